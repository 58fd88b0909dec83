//! Tarn IR vocabulary shared by every compiler phase.
//!
//! - `Name`: interned identifier, a 32-bit handle with O(1) equality
//! - `StringInterner`: owner of the identifier text behind every `Name`
//! - `Span`: compact byte range into a source file
//!
//! Declarations and types reference each other through these handles only,
//! so the graphs built on top of them stay `Copy`-friendly and serializable.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod interner;
mod name;
mod span;

pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use span::Span;
