//! Stable handles into the type store and the declaration graph.
//!
//! Every node in the type graph is addressed by an [`Idx`], every
//! declaration by a [`DefnId`], every specialization by a [`SpecId`], and
//! every inference placeholder by an [`InferVar`]. Handles are plain 32-bit
//! indices: comparing two handles from the same store is comparing identity.

use std::fmt;

/// A 32-bit index into the [`TypeStore`](crate::TypeStore).
///
/// Derived types are interned, so two structurally identical types created
/// through the same store always share one `Idx`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Primitive singletons (pre-interned, fixed indices) ===

    /// `void`.
    pub const VOID: Self = Self(0);
    /// `bool`.
    pub const BOOL: Self = Self(1);
    /// Signed 8-bit integer.
    pub const I8: Self = Self(2);
    /// Signed 16-bit integer.
    pub const I16: Self = Self(3);
    /// Signed 32-bit integer.
    pub const I32: Self = Self(4);
    /// Signed 64-bit integer.
    pub const I64: Self = Self(5);
    /// Unsigned 8-bit integer.
    pub const U8: Self = Self(6);
    /// Unsigned 16-bit integer.
    pub const U16: Self = Self(7);
    /// Unsigned 32-bit integer.
    pub const U32: Self = Self(8);
    /// Unsigned 64-bit integer.
    pub const U64: Self = Self(9);
    /// 32-bit float.
    pub const F32: Self = Self(10);
    /// 64-bit float.
    pub const F64: Self = Self(11);

    /// Number of pre-interned primitive types.
    pub const PRIMITIVE_COUNT: u32 = 12;

    /// Sentinel for "no type".
    pub const NONE: Self = Self(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the pre-interned primitive singletons.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::PRIMITIVE_COUNT
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Source spelling of a primitive, `None` for derived types.
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("void"),
            1 => Some("bool"),
            2 => Some("i8"),
            3 => Some("i16"),
            4 => Some("i32"),
            5 => Some("i64"),
            6 => Some("u8"),
            7 => Some("u16"),
            8 => Some("u32"),
            9 => Some("u64"),
            10 => Some("f32"),
            11 => Some("f64"),
            _ => None,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Idx::{}", name.to_ascii_uppercase()),
            None if self.is_none() => write!(f, "Idx::NONE"),
            None => write!(f, "Idx({})", self.0),
        }
    }
}

/// Handle to a declaration in the [`DefnGraph`](crate::DefnGraph).
///
/// Type parameters are declarations too, so a `DefnId` is also the identity
/// of a type variable and the key of every substitution environment.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct DefnId(u32);

impl DefnId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for DefnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DefnId({})", self.0)
    }
}

/// Handle to an interned [`SpecializedDefn`](crate::SpecializedDefn).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct SpecId(u32);

impl SpecId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Inference placeholder id.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct InferVar(u32);

impl InferVar {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{DefnId, Idx};
    tarn_ir::static_assert_size!(Idx, 4);
    tarn_ir::static_assert_size!(DefnId, 4);
    tarn_ir::static_assert_size!(Option<super::SpecId>, 8);
}
