//! Generic type core for Tarn.
//!
//! - [`TypeStore`]: canonicalizing factory; structurally identical types
//!   share one [`Idx`]
//! - [`DefnGraph`]: declarations and their `extends` / `implements` edges
//! - [`Env`] / [`EnvChain`]: substitutions realizing generic declarations
//! - [`TypeRelation`]: equality, subtyping, conversion ranking and
//!   structural conformance
//! - [`NameLookup`]: member lookup with inheritance and shadowing
//!
//! # Example
//!
//! ```
//! use tarn_types::{Idx, Operand, TypeRelation, TypeStore, DefnGraph};
//!
//! let mut store = TypeStore::new();
//! let defns = DefnGraph::new();
//!
//! let ab = store.union(&[Idx::I16, Idx::I32]).unwrap();
//! let ba = store.union(&[Idx::I32, Idx::I16]).unwrap();
//! assert_eq!(ab, ba);
//!
//! let mut relation = TypeRelation::new(&mut store, &defns);
//! assert!(relation.is_equal(Operand::plain(ab), Operand::plain(ba)).unwrap());
//! ```
//!
//! Semantic findings are answers (`false`, `Incompatible`, no members).
//! [`InvariantViolation`] is returned only for inputs a well-formed
//! upstream pass cannot produce.

mod defn;
mod env;
mod error;
mod flags;
mod guard;
mod idx;
mod kind;
mod lookup;
mod relate;
mod store;

pub use defn::{
    Defn, DefnBody, DefnGraph, DefnHeader, DefnKind, FunctionDefn, ModuleDefn, SymbolTable,
    TypeDefn, TypeParamDefn, ValueDefn, Visibility,
};
pub use env::{resolve_nominal, subst, Env, EnvChain, EnvKey};
pub use error::InvariantViolation;
pub use flags::{Modifiers, Qualifiers, TypeFlags};
pub use guard::ensure_sufficient_stack;
pub use idx::{DefnId, Idx, InferVar, SpecId};
pub use kind::{NominalKind, TypeKind};
pub use lookup::{MemberRef, NameLookup, Stem};
pub use relate::{
    ConversionRank, Operand, RelationConfig, TypeRelation, TypeResolver, DEFAULT_MAX_DEPTH,
};
pub use store::{InferConstraints, SpecializedDefn, TypeStore};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Operand;
    // Idx (4) + Qualifiers (1, padded) + &Env (8)
    tarn_ir::static_assert_size!(Operand<'static>, 16);
}
