//! Compiler-internal contract violations.
//!
//! Semantic findings (mismatched types, unmet interfaces, missing names) are
//! never errors here: predicates answer `false`, `Incompatible`, or an empty
//! result set and the caller decides what to report. `InvariantViolation`
//! is reserved for inputs no well-formed upstream pass can produce.

use crate::{DefnId, Idx};

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    /// `specialize` called with the wrong number of type arguments.
    #[error("specialization of {generic:?} expects {expected} type arguments, found {found}")]
    ArityMismatch {
        generic: DefnId,
        expected: usize,
        found: usize,
    },

    /// `specialize` called on a declaration without type parameters.
    #[error("{defn:?} has no type parameters and cannot be specialized")]
    NotGeneric { defn: DefnId },

    /// A union was requested with no members.
    #[error("union type requires at least one member")]
    EmptyUnion,

    /// A provisional qualifier reached a comparison before finalization.
    #[error("type {ty:?} carries a provisional qualifier and cannot be compared")]
    ProvisionalQualifier { ty: Idx },

    /// An alias was dereferenced before its target was set.
    #[error("alias {defn:?} has no target")]
    MissingAliasTarget { defn: DefnId },

    /// Nesting exceeded the configured limit; the graph is malformed or cyclic.
    #[error("type relation exceeded recursion limit of {limit}")]
    RecursionLimit { limit: u32 },
}
