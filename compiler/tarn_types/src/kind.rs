//! The closed set of type shapes stored in the [`TypeStore`](crate::TypeStore).

use crate::{DefnId, Idx, InferVar, Qualifiers, SpecId};

/// Category of a nominal (declaration-backed) type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum NominalKind {
    Class,
    Struct,
    Interface,
    Trait,
    Enum,
    Extension,
}

impl NominalKind {
    /// Interfaces and traits: satisfied through `implements` edges or
    /// structural conformance.
    #[inline]
    pub const fn is_trait_like(self) -> bool {
        matches!(self, Self::Interface | Self::Trait)
    }

    /// Everything that can carry state and inherit through `extends`.
    #[inline]
    pub const fn is_class_like(self) -> bool {
        !self.is_trait_like()
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Trait => "trait",
            Self::Enum => "enum",
            Self::Extension => "extend",
        }
    }
}

/// Type shape.
///
/// Children are referenced by `Idx`, so the enum doubles as the interning
/// key: two equal `TypeKind` values always map to the same `Idx`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKind {
    Void,
    Bool,
    Int {
        bits: u8,
        signed: bool,
    },
    Float {
        bits: u8,
    },

    /// Ordered members; order is part of the identity.
    Tuple(Box<[Idx]>),
    /// Members sorted by `Idx` and deduplicated at construction.
    Union(Box<[Idx]>),
    Function {
        ret: Idx,
        params: Box<[Idx]>,
    },

    /// Class, struct, interface, trait, enum or extension declaration.
    Nominal {
        kind: NominalKind,
        defn: DefnId,
    },
    /// Transparent name for the alias declaration's target.
    Alias(DefnId),
    /// Generic parameter slot; the `DefnId` is the parameter declaration.
    TypeVar(DefnId),
    /// Generic declaration applied to arguments, not yet reduced.
    Specialized(SpecId),
    /// Qualifier wrapper. Never nests: wrapping a wrapper merges qualifiers.
    Modified {
        base: Idx,
        quals: Qualifiers,
    },

    /// Candidate set awaiting overload selection.
    Contingent(Box<[Idx]>),
    /// Inference placeholder; constraints live in the store.
    Inferred(InferVar),
}

impl TypeKind {
    /// Child types, in declaration order (return type first for functions).
    pub fn children(&self) -> Vec<Idx> {
        match self {
            Self::Tuple(members) | Self::Union(members) | Self::Contingent(members) => {
                members.to_vec()
            }
            Self::Function { ret, params } => {
                let mut out = Vec::with_capacity(params.len() + 1);
                out.push(*ret);
                out.extend_from_slice(params);
                out
            }
            Self::Modified { base, .. } => vec![*base],
            Self::Void
            | Self::Bool
            | Self::Int { .. }
            | Self::Float { .. }
            | Self::Nominal { .. }
            | Self::Alias(_)
            | Self::TypeVar(_)
            | Self::Specialized(_)
            | Self::Inferred(_) => Vec::new(),
        }
    }

    pub const fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Void | Self::Bool | Self::Int { .. } | Self::Float { .. }
        )
    }
}
