//! Canonicalizing type store.
//!
//! The store owns every derived type and hands out `Idx` handles. Interning
//! guarantees that structurally identical types share one `Idx`, which is
//! what lets the rest of the compiler treat type identity as index equality.
//!
//! # Layout
//!
//! - `kinds[idx]`: the [`TypeKind`] of each type
//! - `flags[idx]`: [`TypeFlags`] computed once at interning time
//! - `map`: `TypeKind -> Idx` for lookup-or-insert
//! - `specs` / `spec_map`: interned [`SpecializedDefn`]s
//! - `infer`: constraint records for inference placeholders
//!
//! Primitives are interned first, at the fixed indices named by the `Idx`
//! constants.

mod construct;
mod format;

use rustc_hash::FxHashMap;

use crate::{DefnId, Idx, InferVar, SpecId, TypeFlags, TypeKind};

/// A generic declaration applied to concrete type arguments.
///
/// Holds only the substitution, never a copy of the generic's members.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct SpecializedDefn {
    pub generic: DefnId,
    pub args: Box<[Idx]>,
}

/// Constraints recorded against an inference placeholder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InferConstraints {
    /// Types the placeholder must equal.
    pub equivalents: Vec<Idx>,
    /// Subtype constraints: the placeholder is a supertype of each.
    pub lower: Vec<Idx>,
    /// Supertype constraints: the placeholder is a subtype of each.
    pub upper: Vec<Idx>,
}

/// Interning factory and owner of all types of one compilation.
#[derive(Clone, Debug)]
pub struct TypeStore {
    kinds: Vec<TypeKind>,
    flags: Vec<TypeFlags>,
    map: FxHashMap<TypeKind, Idx>,
    specs: Vec<SpecializedDefn>,
    spec_map: FxHashMap<SpecializedDefn, SpecId>,
    infer: Vec<InferConstraints>,
}

impl TypeStore {
    /// Create a store holding only the primitive singletons.
    pub fn new() -> Self {
        let mut store = TypeStore {
            kinds: Vec::with_capacity(256),
            flags: Vec::with_capacity(256),
            map: FxHashMap::default(),
            specs: Vec::new(),
            spec_map: FxHashMap::default(),
            infer: Vec::new(),
        };

        // Order must match the `Idx` primitive constants.
        let primitives = [
            TypeKind::Void,
            TypeKind::Bool,
            TypeKind::Int { bits: 8, signed: true },
            TypeKind::Int { bits: 16, signed: true },
            TypeKind::Int { bits: 32, signed: true },
            TypeKind::Int { bits: 64, signed: true },
            TypeKind::Int { bits: 8, signed: false },
            TypeKind::Int { bits: 16, signed: false },
            TypeKind::Int { bits: 32, signed: false },
            TypeKind::Int { bits: 64, signed: false },
            TypeKind::Float { bits: 32 },
            TypeKind::Float { bits: 64 },
        ];
        for kind in primitives {
            store.intern(kind);
        }
        debug_assert_eq!(store.len(), Idx::PRIMITIVE_COUNT as usize);

        store
    }

    /// Look up or insert a type.
    pub(crate) fn intern(&mut self, kind: TypeKind) -> Idx {
        if let Some(&idx) = self.map.get(&kind) {
            return idx;
        }

        let flags = self.compute_flags(&kind);
        let raw = u32::try_from(self.kinds.len()).unwrap_or_else(|_| {
            panic!("type store exceeded u32::MAX types");
        });
        let idx = Idx::from_raw(raw);

        self.kinds.push(kind.clone());
        self.flags.push(flags);
        self.map.insert(kind, idx);
        idx
    }

    fn compute_flags(&self, kind: &TypeKind) -> TypeFlags {
        let own = match kind {
            TypeKind::Void | TypeKind::Bool | TypeKind::Int { .. } | TypeKind::Float { .. } => {
                TypeFlags::IS_PRIMITIVE
            }
            TypeKind::Tuple(_) | TypeKind::Union(_) | TypeKind::Function { .. } => {
                TypeFlags::IS_STRUCTURAL
            }
            TypeKind::Nominal { .. } | TypeKind::Alias(_) => {
                TypeFlags::IS_NOMINAL | TypeFlags::HAS_NOMINAL
            }
            TypeKind::TypeVar(_) => TypeFlags::HAS_TYPE_VAR,
            TypeKind::Specialized(spec) => {
                let args = self.specs[spec.index()]
                    .args
                    .iter()
                    .fold(TypeFlags::empty(), |acc, &arg| acc | self.flags(arg).propagated());
                TypeFlags::HAS_SPECIALIZED | TypeFlags::IS_NOMINAL | args
            }
            TypeKind::Modified { .. } => TypeFlags::HAS_QUALIFIER,
            TypeKind::Contingent(_) => TypeFlags::HAS_CONTINGENT,
            TypeKind::Inferred(_) => TypeFlags::HAS_INFER,
        };

        kind.children()
            .into_iter()
            .fold(own, |acc, child| acc | self.flags(child).propagated())
    }

    /// Shape of a type.
    ///
    /// # Panics
    /// Panics if `idx` was not produced by this store.
    #[inline]
    pub fn kind(&self, idx: Idx) -> &TypeKind {
        &self.kinds[idx.index()]
    }

    /// Cached flags of a type.
    #[inline]
    pub fn flags(&self, idx: Idx) -> TypeFlags {
        self.flags[idx.index()]
    }

    /// The specialization behind a `SpecId`.
    #[inline]
    pub fn spec(&self, id: SpecId) -> &SpecializedDefn {
        &self.specs[id.index()]
    }

    /// Constraints recorded for an inference placeholder.
    #[inline]
    pub fn infer_constraints(&self, var: InferVar) -> &InferConstraints {
        &self.infer[var.index()]
    }

    /// Number of interned types, primitives included.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Check if nothing beyond the primitives has been interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= Idx::PRIMITIVE_COUNT as usize
    }

    /// Number of interned specializations.
    pub fn spec_count(&self) -> usize {
        self.specs.len()
    }
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}
