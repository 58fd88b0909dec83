//! Type construction helpers for the store.
//!
//! Every constructor goes through `intern`, so repeating a call with the
//! same arguments returns the same `Idx`.

use crate::{
    DefnGraph, DefnId, Idx, InferVar, InvariantViolation, NominalKind, Qualifiers, SpecId,
    SpecializedDefn, TypeKind, TypeStore,
};

use super::InferConstraints;

impl TypeStore {
    // === Primitives ===

    /// Integer type of the given width. Standard widths return the
    /// pre-interned singletons.
    pub fn int(&mut self, bits: u8, signed: bool) -> Idx {
        self.intern(TypeKind::Int { bits, signed })
    }

    /// Float type of the given width.
    pub fn float(&mut self, bits: u8) -> Idx {
        self.intern(TypeKind::Float { bits })
    }

    // === Structural types ===

    /// Tuple type. Member order is part of the key.
    pub fn tuple(&mut self, members: &[Idx]) -> Idx {
        self.intern(TypeKind::Tuple(members.into()))
    }

    /// Union type.
    ///
    /// Nested unions are flattened, members are sorted by `Idx` and
    /// deduplicated, and a single surviving member is returned unwrapped,
    /// so `A | B`, `B | A` and `A | B | A` all intern to one type.
    pub fn union(&mut self, members: &[Idx]) -> Result<Idx, InvariantViolation> {
        if members.is_empty() {
            return Err(InvariantViolation::EmptyUnion);
        }
        Ok(self.union_unchecked(members))
    }

    /// Union over a member list known to be non-empty.
    pub(crate) fn union_unchecked(&mut self, members: &[Idx]) -> Idx {
        let mut flat = Vec::with_capacity(members.len());
        for &member in members {
            match self.kind(member) {
                TypeKind::Union(inner) => flat.extend_from_slice(inner),
                _ => flat.push(member),
            }
        }
        flat.sort_unstable();
        flat.dedup();

        match flat.as_slice() {
            [single] => *single,
            _ => self.intern(TypeKind::Union(flat.into_boxed_slice())),
        }
    }

    /// Function type keyed by `(ret, params)`.
    pub fn function(&mut self, ret: Idx, params: &[Idx]) -> Idx {
        self.intern(TypeKind::Function {
            ret,
            params: params.into(),
        })
    }

    // === Declaration-backed types ===

    /// Nominal type of a type declaration. Normally created by
    /// [`DefnGraph::add_type`].
    pub fn nominal(&mut self, kind: NominalKind, defn: DefnId) -> Idx {
        self.intern(TypeKind::Nominal { kind, defn })
    }

    /// Alias type of an alias declaration.
    pub fn alias(&mut self, defn: DefnId) -> Idx {
        self.intern(TypeKind::Alias(defn))
    }

    /// Type variable of a type-parameter declaration.
    pub fn type_var(&mut self, param: DefnId) -> Idx {
        self.intern(TypeKind::TypeVar(param))
    }

    /// Canonical specialization of `generic` with `args`.
    ///
    /// `args` must supply one type per entry of
    /// [`DefnGraph::all_type_params`]; anything else is a contract violation.
    pub fn specialize(
        &mut self,
        defns: &DefnGraph,
        generic: DefnId,
        args: &[Idx],
    ) -> Result<SpecId, InvariantViolation> {
        let expected = defns.all_type_params(generic).len();
        if expected == 0 {
            return Err(InvariantViolation::NotGeneric { defn: generic });
        }
        if expected != args.len() {
            return Err(InvariantViolation::ArityMismatch {
                generic,
                expected,
                found: args.len(),
            });
        }
        Ok(self.intern_spec(generic, args))
    }

    /// Interned `Specialized` type for `generic` applied to `args`.
    pub fn specialized_type(
        &mut self,
        defns: &DefnGraph,
        generic: DefnId,
        args: &[Idx],
    ) -> Result<Idx, InvariantViolation> {
        let spec = self.specialize(defns, generic, args)?;
        Ok(self.intern(TypeKind::Specialized(spec)))
    }

    /// Rebuild an existing specialization with new arguments of the same
    /// arity, as substitution does.
    pub(crate) fn respecialize(&mut self, spec: SpecId, args: &[Idx]) -> Idx {
        let generic = self.spec(spec).generic;
        debug_assert_eq!(self.spec(spec).args.len(), args.len());
        let spec = self.intern_spec(generic, args);
        self.intern(TypeKind::Specialized(spec))
    }

    fn intern_spec(&mut self, generic: DefnId, args: &[Idx]) -> SpecId {
        let key = SpecializedDefn {
            generic,
            args: args.into(),
        };
        if let Some(&id) = self.spec_map.get(&key) {
            return id;
        }
        let raw = u32::try_from(self.specs.len()).unwrap_or_else(|_| {
            panic!("type store exceeded u32::MAX specializations");
        });
        let id = SpecId::from_raw(raw);
        self.specs.push(key.clone());
        self.spec_map.insert(key, id);
        id
    }

    // === Qualifiers ===

    /// Const-qualified `base`. A provisional qualifier must be finalized
    /// with [`finalize_const`](Self::finalize_const) before the type takes
    /// part in equality.
    pub fn const_type(&mut self, base: Idx, provisional: bool) -> Idx {
        let mut quals = Qualifiers::CONST;
        if provisional {
            quals |= Qualifiers::PROVISIONAL;
        }
        self.modified(base, quals)
    }

    /// Qualifier wrapper. Wrapping an existing wrapper merges the
    /// qualifiers; an empty qualifier set returns `base` itself.
    pub fn modified(&mut self, base: Idx, quals: Qualifiers) -> Idx {
        if quals.is_empty() {
            return base;
        }
        let (base, quals) = match *self.kind(base) {
            TypeKind::Modified {
                base: inner,
                quals: existing,
            } => (inner, existing | quals),
            _ => (base, quals),
        };
        self.intern(TypeKind::Modified { base, quals })
    }

    /// Drop every provisional qualifier in `ty`, keeping the const ones.
    ///
    /// Returns `ty` itself when nothing was provisional.
    pub fn finalize_const(&mut self, ty: Idx) -> Idx {
        if !self.flags(ty).contains(crate::TypeFlags::HAS_QUALIFIER) {
            return ty;
        }
        match self.kind(ty).clone() {
            TypeKind::Modified { base, quals } => {
                let base = self.finalize_const(base);
                self.modified(base, quals - Qualifiers::PROVISIONAL)
            }
            TypeKind::Tuple(members) => {
                let members = self.finalize_all(&members);
                self.tuple(&members)
            }
            TypeKind::Union(members) => {
                let members = self.finalize_all(&members);
                self.union_unchecked(&members)
            }
            TypeKind::Contingent(members) => {
                let members = self.finalize_all(&members);
                self.contingent(&members)
            }
            TypeKind::Function { ret, params } => {
                let ret = self.finalize_const(ret);
                let params = self.finalize_all(&params);
                self.function(ret, &params)
            }
            TypeKind::Specialized(spec) => {
                let args = self.spec(spec).args.clone();
                let finalized = self.finalize_all(&args);
                if finalized.as_slice() == &*args {
                    ty
                } else {
                    self.respecialize(spec, &finalized)
                }
            }
            TypeKind::Void
            | TypeKind::Bool
            | TypeKind::Int { .. }
            | TypeKind::Float { .. }
            | TypeKind::Nominal { .. }
            | TypeKind::Alias(_)
            | TypeKind::TypeVar(_)
            | TypeKind::Inferred(_) => ty,
        }
    }

    fn finalize_all(&mut self, members: &[Idx]) -> Vec<Idx> {
        members.iter().map(|&m| self.finalize_const(m)).collect()
    }

    // === Inference ===

    /// Candidate set pending overload selection. A single candidate is
    /// returned unwrapped.
    pub fn contingent(&mut self, candidates: &[Idx]) -> Idx {
        match candidates {
            [single] => *single,
            _ => self.intern(TypeKind::Contingent(candidates.into())),
        }
    }

    /// Fresh inference placeholder with no constraints.
    pub fn fresh_infer(&mut self) -> Idx {
        let raw = u32::try_from(self.infer.len()).unwrap_or_else(|_| {
            panic!("type store exceeded u32::MAX inference variables");
        });
        self.infer.push(InferConstraints::default());
        self.intern(TypeKind::Inferred(InferVar::from_raw(raw)))
    }

    /// Record that `var` must equal `ty`.
    pub fn add_equivalent(&mut self, var: InferVar, ty: Idx) {
        push_unique(&mut self.infer[var.index()].equivalents, ty);
    }

    /// Record that `ty` is a subtype of `var`.
    pub fn add_lower_bound(&mut self, var: InferVar, ty: Idx) {
        push_unique(&mut self.infer[var.index()].lower, ty);
    }

    /// Record that `ty` is a supertype of `var`.
    pub fn add_upper_bound(&mut self, var: InferVar, ty: Idx) {
        push_unique(&mut self.infer[var.index()].upper, ty);
    }

    /// The placeholder behind an `Inferred` type.
    pub fn as_infer_var(&self, ty: Idx) -> Option<InferVar> {
        match *self.kind(ty) {
            TypeKind::Inferred(var) => Some(var),
            _ => None,
        }
    }
}

fn push_unique(list: &mut Vec<Idx>, ty: Idx) {
    if !list.contains(&ty) {
        list.push(ty);
    }
}
