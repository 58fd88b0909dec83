//! Type substitution through an environment chain.

use crate::guard::ensure_sufficient_stack;
use crate::{Idx, TypeKind, TypeStore};

use super::EnvChain;

/// Replace every type variable bound in `chain` and return the canonical
/// result.
///
/// Types without type variables are returned untouched, and composite types
/// whose children did not change keep their original `Idx`. Bindings are
/// not substituted again: a binding that mentions type variables of an
/// outer scope is taken as already expressed in that scope.
pub fn subst(store: &mut TypeStore, ty: Idx, chain: &EnvChain<'_>) -> Idx {
    if !store.flags(ty).has_type_var() {
        return ty;
    }
    ensure_sufficient_stack(|| subst_inner(store, ty, chain))
}

fn subst_inner(store: &mut TypeStore, ty: Idx, chain: &EnvChain<'_>) -> Idx {
    match store.kind(ty).clone() {
        TypeKind::TypeVar(param) => chain.find(param).unwrap_or(ty),
        TypeKind::Tuple(members) => match subst_all(store, &members, chain) {
            Some(members) => store.tuple(&members),
            None => ty,
        },
        TypeKind::Union(members) => match subst_all(store, &members, chain) {
            Some(members) => store.union_unchecked(&members),
            None => ty,
        },
        TypeKind::Contingent(members) => match subst_all(store, &members, chain) {
            Some(members) => store.contingent(&members),
            None => ty,
        },
        TypeKind::Function { ret, params } => {
            let new_ret = subst(store, ret, chain);
            match subst_all(store, &params, chain) {
                Some(params) => store.function(new_ret, &params),
                None if new_ret != ret => store.function(new_ret, &params),
                None => ty,
            }
        }
        TypeKind::Specialized(spec) => {
            let args = store.spec(spec).args.clone();
            match subst_all(store, &args, chain) {
                Some(args) => store.respecialize(spec, &args),
                None => ty,
            }
        }
        TypeKind::Modified { base, quals } => {
            let new_base = subst(store, base, chain);
            if new_base == base {
                ty
            } else {
                store.modified(new_base, quals)
            }
        }
        TypeKind::Void
        | TypeKind::Bool
        | TypeKind::Int { .. }
        | TypeKind::Float { .. }
        | TypeKind::Nominal { .. }
        | TypeKind::Alias(_)
        | TypeKind::Inferred(_) => ty,
    }
}

/// Substitute each member; `None` when nothing changed.
fn subst_all(store: &mut TypeStore, members: &[Idx], chain: &EnvChain<'_>) -> Option<Vec<Idx>> {
    let mut changed = false;
    let out: Vec<Idx> = members
        .iter()
        .map(|&member| {
            let new = subst(store, member, chain);
            changed |= new != member;
            new
        })
        .collect();
    changed.then_some(out)
}
