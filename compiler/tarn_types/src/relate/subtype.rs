//! Nominal subtyping over the declaration graph.

use crate::env::resolve_nominal;
use crate::{DefnId, Env, InvariantViolation, TypeKind};

use super::{Norm, Operand, Query, QueryKey, TypeRelation};

impl TypeRelation<'_> {
    /// Whether declaration `sub` seen through `sub_env` is a subtype of
    /// `sup` seen through `sup_env`.
    ///
    /// Subtyping is the existence of an inheritance path: every `extends`
    /// (and, when `sup` is an interface or trait, `implements`) edge of
    /// `sub` is followed depth-first with its type arguments transformed
    /// through the current environment, and the first path that reaches
    /// `sup` with equal bindings wins.
    #[tracing::instrument(level = "trace", skip_all, fields(?sub, ?sup))]
    pub fn is_subtype(
        &mut self,
        sub: DefnId,
        sub_env: &Env,
        sup: DefnId,
        sup_env: &Env,
    ) -> Result<bool, InvariantViolation> {
        if sub == sup {
            return self.equal_bindings(sub, sub_env, sup_env);
        }
        let key = QueryKey::defns(Query::Subtype, sup, sup_env, sub, sub_env);
        self.cached(key, false, |this| this.search_bases(sub, sub_env, sup, sup_env))
    }

    fn search_bases(
        &mut self,
        sub: DefnId,
        sub_env: &Env,
        sup: DefnId,
        sup_env: &Env,
    ) -> Result<bool, InvariantViolation> {
        let defns = self.defns;
        let (Some(sub_defn), Some(sup_kind)) = (defns.get(sub).as_type(), defns.get(sup).category())
        else {
            return Ok(false);
        };
        let Some(sub_kind) = sub_defn.category else {
            return Ok(false);
        };

        // A class reaches an interface through its own `implements` list or
        // through a superclass, so both edge kinds are searched.
        let implemented: &[_] = if sup_kind.is_trait_like() && sub_kind.is_class_like() {
            &sub_defn.implements
        } else {
            &[]
        };

        for &edge in implemented.iter().chain(&sub_defn.extends) {
            let Some((base, base_env)) = resolve_nominal(self.store, defns, edge, sub_env) else {
                continue;
            };
            if self.is_subtype(base, &base_env, sup, sup_env)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// [`is_subtype`](Self::is_subtype) lifted to types.
    ///
    /// Nominal and specialized types compare through their declarations. An
    /// unbound type variable is a subtype of anything one of its bounds is a
    /// subtype of. Any other pair is a subtype only when equal.
    #[tracing::instrument(level = "trace", skip_all, fields(sub = ?sub.ty, sup = ?sup.ty))]
    pub fn is_subtype_type(
        &mut self,
        sub: Operand<'_>,
        sup: Operand<'_>,
    ) -> Result<bool, InvariantViolation> {
        if self.is_equal(sup, sub)? {
            return Ok(true);
        }
        let sub = self.normalize(sub)?;
        let sup = self.normalize(sup)?;
        let key = QueryKey::types(Query::Subtype, sup.base(), sub.base());
        self.cached(key, false, |this| this.subtype_shapes(&sub, &sup))
    }

    fn subtype_shapes(&mut self, sub: &Norm<'_>, sup: &Norm<'_>) -> Result<bool, InvariantViolation> {
        match (self.store.kind(sub.ty), self.store.kind(sup.ty)) {
            (
                &TypeKind::Nominal { defn: sub_defn, .. },
                &TypeKind::Nominal { defn: sup_defn, .. },
            ) => self.is_subtype(sub_defn, &sub.env, sup_defn, &sup.env),
            (&TypeKind::TypeVar(param), _) => {
                let bounds = self
                    .defns
                    .get(param)
                    .as_type_param()
                    .map(|p| p.bounds.clone())
                    .unwrap_or_default();
                for bound in bounds {
                    if self.is_subtype_type(Operand::new(bound, &sub.env), sup.base())? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            _ => Ok(false),
        }
    }
}
