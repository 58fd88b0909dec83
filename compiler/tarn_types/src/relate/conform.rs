//! Structural conformance of a type to an interface or trait.

use crate::env::resolve_nominal;
use crate::{DefnId, DefnKind, Env, InvariantViolation, MemberRef, NameLookup};

use super::{ConversionRank, Operand, Query, QueryKey, TypeRelation};

impl TypeRelation<'_> {
    /// Whether declaration `src` provides every member `dst` requires,
    /// regardless of whether it declares `dst` as a base.
    ///
    /// `dst`'s own bases are required first. Then every function and field
    /// member of `dst` must be matched by a non-static member of `src` found
    /// through inherited lookup: a function whose type converts at rank
    /// `NonPreferred` or better, or a field of equal type. A conformance
    /// query that depends on itself is assumed to hold.
    #[tracing::instrument(level = "trace", skip_all, fields(?src, ?dst))]
    pub fn implements_members(
        &mut self,
        src: DefnId,
        src_env: &Env,
        dst: DefnId,
        dst_env: &Env,
    ) -> Result<bool, InvariantViolation> {
        let key = QueryKey::defns(Query::Conform, dst, dst_env, src, src_env);
        self.cached(key, true, |this| this.conform(src, src_env, dst, dst_env))
    }

    fn conform(
        &mut self,
        src: DefnId,
        src_env: &Env,
        dst: DefnId,
        dst_env: &Env,
    ) -> Result<bool, InvariantViolation> {
        let defns = self.defns;
        let Some(required) = defns.get(dst).as_type() else {
            return Ok(false);
        };

        for &edge in required.extends.iter().chain(&required.implements) {
            let Some((base, base_env)) = resolve_nominal(self.store, defns, edge, dst_env) else {
                continue;
            };
            if !self.implements_members(src, src_env, base, &base_env)? {
                tracing::debug!(?base, "base requirement not met");
                return Ok(false);
            }
        }

        for &member in &required.members {
            let member_defn = defns.get(member);
            let is_function = match member_defn.kind {
                DefnKind::Function => true,
                DefnKind::Let | DefnKind::Var | DefnKind::Const => false,
                _ => continue,
            };

            let mut candidates = Vec::new();
            NameLookup::new(self.store, defns).lookup_inherited(
                member_defn.name,
                src,
                src_env,
                false,
                &mut candidates,
            );
            if candidates.is_empty() {
                tracing::debug!(?member, "no candidate for required member");
                return Ok(false);
            }
            // A requirement of unknown type cannot be checked.
            let Some(required_ty) = self.member_type(member) else {
                tracing::debug!(?member, "required member has no type");
                return Ok(false);
            };

            let required_op = Operand::new(required_ty, dst_env);
            let satisfied = if is_function {
                self.any_function_converts(required_op, &candidates)?
            } else {
                self.any_field_matches(required_op, &candidates)?
            };
            if !satisfied {
                tracing::debug!(?member, "no candidate satisfies required member");
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn any_function_converts(
        &mut self,
        required: Operand<'_>,
        candidates: &[MemberRef],
    ) -> Result<bool, InvariantViolation> {
        for candidate in candidates {
            let defn = self.defns.get(candidate.defn);
            if defn.kind != DefnKind::Function || defn.is_static() {
                continue;
            }
            let Some(ty) = self.function_type(candidate.defn) else {
                continue;
            };
            let rank = self.convert(required, Operand::new(ty, &candidate.env))?;
            // Structural conformance of the return type ranks `NonPreferred`
            // and still satisfies the requirement.
            if rank >= ConversionRank::NonPreferred {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn any_field_matches(
        &mut self,
        required: Operand<'_>,
        candidates: &[MemberRef],
    ) -> Result<bool, InvariantViolation> {
        for candidate in candidates {
            let defn = self.defns.get(candidate.defn);
            if !defn.kind.is_value() || defn.is_static() {
                continue;
            }
            let Some(ty) = defn.declared_type() else {
                continue;
            };
            if self.is_equal(required, Operand::new(ty, &candidate.env))? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
