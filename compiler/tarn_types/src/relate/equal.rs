//! Type equality.

use crate::{DefnId, Env, Idx, InferVar, InvariantViolation, TypeKind};

use super::{Norm, Operand, Query, QueryKey, TypeRelation};

impl TypeRelation<'_> {
    /// Whether `dst` and `src` denote the same type.
    ///
    /// Qualifiers must match exactly. Generic declarations are invariant:
    /// two uses of one declaration are equal only when every type
    /// parameter is bound to equal types on both sides.
    #[tracing::instrument(level = "trace", skip_all, fields(dst = ?dst.ty, src = ?src.ty))]
    pub fn is_equal(
        &mut self,
        dst: Operand<'_>,
        src: Operand<'_>,
    ) -> Result<bool, InvariantViolation> {
        if self.trivially_equal(dst, src) {
            return Ok(true);
        }
        let dst = self.normalize(dst)?;
        let src = self.normalize(src)?;
        if dst.quals != src.quals {
            return Ok(false);
        }
        if self.trivially_equal(dst.operand(), src.operand()) {
            return Ok(true);
        }

        let key = QueryKey::types(Query::Equal, dst.operand(), src.operand());
        self.cached(key, false, |this| this.equal_shapes(&dst, &src))
    }

    /// Equality of two unqualified types with no bindings.
    pub fn types_equal(&mut self, a: Idx, b: Idx) -> Result<bool, InvariantViolation> {
        self.is_equal(Operand::plain(a), Operand::plain(b))
    }

    fn equal_shapes(&mut self, dst: &Norm<'_>, src: &Norm<'_>) -> Result<bool, InvariantViolation> {
        let dst_kind = self.store.kind(dst.ty).clone();
        let src_kind = self.store.kind(src.ty).clone();

        match (dst_kind, src_kind) {
            (TypeKind::Inferred(var), _) => self.equal_inferred(var, src),
            (_, TypeKind::Inferred(var)) => self.equal_inferred(var, dst),

            (TypeKind::Contingent(candidates), _) => {
                self.all_equal(&candidates, &dst.env, src.base())
            }
            (_, TypeKind::Contingent(candidates)) => {
                self.all_equal(&candidates, &src.env, dst.base())
            }

            (
                TypeKind::Int {
                    bits: dst_bits,
                    signed: dst_signed,
                },
                TypeKind::Int {
                    bits: src_bits,
                    signed: src_signed,
                },
            ) => Ok(dst_bits == src_bits && dst_signed == src_signed),
            (TypeKind::Float { bits: dst_bits }, TypeKind::Float { bits: src_bits }) => {
                Ok(dst_bits == src_bits)
            }

            (TypeKind::Nominal { defn: dst_defn, .. }, TypeKind::Nominal { defn: src_defn, .. }) => {
                if dst_defn != src_defn {
                    return Ok(false);
                }
                self.equal_bindings(dst_defn, &dst.env, &src.env)
            }

            // Normalization leaves only unbound variables.
            (TypeKind::TypeVar(dst_param), TypeKind::TypeVar(src_param)) => {
                Ok(dst_param == src_param)
            }

            (TypeKind::Tuple(dst_members), TypeKind::Tuple(src_members)) => {
                if dst_members.len() != src_members.len() {
                    return Ok(false);
                }
                self.pairwise_equal(&dst_members, &dst.env, &src_members, &src.env)
            }
            (TypeKind::Union(dst_members), TypeKind::Union(src_members)) => {
                Ok(self.covers(&dst_members, &dst.env, &src_members, &src.env)?
                    && self.covers(&src_members, &src.env, &dst_members, &dst.env)?)
            }
            (
                TypeKind::Function {
                    ret: dst_ret,
                    params: dst_params,
                },
                TypeKind::Function {
                    ret: src_ret,
                    params: src_params,
                },
            ) => {
                if dst_params.len() != src_params.len() {
                    return Ok(false);
                }
                if !self.is_equal(
                    Operand::new(dst_ret, &dst.env),
                    Operand::new(src_ret, &src.env),
                )? {
                    return Ok(false);
                }
                self.pairwise_equal(&dst_params, &dst.env, &src_params, &src.env)
            }

            // Void and bool are singletons: distinct handles are distinct types.
            _ => Ok(false),
        }
    }

    /// Whether every type parameter of `defn` is bound to equal types in
    /// both environments. A parameter with no binding stands for itself.
    pub(super) fn equal_bindings(
        &mut self,
        defn: DefnId,
        dst_env: &Env,
        src_env: &Env,
    ) -> Result<bool, InvariantViolation> {
        for param in self.defns.all_type_params(defn) {
            let Some(var) = self.defns.param_var(param) else {
                continue;
            };
            let dst_ty = dst_env.find(param).unwrap_or(var);
            let src_ty = src_env.find(param).unwrap_or(var);
            if !self.is_equal(Operand::plain(dst_ty), Operand::plain(src_ty))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// An inference placeholder equals `other` when one of its recorded
    /// equivalences does, or when `other` equals both a recorded lower bound
    /// and a recorded upper bound.
    fn equal_inferred(&mut self, var: InferVar, other: &Norm<'_>) -> Result<bool, InvariantViolation> {
        let constraints = self.store.infer_constraints(var).clone();
        let other = other.base();

        for &ty in &constraints.equivalents {
            if self.is_equal(Operand::plain(ty), other)? {
                return Ok(true);
            }
        }
        if constraints.lower.is_empty() || constraints.upper.is_empty() {
            return Ok(false);
        }
        Ok(self.any_equal(&constraints.lower, Env::empty(), other)?
            && self.any_equal(&constraints.upper, Env::empty(), other)?)
    }

    fn pairwise_equal(
        &mut self,
        dst: &[Idx],
        dst_env: &Env,
        src: &[Idx],
        src_env: &Env,
    ) -> Result<bool, InvariantViolation> {
        for (&d, &s) in dst.iter().zip(src) {
            if !self.is_equal(Operand::new(d, dst_env), Operand::new(s, src_env))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Every member of `members` equals some member of `targets`.
    fn covers(
        &mut self,
        members: &[Idx],
        members_env: &Env,
        targets: &[Idx],
        targets_env: &Env,
    ) -> Result<bool, InvariantViolation> {
        for &member in members {
            if !self.any_equal(targets, targets_env, Operand::new(member, members_env))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn any_equal(
        &mut self,
        candidates: &[Idx],
        env: &Env,
        other: Operand<'_>,
    ) -> Result<bool, InvariantViolation> {
        for &candidate in candidates {
            if self.is_equal(Operand::new(candidate, env), other)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn all_equal(
        &mut self,
        candidates: &[Idx],
        env: &Env,
        other: Operand<'_>,
    ) -> Result<bool, InvariantViolation> {
        for &candidate in candidates {
            if !self.is_equal(Operand::new(candidate, env), other)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
