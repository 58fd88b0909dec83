//! Assignability ranking.
//!
//! `convert` answers how well a value of the source type fits a slot of the
//! destination type. Overload resolution compares ranks across candidates,
//! so the ordering of [`ConversionRank`] is part of the contract.

use crate::{Env, Idx, InferVar, InvariantViolation, TypeKind};

use super::{Norm, Operand, Query, QueryKey, TypeRelation};

/// Strength of an implicit conversion, weakest first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConversionRank {
    /// No implicit conversion exists.
    Incompatible,
    /// Integer narrowing.
    Truncation,
    /// Integer sign change.
    SignedUnsigned,
    /// Float narrowing or an integer too wide for the float mantissa.
    PrecisionLoss,
    /// Integer used as a boolean.
    IntegerToBool,
    /// Structural conformance to an interface or trait.
    NonPreferred,
    /// Lossless widening, upcast, or added `const`.
    ExactConversion,
    /// The types are equal.
    IdenticalTypes,
}

impl ConversionRank {
    /// Whether a value converts implicitly at all.
    #[inline]
    pub fn is_convertible(self) -> bool {
        self != Self::Incompatible
    }

    /// Whether the conversion loses nothing.
    #[inline]
    pub fn is_exact(self) -> bool {
        self >= Self::ExactConversion
    }
}

/// Significand width of a float, implicit bit included.
fn mantissa_bits(float_bits: u8) -> u8 {
    match float_bits {
        16 => 11,
        32 => 24,
        64 => 53,
        other => other,
    }
}

/// Integer → integer conversion rank for distinct integer types.
fn int_to_int(dst_bits: u8, dst_signed: bool, src_bits: u8, src_signed: bool) -> ConversionRank {
    let widening = dst_bits > src_bits;
    if dst_signed == src_signed {
        if widening {
            ConversionRank::ExactConversion
        } else {
            ConversionRank::Truncation
        }
    } else if widening && dst_signed {
        // Every unsigned value fits a wider signed type.
        ConversionRank::ExactConversion
    } else if dst_bits < src_bits {
        ConversionRank::Truncation
    } else {
        ConversionRank::SignedUnsigned
    }
}

/// Integer → float conversion rank.
fn int_to_float(dst_bits: u8, src_bits: u8, src_signed: bool) -> ConversionRank {
    let magnitude = if src_signed { src_bits.saturating_sub(1) } else { src_bits };
    if magnitude <= mantissa_bits(dst_bits) {
        ConversionRank::ExactConversion
    } else {
        ConversionRank::PrecisionLoss
    }
}

impl TypeRelation<'_> {
    /// Rank of implicitly converting `src` to `dst`.
    ///
    /// Dropping `const` is never implicit; adding it caps the rank at
    /// [`ConversionRank::ExactConversion`].
    #[tracing::instrument(level = "trace", skip_all, fields(dst = ?dst.ty, src = ?src.ty))]
    pub fn convert(
        &mut self,
        dst: Operand<'_>,
        src: Operand<'_>,
    ) -> Result<ConversionRank, InvariantViolation> {
        let dst = self.normalize(dst)?;
        let src = self.normalize(src)?;

        if src.quals.is_const() && !dst.quals.is_const() {
            return Ok(ConversionRank::Incompatible);
        }
        let cap = if dst.quals == src.quals {
            ConversionRank::IdenticalTypes
        } else {
            ConversionRank::ExactConversion
        };

        let key = QueryKey::types(Query::Convert, dst.base(), src.base());
        let rank = self.cached(key, ConversionRank::Incompatible, |this| {
            this.convert_shapes(&dst, &src)
        })?;
        Ok(rank.min(cap))
    }

    /// Whether `src` is assignable to `dst` without loss.
    pub fn is_assignable(
        &mut self,
        dst: Operand<'_>,
        src: Operand<'_>,
    ) -> Result<bool, InvariantViolation> {
        Ok(self.convert(dst, src)?.is_exact())
    }

    fn convert_shapes(
        &mut self,
        dst: &Norm<'_>,
        src: &Norm<'_>,
    ) -> Result<ConversionRank, InvariantViolation> {
        if self.is_equal(dst.base(), src.base())? {
            return Ok(ConversionRank::IdenticalTypes);
        }

        let dst_kind = self.store.kind(dst.ty).clone();
        let src_kind = self.store.kind(src.ty).clone();

        match (dst_kind, src_kind) {
            // Every member of a source union must convert.
            (_, TypeKind::Union(members)) => {
                self.worst_of(&members, &src.env, |this, member| {
                    this.convert(dst.base(), member)
                })
            }
            // Some member of a destination union must accept the source.
            (TypeKind::Union(members), _) => {
                self.best_of(&members, &dst.env, |this, member| {
                    this.convert(member, src.base())
                })
            }

            (_, TypeKind::Inferred(var)) => self.convert_inferred(dst, var),
            // Any candidate may be the one overload resolution selects.
            (_, TypeKind::Contingent(candidates)) => {
                self.best_of(&candidates, &src.env, |this, candidate| {
                    this.convert(dst.base(), candidate)
                })
            }
            (TypeKind::Contingent(candidates), _) => {
                self.worst_of(&candidates, &dst.env, |this, candidate| {
                    this.convert(candidate, src.base())
                })
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
            ) => Ok(int_to_int(dst_bits, dst_signed, src_bits, src_signed)),
            (
                TypeKind::Float { bits: dst_bits },
                TypeKind::Int {
                    bits: src_bits,
                    signed: src_signed,
                },
            ) => Ok(int_to_float(dst_bits, src_bits, src_signed)),
            (TypeKind::Float { bits: dst_bits }, TypeKind::Float { bits: src_bits }) => {
                Ok(if dst_bits >= src_bits {
                    ConversionRank::ExactConversion
                } else {
                    ConversionRank::PrecisionLoss
                })
            }
            (TypeKind::Bool, TypeKind::Int { .. }) => Ok(ConversionRank::IntegerToBool),

            (TypeKind::Tuple(dst_members), TypeKind::Tuple(src_members)) => {
                if dst_members.len() != src_members.len() {
                    return Ok(ConversionRank::Incompatible);
                }
                let mut rank = ConversionRank::IdenticalTypes;
                for (&d, &s) in dst_members.iter().zip(src_members.iter()) {
                    rank = rank.min(self.convert(
                        Operand::new(d, &dst.env),
                        Operand::new(s, &src.env),
                    )?);
                    if rank == ConversionRank::Incompatible {
                        break;
                    }
                }
                Ok(rank)
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
                    return Ok(ConversionRank::Incompatible);
                }
                let mut rank = self.convert(
                    Operand::new(dst_ret, &dst.env),
                    Operand::new(src_ret, &src.env),
                )?;
                // Parameters are contravariant.
                for (&d, &s) in dst_params.iter().zip(src_params.iter()) {
                    if rank == ConversionRank::Incompatible {
                        break;
                    }
                    rank = rank.min(self.convert(
                        Operand::new(s, &src.env),
                        Operand::new(d, &dst.env),
                    )?);
                }
                Ok(rank)
            }

            (
                TypeKind::Nominal {
                    kind: dst_category,
                    defn: dst_defn,
                },
                TypeKind::Nominal { defn: src_defn, .. },
            ) => {
                if self.is_subtype(src_defn, &src.env, dst_defn, &dst.env)? {
                    return Ok(ConversionRank::ExactConversion);
                }
                if dst_category.is_trait_like()
                    && self.implements_members(src_defn, &src.env, dst_defn, &dst.env)?
                {
                    return Ok(ConversionRank::NonPreferred);
                }
                Ok(ConversionRank::Incompatible)
            }

            // A bounded type parameter converts wherever one of its bounds does.
            (_, TypeKind::TypeVar(param)) => {
                let bounds = self
                    .defns
                    .get(param)
                    .as_type_param()
                    .map(|p| p.bounds.clone())
                    .unwrap_or_default();
                let rank = self.best_of(&bounds, &src.env, |this, bound| {
                    this.convert(dst.base(), bound)
                })?;
                Ok(rank.min(ConversionRank::ExactConversion))
            }

            _ => Ok(ConversionRank::Incompatible),
        }
    }

    /// Best rank over the placeholder's equivalences and lower bounds.
    fn convert_inferred(
        &mut self,
        dst: &Norm<'_>,
        var: InferVar,
    ) -> Result<ConversionRank, InvariantViolation> {
        let constraints = self.store.infer_constraints(var).clone();
        let known: Vec<Idx> = constraints
            .equivalents
            .iter()
            .chain(&constraints.lower)
            .copied()
            .collect();
        self.best_of(&known, Env::empty(), |this, ty| this.convert(dst.base(), ty))
    }

    fn best_of(
        &mut self,
        members: &[Idx],
        env: &Env,
        mut rank_of: impl FnMut(&mut Self, Operand<'_>) -> Result<ConversionRank, InvariantViolation>,
    ) -> Result<ConversionRank, InvariantViolation> {
        let mut best = ConversionRank::Incompatible;
        for &member in members {
            best = best.max(rank_of(self, Operand::new(member, env))?);
            if best == ConversionRank::IdenticalTypes {
                break;
            }
        }
        Ok(best)
    }

    fn worst_of(
        &mut self,
        members: &[Idx],
        env: &Env,
        mut rank_of: impl FnMut(&mut Self, Operand<'_>) -> Result<ConversionRank, InvariantViolation>,
    ) -> Result<ConversionRank, InvariantViolation> {
        let mut worst = ConversionRank::IdenticalTypes;
        for &member in members {
            worst = worst.min(rank_of(self, Operand::new(member, env))?);
            if worst == ConversionRank::Incompatible {
                break;
            }
        }
        Ok(worst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_ordered_weakest_first() {
        assert!(ConversionRank::Incompatible < ConversionRank::Truncation);
        assert!(ConversionRank::Truncation < ConversionRank::SignedUnsigned);
        assert!(ConversionRank::SignedUnsigned < ConversionRank::PrecisionLoss);
        assert!(ConversionRank::PrecisionLoss < ConversionRank::IntegerToBool);
        assert!(ConversionRank::IntegerToBool < ConversionRank::NonPreferred);
        assert!(ConversionRank::NonPreferred < ConversionRank::ExactConversion);
        assert!(ConversionRank::ExactConversion < ConversionRank::IdenticalTypes);
    }

    #[test]
    fn integer_rules() {
        assert_eq!(int_to_int(32, true, 16, true), ConversionRank::ExactConversion);
        assert_eq!(int_to_int(16, true, 32, true), ConversionRank::Truncation);
        assert_eq!(int_to_int(32, true, 16, false), ConversionRank::ExactConversion);
        assert_eq!(int_to_int(32, false, 32, true), ConversionRank::SignedUnsigned);
        assert_eq!(int_to_int(64, false, 8, true), ConversionRank::SignedUnsigned);
        assert_eq!(int_to_int(8, false, 32, true), ConversionRank::Truncation);
    }

    #[test]
    fn int_to_float_respects_mantissa() {
        assert_eq!(int_to_float(32, 16, true), ConversionRank::ExactConversion);
        assert_eq!(int_to_float(32, 32, true), ConversionRank::PrecisionLoss);
        assert_eq!(int_to_float(64, 32, false), ConversionRank::ExactConversion);
        assert_eq!(int_to_float(64, 64, true), ConversionRank::PrecisionLoss);
    }
}
