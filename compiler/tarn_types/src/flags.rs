//! Bit sets carried by types and declarations.
//!
//! `TypeFlags` are computed once when a type is interned and let the
//! substitution and relation code skip whole subtrees without walking them.

use bitflags::bitflags;

bitflags! {
    /// Pre-computed type properties.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u16 {
        /// Contains a type variable (substitution may change it).
        const HAS_TYPE_VAR = 1 << 0;
        /// Contains an inference placeholder.
        const HAS_INFER = 1 << 1;
        /// Contains an unreduced specialization.
        const HAS_SPECIALIZED = 1 << 2;
        /// Contains a qualifier wrapper.
        const HAS_QUALIFIER = 1 << 3;
        /// Contains a contingent candidate set.
        const HAS_CONTINGENT = 1 << 4;
        /// Contains a nominal or alias type, whose meaning can depend on
        /// the environment it is seen through.
        const HAS_NOMINAL = 1 << 5;

        /// Pre-interned primitive singleton.
        const IS_PRIMITIVE = 1 << 8;
        /// Backed by a type declaration.
        const IS_NOMINAL = 1 << 9;
        /// Tuple, union or function.
        const IS_STRUCTURAL = 1 << 10;
    }
}

impl TypeFlags {
    /// Flags inherited by a compound type from its children.
    pub const PROPAGATE_MASK: Self = Self::from_bits_truncate(
        Self::HAS_TYPE_VAR.bits()
            | Self::HAS_INFER.bits()
            | Self::HAS_SPECIALIZED.bits()
            | Self::HAS_QUALIFIER.bits()
            | Self::HAS_CONTINGENT.bits()
            | Self::HAS_NOMINAL.bits(),
    );

    #[inline]
    pub const fn has_type_var(self) -> bool {
        self.contains(Self::HAS_TYPE_VAR)
    }

    #[inline]
    pub const fn has_infer(self) -> bool {
        self.contains(Self::HAS_INFER)
    }

    /// Whether the meaning of the type depends on its environment.
    #[inline]
    pub const fn is_env_sensitive(self) -> bool {
        self.intersects(Self::HAS_TYPE_VAR.union(Self::HAS_NOMINAL))
    }

    /// Parent flags contributed by a child.
    #[inline]
    #[must_use]
    pub const fn propagated(self) -> Self {
        self.intersection(Self::PROPAGATE_MASK)
    }
}

bitflags! {
    /// Type qualifiers applied by a `Modified` wrapper.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Qualifiers: u8 {
        /// Read-only view of the underlying type.
        const CONST = 1 << 0;
        /// Speculative qualifier; must be finalized before comparison.
        const PROVISIONAL = 1 << 1;
    }
}

impl Qualifiers {
    #[inline]
    pub const fn is_const(self) -> bool {
        self.contains(Self::CONST)
    }

    #[inline]
    pub const fn is_provisional(self) -> bool {
        self.contains(Self::PROVISIONAL)
    }
}

bitflags! {
    /// Declaration modifiers.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifiers: u16 {
        const STATIC = 1 << 0;
        const FINAL = 1 << 1;
        const ABSTRACT = 1 << 2;
        const OVERRIDE = 1 << 3;
        const READONLY = 1 << 4;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn propagation_drops_category_flags() {
        let flags = TypeFlags::HAS_TYPE_VAR | TypeFlags::IS_NOMINAL;
        assert_eq!(flags.propagated(), TypeFlags::HAS_TYPE_VAR);
    }

    #[test]
    fn qualifier_queries() {
        let q = Qualifiers::CONST | Qualifiers::PROVISIONAL;
        assert!(q.is_const());
        assert!(q.is_provisional());
        assert!(!Qualifiers::empty().is_const());
    }
}
