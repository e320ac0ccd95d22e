//! Generic parameter attribute flags.

use bitflags::bitflags;

bitflags! {
    /// Variance and special-constraint flags of a generic parameter.
    ///
    /// Bit values follow the metadata encoding of the original runtime so
    /// that flags can be copied across unchanged.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct GenericParamAttrs: u16 {
        /// `out T`.
        const COVARIANT = 0x0001;
        /// `in T`.
        const CONTRAVARIANT = 0x0002;
        /// Both variance bits.
        const VARIANCE_MASK = Self::COVARIANT.bits() | Self::CONTRAVARIANT.bits();
        /// `where T : class`.
        const REFERENCE_TYPE_CONSTRAINT = 0x0004;
        /// `where T : struct`.
        const NOT_NULLABLE_VALUE_TYPE_CONSTRAINT = 0x0008;
        /// `where T : new()`.
        const DEFAULT_CONSTRUCTOR_CONSTRAINT = 0x0010;
    }
}

impl GenericParamAttrs {
    /// Drop variance and the value-type constraint.
    ///
    /// The target runtime represents most generic arguments as wrapped
    /// references, where neither survives.
    #[must_use]
    pub fn strip_value_type_constraint(self) -> Self {
        self.difference(Self::NOT_NULLABLE_VALUE_TYPE_CONSTRAINT | Self::VARIANCE_MASK)
    }

    /// Whether any variance bit is set.
    pub fn is_variant(self) -> bool {
        self.intersects(Self::VARIANCE_MASK)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::GenericParamAttrs;

    #[test]
    fn strip_removes_variance_and_struct_constraint() {
        let attrs = GenericParamAttrs::COVARIANT
            | GenericParamAttrs::NOT_NULLABLE_VALUE_TYPE_CONSTRAINT
            | GenericParamAttrs::DEFAULT_CONSTRUCTOR_CONSTRAINT;

        let stripped = attrs.strip_value_type_constraint();

        assert_eq!(stripped, GenericParamAttrs::DEFAULT_CONSTRUCTOR_CONSTRAINT);
        assert!(!stripped.is_variant());
    }

    #[test]
    fn strip_keeps_reference_constraint() {
        let attrs =
            GenericParamAttrs::CONTRAVARIANT | GenericParamAttrs::REFERENCE_TYPE_CONSTRAINT;

        assert_eq!(
            attrs.strip_value_type_constraint(),
            GenericParamAttrs::REFERENCE_TYPE_CONSTRAINT
        );
    }
}
