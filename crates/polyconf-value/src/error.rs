//! Error types for value coercion

/// A stored value could not be converted to the requested type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoercionError {
    /// Value variant has no conversion to the target type
    #[error("cannot convert {from} to {target}")]
    Incompatible {
        /// Variant name of the stored value
        from: &'static str,
        /// Requested type
        target: &'static str,
    },

    /// Text did not parse as the target type
    #[error("cannot parse '{input}' as {target}")]
    Unparsable {
        /// Offending text
        input: String,
        /// Requested type
        target: &'static str,
    },

    /// Number does not fit the target type
    #[error("{value} is out of range for {target}")]
    OutOfRange {
        /// Offending number, rendered
        value: String,
        /// Requested type
        target: &'static str,
    },
}

impl CoercionError {
    /// Create incompatible-variant error
    #[inline]
    pub fn incompatible(from: &'static str, target: &'static str) -> Self {
        Self::Incompatible { from, target }
    }

    /// Create parse failure error
    #[inline]
    pub fn unparsable(input: impl Into<String>, target: &'static str) -> Self {
        Self::Unparsable {
            input: input.into(),
            target,
        }
    }

    /// Create out-of-range error
    #[inline]
    pub fn out_of_range(value: impl ToString, target: &'static str) -> Self {
        Self::OutOfRange {
            value: value.to_string(),
            target,
        }
    }
}
