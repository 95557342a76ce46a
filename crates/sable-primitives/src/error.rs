//! Common error types for primitives

use thiserror::Error;

/// Primitive construction or parsing error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Limb slice does not match the fixed width
    #[error("invalid limb count: expected {expected}, got {got}")]
    InvalidLimbCount {
        /// Limbs required by the type
        expected: usize,
        /// Limbs supplied
        got: usize,
    },

    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// Value wider than the type
    #[error("invalid length: expected at most {expected} bytes, got {got}")]
    InvalidLength {
        /// Maximum byte width
        expected: usize,
        /// Bytes supplied
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PrimitiveError::InvalidLimbCount { expected: 4, got: 3 };
        assert_eq!(err.to_string(), "invalid limb count: expected 4, got 3");

        let err = PrimitiveError::InvalidHex("zz".to_string());
        assert_eq!(err.to_string(), "invalid hex string: zz");

        let err = PrimitiveError::InvalidLength { expected: 32, got: 33 };
        assert_eq!(err.to_string(), "invalid length: expected at most 32 bytes, got 33");
    }
}
