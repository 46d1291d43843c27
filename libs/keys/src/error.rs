//! Error types for key encoding and decoding.

use thiserror::Error;

/// Errors produced by the key codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The input text is not decodable base64, or a varint is malformed.
    #[error("invalid encoding: {reason}")]
    InvalidEncoding { reason: String },

    /// The decoded byte length does not match the fixed size required by
    /// the operation. Only raised in strict mode, except where an operation
    /// cannot proceed at all (e.g. a system-id read needs at least 4 bytes).
    #[error("unexpected {what} length: expected {expected} bytes, got {actual}")]
    UnexpectedLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl KeyError {
    pub(crate) fn invalid_encoding(reason: impl Into<String>) -> Self {
        KeyError::InvalidEncoding {
            reason: reason.into(),
        }
    }

    /// Returns true if this error indicates malformed base64 or varint input.
    pub fn is_invalid_encoding(&self) -> bool {
        matches!(self, KeyError::InvalidEncoding { .. })
    }

    /// Returns true if this error indicates a size mismatch.
    pub fn is_unexpected_length(&self) -> bool {
        matches!(self, KeyError::UnexpectedLength { .. })
    }
}
