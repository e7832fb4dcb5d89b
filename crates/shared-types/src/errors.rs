//! # Error Types
//!
//! Defines error types shared across subsystem boundaries.

use thiserror::Error;

/// Errors raised while assembling a [`crate::TxEnvelope`] from wire data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// OP_RETURN script had fewer operands than the commitment requires.
    #[error("Malformed OP_RETURN: {operands} operands, need at least 3")]
    MalformedOpReturn { operands: usize },

    /// The OP_RETURN type tag is not a known transaction kind.
    #[error("Unknown transaction type tag: {tag}")]
    UnknownTypeTag { tag: u16 },

    /// The payload bundle is not a JSON object.
    #[error("Payload bundle is not an object")]
    PayloadNotObject,
}
