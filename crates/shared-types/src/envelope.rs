//! # Transaction Envelope
//!
//! The verified monetary envelope handed to the social consensus core.
//!
//! The UTXO layer validates inputs, signatures and fees before anything in
//! this crate is constructed; the social core treats the envelope as
//! trustworthy monetary data plus an *unverified* social payload bundle
//! that it must still check against the OP_RETURN commitment.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::{BlockHeight, TxHash, TxKind};
use crate::errors::EnvelopeError;

/// A spent output reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    /// The transaction the spent output belongs to.
    pub prev_tx_hash: TxHash,
    /// The output index within that transaction.
    pub prev_out: u32,
}

/// A created output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    /// Destination address.
    pub address: String,
    /// Value in base units.
    pub value: i64,
}

/// The OP_RETURN commitment carried by every social transaction.
///
/// The script assembles as `OP_RETURN <type-tag> <data-hash> [<extra>]`;
/// only the last two operands reach the core. `data_hash` commits to the
/// canonical byte string of the social payload; `extra` carries the
/// kind-specific binding (for scores, `hex("<author_address> <value>")`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpReturn {
    /// Double-SHA256 (hex) of the payload's canonical byte string.
    pub data_hash: TxHash,
    /// Optional kind-specific binding payload, hex-encoded.
    pub extra: Option<String>,
}

impl OpReturn {
    /// Splits a decoded script assembly string into the commitment parts.
    ///
    /// Expects at least `OP_RETURN <type-tag> <data-hash>`; a fourth field
    /// becomes [`OpReturn::extra`].
    pub fn from_asm(asm: &str) -> Result<Self, EnvelopeError> {
        let parts: Vec<&str> = asm.split(|c| c == ' ' || c == '\t').collect();
        if parts.len() < 3 {
            return Err(EnvelopeError::MalformedOpReturn {
                operands: parts.len(),
            });
        }

        Ok(Self {
            data_hash: parts[2].to_string(),
            extra: parts.get(3).map(|s| (*s).to_string()),
        })
    }
}

/// A verified transaction envelope.
///
/// `height` is `None` while the transaction is a mempool candidate and set
/// once it is being connected as part of a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxEnvelope {
    /// The transaction id advertised by the monetary layer.
    pub tx_hash: TxHash,
    /// Envelope time, seconds since epoch.
    pub time: i64,
    /// Block height, or `None` for mempool candidates.
    pub height: Option<BlockHeight>,
    /// Kind discriminant parsed from the OP_RETURN type tag.
    pub kind: TxKind,
    /// Spent outputs.
    pub inputs: Vec<TxInput>,
    /// Created outputs.
    pub outputs: Vec<TxOutput>,
    /// The OP_RETURN commitment.
    pub op_return: OpReturn,
    /// The decoded social payload bundle (named string fields).
    pub payload: Map<String, Value>,
}

impl TxEnvelope {
    /// Looks up a string field in the payload bundle.
    ///
    /// Missing keys and non-string values both read as absent; the hash
    /// canonicalization treats absent and empty identically anyway.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }

    /// Looks up an integer field in the payload bundle.
    pub fn payload_int(&self, key: &str) -> Option<i64> {
        self.payload.get(key).and_then(Value::as_i64)
    }
}
