//! # Historic Rule-Violation Escapes
//!
//! A handful of committed transactions violate rules that did not exist
//! when they were admitted. Re-validating old blocks must keep accepting
//! exactly those transactions, so the exceptions are first-class read-only
//! data instead of scattered conditionals: diverging from this table is
//! visible in diffs and nowhere else.

use std::collections::{HashMap, HashSet};

use shared_types::{TxHash, TxKind};

use crate::domain::error::ConsensusError;

/// Read-only registry of historic escapes.
#[derive(Debug, Clone, Default)]
pub struct EscapeRegistry {
    /// `(hash, kind, error)` triples that short-circuit to success.
    social: HashSet<(TxHash, TxKind, ConsensusError)>,
    /// Transactions whose OP_RETURN commits to a different data hash than
    /// the canonical bytes produce today.
    op_return: HashMap<TxHash, TxHash>,
}

impl EscapeRegistry {
    /// An empty registry, for tests that want no escapes in play.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The production registry.
    pub fn chain() -> Self {
        let mut registry = Self::default();

        registry.insert_op_return(
            "5741a02961547b401f9f9be17bd2c220bc6a98b4ff4d7909543e44adf3cb57e9",
            "603d2953b635a5963ad26da7f4d945e58ad511707c983cf11f96eadaa8511fa6",
        );

        registry.insert_social(
            "30064229865164a2d0dcb5f1d0d9a0c8f8a34e1e9ca14a9f68167bb3e84dc08a",
            TxKind::AccountUser,
            ConsensusError::NicknameDouble,
        );
        registry.insert_social(
            "0f03d4ae464c7ff8ed9e54b6fcbf82b53f30b30ca382db15d4a13e0551a64bfb",
            TxKind::AccountUser,
            ConsensusError::ChangeInfoDoubleInBlock,
        );
        registry.insert_social(
            "92dca27ddfd42fa4ce2c8f4bb1a6c2b201b8fac29e49e8a42e3ac44bfda04f26",
            TxKind::ActionSubscribeCancel,
            ConsensusError::InvalidSubscribe,
        );
        registry.insert_social(
            "db8f44bcd9a27a2d78ceaa98e5e70fcd7b29f9299219ec6e35ac77dfdc1ce0d6",
            TxKind::ActionBlockingCancel,
            ConsensusError::InvalidBlocking,
        );
        registry.insert_social(
            "6d4b7ec8b3539ae50ce836426ff65a968a94ef2f08bf36a571b1e28e1765a9a5",
            TxKind::ActionScoreComment,
            ConsensusError::NotFound,
        );

        registry
    }

    fn insert_social(&mut self, hash: &str, kind: TxKind, error: ConsensusError) {
        self.social.insert((hash.to_string(), kind, error));
    }

    fn insert_op_return(&mut self, tx_hash: &str, accepted_data_hash: &str) {
        self.op_return
            .insert(tx_hash.to_string(), accepted_data_hash.to_string());
    }

    /// Would this historic transaction be excused from this failure?
    pub fn allows(&self, hash: &str, kind: TxKind, error: ConsensusError) -> bool {
        self.social.contains(&(hash.to_string(), kind, error))
    }

    /// The grandfathered data hash for a transaction, if any.
    pub fn op_return_override(&self, tx_hash: &str) -> Option<&str> {
        self.op_return.get(tx_hash).map(String::as_str)
    }
}
