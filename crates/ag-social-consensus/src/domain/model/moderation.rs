//! Moderation records: flags, jury votes, moderator registration.
//!
//! Moderation hashes commit only to the target identifier; payload bodies
//! stay out of the canonical bytes.

use serde::{Deserialize, Serialize};
use shared_types::{Address, TxHash};

/// `MODERATION_FLAG`: reports a content record for jury review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationFlag {
    pub address: Address,
    pub content_tx_hash: TxHash,
    pub reason: i64,
}

impl ModerationFlag {
    pub fn canonical_data(&self) -> String {
        self.content_tx_hash.clone()
    }
}

/// `MODERATION_VOTE`: a juror's verdict on a flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationVote {
    pub address: Address,
    pub flag_tx_hash: TxHash,
    pub verdict: i64,
}

impl ModerationVote {
    pub fn canonical_data(&self) -> String {
        self.flag_tx_hash.clone()
    }
}

/// `MODERATOR_REGISTER`: binds a moderator entry in the sub-ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeratorRegister {
    pub address: Address,
    pub request_id: Option<TxHash>,
}

impl ModeratorRegister {
    pub fn canonical_data(&self) -> String {
        self.request_id.clone().unwrap_or_default()
    }
}

/// `MODERATOR_REQUEST`: invites another address into moderation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeratorRequest {
    pub address: Address,
    pub destination_address: Address,
}

impl ModeratorRequest {
    pub fn canonical_data(&self) -> String {
        self.destination_address.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashes_commit_to_target_only() {
        let a = ModerationFlag {
            address: "alice".into(),
            content_tx_hash: "post1".into(),
            reason: 3,
        };
        let b = ModerationFlag {
            address: "bob".into(),
            content_tx_hash: "post1".into(),
            reason: 7,
        };
        assert_eq!(a.canonical_data(), b.canonical_data());
    }
}
