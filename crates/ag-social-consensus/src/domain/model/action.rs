//! Action records: scores, subscriptions, blockings, complaints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{Address, TxHash};

use super::{push_json_array, push_opt};

/// `ACTION_SCORE_CONTENT` / `ACTION_SCORE_COMMENT`.
///
/// Content scores carry `1..=5`, comment scores `-1` or `1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub address: Address,
    pub target_tx_hash: TxHash,
    pub value: i64,
}

impl Score {
    pub fn canonical_data(&self) -> String {
        format!("{}{}", self.target_tx_hash, self.value)
    }

    /// The OP_RETURN binding string: `"<target_author_address> <value>"`,
    /// hex-encoded by the envelope layer.
    pub fn op_return_binding(&self, target_author: &str) -> String {
        hex::encode(format!("{} {}", target_author, self.value))
    }
}

/// `ACTION_SUBSCRIBE` family: follow, private follow, unfollow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscribeAction {
    pub address: Address,
    pub address_to: Address,
}

impl SubscribeAction {
    pub fn canonical_data(&self) -> String {
        self.address_to.clone()
    }
}

/// `ACTION_BLOCKING` / `ACTION_BLOCKING_CANCEL`.
///
/// Exactly one of `address_to` (single form) or `addresses_to` (raw JSON
/// array, multi form) is set; the multi form exists only past its
/// activation checkpoint and cancels never use it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockingAction {
    pub address: Address,
    pub address_to: Option<Address>,
    pub addresses_to: Option<String>,
}

impl BlockingAction {
    pub fn canonical_data(&self) -> String {
        let mut data = String::new();
        push_opt(&mut data, &self.address_to);
        push_json_array(&mut data, &self.addresses_to);
        data
    }

    /// Parses the multi-form target list. Garbage reads as empty.
    pub fn multi_targets(&self) -> Vec<String> {
        let Some(raw) = &self.addresses_to else {
            return Vec::new();
        };
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Every address named by the record, whichever form it uses.
    pub fn all_targets(&self) -> Vec<String> {
        match &self.address_to {
            Some(single) => vec![single.clone()],
            None => self.multi_targets(),
        }
    }
}

/// `ACTION_COMPLAIN`: a complaint with a numeric reason code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplainAction {
    pub address: Address,
    pub content_tx_hash: TxHash,
    pub reason: i64,
}

impl ComplainAction {
    pub fn canonical_data(&self) -> String {
        format!("{}{}", self.content_tx_hash, self.reason)
    }
}
