//! Barter records: trading accounts and offers.

use serde::{Deserialize, Serialize};
use shared_types::{Address, TxHash};

use super::push_opt;

/// `BARTERON_ACCOUNT`: the trading profile attached to an account.
///
/// The payload is the raw JSON profile body; its internal structure is a
/// marketplace concern, the consensus core only bounds its size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarteronAccount {
    pub address: Address,
    pub payload: Option<String>,
}

impl BarteronAccount {
    pub fn canonical_data(&self) -> String {
        let mut data = String::new();
        push_opt(&mut data, &self.payload);
        data
    }

    pub fn payload_size(&self) -> usize {
        self.payload.as_deref().map_or(0, str::len)
    }
}

/// `BARTERON_OFFER`: an editable barter offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarteronOffer {
    pub address: Address,
    pub root_tx_hash: TxHash,
    pub payload: Option<String>,
}

impl BarteronOffer {
    pub fn canonical_data(&self, is_edit: bool) -> String {
        let mut data = String::new();
        push_opt(&mut data, &self.payload);
        if is_edit {
            data.push_str(&self.root_tx_hash);
        }
        data
    }

    pub fn payload_size(&self) -> usize {
        self.payload.as_deref().map_or(0, str::len)
    }
}
