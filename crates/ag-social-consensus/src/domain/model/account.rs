//! Account records: registration/profile updates and the delete tombstone.

use serde::{Deserialize, Serialize};
use shared_types::Address;

use super::push_opt;

/// Profile payload of an account record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountPayload {
    pub lang: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub about: Option<String>,
    pub url: Option<String>,
    pub pubkey: Option<String>,
    pub donations: Option<String>,
}

/// `ACCOUNT_USER`: registers an account or edits its profile.
///
/// There is one live account record per address; every later record is an
/// edit of the profile, constrained by the daily change limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountUser {
    pub address: Address,
    pub referrer: Option<Address>,
    pub payload: Option<AccountPayload>,
}

impl AccountUser {
    /// The display name, when the payload carries one.
    pub fn name(&self) -> Option<&str> {
        self.payload.as_ref().and_then(|p| p.name.as_deref())
    }

    /// Canonical field order: name, url, lang, about, avatar, donations,
    /// referrer, pubkey. The referrer slot is skipped for the secondary
    /// commitment variant.
    pub fn canonical_data(&self, include_referrer: bool) -> String {
        let mut data = String::new();
        if let Some(p) = &self.payload {
            push_opt(&mut data, &p.name);
            push_opt(&mut data, &p.url);
            push_opt(&mut data, &p.lang);
            push_opt(&mut data, &p.about);
            push_opt(&mut data, &p.avatar);
            push_opt(&mut data, &p.donations);
        }
        if include_referrer {
            push_opt(&mut data, &self.referrer);
        }
        if let Some(p) = &self.payload {
            push_opt(&mut data, &p.pubkey);
        }
        data
    }

    pub fn payload_size(&self) -> usize {
        let payload = self
            .payload
            .as_ref()
            .map(|p| {
                [
                    &p.name,
                    &p.url,
                    &p.lang,
                    &p.about,
                    &p.avatar,
                    &p.donations,
                    &p.pubkey,
                ]
                .iter()
                .map(|f| f.as_deref().map_or(0, str::len))
                .sum::<usize>()
            })
            .unwrap_or(0);
        payload + self.referrer.as_deref().map_or(0, str::len)
    }
}

/// `ACCOUNT_DELETE`: the account tombstone. A deleted account cannot be
/// resurrected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDelete {
    pub address: Address,
}

impl AccountDelete {
    /// The tombstone commits to no payload.
    pub fn canonical_data(&self) -> String {
        String::new()
    }
}
