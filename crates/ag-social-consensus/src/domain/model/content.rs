//! Content records: posts, videos, the comment tree, and deletions.

use serde::{Deserialize, Serialize};
use shared_types::{Address, TxHash};

use super::{push_json_array, push_opt};

/// Human-readable payload of a post or video.
///
/// `tags` and `images` carry raw JSON string arrays; canonicalization joins
/// their elements with `,`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPayload {
    pub lang: Option<String>,
    pub caption: Option<String>,
    pub message: Option<String>,
    pub tags: Option<String>,
    pub images: Option<String>,
    pub settings: Option<String>,
    pub url: Option<String>,
}

/// `CONTENT_POST` / `CONTENT_VIDEO`: an editable content entry.
///
/// `root_tx_hash` equals the record's own hash on the first version and the
/// original's hash on every edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub address: Address,
    pub root_tx_hash: TxHash,
    pub relay_tx_hash: Option<TxHash>,
    pub payload: Option<ContentPayload>,
}

impl ContentEntry {
    /// url, caption, message, tags, images, then the root on edits, then
    /// the relay reference.
    pub fn canonical_data(&self, is_edit: bool) -> String {
        let mut data = String::new();
        if let Some(p) = &self.payload {
            push_opt(&mut data, &p.url);
            push_opt(&mut data, &p.caption);
            push_opt(&mut data, &p.message);
            push_json_array(&mut data, &p.tags);
            push_json_array(&mut data, &p.images);
        }
        if is_edit {
            data.push_str(&self.root_tx_hash);
        }
        push_opt(&mut data, &self.relay_tx_hash);
        data
    }

    pub fn payload_size(&self) -> usize {
        self.payload
            .as_ref()
            .map(|p| {
                [
                    &p.lang,
                    &p.caption,
                    &p.message,
                    &p.tags,
                    &p.images,
                    &p.settings,
                    &p.url,
                ]
                .iter()
                .map(|f| f.as_deref().map_or(0, str::len))
                .sum()
            })
            .unwrap_or(0)
    }
}

/// `CONTENT_COMMENT` family: a node in the comment tree.
///
/// The same shape backs new comments, edits and deletes; the kind tag
/// decides which rules apply and whether the message participates in the
/// canonical bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentEntry {
    pub address: Address,
    pub root_tx_hash: TxHash,
    pub post_tx_hash: TxHash,
    pub parent_tx_hash: Option<TxHash>,
    pub answer_tx_hash: Option<TxHash>,
    pub message: Option<String>,
}

impl CommentEntry {
    /// post, message, parent, answer. The root stays out of the canonical
    /// bytes for the whole family, new comments, edits and deletes alike;
    /// only the post/video/offer chains fold the root in on edits.
    ///
    /// Deletions substitute the empty string for the message so the
    /// tombstone's hash is independent of the removed text.
    pub fn canonical_data(&self, deleted: bool) -> String {
        let mut data = String::new();
        data.push_str(&self.post_tx_hash);
        if !deleted {
            push_opt(&mut data, &self.message);
        }
        push_opt(&mut data, &self.parent_tx_hash);
        push_opt(&mut data, &self.answer_tx_hash);
        data
    }

    pub fn payload_size(&self) -> usize {
        self.message.as_deref().map_or(0, str::len)
    }
}

/// `CONTENT_DELETE`: tombstone for a post or video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDelete {
    pub address: Address,
    pub root_tx_hash: TxHash,
    pub settings: Option<String>,
}

impl ContentDelete {
    pub fn canonical_data(&self) -> String {
        let mut data = String::new();
        data.push_str(&self.root_tx_hash);
        push_opt(&mut data, &self.settings);
        data
    }
}
