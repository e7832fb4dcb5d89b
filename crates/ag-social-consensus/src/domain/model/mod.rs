//! Transaction Model - Typed Records and Canonical Hashing
//!
//! Every social transaction is a [`SocialTx`]: the envelope facts (id, time,
//! height, OP_RETURN commitment) plus a kind-tagged [`TxBody`]. Each body
//! variant owns the fields that matter for its rules; the generic slot
//! numbering of the wire format exists only in the decoder.
//!
//! The record id is the double-SHA256 (lower-case hex) of a kind-specific
//! canonical byte string. Canonicalization treats absent and empty string
//! fields identically and joins JSON array fields with `,`. Post, video
//! and offer edits fold the root tx hash into the bytes; the comment
//! family commits to its slot fields alone, in every version.

pub mod account;
pub mod action;
pub mod barteron;
pub mod content;
pub mod decode;
pub mod moderation;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use shared_types::{BlockHeight, OpReturn, TxHash, TxKind};

pub use account::{AccountDelete, AccountPayload, AccountUser};
pub use action::{BlockingAction, ComplainAction, Score, SubscribeAction};
pub use barteron::{BarteronAccount, BarteronOffer};
pub use content::{CommentEntry, ContentDelete, ContentEntry, ContentPayload};
pub use moderation::{ModerationFlag, ModerationVote, ModeratorRegister, ModeratorRequest};

/// Double-SHA256 over a canonical byte string, as lower-case hex.
pub fn generate_hash(data: &str) -> TxHash {
    let first = Sha256::digest(data.as_bytes());
    let second = Sha256::digest(first);
    hex::encode(second)
}

/// Appends an optional field; absent contributes nothing.
pub(crate) fn push_opt(data: &mut String, field: &Option<String>) {
    if let Some(v) = field {
        data.push_str(v);
    }
}

/// Appends the elements of a JSON string array joined with `,`.
///
/// Anything that does not parse as an array contributes nothing; the wire
/// format has carried malformed lists and their hashes are already fixed.
pub(crate) fn push_json_array(data: &mut String, raw: &Option<String>) {
    let Some(raw) = raw else { return };
    if raw.is_empty() {
        return;
    }
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                data.push(',');
            }
            if let Some(s) = item.as_str() {
                data.push_str(s);
            }
        }
    }
}

/// The kind-tagged record body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TxBody {
    User(AccountUser),
    AccountDelete(AccountDelete),
    Post(ContentEntry),
    Video(ContentEntry),
    Comment(CommentEntry),
    CommentEdit(CommentEntry),
    CommentDelete(CommentEntry),
    ContentDelete(ContentDelete),
    ScoreContent(Score),
    ScoreComment(Score),
    Subscribe(SubscribeAction),
    SubscribePrivate(SubscribeAction),
    SubscribeCancel(SubscribeAction),
    Blocking(BlockingAction),
    BlockingCancel(BlockingAction),
    Complain(ComplainAction),
    BarteronAccount(BarteronAccount),
    BarteronOffer(BarteronOffer),
    ModerationFlag(ModerationFlag),
    ModerationVote(ModerationVote),
    ModeratorRegister(ModeratorRegister),
    ModeratorRequest(ModeratorRequest),
    /// Monetary envelope kinds pass through the social core unvalidated.
    Money { kind: TxKind },
}

impl TxBody {
    /// The kind discriminant of this body.
    pub fn kind(&self) -> TxKind {
        match self {
            TxBody::User(_) => TxKind::AccountUser,
            TxBody::AccountDelete(_) => TxKind::AccountDelete,
            TxBody::Post(_) => TxKind::ContentPost,
            TxBody::Video(_) => TxKind::ContentVideo,
            TxBody::Comment(_) => TxKind::ContentComment,
            TxBody::CommentEdit(_) => TxKind::ContentCommentEdit,
            TxBody::CommentDelete(_) => TxKind::ContentCommentDelete,
            TxBody::ContentDelete(_) => TxKind::ContentDelete,
            TxBody::ScoreContent(_) => TxKind::ActionScoreContent,
            TxBody::ScoreComment(_) => TxKind::ActionScoreComment,
            TxBody::Subscribe(_) => TxKind::ActionSubscribe,
            TxBody::SubscribePrivate(_) => TxKind::ActionSubscribePrivate,
            TxBody::SubscribeCancel(_) => TxKind::ActionSubscribeCancel,
            TxBody::Blocking(_) => TxKind::ActionBlocking,
            TxBody::BlockingCancel(_) => TxKind::ActionBlockingCancel,
            TxBody::Complain(_) => TxKind::ActionComplain,
            TxBody::BarteronAccount(_) => TxKind::BarteronAccount,
            TxBody::BarteronOffer(_) => TxKind::BarteronOffer,
            TxBody::ModerationFlag(_) => TxKind::ModerationFlag,
            TxBody::ModerationVote(_) => TxKind::ModerationVote,
            TxBody::ModeratorRegister(_) => TxKind::ModeratorRegister,
            TxBody::ModeratorRequest(_) => TxKind::ModeratorRequest,
            TxBody::Money { kind } => *kind,
        }
    }
}

/// A parsed social transaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialTx {
    /// Content-addressed id advertised by the envelope.
    pub hash: TxHash,
    /// Envelope time, seconds since epoch.
    pub time: i64,
    /// Block height, or `None` for mempool candidates.
    pub height: Option<BlockHeight>,
    /// The OP_RETURN commitment carried by the envelope, when present.
    pub op_return: Option<OpReturn>,
    /// Kind-specific fields.
    pub body: TxBody,
}

impl SocialTx {
    pub fn kind(&self) -> TxKind {
        self.body.kind()
    }

    /// The authoring address (slot 1 of every social kind).
    pub fn author(&self) -> Option<&str> {
        match &self.body {
            TxBody::User(b) => Some(&b.address),
            TxBody::AccountDelete(b) => Some(&b.address),
            TxBody::Post(b) | TxBody::Video(b) => Some(&b.address),
            TxBody::Comment(b) | TxBody::CommentEdit(b) | TxBody::CommentDelete(b) => {
                Some(&b.address)
            }
            TxBody::ContentDelete(b) => Some(&b.address),
            TxBody::ScoreContent(b) | TxBody::ScoreComment(b) => Some(&b.address),
            TxBody::Subscribe(b) | TxBody::SubscribePrivate(b) | TxBody::SubscribeCancel(b) => {
                Some(&b.address)
            }
            TxBody::Blocking(b) | TxBody::BlockingCancel(b) => Some(&b.address),
            TxBody::Complain(b) => Some(&b.address),
            TxBody::BarteronAccount(b) => Some(&b.address),
            TxBody::BarteronOffer(b) => Some(&b.address),
            TxBody::ModerationFlag(b) => Some(&b.address),
            TxBody::ModerationVote(b) => Some(&b.address),
            TxBody::ModeratorRegister(b) => Some(&b.address),
            TxBody::ModeratorRequest(b) => Some(&b.address),
            TxBody::Money { .. } => None,
        }
    }

    /// The root of the edit chain for editable kinds, the edited original
    /// for deletion kinds.
    pub fn root_tx_hash(&self) -> Option<&str> {
        match &self.body {
            TxBody::Post(b) | TxBody::Video(b) => Some(&b.root_tx_hash),
            TxBody::Comment(b) | TxBody::CommentEdit(b) | TxBody::CommentDelete(b) => {
                Some(&b.root_tx_hash)
            }
            TxBody::ContentDelete(b) => Some(&b.root_tx_hash),
            TxBody::BarteronOffer(b) => Some(&b.root_tx_hash),
            _ => None,
        }
    }

    /// The counterparty address for pair-state kinds.
    pub fn target_address(&self) -> Option<&str> {
        match &self.body {
            TxBody::Subscribe(b) | TxBody::SubscribePrivate(b) | TxBody::SubscribeCancel(b) => {
                Some(&b.address_to)
            }
            TxBody::Blocking(b) | TxBody::BlockingCancel(b) => b.address_to.as_deref(),
            TxBody::ModeratorRequest(b) => Some(&b.destination_address),
            _ => None,
        }
    }

    /// The referenced record for score/complaint/moderation kinds.
    pub fn target_hash(&self) -> Option<&str> {
        match &self.body {
            TxBody::ScoreContent(b) | TxBody::ScoreComment(b) => Some(&b.target_tx_hash),
            TxBody::Complain(b) => Some(&b.content_tx_hash),
            TxBody::ModerationFlag(b) => Some(&b.content_tx_hash),
            TxBody::ModerationVote(b) => Some(&b.flag_tx_hash),
            _ => None,
        }
    }

    /// An edit carries the original's hash as its root; the first version
    /// is its own root.
    pub fn is_edit(&self) -> bool {
        self.root_tx_hash().is_some_and(|root| root != self.hash)
    }

    /// The canonical byte string the record id commits to.
    pub fn canonical_data(&self) -> String {
        let is_edit = self.is_edit();
        match &self.body {
            TxBody::User(b) => b.canonical_data(true),
            TxBody::AccountDelete(b) => b.canonical_data(),
            TxBody::Post(b) | TxBody::Video(b) => b.canonical_data(is_edit),
            TxBody::Comment(b) | TxBody::CommentEdit(b) => b.canonical_data(false),
            TxBody::CommentDelete(b) => b.canonical_data(true),
            TxBody::ContentDelete(b) => b.canonical_data(),
            TxBody::ScoreContent(b) | TxBody::ScoreComment(b) => b.canonical_data(),
            TxBody::Subscribe(b) | TxBody::SubscribePrivate(b) | TxBody::SubscribeCancel(b) => {
                b.canonical_data()
            }
            TxBody::Blocking(b) | TxBody::BlockingCancel(b) => b.canonical_data(),
            TxBody::Complain(b) => b.canonical_data(),
            TxBody::BarteronAccount(b) => b.canonical_data(),
            TxBody::BarteronOffer(b) => b.canonical_data(is_edit),
            TxBody::ModerationFlag(b) => b.canonical_data(),
            TxBody::ModerationVote(b) => b.canonical_data(),
            TxBody::ModeratorRegister(b) => b.canonical_data(),
            TxBody::ModeratorRequest(b) => b.canonical_data(),
            TxBody::Money { .. } => String::new(),
        }
    }

    /// Rebuilds the record id from the canonical byte string.
    pub fn build_hash(&self) -> TxHash {
        generate_hash(&self.canonical_data())
    }

    /// Account records additionally commit to a referrer-free variant;
    /// both hashes are accepted by the OP_RETURN comparison.
    pub fn build_hash_without_referrer(&self) -> Option<TxHash> {
        match &self.body {
            TxBody::User(b) => Some(generate_hash(&b.canonical_data(false))),
            _ => None,
        }
    }

    /// Total size of the human-readable payload, for the size caps.
    pub fn payload_size(&self) -> usize {
        match &self.body {
            TxBody::User(b) => b.payload_size(),
            TxBody::Post(b) | TxBody::Video(b) => b.payload_size(),
            TxBody::Comment(b) | TxBody::CommentEdit(b) | TxBody::CommentDelete(b) => {
                b.payload_size()
            }
            TxBody::BarteronAccount(b) => b.payload_size(),
            TxBody::BarteronOffer(b) => b.payload_size(),
            _ => 0,
        }
    }
}
