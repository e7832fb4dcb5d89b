//! # Core Domain Entities
//!
//! Defines the identifiers and discriminants shared between the monetary
//! envelope layer and the social consensus core.
//!
//! ## Clusters
//!
//! - **Identity**: `Address`, `TxHash`, `BlockHeight`
//! - **Networks**: `Network`
//! - **Transaction tags**: `TxKind`

use serde::{Deserialize, Serialize};

/// An account address: an opaque base58 string derived from the envelope
/// signer's public key. Accounts are not first-class rows; their state is
/// the fold of the social transactions they authored.
pub type Address = String;

/// A content-addressed transaction id: lower-case hex of a double-SHA256.
pub type TxHash = String;

/// A block height in the chain.
pub type BlockHeight = u32;

/// The network a node runs on. Consensus rule activations differ per
/// network; nothing else in the core branches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    /// The production chain.
    Main,
    /// The public test chain.
    Test,
    /// Local regression-test chain.
    Alt,
}

/// Transaction kind discriminant with stable numeric tags.
///
/// The envelope layer parses the OP_RETURN type marker into this tag; the
/// tags are part of the wire format and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum TxKind {
    // Money envelope (pass-through, not validated by the social core)
    Coinbase = 1,
    Coinstake = 2,
    Default = 3,

    // Accounts
    AccountUser = 100,
    BarteronAccount = 104,
    AccountDelete = 170,

    // Content
    ContentPost = 200,
    ContentVideo = 201,
    ContentComment = 204,
    ContentCommentEdit = 205,
    ContentCommentDelete = 206,
    ContentDelete = 207,
    BarteronOffer = 211,

    // Actions
    ActionScoreContent = 300,
    ActionScoreComment = 301,
    ActionSubscribe = 302,
    ActionSubscribePrivate = 303,
    ActionSubscribeCancel = 304,
    ActionBlocking = 305,
    ActionBlockingCancel = 306,
    ActionComplain = 307,

    // Moderation
    ModerationFlag = 410,
    ModerationVote = 420,
    ModeratorRegister = 450,
    ModeratorRequest = 451,
}

impl TxKind {
    /// Resolves a numeric wire tag back to a kind.
    pub fn from_tag(tag: u16) -> Option<Self> {
        use TxKind::*;
        let kind = match tag {
            1 => Coinbase,
            2 => Coinstake,
            3 => Default,
            100 => AccountUser,
            104 => BarteronAccount,
            170 => AccountDelete,
            200 => ContentPost,
            201 => ContentVideo,
            204 => ContentComment,
            205 => ContentCommentEdit,
            206 => ContentCommentDelete,
            207 => ContentDelete,
            211 => BarteronOffer,
            300 => ActionScoreContent,
            301 => ActionScoreComment,
            302 => ActionSubscribe,
            303 => ActionSubscribePrivate,
            304 => ActionSubscribeCancel,
            305 => ActionBlocking,
            306 => ActionBlockingCancel,
            307 => ActionComplain,
            410 => ModerationFlag,
            420 => ModerationVote,
            450 => ModeratorRegister,
            451 => ModeratorRequest,
            _ => return None,
        };
        Some(kind)
    }

    /// The numeric wire tag.
    pub fn tag(self) -> u16 {
        self as u16
    }

    /// Monetary kinds pass through the social core untouched.
    pub fn is_money(self) -> bool {
        matches!(self, TxKind::Coinbase | TxKind::Coinstake | TxKind::Default)
    }

    /// Kinds whose records form an edit chain keyed by a root tx hash.
    pub fn is_editable(self) -> bool {
        matches!(
            self,
            TxKind::ContentPost
                | TxKind::ContentVideo
                | TxKind::ContentComment
                | TxKind::ContentCommentEdit
                | TxKind::BarteronOffer
        )
    }
}
