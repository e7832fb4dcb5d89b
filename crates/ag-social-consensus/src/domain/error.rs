//! Error types for the social consensus subsystem.
//!
//! Validation outcomes are values, not panics: every rule failure maps to
//! one [`ConsensusError`] variant, and the envelope layer translates the
//! variant into its user-visible code. `Ok(())` is the only success.

use crate::ports::outbound::RepositoryError;

/// Result alias used throughout the validators.
pub type ConsensusResult<T = ()> = Result<T, ConsensusError>;

/// The fixed outcome surface of the social consensus core.
///
/// Each variant implies a specific contract violation. The set is part of
/// the node's public API: variants are never renumbered or reused, and the
/// legacy `PostLimit` / `PostEditLimit` codes remain for envelope-layer
/// compatibility with chains validated before the content-kind merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ConsensusError {
    #[error("unknown transaction kind")]
    Unknown,
    #[error("malformed transaction")]
    Failed,
    #[error("op_return commitment mismatch")]
    FailedOpReturn,
    #[error("author address is not a registered account")]
    NotRegistered,
    #[error("referenced record not found")]
    NotFound,
    #[error("operation not allowed for this record")]
    NotAllowed,

    #[error("daily post limit reached")]
    PostLimit,
    #[error("post edit limit reached")]
    PostEditLimit,
    #[error("editor is not the original author")]
    ContentEditUnauthorized,
    #[error("daily content limit reached")]
    ContentLimit,
    #[error("content edit limit reached")]
    ContentEditLimit,
    #[error("root already edited in this context")]
    DoubleContentEdit,
    #[error("payload exceeds size limit")]
    ContentSizeLimit,

    #[error("daily score limit reached")]
    ScoreLimit,
    #[error("score to own content")]
    SelfScore,
    #[error("content already scored by this address")]
    DoubleScore,
    #[error("daily comment score limit reached")]
    CommentScoreLimit,
    #[error("score to own comment")]
    SelfCommentScore,
    #[error("comment already scored by this address")]
    DoubleCommentScore,

    #[error("daily complaint limit reached")]
    ComplainLimit,
    #[error("complaint against own content")]
    SelfComplain,
    #[error("content already complained by this address")]
    DoubleComplain,
    #[error("reputation below required threshold")]
    LowReputation,

    #[error("account name too long")]
    NicknameLong,
    #[error("account name already taken")]
    NicknameDouble,
    #[error("account edit limit reached")]
    ChangeInfoLimit,
    #[error("second account change in one block")]
    ChangeInfoDoubleInBlock,
    #[error("second account change in mempool")]
    ChangeInfoDoubleInMempool,
    #[error("referrer equals the account itself")]
    ReferrerSelf,

    #[error("subscription to self")]
    SelfSubscribe,
    #[error("already subscribed")]
    DoubleSubscribe,
    #[error("no live subscription to cancel")]
    InvalidSubscribe,

    #[error("blocking of self")]
    SelfBlocking,
    #[error("already blocked")]
    DoubleBlocking,
    #[error("no live blocking to cancel")]
    InvalidBlocking,

    #[error("too many transactions for one pair in this context")]
    ManyTransactions,
    #[error("author has blocked this address")]
    Blocking,
    #[error("account is deleted")]
    AccountDeleted,
    #[error("active record limit exceeded")]
    ExceededLimit,
}

impl From<RepositoryError> for ConsensusError {
    // A repository that cannot answer leaves the transaction unverifiable;
    // the candidate is rejected, the chain state is untouched.
    fn from(_: RepositoryError) -> Self {
        ConsensusError::Failed
    }
}

/// Failures while building a typed record from a deserialized envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The envelope's kind tag has no record shape in this subsystem.
    #[error("unsupported transaction kind tag {0}")]
    UnsupportedKind(u16),

    /// A required payload field is missing or has the wrong type.
    #[error("malformed payload: {0}")]
    Malformed(&'static str),
}
