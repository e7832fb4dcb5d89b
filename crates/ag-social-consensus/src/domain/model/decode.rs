//! Envelope decoding: builds a typed [`SocialTx`] from a verified envelope.
//!
//! The payload bundle carries named string fields; absent keys, empty
//! strings and non-string values all read as absent, matching the identity
//! the canonical hashing applies. Editable kinds resolve their root from
//! the `txidEdit`/`txid` pair: a record without `txidEdit` is its own root.

use shared_types::{TxEnvelope, TxKind};

use crate::domain::error::DecodeError;
use crate::domain::model::{
    AccountDelete, AccountPayload, AccountUser, BarteronAccount, BarteronOffer, BlockingAction,
    CommentEntry, ComplainAction, ContentDelete, ContentEntry, ContentPayload, ModerationFlag,
    ModerationVote, ModeratorRegister, ModeratorRequest, Score, SocialTx, SubscribeAction, TxBody,
};

/// Resolves a wire tag to a kind, for envelope assembly.
pub fn decode_kind(tag: u16) -> Result<TxKind, DecodeError> {
    TxKind::from_tag(tag).ok_or(DecodeError::UnsupportedKind(tag))
}

fn opt_str(env: &TxEnvelope, key: &str) -> Option<String> {
    match env.payload_str(key) {
        Some("") | None => None,
        Some(v) => Some(v.to_string()),
    }
}

fn req_str(env: &TxEnvelope, key: &'static str) -> Result<String, DecodeError> {
    opt_str(env, key).ok_or(DecodeError::Malformed(key))
}

fn req_int(env: &TxEnvelope, key: &'static str) -> Result<i64, DecodeError> {
    env.payload_int(key).ok_or(DecodeError::Malformed(key))
}

/// Root of an edit chain: `txid` when the bundle marks an edit via
/// `txidEdit`, the record's own hash otherwise.
fn root_tx_hash(env: &TxEnvelope) -> Result<String, DecodeError> {
    match opt_str(env, "txidEdit") {
        Some(_) => req_str(env, "txid"),
        None => Ok(env.tx_hash.clone()),
    }
}

fn account_payload(env: &TxEnvelope) -> Option<AccountPayload> {
    let payload = AccountPayload {
        lang: opt_str(env, "lang"),
        name: opt_str(env, "name"),
        avatar: opt_str(env, "avatar"),
        about: opt_str(env, "about"),
        url: opt_str(env, "url"),
        pubkey: opt_str(env, "pubkey"),
        donations: opt_str(env, "donations"),
    };
    (payload != AccountPayload::default()).then_some(payload)
}

fn content_payload(env: &TxEnvelope) -> Option<ContentPayload> {
    let payload = ContentPayload {
        lang: opt_str(env, "lang"),
        caption: opt_str(env, "caption"),
        message: opt_str(env, "message"),
        tags: opt_str(env, "tags"),
        images: opt_str(env, "images"),
        settings: opt_str(env, "settings"),
        url: opt_str(env, "url"),
    };
    (payload != ContentPayload::default()).then_some(payload)
}

fn content_entry(env: &TxEnvelope) -> Result<ContentEntry, DecodeError> {
    Ok(ContentEntry {
        address: req_str(env, "address")?,
        root_tx_hash: root_tx_hash(env)?,
        relay_tx_hash: opt_str(env, "txidRepost"),
        payload: content_payload(env),
    })
}

fn comment_entry(env: &TxEnvelope) -> Result<CommentEntry, DecodeError> {
    Ok(CommentEntry {
        address: req_str(env, "address")?,
        root_tx_hash: opt_str(env, "otxid").unwrap_or_else(|| env.tx_hash.clone()),
        post_tx_hash: req_str(env, "postid")?,
        parent_tx_hash: opt_str(env, "parentid"),
        answer_tx_hash: opt_str(env, "answerid"),
        message: opt_str(env, "msg"),
    })
}

fn subscribe_action(env: &TxEnvelope) -> Result<SubscribeAction, DecodeError> {
    Ok(SubscribeAction {
        address: req_str(env, "address")?,
        address_to: req_str(env, "address_to")?,
    })
}

fn blocking_action(env: &TxEnvelope) -> Result<BlockingAction, DecodeError> {
    Ok(BlockingAction {
        address: req_str(env, "address")?,
        address_to: opt_str(env, "address_to"),
        addresses_to: opt_str(env, "addresses_to"),
    })
}

impl SocialTx {
    /// Builds the typed record for the envelope's kind tag.
    ///
    /// # Errors
    /// - [`DecodeError::UnsupportedKind`] when the tag has no record shape
    /// - [`DecodeError::Malformed`] when a required field is missing
    pub fn from_envelope(env: &TxEnvelope) -> Result<SocialTx, DecodeError> {
        let body = match env.kind {
            TxKind::Coinbase | TxKind::Coinstake | TxKind::Default => {
                TxBody::Money { kind: env.kind }
            }

            TxKind::AccountUser => TxBody::User(AccountUser {
                address: req_str(env, "address")?,
                referrer: opt_str(env, "referrer"),
                payload: account_payload(env),
            }),
            TxKind::AccountDelete => TxBody::AccountDelete(AccountDelete {
                address: req_str(env, "address")?,
            }),

            TxKind::ContentPost => TxBody::Post(content_entry(env)?),
            TxKind::ContentVideo => TxBody::Video(content_entry(env)?),
            TxKind::ContentComment => TxBody::Comment(comment_entry(env)?),
            TxKind::ContentCommentEdit => TxBody::CommentEdit(comment_entry(env)?),
            TxKind::ContentCommentDelete => TxBody::CommentDelete(comment_entry(env)?),
            TxKind::ContentDelete => TxBody::ContentDelete(ContentDelete {
                address: req_str(env, "address")?,
                root_tx_hash: req_str(env, "txid")?,
                settings: opt_str(env, "settings"),
            }),

            TxKind::ActionScoreContent => TxBody::ScoreContent(Score {
                address: req_str(env, "address")?,
                target_tx_hash: req_str(env, "posttxid")?,
                value: req_int(env, "value")?,
            }),
            TxKind::ActionScoreComment => TxBody::ScoreComment(Score {
                address: req_str(env, "address")?,
                target_tx_hash: req_str(env, "commentid")?,
                value: req_int(env, "value")?,
            }),

            TxKind::ActionSubscribe => TxBody::Subscribe(subscribe_action(env)?),
            TxKind::ActionSubscribePrivate => TxBody::SubscribePrivate(subscribe_action(env)?),
            TxKind::ActionSubscribeCancel => TxBody::SubscribeCancel(subscribe_action(env)?),

            TxKind::ActionBlocking => TxBody::Blocking(blocking_action(env)?),
            TxKind::ActionBlockingCancel => TxBody::BlockingCancel(blocking_action(env)?),

            TxKind::ActionComplain => TxBody::Complain(ComplainAction {
                address: req_str(env, "address")?,
                content_tx_hash: req_str(env, "posttxid")?,
                reason: req_int(env, "reason")?,
            }),

            TxKind::BarteronAccount => TxBody::BarteronAccount(BarteronAccount {
                address: req_str(env, "address")?,
                payload: opt_str(env, "payload"),
            }),
            TxKind::BarteronOffer => TxBody::BarteronOffer(BarteronOffer {
                address: req_str(env, "address")?,
                root_tx_hash: root_tx_hash(env)?,
                payload: opt_str(env, "payload"),
            }),

            TxKind::ModerationFlag => TxBody::ModerationFlag(ModerationFlag {
                address: req_str(env, "address")?,
                content_tx_hash: req_str(env, "contenttxid")?,
                reason: req_int(env, "reason")?,
            }),
            TxKind::ModerationVote => TxBody::ModerationVote(ModerationVote {
                address: req_str(env, "address")?,
                flag_tx_hash: req_str(env, "flagtxid")?,
                verdict: req_int(env, "verdict")?,
            }),
            TxKind::ModeratorRegister => TxBody::ModeratorRegister(ModeratorRegister {
                address: req_str(env, "address")?,
                request_id: opt_str(env, "requestid"),
            }),
            TxKind::ModeratorRequest => TxBody::ModeratorRequest(ModeratorRequest {
                address: req_str(env, "address")?,
                destination_address: req_str(env, "destination")?,
            }),
        };

        Ok(SocialTx {
            hash: env.tx_hash.clone(),
            time: env.time,
            height: env.height,
            op_return: Some(env.op_return.clone()),
            body,
        })
    }
}
