//! Shared fixtures for the validator unit tests.

use shared_types::Network;

use crate::adapters::memory::MemoryRepository;
use crate::domain::context::ConsensusContext;
use crate::domain::escapes::EscapeRegistry;
use crate::domain::limits::LimitTable;
use crate::domain::model::{
    AccountDelete, AccountPayload, AccountUser, BarteronOffer, BlockingAction, CommentEntry,
    ComplainAction, ContentDelete, ContentEntry, ContentPayload, ModerationFlag, ModerationVote,
    Score, SocialTx, SubscribeAction, TxBody,
};

pub fn repo() -> MemoryRepository {
    MemoryRepository::new()
}

pub fn limits() -> LimitTable {
    LimitTable::default()
}

pub fn no_escapes() -> EscapeRegistry {
    EscapeRegistry::empty()
}

pub fn ctx_at<'a>(
    repo: &'a MemoryRepository,
    limits: &'a LimitTable,
    escapes: &'a EscapeRegistry,
    height: u32,
) -> ConsensusContext<'a> {
    ConsensusContext {
        repo,
        limits,
        escapes,
        network: Network::Main,
        height,
    }
}

fn tx(hash: &str, time: i64, body: TxBody) -> SocialTx {
    SocialTx {
        hash: hash.to_string(),
        time,
        height: None,
        op_return: None,
        body,
    }
}

pub fn user_tx(hash: &str, address: &str, name: &str) -> SocialTx {
    tx(
        hash,
        1_000,
        TxBody::User(AccountUser {
            address: address.to_string(),
            referrer: None,
            payload: Some(AccountPayload {
                lang: Some("en".into()),
                name: Some(name.to_string()),
                ..Default::default()
            }),
        }),
    )
}

pub fn account_delete_tx(hash: &str, address: &str) -> SocialTx {
    tx(
        hash,
        1_000,
        TxBody::AccountDelete(AccountDelete {
            address: address.to_string(),
        }),
    )
}

fn content_entry(hash: &str, address: &str, root: &str) -> ContentEntry {
    ContentEntry {
        address: address.to_string(),
        root_tx_hash: if root.is_empty() {
            hash.to_string()
        } else {
            root.to_string()
        },
        relay_tx_hash: None,
        payload: Some(ContentPayload {
            lang: Some("en".into()),
            message: Some(format!("message of {hash}")),
            ..Default::default()
        }),
    }
}

pub fn post_tx(hash: &str, address: &str, time: i64) -> SocialTx {
    tx(hash, time, TxBody::Post(content_entry(hash, address, "")))
}

pub fn post_edit_tx(hash: &str, root: &str, address: &str, time: i64) -> SocialTx {
    tx(hash, time, TxBody::Post(content_entry(hash, address, root)))
}

pub fn video_tx(hash: &str, address: &str, time: i64) -> SocialTx {
    tx(hash, time, TxBody::Video(content_entry(hash, address, "")))
}

pub fn content_delete_tx(hash: &str, root: &str, address: &str, time: i64) -> SocialTx {
    tx(
        hash,
        time,
        TxBody::ContentDelete(ContentDelete {
            address: address.to_string(),
            root_tx_hash: root.to_string(),
            settings: None,
        }),
    )
}

fn comment_entry(hash: &str, address: &str, root: &str, post: &str) -> CommentEntry {
    CommentEntry {
        address: address.to_string(),
        root_tx_hash: if root.is_empty() {
            hash.to_string()
        } else {
            root.to_string()
        },
        post_tx_hash: post.to_string(),
        parent_tx_hash: None,
        answer_tx_hash: None,
        message: Some("a comment".into()),
    }
}

pub fn comment_tx(hash: &str, address: &str, post: &str, time: i64) -> SocialTx {
    tx(
        hash,
        time,
        TxBody::Comment(comment_entry(hash, address, "", post)),
    )
}

pub fn comment_edit_tx(hash: &str, root: &str, address: &str, post: &str, time: i64) -> SocialTx {
    tx(
        hash,
        time,
        TxBody::CommentEdit(comment_entry(hash, address, root, post)),
    )
}

pub fn comment_delete_tx(hash: &str, root: &str, address: &str, post: &str, time: i64) -> SocialTx {
    let mut entry = comment_entry(hash, address, root, post);
    entry.message = None;
    tx(hash, time, TxBody::CommentDelete(entry))
}

pub fn score_tx(hash: &str, address: &str, target: &str, value: i64, time: i64) -> SocialTx {
    tx(
        hash,
        time,
        TxBody::ScoreContent(Score {
            address: address.to_string(),
            target_tx_hash: target.to_string(),
            value,
        }),
    )
}

pub fn comment_score_tx(
    hash: &str,
    address: &str,
    target: &str,
    value: i64,
    time: i64,
) -> SocialTx {
    tx(
        hash,
        time,
        TxBody::ScoreComment(Score {
            address: address.to_string(),
            target_tx_hash: target.to_string(),
            value,
        }),
    )
}

fn subscribe_action(address: &str, to: &str) -> SubscribeAction {
    SubscribeAction {
        address: address.to_string(),
        address_to: to.to_string(),
    }
}

pub fn subscribe_tx(hash: &str, address: &str, to: &str) -> SocialTx {
    tx(hash, 1_000, TxBody::Subscribe(subscribe_action(address, to)))
}

pub fn subscribe_private_tx(hash: &str, address: &str, to: &str) -> SocialTx {
    tx(
        hash,
        1_000,
        TxBody::SubscribePrivate(subscribe_action(address, to)),
    )
}

pub fn subscribe_cancel_tx(hash: &str, address: &str, to: &str) -> SocialTx {
    tx(
        hash,
        1_000,
        TxBody::SubscribeCancel(subscribe_action(address, to)),
    )
}

pub fn blocking_tx(hash: &str, address: &str, to: &str) -> SocialTx {
    tx(
        hash,
        1_000,
        TxBody::Blocking(BlockingAction {
            address: address.to_string(),
            address_to: Some(to.to_string()),
            addresses_to: None,
        }),
    )
}

pub fn multi_blocking_tx(hash: &str, address: &str, targets: &[&str]) -> SocialTx {
    tx(
        hash,
        1_000,
        TxBody::Blocking(BlockingAction {
            address: address.to_string(),
            address_to: None,
            addresses_to: Some(serde_json::to_string(targets).expect("serializable")),
        }),
    )
}

pub fn blocking_cancel_tx(hash: &str, address: &str, to: &str) -> SocialTx {
    tx(
        hash,
        1_000,
        TxBody::BlockingCancel(BlockingAction {
            address: address.to_string(),
            address_to: Some(to.to_string()),
            addresses_to: None,
        }),
    )
}

pub fn complain_tx(hash: &str, address: &str, target: &str, time: i64) -> SocialTx {
    tx(
        hash,
        time,
        TxBody::Complain(ComplainAction {
            address: address.to_string(),
            content_tx_hash: target.to_string(),
            reason: 1,
        }),
    )
}

pub fn offer_tx(hash: &str, address: &str) -> SocialTx {
    tx(
        hash,
        1_000,
        TxBody::BarteronOffer(BarteronOffer {
            address: address.to_string(),
            root_tx_hash: hash.to_string(),
            payload: Some("{\"title\":\"offer\"}".into()),
        }),
    )
}

pub fn offer_edit_tx(hash: &str, root: &str, address: &str) -> SocialTx {
    tx(
        hash,
        1_000,
        TxBody::BarteronOffer(BarteronOffer {
            address: address.to_string(),
            root_tx_hash: root.to_string(),
            payload: Some("{\"title\":\"offer v2\"}".into()),
        }),
    )
}

pub fn offer_delete_tx(hash: &str, root: &str, address: &str) -> SocialTx {
    content_delete_tx(hash, root, address, 1_000)
}

pub fn flag_tx(hash: &str, address: &str, content: &str) -> SocialTx {
    tx(
        hash,
        1_000,
        TxBody::ModerationFlag(ModerationFlag {
            address: address.to_string(),
            content_tx_hash: content.to_string(),
            reason: 1,
        }),
    )
}

pub fn vote_tx(hash: &str, address: &str, flag: &str) -> SocialTx {
    tx(
        hash,
        1_000,
        TxBody::ModerationVote(ModerationVote {
            address: address.to_string(),
            flag_tx_hash: flag.to_string(),
            verdict: 1,
        }),
    )
}

/// Registers an account straight into chain state.
pub fn register(repo: &mut MemoryRepository, address: &str, height: u32) {
    repo.add_chain(user_tx(&format!("reg-{address}"), address, address), height);
}
