//! Test fixtures: a chain-state world plus record and envelope builders.

use ag_social_consensus::adapters::memory::MemoryRepository;
use ag_social_consensus::domain::model::{
    AccountPayload, AccountUser, BlockingAction, CommentEntry, ComplainAction, ContentDelete,
    ContentEntry, ContentPayload, Score, SocialTx, SubscribeAction, TxBody,
};
use ag_social_consensus::{ConsensusContext, EscapeRegistry, LimitTable};
use serde_json::{Map, Value};
use shared_types::{BlockHeight, Network, OpReturn, TxEnvelope};

/// Chain state, limits and escapes for one validation run.
pub struct World {
    pub repo: MemoryRepository,
    pub limits: LimitTable,
    pub escapes: EscapeRegistry,
    pub network: Network,
    pub height: BlockHeight,
}

impl World {
    /// A mainnet world with production limits and escapes.
    pub fn at_height(height: BlockHeight) -> Self {
        Self {
            repo: MemoryRepository::new(),
            limits: LimitTable::default(),
            escapes: EscapeRegistry::chain(),
            network: Network::Main,
            height,
        }
    }

    pub fn ctx(&self) -> ConsensusContext<'_> {
        ConsensusContext {
            repo: &self.repo,
            limits: &self.limits,
            escapes: &self.escapes,
            network: self.network,
            height: self.height,
        }
    }

    /// Registers an account straight into chain state.
    pub fn register(&mut self, address: &str) {
        self.repo
            .add_chain(user_tx(&format!("reg-{address}"), address, address), 10);
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

pub fn post_tx(hash: &str, address: &str, time: i64) -> SocialTx {
    tx(
        hash,
        time,
        TxBody::Post(ContentEntry {
            address: address.to_string(),
            root_tx_hash: hash.to_string(),
            relay_tx_hash: None,
            payload: Some(ContentPayload {
                lang: Some("en".into()),
                caption: Some(format!("caption {hash}")),
                message: Some(format!("message {hash}")),
                tags: Some(r#"["news"]"#.into()),
                ..Default::default()
            }),
        }),
    )
}

pub fn post_edit_tx(hash: &str, root: &str, address: &str, time: i64) -> SocialTx {
    let mut record = post_tx(hash, address, time);
    if let TxBody::Post(entry) = &mut record.body {
        entry.root_tx_hash = root.to_string();
    }
    record
}

pub fn comment_tx(hash: &str, address: &str, post: &str, time: i64) -> SocialTx {
    tx(
        hash,
        time,
        TxBody::Comment(CommentEntry {
            address: address.to_string(),
            root_tx_hash: hash.to_string(),
            post_tx_hash: post.to_string(),
            parent_tx_hash: None,
            answer_tx_hash: None,
            message: Some("a comment".into()),
        }),
    )
}

pub fn comment_delete_tx(hash: &str, root: &str, address: &str, post: &str, time: i64) -> SocialTx {
    tx(
        hash,
        time,
        TxBody::CommentDelete(CommentEntry {
            address: address.to_string(),
            root_tx_hash: root.to_string(),
            post_tx_hash: post.to_string(),
            parent_tx_hash: None,
            answer_tx_hash: None,
            message: None,
        }),
    )
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

pub fn subscribe_tx(hash: &str, address: &str, to: &str) -> SocialTx {
    tx(
        hash,
        1_000,
        TxBody::Subscribe(SubscribeAction {
            address: address.to_string(),
            address_to: to.to_string(),
        }),
    )
}

pub fn subscribe_cancel_tx(hash: &str, address: &str, to: &str) -> SocialTx {
    tx(
        hash,
        1_000,
        TxBody::SubscribeCancel(SubscribeAction {
            address: address.to_string(),
            address_to: to.to_string(),
        }),
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

/// Seals a record: sets its content-addressed id and the matching
/// OP_RETURN commitment, the way the envelope layer would present it.
pub fn sealed(mut record: SocialTx) -> SocialTx {
    let hash = record.build_hash();
    // First versions are their own root.
    match &mut record.body {
        TxBody::Post(entry) | TxBody::Video(entry) => {
            if entry.root_tx_hash == record.hash {
                entry.root_tx_hash = hash.clone();
            }
        }
        TxBody::Comment(entry) => {
            if entry.root_tx_hash == record.hash {
                entry.root_tx_hash = hash.clone();
            }
        }
        _ => {}
    }
    record.hash = hash.clone();
    record.op_return = Some(OpReturn {
        data_hash: hash,
        extra: None,
    });
    record
}

/// Rebuilds the envelope a record would have arrived in.
///
/// Only the payload keys the decoder reads are emitted; the monetary side
/// is synthetic.
pub fn envelope_for(record: &SocialTx) -> TxEnvelope {
    let mut payload = Map::new();
    let mut put = |key: &str, value: &str| {
        if !value.is_empty() {
            payload.insert(key.to_string(), Value::String(value.to_string()));
        }
    };

    match &record.body {
        TxBody::User(user) => {
            put("address", &user.address);
            put("referrer", user.referrer.as_deref().unwrap_or_default());
            if let Some(p) = &user.payload {
                put("lang", p.lang.as_deref().unwrap_or_default());
                put("name", p.name.as_deref().unwrap_or_default());
                put("avatar", p.avatar.as_deref().unwrap_or_default());
                put("about", p.about.as_deref().unwrap_or_default());
                put("url", p.url.as_deref().unwrap_or_default());
                put("pubkey", p.pubkey.as_deref().unwrap_or_default());
                put("donations", p.donations.as_deref().unwrap_or_default());
            }
        }
        TxBody::Post(entry) | TxBody::Video(entry) => {
            put("address", &entry.address);
            if entry.root_tx_hash != record.hash {
                put("txid", &entry.root_tx_hash);
                put("txidEdit", &record.hash);
            }
            put(
                "txidRepost",
                entry.relay_tx_hash.as_deref().unwrap_or_default(),
            );
            if let Some(p) = &entry.payload {
                put("lang", p.lang.as_deref().unwrap_or_default());
                put("caption", p.caption.as_deref().unwrap_or_default());
                put("message", p.message.as_deref().unwrap_or_default());
                put("tags", p.tags.as_deref().unwrap_or_default());
                put("images", p.images.as_deref().unwrap_or_default());
                put("settings", p.settings.as_deref().unwrap_or_default());
                put("url", p.url.as_deref().unwrap_or_default());
            }
        }
        TxBody::Comment(entry) | TxBody::CommentEdit(entry) | TxBody::CommentDelete(entry) => {
            put("address", &entry.address);
            if entry.root_tx_hash != record.hash {
                put("otxid", &entry.root_tx_hash);
            }
            put("postid", &entry.post_tx_hash);
            put(
                "parentid",
                entry.parent_tx_hash.as_deref().unwrap_or_default(),
            );
            put(
                "answerid",
                entry.answer_tx_hash.as_deref().unwrap_or_default(),
            );
            put("msg", entry.message.as_deref().unwrap_or_default());
        }
        TxBody::ContentDelete(del) => {
            put("address", &del.address);
            put("txid", &del.root_tx_hash);
            put("settings", del.settings.as_deref().unwrap_or_default());
        }
        TxBody::ScoreContent(score) => {
            put("address", &score.address);
            put("posttxid", &score.target_tx_hash);
            payload.insert("value".into(), Value::from(score.value));
        }
        TxBody::ScoreComment(score) => {
            put("address", &score.address);
            put("commentid", &score.target_tx_hash);
            payload.insert("value".into(), Value::from(score.value));
        }
        TxBody::Subscribe(action) | TxBody::SubscribePrivate(action)
        | TxBody::SubscribeCancel(action) => {
            put("address", &action.address);
            put("address_to", &action.address_to);
        }
        TxBody::Blocking(action) | TxBody::BlockingCancel(action) => {
            put("address", &action.address);
            put("address_to", action.address_to.as_deref().unwrap_or_default());
            put(
                "addresses_to",
                action.addresses_to.as_deref().unwrap_or_default(),
            );
        }
        TxBody::Complain(action) => {
            put("address", &action.address);
            put("posttxid", &action.content_tx_hash);
            payload.insert("reason".into(), Value::from(action.reason));
        }
        TxBody::BarteronAccount(account) => {
            put("address", &account.address);
            put("payload", account.payload.as_deref().unwrap_or_default());
        }
        TxBody::BarteronOffer(offer) => {
            put("address", &offer.address);
            if offer.root_tx_hash != record.hash {
                put("txid", &offer.root_tx_hash);
                put("txidEdit", &record.hash);
            }
            put("payload", offer.payload.as_deref().unwrap_or_default());
        }
        TxBody::ModerationFlag(flag) => {
            put("address", &flag.address);
            put("contenttxid", &flag.content_tx_hash);
            payload.insert("reason".into(), Value::from(flag.reason));
        }
        TxBody::ModerationVote(vote) => {
            put("address", &vote.address);
            put("flagtxid", &vote.flag_tx_hash);
            payload.insert("verdict".into(), Value::from(vote.verdict));
        }
        TxBody::ModeratorRegister(register) => {
            put("address", &register.address);
            put("requestid", register.request_id.as_deref().unwrap_or_default());
        }
        TxBody::ModeratorRequest(request) => {
            put("address", &request.address);
            put("destination", &request.destination_address);
        }
        TxBody::AccountDelete(del) => {
            put("address", &del.address);
        }
        TxBody::Money { .. } => {}
    }

    TxEnvelope {
        tx_hash: record.hash.clone(),
        time: record.time,
        height: record.height,
        kind: record.kind(),
        inputs: vec![],
        outputs: vec![],
        op_return: record.op_return.clone().unwrap_or(OpReturn {
            data_hash: record.build_hash(),
            extra: None,
        }),
        payload,
    }
}

/// One-time tracing setup so failing scenarios print the core's warnings.
#[cfg(test)]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
