//! In-memory repository adapter.
//!
//! A reference implementation of [`ConsensusRepository`] over plain
//! vectors: the chain is an ordered list of committed records, the mempool
//! an unordered set of candidates. Query semantics are written for
//! readability, not speed; production nodes back the port with their own
//! store. The unit tests and the workspace scenario suite both drive the
//! core through this adapter.

use std::collections::{HashMap, HashSet};

use shared_types::{Address, BlockHeight, TxHash, TxKind};

use crate::domain::model::{SocialTx, TxBody};
use crate::ports::outbound::{
    ConsensusRepository, MempoolFilter, RepositoryResult, WindowStart,
};

/// Chain + mempool snapshot held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    chain: Vec<SocialTx>,
    mempool: Vec<SocialTx>,
    reputations: HashMap<Address, i64>,
    balances: HashMap<Address, i64>,
    jurors: HashSet<(Address, TxHash)>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits a record at the given height.
    pub fn add_chain(&mut self, mut tx: SocialTx, height: BlockHeight) {
        tx.height = Some(height);
        self.chain.push(tx);
    }

    /// Adds a mempool candidate.
    pub fn add_mempool(&mut self, mut tx: SocialTx) {
        tx.height = None;
        self.mempool.push(tx);
    }

    pub fn set_reputation(&mut self, address: &str, value: i64) {
        self.reputations.insert(address.to_string(), value);
    }

    pub fn set_balance(&mut self, address: &str, value: i64) {
        self.balances.insert(address.to_string(), value);
    }

    pub fn assign_juror(&mut self, address: &str, flag_tx_hash: &str) {
        self.jurors
            .insert((address.to_string(), flag_tx_hash.to_string()));
    }

    /// The newest account record for an address.
    fn last_account(&self, address: &str) -> Option<&SocialTx> {
        self.chain
            .iter()
            .filter(|tx| {
                matches!(tx.kind(), TxKind::AccountUser | TxKind::AccountDelete)
                    && tx.author() == Some(address)
            })
            .next_back()
    }

    /// The author of a committed content record, by root or exact hash.
    fn content_author(&self, content_tx_hash: &str) -> Option<&str> {
        self.chain
            .iter()
            .find(|tx| {
                matches!(tx.kind(), TxKind::ContentPost | TxKind::ContentVideo)
                    && (tx.hash == content_tx_hash
                        || tx.root_tx_hash() == Some(content_tx_hash))
            })
            .and_then(SocialTx::author)
    }

    fn in_window(tx: &SocialTx, from: WindowStart) -> bool {
        match from {
            WindowStart::Time(t) => tx.time >= t,
            WindowStart::Height(h) => tx.height.is_some_and(|height| height >= h),
        }
    }
}

impl ConsensusRepository for MemoryRepository {
    fn exists_account(&self, address: &str, include_mempool: bool) -> RepositoryResult<bool> {
        if self
            .last_account(address)
            .is_some_and(|tx| tx.kind() == TxKind::AccountUser)
        {
            return Ok(true);
        }
        if include_mempool {
            return Ok(self
                .mempool
                .iter()
                .any(|tx| tx.kind() == TxKind::AccountUser && tx.author() == Some(address)));
        }
        Ok(false)
    }

    fn count_chain_window(
        &self,
        kinds: &[TxKind],
        address: &str,
        from: WindowStart,
    ) -> RepositoryResult<u32> {
        Ok(self
            .chain
            .iter()
            .filter(|tx| {
                kinds.contains(&tx.kind())
                    && tx.author() == Some(address)
                    && !tx.is_edit()
                    && Self::in_window(tx, from)
            })
            .count() as u32)
    }

    fn count_chain_edits(&self, kinds: &[TxKind], root_tx_hash: &str) -> RepositoryResult<u32> {
        Ok(self
            .chain
            .iter()
            .filter(|tx| {
                kinds.contains(&tx.kind())
                    && tx.root_tx_hash() == Some(root_tx_hash)
                    && tx.hash != root_tx_hash
            })
            .count() as u32)
    }

    fn get_last(
        &self,
        kinds: &[TxKind],
        root_tx_hash: &str,
    ) -> RepositoryResult<Option<SocialTx>> {
        Ok(self
            .chain
            .iter()
            .filter(|tx| kinds.contains(&tx.kind()) && tx.root_tx_hash() == Some(root_tx_hash))
            .next_back()
            .cloned())
    }

    fn get_transaction(&self, hash: &str) -> RepositoryResult<Option<SocialTx>> {
        Ok(self.chain.iter().find(|tx| tx.hash == hash).cloned())
    }

    fn get_last_account_kind(&self, address: &str) -> RepositoryResult<Option<TxKind>> {
        Ok(self.last_account(address).map(SocialTx::kind))
    }

    fn get_last_subscribe_kind(&self, from: &str, to: &str) -> RepositoryResult<Option<TxKind>> {
        Ok(self
            .chain
            .iter()
            .filter(|tx| {
                matches!(
                    tx.kind(),
                    TxKind::ActionSubscribe
                        | TxKind::ActionSubscribePrivate
                        | TxKind::ActionSubscribeCancel
                ) && tx.author() == Some(from)
                    && tx.target_address() == Some(to)
            })
            .next_back()
            .map(SocialTx::kind))
    }

    fn get_last_blocking_kind(&self, from: &str, to: &str) -> RepositoryResult<Option<TxKind>> {
        Ok(self
            .chain
            .iter()
            .filter(|tx| {
                tx.author() == Some(from)
                    && match &tx.body {
                        TxBody::Blocking(action) => {
                            action.all_targets().iter().any(|target| target == to)
                        }
                        TxBody::BlockingCancel(action) => {
                            action.address_to.as_deref() == Some(to)
                        }
                        _ => false,
                    }
            })
            .next_back()
            .map(SocialTx::kind))
    }

    fn exists_score(
        &self,
        address: &str,
        target_tx_hash: &str,
        kind: TxKind,
        include_mempool: bool,
    ) -> RepositoryResult<bool> {
        let matches = |tx: &SocialTx| {
            tx.kind() == kind
                && tx.author() == Some(address)
                && tx.target_hash() == Some(target_tx_hash)
        };
        if self.chain.iter().any(|tx| matches(tx)) {
            return Ok(true);
        }
        if include_mempool {
            return Ok(self.mempool.iter().any(|tx| matches(tx)));
        }
        Ok(false)
    }

    fn exists_another_by_name(&self, address: &str, name_lower: &str) -> RepositoryResult<bool> {
        let mut last_by_author: HashMap<&str, &SocialTx> = HashMap::new();
        for tx in &self.chain {
            if matches!(tx.kind(), TxKind::AccountUser | TxKind::AccountDelete) {
                if let Some(author) = tx.author() {
                    last_by_author.insert(author, tx);
                }
            }
        }

        Ok(last_by_author.iter().any(|(author, tx)| {
            *author != address
                && match &tx.body {
                    TxBody::User(user) => user
                        .name()
                        .is_some_and(|name| name.to_lowercase() == name_lower),
                    _ => false,
                }
        }))
    }

    fn count_mempool(
        &self,
        kinds: &[TxKind],
        address: &str,
        filter: Option<MempoolFilter<'_>>,
    ) -> RepositoryResult<u32> {
        Ok(self
            .mempool
            .iter()
            .filter(|tx| {
                if !kinds.contains(&tx.kind()) || tx.author() != Some(address) {
                    return false;
                }
                match filter {
                    // The bare count is the daily-window companion: edits
                    // never count against the daily ceiling.
                    None => !tx.is_edit(),
                    Some(MempoolFilter::ToAddress(to)) => tx.target_address() == Some(to),
                    Some(MempoolFilter::RootTxHash(root)) => tx.root_tx_hash() == Some(root),
                }
            })
            .count() as u32)
    }

    fn user_reputation(&self, address: &str, _height: BlockHeight) -> RepositoryResult<i64> {
        Ok(self.reputations.get(address).copied().unwrap_or(0))
    }

    fn user_balance(&self, address: &str, _height: BlockHeight) -> RepositoryResult<i64> {
        Ok(self.balances.get(address).copied().unwrap_or(0))
    }

    fn transaction_height(&self, hash: &str) -> RepositoryResult<Option<BlockHeight>> {
        Ok(self
            .chain
            .iter()
            .find(|tx| tx.hash == hash)
            .and_then(|tx| tx.height))
    }

    fn count_scores_one_to_one(
        &self,
        scorer: &str,
        author: &str,
        from_time: i64,
        to_time: i64,
        values: &[i64],
        exclude_tx_hash: &str,
    ) -> RepositoryResult<u32> {
        Ok(self
            .chain
            .iter()
            .filter(|tx| {
                let TxBody::ScoreContent(score) = &tx.body else {
                    return false;
                };
                score.address == scorer
                    && tx.hash != exclude_tx_hash
                    && tx.time >= from_time
                    && tx.time < to_time
                    && (values.is_empty() || values.contains(&score.value))
                    && self.content_author(&score.target_tx_hash) == Some(author)
            })
            .count() as u32)
    }

    fn count_active_offers(&self, address: &str) -> RepositoryResult<u32> {
        let mut roots: HashSet<&str> = HashSet::new();
        for tx in &self.chain {
            if tx.kind() == TxKind::BarteronOffer && tx.author() == Some(address) {
                if let Some(root) = tx.root_tx_hash() {
                    roots.insert(root);
                }
            }
        }

        let mut active = 0;
        for root in roots {
            let last = self.get_last(&[TxKind::BarteronOffer, TxKind::ContentDelete], root)?;
            if last.is_some_and(|tx| tx.kind() == TxKind::BarteronOffer) {
                active += 1;
            }
        }
        Ok(active)
    }

    fn is_assigned_juror(&self, address: &str, flag_tx_hash: &str) -> RepositoryResult<bool> {
        Ok(self
            .jurors
            .contains(&(address.to_string(), flag_tx_hash.to_string())))
    }
}
