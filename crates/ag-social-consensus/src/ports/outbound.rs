//! Outbound (Driven) port for the social consensus subsystem.
//!
//! Validators consume a narrow, read-only query surface; an implementation
//! over any store satisfying these semantics is acceptable. All filtering
//! beyond the listed parameters lives in the validators, not here.

use shared_types::{BlockHeight, TxKind};

use crate::domain::model::SocialTx;

/// Errors surfaced by a repository implementation.
///
/// The core converts any repository failure into a rejected candidate; the
/// implementation is responsible for logging the underlying cause.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// The backing store failed to answer.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for repository reads.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Start of a counting window.
///
/// Daily limits were measured in envelope seconds in the early eras and in
/// block heights after the window checkpoint; the repository supports both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStart {
    /// Count records with `time >= t`.
    Time(i64),
    /// Count records with `height >= h`.
    Height(BlockHeight),
}

/// Narrows a mempool count to one counterparty or one edit chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MempoolFilter<'a> {
    /// Only records targeting this address (subscribe/blocking pairs).
    ToAddress(&'a str),
    /// Only records editing this root (content edit chains).
    RootTxHash(&'a str),
}

/// Read-only chain/mempool queries the validators need.
///
/// Implementations must present an immutable snapshot for the duration of
/// one validation call; the core performs no mutation and tolerates the
/// usual reader discipline (no torn reads within one call).
pub trait ConsensusRepository: Send + Sync {
    /// Is there a live (not deleted) registered account for this address?
    ///
    /// # Arguments
    /// - `include_mempool`: also count an unconfirmed registration
    fn exists_account(&self, address: &str, include_mempool: bool) -> RepositoryResult<bool>;

    /// Number of original (non-edit) records of the given kinds authored by
    /// `address` inside the window.
    fn count_chain_window(
        &self,
        kinds: &[TxKind],
        address: &str,
        from: WindowStart,
    ) -> RepositoryResult<u32>;

    /// Number of committed edits of the given root.
    fn count_chain_edits(&self, kinds: &[TxKind], root_tx_hash: &str) -> RepositoryResult<u32>;

    /// The chronologically newest record for an editable root, if any.
    fn get_last(&self, kinds: &[TxKind], root_tx_hash: &str)
        -> RepositoryResult<Option<SocialTx>>;

    /// A committed record by exact hash.
    fn get_transaction(&self, hash: &str) -> RepositoryResult<Option<SocialTx>>;

    /// Kind of the newest account record for this address, if any.
    /// Detects the `AccountDelete` tombstone.
    fn get_last_account_kind(&self, address: &str) -> RepositoryResult<Option<TxKind>>;

    /// Kind of the newest subscribe-family record for the pair, if any.
    fn get_last_subscribe_kind(&self, from: &str, to: &str) -> RepositoryResult<Option<TxKind>>;

    /// Kind of the newest blocking-family record for the pair, if any.
    /// A multi-target blocking whose list contains `to` counts for the pair.
    fn get_last_blocking_kind(&self, from: &str, to: &str) -> RepositoryResult<Option<TxKind>>;

    /// Has `address` already produced a record of `kind` against this
    /// target hash? Backs the unique-score and unique-complaint rules.
    fn exists_score(
        &self,
        address: &str,
        target_tx_hash: &str,
        kind: TxKind,
        include_mempool: bool,
    ) -> RepositoryResult<bool>;

    /// Does a different address hold this lower-cased account name?
    fn exists_another_by_name(&self, address: &str, name_lower: &str) -> RepositoryResult<bool>;

    /// Mempool companion of [`Self::count_chain_window`].
    fn count_mempool(
        &self,
        kinds: &[TxKind],
        address: &str,
        filter: Option<MempoolFilter<'_>>,
    ) -> RepositoryResult<u32>;

    /// Accumulated reputation of an address as of the given height.
    fn user_reputation(&self, address: &str, height: BlockHeight) -> RepositoryResult<i64>;

    /// Confirmed balance of an address as of the given height, base units.
    fn user_balance(&self, address: &str, height: BlockHeight) -> RepositoryResult<i64>;

    /// Height the transaction was committed at, if committed.
    fn transaction_height(&self, hash: &str) -> RepositoryResult<Option<BlockHeight>>;

    /// Scores from `scorer` to content authored by `author` with time in
    /// `[from_time, to_time)`, value in `values` (empty = any), excluding
    /// `exclude_tx_hash`. Backs the one-to-one reputation gates.
    #[allow(clippy::too_many_arguments)]
    fn count_scores_one_to_one(
        &self,
        scorer: &str,
        author: &str,
        from_time: i64,
        to_time: i64,
        values: &[i64],
        exclude_tx_hash: &str,
    ) -> RepositoryResult<u32>;

    /// Barter offers of this address whose newest version is still an offer.
    fn count_active_offers(&self, address: &str) -> RepositoryResult<u32>;

    /// Was `address` deterministically assigned to the jury of this flag?
    /// The assignment itself is an external capability; the core only
    /// consumes the decision.
    fn is_assigned_juror(&self, address: &str, flag_tx_hash: &str) -> RepositoryResult<bool>;
}
