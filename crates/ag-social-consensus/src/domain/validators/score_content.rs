//! Content score rules.
//!
//! Revision lineage: base rules; the era that rejected scores from blocked
//! addresses; the era that lifted that rule again; whole-block counting;
//! height-measured windows.

use shared_types::TxKind;

use crate::domain::checkpoints::{Checkpoint, CheckpointSchedule};
use crate::domain::context::ConsensusContext;
use crate::domain::error::{ConsensusError, ConsensusResult};
use crate::domain::limits::LimitKey;
use crate::domain::model::{Score, SocialTx, TxBody};
use crate::domain::reputation::{self, ScoreEffect};
use crate::domain::validators::{mode_limit, window_start, BlockView, SocialValidator};

const CONTENT_KINDS: [TxKind; 3] = [
    TxKind::ContentPost,
    TxKind::ContentVideo,
    TxKind::ContentDelete,
];

/// `ACTION_SCORE_CONTENT` rules.
pub struct ScoreContentValidator {
    blocking_check: bool,
    count_all_block: bool,
    windows_by_height: bool,
}

impl ScoreContentValidator {
    pub fn base() -> Self {
        Self {
            blocking_check: false,
            count_all_block: false,
            windows_by_height: false,
        }
    }

    pub fn blocking_era() -> Self {
        Self {
            blocking_check: true,
            ..Self::base()
        }
    }

    pub fn blocking_lifted() -> Self {
        Self::base()
    }

    pub fn count_all_block() -> Self {
        Self {
            count_all_block: true,
            ..Self::base()
        }
    }

    pub fn height_windows() -> Self {
        Self {
            windows_by_height: true,
            ..Self::count_all_block()
        }
    }

    fn body<'t>(tx: &'t SocialTx) -> ConsensusResult<&'t Score> {
        match &tx.body {
            TxBody::ScoreContent(score) => Ok(score),
            _ => Err(ConsensusError::Failed),
        }
    }

    fn chain_count(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult<u32> {
        let score = Self::body(tx)?;
        let depth = ctx.limit(LimitKey::Depth);
        let from = window_start(self.windows_by_height, depth, tx.time, ctx.height);
        Ok(ctx
            .repo
            .count_chain_window(&[TxKind::ActionScoreContent], &score.address, from)?)
    }

    fn check_daily_limit(
        &self,
        tx: &SocialTx,
        count: u32,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let score = Self::body(tx)?;
        let limit = mode_limit(
            ctx,
            &score.address,
            LimitKey::FullScoreLimit,
            LimitKey::TrialScoreLimit,
        )?;
        if i64::from(count) >= limit {
            return Err(ConsensusError::ScoreLimit);
        }
        Ok(())
    }

    /// The scored content, newest version, from chain or block.
    fn find_target(
        &self,
        score: &Score,
        block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult<SocialTx> {
        match super::last_of_root(&score.target_tx_hash, &CONTENT_KINDS, block, ctx)? {
            Some(last) if last.kind() != TxKind::ContentDelete => Ok(last),
            _ => Err(ConsensusError::NotFound),
        }
    }
}

impl SocialValidator for ScoreContentValidator {
    fn check(&self, tx: &SocialTx, _ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let score = Self::body(tx)?;
        if score.address.is_empty() || score.target_tx_hash.is_empty() {
            return Err(ConsensusError::Failed);
        }
        if !(1..=5).contains(&score.value) {
            return Err(ConsensusError::Failed);
        }
        Ok(())
    }

    fn validate_chain(
        &self,
        tx: &SocialTx,
        block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let score = Self::body(tx)?;

        if ctx.repo.exists_score(
            &score.address,
            &score.target_tx_hash,
            TxKind::ActionScoreContent,
            false,
        )? {
            return Err(ConsensusError::DoubleScore);
        }

        let target = self.find_target(score, block, ctx)?;
        let author = target.author().ok_or(ConsensusError::Failed)?.to_string();

        if author == score.address {
            return Err(ConsensusError::SelfScore);
        }

        if self.blocking_check
            && ctx.repo.get_last_blocking_kind(&author, &score.address)?
                == Some(TxKind::ActionBlocking)
        {
            return Err(ConsensusError::Blocking);
        }

        // The envelope's extra operand binds the score to the content
        // author; a stale or forged binding invalidates the transaction
        // even when the record itself is consistent.
        if let Some(extra) = tx.op_return.as_ref().and_then(|op| op.extra.as_ref()) {
            if *extra != score.op_return_binding(&author) {
                return Err(ConsensusError::FailedOpReturn);
            }
        }

        Ok(())
    }

    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let score = Self::body(tx)?;

        let mut count = self.chain_count(tx, ctx)?;
        for btx in block
            .iter()
            .filter(|btx| btx.kind() == TxKind::ActionScoreContent)
        {
            if btx.author() != Some(score.address.as_str()) {
                continue;
            }
            if btx.target_hash() == Some(score.target_tx_hash.as_str()) {
                return Err(ConsensusError::DoubleScore);
            }
            if self.count_all_block || btx.time <= tx.time {
                count += 1;
            }
        }

        self.check_daily_limit(tx, count, ctx)
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let score = Self::body(tx)?;

        if ctx.repo.exists_score(
            &score.address,
            &score.target_tx_hash,
            TxKind::ActionScoreContent,
            true,
        )? {
            return Err(ConsensusError::DoubleScore);
        }

        let count = self.chain_count(tx, ctx)?
            + ctx
                .repo
                .count_mempool(&[TxKind::ActionScoreContent], &score.address, None)?;
        self.check_daily_limit(tx, count, ctx)
    }

    fn reputation_effect(
        &self,
        tx: &SocialTx,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult<Option<ScoreEffect>> {
        let score = Self::body(tx)?;
        let target = self.find_target(score, None, ctx)?;
        let author = target.author().ok_or(ConsensusError::Failed)?.to_string();

        let modifies_reputation = reputation::allow_modify_reputation(ctx, &score.address)?
            && reputation::allow_reputation_one_to_one(
                ctx,
                &score.address,
                &author,
                &tx.hash,
                tx.time,
            )?;
        // Only the top grades enter the draw.
        let enters_lottery = matches!(score.value, 4 | 5)
            && reputation::allow_lottery(ctx, &score.address, &author, &tx.hash, tx.time)?;

        Ok(Some(ScoreEffect {
            modifies_reputation,
            enters_lottery,
        }))
    }
}

pub static SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> = CheckpointSchedule::new(&[
    Checkpoint {
        main: 0,
        test: -1,
        alt: -1,
        make: || Box::new(ScoreContentValidator::base()),
    },
    Checkpoint {
        main: 430_000,
        test: -1,
        alt: -1,
        make: || Box::new(ScoreContentValidator::blocking_era()),
    },
    Checkpoint {
        main: 514_184,
        test: 0,
        alt: 0,
        make: || Box::new(ScoreContentValidator::blocking_lifted()),
    },
    Checkpoint {
        main: 1_124_000,
        test: -1,
        alt: -1,
        make: || Box::new(ScoreContentValidator::count_all_block()),
    },
    Checkpoint {
        main: 1_180_000,
        test: 0,
        alt: 0,
        make: || Box::new(ScoreContentValidator::height_windows()),
    },
]);
