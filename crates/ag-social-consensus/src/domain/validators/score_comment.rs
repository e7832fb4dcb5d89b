//! Comment score rules.
//!
//! The blocking rejection was active in the early era, lifted for years,
//! and reinstated by the disable-for-blocked checkpoint.

use shared_types::TxKind;

use crate::domain::checkpoints::{Checkpoint, CheckpointSchedule};
use crate::domain::context::ConsensusContext;
use crate::domain::error::{ConsensusError, ConsensusResult};
use crate::domain::limits::LimitKey;
use crate::domain::model::{Score, SocialTx, TxBody};
use crate::domain::reputation::{self, ScoreEffect};
use crate::domain::validators::{
    fail_unless_escaped, last_of_root, mode_limit, window_start, BlockView, SocialValidator,
};

const COMMENT_KINDS: [TxKind; 3] = [
    TxKind::ContentComment,
    TxKind::ContentCommentEdit,
    TxKind::ContentCommentDelete,
];

/// `ACTION_SCORE_COMMENT` rules.
pub struct ScoreCommentValidator {
    blocking_check: bool,
    count_all_block: bool,
    windows_by_height: bool,
}

impl ScoreCommentValidator {
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

    pub fn disable_for_blocked() -> Self {
        Self {
            blocking_check: true,
            ..Self::height_windows()
        }
    }

    fn body<'t>(tx: &'t SocialTx) -> ConsensusResult<&'t Score> {
        match &tx.body {
            TxBody::ScoreComment(score) => Ok(score),
            _ => Err(ConsensusError::Failed),
        }
    }

    fn chain_count(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult<u32> {
        let score = Self::body(tx)?;
        let depth = ctx.limit(LimitKey::Depth);
        let from = window_start(self.windows_by_height, depth, tx.time, ctx.height);
        Ok(ctx
            .repo
            .count_chain_window(&[TxKind::ActionScoreComment], &score.address, from)?)
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
            LimitKey::FullCommentScoreLimit,
            LimitKey::TrialCommentScoreLimit,
        )?;
        if i64::from(count) >= limit {
            return Err(ConsensusError::CommentScoreLimit);
        }
        Ok(())
    }
}

impl SocialValidator for ScoreCommentValidator {
    fn check(&self, tx: &SocialTx, _ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let score = Self::body(tx)?;
        if score.address.is_empty() || score.target_tx_hash.is_empty() {
            return Err(ConsensusError::Failed);
        }
        if score.value != 1 && score.value != -1 {
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
            TxKind::ActionScoreComment,
            false,
        )? {
            return Err(ConsensusError::DoubleCommentScore);
        }

        let Some(comment) = last_of_root(&score.target_tx_hash, &COMMENT_KINDS, block, ctx)?
        else {
            return Err(ConsensusError::NotFound);
        };
        if comment.kind() == TxKind::ContentCommentDelete {
            fail_unless_escaped(tx, ctx, ConsensusError::NotFound)?;
        }

        let author = comment.author().ok_or(ConsensusError::Failed)?.to_string();
        if author == score.address {
            return Err(ConsensusError::SelfCommentScore);
        }

        if self.blocking_check
            && ctx.repo.get_last_blocking_kind(&author, &score.address)?
                == Some(TxKind::ActionBlocking)
        {
            return Err(ConsensusError::Blocking);
        }

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
            .filter(|btx| btx.kind() == TxKind::ActionScoreComment)
        {
            if btx.author() != Some(score.address.as_str()) {
                continue;
            }
            if btx.target_hash() == Some(score.target_tx_hash.as_str()) {
                return Err(ConsensusError::DoubleCommentScore);
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
            TxKind::ActionScoreComment,
            true,
        )? {
            return Err(ConsensusError::DoubleCommentScore);
        }

        let count = self.chain_count(tx, ctx)?
            + ctx
                .repo
                .count_mempool(&[TxKind::ActionScoreComment], &score.address, None)?;
        self.check_daily_limit(tx, count, ctx)
    }

    // Comment scores carry reputation weight behind the same scorer
    // threshold; the one-to-one damping and the lottery apply to content
    // scores only.
    fn reputation_effect(
        &self,
        tx: &SocialTx,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult<Option<ScoreEffect>> {
        let score = Self::body(tx)?;
        let modifies_reputation = reputation::allow_modify_reputation(ctx, &score.address)?;
        Ok(Some(ScoreEffect {
            modifies_reputation,
            enters_lottery: false,
        }))
    }
}

pub static SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> = CheckpointSchedule::new(&[
    Checkpoint {
        main: 0,
        test: -1,
        alt: -1,
        make: || Box::new(ScoreCommentValidator::base()),
    },
    Checkpoint {
        main: 430_000,
        test: -1,
        alt: -1,
        make: || Box::new(ScoreCommentValidator::blocking_era()),
    },
    Checkpoint {
        main: 514_184,
        test: -1,
        alt: -1,
        make: || Box::new(ScoreCommentValidator::blocking_lifted()),
    },
    Checkpoint {
        main: 1_124_000,
        test: -1,
        alt: -1,
        make: || Box::new(ScoreCommentValidator::count_all_block()),
    },
    Checkpoint {
        main: 1_180_000,
        test: 0,
        alt: 0,
        make: || Box::new(ScoreCommentValidator::height_windows()),
    },
    Checkpoint {
        main: 1_757_000,
        test: 953_000,
        alt: 0,
        make: || Box::new(ScoreCommentValidator::disable_for_blocked()),
    },
]);
