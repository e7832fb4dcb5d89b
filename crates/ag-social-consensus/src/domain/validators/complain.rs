//! Complaint rules: reputation-gated, unique per content, daily-capped.

use shared_types::TxKind;

use crate::domain::checkpoints::{Checkpoint, CheckpointSchedule};
use crate::domain::context::ConsensusContext;
use crate::domain::error::{ConsensusError, ConsensusResult};
use crate::domain::limits::LimitKey;
use crate::domain::model::{ComplainAction, SocialTx, TxBody};
use crate::domain::reputation;
use crate::domain::validators::{
    last_of_root, mode_limit, window_start, BlockView, SocialValidator,
};

const CONTENT_KINDS: [TxKind; 3] = [
    TxKind::ContentPost,
    TxKind::ContentVideo,
    TxKind::ContentDelete,
];

/// `ACTION_COMPLAIN` rules.
pub struct ComplainValidator {
    windows_by_height: bool,
}

impl ComplainValidator {
    pub fn base() -> Self {
        Self {
            windows_by_height: false,
        }
    }

    pub fn height_windows() -> Self {
        Self {
            windows_by_height: true,
        }
    }

    fn body<'t>(tx: &'t SocialTx) -> ConsensusResult<&'t ComplainAction> {
        match &tx.body {
            TxBody::Complain(action) => Ok(action),
            _ => Err(ConsensusError::Failed),
        }
    }

    fn chain_count(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult<u32> {
        let action = Self::body(tx)?;
        let depth = ctx.limit(LimitKey::Depth);
        let from = window_start(self.windows_by_height, depth, tx.time, ctx.height);
        Ok(ctx
            .repo
            .count_chain_window(&[TxKind::ActionComplain], &action.address, from)?)
    }

    fn check_daily_limit(
        &self,
        tx: &SocialTx,
        count: u32,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let action = Self::body(tx)?;
        let limit = mode_limit(
            ctx,
            &action.address,
            LimitKey::FullComplainLimit,
            LimitKey::TrialComplainLimit,
        )?;
        if i64::from(count) >= limit {
            return Err(ConsensusError::ComplainLimit);
        }
        Ok(())
    }
}

impl SocialValidator for ComplainValidator {
    fn check(&self, tx: &SocialTx, _ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let action = Self::body(tx)?;
        if action.address.is_empty() || action.content_tx_hash.is_empty() || action.reason < 1 {
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
        let action = Self::body(tx)?;

        let target = match last_of_root(&action.content_tx_hash, &CONTENT_KINDS, block, ctx)? {
            Some(last) if last.kind() != TxKind::ContentDelete => last,
            _ => return Err(ConsensusError::NotFound),
        };

        if target.author() == Some(action.address.as_str()) {
            return Err(ConsensusError::SelfComplain);
        }

        if ctx.repo.exists_score(
            &action.address,
            &action.content_tx_hash,
            TxKind::ActionComplain,
            false,
        )? {
            return Err(ConsensusError::DoubleComplain);
        }

        let info = reputation::account_info(ctx, &action.address)?;
        if info.reputation < ctx.limit(LimitKey::ThresholdReputationComplains) {
            return Err(ConsensusError::LowReputation);
        }

        Ok(())
    }

    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let action = Self::body(tx)?;

        let mut count = self.chain_count(tx, ctx)?;
        for btx in block
            .iter()
            .filter(|btx| btx.kind() == TxKind::ActionComplain)
        {
            if btx.author() != Some(action.address.as_str()) {
                continue;
            }
            if btx.target_hash() == Some(action.content_tx_hash.as_str()) {
                return Err(ConsensusError::DoubleComplain);
            }
            count += 1;
        }

        self.check_daily_limit(tx, count, ctx)
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let action = Self::body(tx)?;

        if ctx.repo.exists_score(
            &action.address,
            &action.content_tx_hash,
            TxKind::ActionComplain,
            true,
        )? {
            return Err(ConsensusError::DoubleComplain);
        }

        let count = self.chain_count(tx, ctx)?
            + ctx
                .repo
                .count_mempool(&[TxKind::ActionComplain], &action.address, None)?;
        self.check_daily_limit(tx, count, ctx)
    }
}

pub static SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> = CheckpointSchedule::new(&[
    Checkpoint {
        main: 0,
        test: 0,
        alt: 0,
        make: || Box::new(ComplainValidator::base()),
    },
    Checkpoint {
        main: 1_180_000,
        test: 0,
        alt: 0,
        make: || Box::new(ComplainValidator::height_windows()),
    },
]);
