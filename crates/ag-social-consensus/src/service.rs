//! Dispatch entry points for the social consensus subsystem.
//!
//! The mempool layer calls [`SocialConsensusHelper::validate_transaction`]
//! for each candidate; block acceptance calls
//! [`SocialConsensusHelper::validate_block`], which walks the block
//! left-to-right handing every validator the accumulating in-block view.
//! The first failure aborts with that kind's outcome and the block is
//! rejected as a whole.

use tracing::{debug, warn};

use crate::domain::context::ConsensusContext;
use crate::domain::error::{ConsensusError, ConsensusResult};
use crate::domain::model::SocialTx;
use crate::domain::reputation::ScoreEffect;
use crate::domain::validators::{check_op_return, validator_for, BlockView};

/// Stateless facade over the per-kind validator registry.
pub struct SocialConsensusHelper;

impl SocialConsensusHelper {
    /// Context-free checks: OP_RETURN commitment plus the kind's
    /// well-formedness rules. Used on freshly decoded envelopes.
    pub fn check(tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        if tx.kind().is_money() {
            debug!(kind = ?tx.kind(), hash = %tx.hash, "monetary kind passes through");
            return Ok(());
        }

        let Some(validator) = validator_for(tx.kind(), ctx.height, ctx.network) else {
            warn!(kind = ?tx.kind(), hash = %tx.hash, height = ctx.height,
                "no consensus rules for kind");
            return Err(ConsensusError::Unknown);
        };

        check_op_return(tx, ctx)?;
        Self::report(tx, ctx, validator.check(tx, ctx))
    }

    /// Full validation of a mempool candidate: chain plus mempool context.
    pub fn validate_transaction(tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        Self::validate(tx, None, ctx)
    }

    /// Full validation of a proposed block's social payload.
    ///
    /// Records are processed in the supplied order; each one observes all
    /// earlier records of the same block.
    pub fn validate_block(block: &[SocialTx], ctx: &ConsensusContext<'_>) -> ConsensusResult {
        for (index, tx) in block.iter().enumerate() {
            Self::validate(tx, Some(&block[..index]), ctx)?;
        }
        Ok(())
    }

    /// Classifies an admitted record's reputation side-effect for the
    /// reward layer: does a score carry weight, does it enter the staking
    /// lottery? Kinds without reputation semantics report `None`.
    pub fn reputation_effect(
        tx: &SocialTx,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult<Option<ScoreEffect>> {
        if tx.kind().is_money() {
            return Ok(None);
        }
        let Some(validator) = validator_for(tx.kind(), ctx.height, ctx.network) else {
            return Ok(None);
        };
        validator.reputation_effect(tx, ctx)
    }

    fn validate(
        tx: &SocialTx,
        block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        if tx.kind().is_money() {
            return Ok(());
        }

        let Some(validator) = validator_for(tx.kind(), ctx.height, ctx.network) else {
            warn!(kind = ?tx.kind(), hash = %tx.hash, height = ctx.height,
                "no consensus rules for kind");
            return Err(ConsensusError::Unknown);
        };

        Self::report(tx, ctx, validator.validate(tx, block, ctx))
    }

    fn report(tx: &SocialTx, ctx: &ConsensusContext<'_>, result: ConsensusResult) -> ConsensusResult {
        if let Err(outcome) = &result {
            warn!(kind = ?tx.kind(), hash = %tx.hash, height = ctx.height, %outcome,
                "social consensus rejected transaction");
        }
        result
    }
}
