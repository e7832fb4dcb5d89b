//! Blocking rules: block, unblock, and the multi-target block form.

use shared_types::TxKind;

use crate::domain::checkpoints::{Checkpoint, CheckpointSchedule};
use crate::domain::context::ConsensusContext;
use crate::domain::error::{ConsensusError, ConsensusResult};
use crate::domain::model::{BlockingAction, SocialTx, TxBody};
use crate::domain::validators::{fail_unless_escaped, BlockView, SocialValidator};
use crate::ports::outbound::MempoolFilter;

const BLOCKING_KINDS: [TxKind; 2] = [TxKind::ActionBlocking, TxKind::ActionBlockingCancel];

fn body<'t>(tx: &'t SocialTx) -> ConsensusResult<&'t BlockingAction> {
    match &tx.body {
        TxBody::Blocking(action) | TxBody::BlockingCancel(action) => Ok(action),
        _ => Err(ConsensusError::Failed),
    }
}

fn registration_targets<'t>(tx: &'t SocialTx) -> Vec<&'t str> {
    let Ok(action) = body(tx) else {
        return Vec::new();
    };
    let mut addresses = vec![action.address.as_str()];
    if let Some(to) = &action.address_to {
        addresses.push(to.as_str());
    }
    addresses
}

/// `ACTION_BLOCKING` rules.
pub struct BlockingValidator {
    multiple: bool,
}

impl BlockingValidator {
    pub fn base() -> Self {
        Self { multiple: false }
    }

    pub fn multiple_blocking() -> Self {
        Self { multiple: true }
    }
}

impl SocialValidator for BlockingValidator {
    fn check(&self, tx: &SocialTx, _ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let action = body(tx)?;
        if action.address.is_empty() {
            return Err(ConsensusError::Failed);
        }

        if self.multiple {
            // Exactly one of the two target forms.
            match (&action.address_to, &action.addresses_to) {
                (Some(_), Some(_)) | (None, None) => return Err(ConsensusError::Failed),
                (None, Some(_)) if action.multi_targets().is_empty() => {
                    return Err(ConsensusError::Failed)
                }
                _ => {}
            }
        } else {
            if action.addresses_to.is_some() {
                return Err(ConsensusError::Failed);
            }
            if action.address_to.is_none() {
                return Err(ConsensusError::Failed);
            }
        }

        if action
            .all_targets()
            .iter()
            .any(|target| *target == action.address)
        {
            return Err(ConsensusError::SelfBlocking);
        }

        Ok(())
    }

    fn validate_chain(
        &self,
        tx: &SocialTx,
        _block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let action = body(tx)?;

        // The double-block rule applies to the single form; a multi-target
        // block simply reasserts the listed pairs.
        if let Some(to) = &action.address_to {
            if ctx.repo.get_last_blocking_kind(&action.address, to)? == Some(TxKind::ActionBlocking)
            {
                fail_unless_escaped(tx, ctx, ConsensusError::DoubleBlocking)?;
            }
        }
        Ok(())
    }

    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        _ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let action = body(tx)?;
        for btx in block
            .iter()
            .filter(|btx| BLOCKING_KINDS.contains(&btx.kind()))
        {
            let Ok(other) = body(btx) else { continue };
            if other.address != action.address {
                continue;
            }
            if other.addresses_to.is_some()
                || action.addresses_to.is_some()
                || other.address_to == action.address_to
            {
                return Err(ConsensusError::ManyTransactions);
            }
        }
        Ok(())
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let action = body(tx)?;
        let count = match &action.address_to {
            Some(to) => ctx.repo.count_mempool(
                &BLOCKING_KINDS,
                &action.address,
                Some(MempoolFilter::ToAddress(to)),
            )?,
            // The multi form conflicts with any pending blocking change.
            None => ctx
                .repo
                .count_mempool(&BLOCKING_KINDS, &action.address, None)?,
        };
        if count > 0 {
            return Err(ConsensusError::ManyTransactions);
        }
        Ok(())
    }

    fn registration_addresses<'t>(&self, tx: &'t SocialTx) -> Vec<&'t str> {
        registration_targets(tx)
    }
}

/// `ACTION_BLOCKING_CANCEL` rules.
///
/// Cancels always name a single pair; a pair blocked through the array
/// form is cancelled one target at a time, which the pair-state lookup
/// already accounts for.
pub struct BlockingCancelValidator;

impl SocialValidator for BlockingCancelValidator {
    fn check(&self, tx: &SocialTx, _ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let action = body(tx)?;
        if action.address.is_empty() {
            return Err(ConsensusError::Failed);
        }
        let Some(to) = &action.address_to else {
            return Err(ConsensusError::Failed);
        };
        // Cancels never use the multi form.
        if action.addresses_to.is_some() {
            return Err(ConsensusError::Failed);
        }
        if *to == action.address {
            return Err(ConsensusError::SelfBlocking);
        }
        Ok(())
    }

    fn validate_chain(
        &self,
        tx: &SocialTx,
        _block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let action = body(tx)?;
        let Some(to) = &action.address_to else {
            return Err(ConsensusError::Failed);
        };
        if ctx.repo.get_last_blocking_kind(&action.address, to)? != Some(TxKind::ActionBlocking) {
            fail_unless_escaped(tx, ctx, ConsensusError::InvalidBlocking)?;
        }
        Ok(())
    }

    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        _ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let action = body(tx)?;
        for btx in block
            .iter()
            .filter(|btx| BLOCKING_KINDS.contains(&btx.kind()))
        {
            let Ok(other) = body(btx) else { continue };
            if other.address != action.address {
                continue;
            }
            if other.address_to == action.address_to || other.addresses_to.is_some() {
                return Err(ConsensusError::ManyTransactions);
            }
        }
        Ok(())
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let action = body(tx)?;
        let Some(to) = &action.address_to else {
            return Err(ConsensusError::Failed);
        };
        if ctx.repo.count_mempool(
            &BLOCKING_KINDS,
            &action.address,
            Some(MempoolFilter::ToAddress(to)),
        )? > 0
        {
            return Err(ConsensusError::ManyTransactions);
        }
        Ok(())
    }

    fn registration_addresses<'t>(&self, tx: &'t SocialTx) -> Vec<&'t str> {
        registration_targets(tx)
    }
}

pub static BLOCKING_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[
        Checkpoint {
            main: 0,
            test: 0,
            alt: 0,
            make: || Box::new(BlockingValidator::base()),
        },
        Checkpoint {
            main: 1_873_500,
            test: 1_114_500,
            alt: 0,
            make: || Box::new(BlockingValidator::multiple_blocking()),
        },
    ]);

pub static BLOCKING_CANCEL_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[Checkpoint {
        main: 0,
        test: 0,
        alt: 0,
        make: || Box::new(BlockingCancelValidator),
    }]);
