//! Subscription rules: follow, private follow, unfollow.
//!
//! A `(from, to)` pair has a single live state decided by its newest
//! record; the rules here keep that state machine consistent.

use shared_types::TxKind;

use crate::domain::checkpoints::{Checkpoint, CheckpointSchedule};
use crate::domain::context::ConsensusContext;
use crate::domain::error::{ConsensusError, ConsensusResult};
use crate::domain::model::{SocialTx, SubscribeAction, TxBody};
use crate::domain::validators::{fail_unless_escaped, BlockView, SocialValidator};
use crate::ports::outbound::MempoolFilter;

const SUBSCRIBE_KINDS: [TxKind; 3] = [
    TxKind::ActionSubscribe,
    TxKind::ActionSubscribePrivate,
    TxKind::ActionSubscribeCancel,
];

fn body<'t>(tx: &'t SocialTx) -> ConsensusResult<&'t SubscribeAction> {
    match &tx.body {
        TxBody::Subscribe(action)
        | TxBody::SubscribePrivate(action)
        | TxBody::SubscribeCancel(action) => Ok(action),
        _ => Err(ConsensusError::Failed),
    }
}

fn check_fields(tx: &SocialTx) -> ConsensusResult<&SubscribeAction> {
    let action = body(tx)?;
    if action.address.is_empty() || action.address_to.is_empty() {
        return Err(ConsensusError::Failed);
    }
    if action.address == action.address_to {
        return Err(ConsensusError::SelfSubscribe);
    }
    Ok(action)
}

/// One subscribe-family transaction per pair per block.
fn check_block_pair(
    tx: &SocialTx,
    action: &SubscribeAction,
    block: BlockView<'_>,
    ctx: &ConsensusContext<'_>,
    error: ConsensusError,
) -> ConsensusResult {
    for btx in block
        .iter()
        .filter(|btx| SUBSCRIBE_KINDS.contains(&btx.kind()))
    {
        if btx.author() == Some(action.address.as_str())
            && btx.target_address() == Some(action.address_to.as_str())
        {
            fail_unless_escaped(tx, ctx, error)?;
        }
    }
    Ok(())
}

/// One subscribe-family transaction per pair in the mempool.
fn check_mempool_pair(action: &SubscribeAction, ctx: &ConsensusContext<'_>) -> ConsensusResult {
    if ctx.repo.count_mempool(
        &SUBSCRIBE_KINDS,
        &action.address,
        Some(MempoolFilter::ToAddress(&action.address_to)),
    )? > 0
    {
        return Err(ConsensusError::ManyTransactions);
    }
    Ok(())
}

fn registration_pair<'t>(tx: &'t SocialTx) -> Vec<&'t str> {
    match body(tx) {
        Ok(action) => vec![action.address.as_str(), action.address_to.as_str()],
        Err(_) => Vec::new(),
    }
}

/// `ACTION_SUBSCRIBE` rules.
pub struct SubscribeValidator;

impl SocialValidator for SubscribeValidator {
    fn check(&self, tx: &SocialTx, _ctx: &ConsensusContext<'_>) -> ConsensusResult {
        check_fields(tx).map(|_| ())
    }

    fn validate_chain(
        &self,
        tx: &SocialTx,
        _block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let action = body(tx)?;
        if ctx
            .repo
            .get_last_subscribe_kind(&action.address, &action.address_to)?
            == Some(TxKind::ActionSubscribe)
        {
            fail_unless_escaped(tx, ctx, ConsensusError::DoubleSubscribe)?;
        }
        Ok(())
    }

    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        check_block_pair(tx, body(tx)?, block, ctx, ConsensusError::ManyTransactions)
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        check_mempool_pair(body(tx)?, ctx)
    }

    fn registration_addresses<'t>(&self, tx: &'t SocialTx) -> Vec<&'t str> {
        registration_pair(tx)
    }
}

/// `ACTION_SUBSCRIBE_PRIVATE` rules.
pub struct SubscribePrivateValidator {
    blocking_check: bool,
}

impl SubscribePrivateValidator {
    pub fn base() -> Self {
        Self {
            blocking_check: false,
        }
    }

    pub fn disable_for_blocked() -> Self {
        Self {
            blocking_check: true,
        }
    }
}

impl SocialValidator for SubscribePrivateValidator {
    fn check(&self, tx: &SocialTx, _ctx: &ConsensusContext<'_>) -> ConsensusResult {
        check_fields(tx).map(|_| ())
    }

    fn validate_chain(
        &self,
        tx: &SocialTx,
        _block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let action = body(tx)?;
        if ctx
            .repo
            .get_last_subscribe_kind(&action.address, &action.address_to)?
            == Some(TxKind::ActionSubscribePrivate)
        {
            fail_unless_escaped(tx, ctx, ConsensusError::DoubleSubscribe)?;
        }

        if self.blocking_check
            && ctx
                .repo
                .get_last_blocking_kind(&action.address_to, &action.address)?
                == Some(TxKind::ActionBlocking)
        {
            return Err(ConsensusError::Blocking);
        }

        Ok(())
    }

    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        check_block_pair(tx, body(tx)?, block, ctx, ConsensusError::DoubleSubscribe)
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        check_mempool_pair(body(tx)?, ctx)
    }

    fn registration_addresses<'t>(&self, tx: &'t SocialTx) -> Vec<&'t str> {
        registration_pair(tx)
    }
}

/// `ACTION_SUBSCRIBE_CANCEL` rules.
pub struct SubscribeCancelValidator;

impl SocialValidator for SubscribeCancelValidator {
    fn check(&self, tx: &SocialTx, _ctx: &ConsensusContext<'_>) -> ConsensusResult {
        check_fields(tx).map(|_| ())
    }

    fn validate_chain(
        &self,
        tx: &SocialTx,
        _block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let action = body(tx)?;
        match ctx
            .repo
            .get_last_subscribe_kind(&action.address, &action.address_to)?
        {
            Some(TxKind::ActionSubscribe) | Some(TxKind::ActionSubscribePrivate) => Ok(()),
            _ => fail_unless_escaped(tx, ctx, ConsensusError::InvalidSubscribe),
        }
    }

    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        check_block_pair(tx, body(tx)?, block, ctx, ConsensusError::ManyTransactions)
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        check_mempool_pair(body(tx)?, ctx)
    }

    fn registration_addresses<'t>(&self, tx: &'t SocialTx) -> Vec<&'t str> {
        registration_pair(tx)
    }
}

pub static SUBSCRIBE_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[Checkpoint {
        main: 0,
        test: 0,
        alt: 0,
        make: || Box::new(SubscribeValidator),
    }]);

pub static SUBSCRIBE_PRIVATE_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[
        Checkpoint {
            main: 0,
            test: 0,
            alt: 0,
            make: || Box::new(SubscribePrivateValidator::base()),
        },
        Checkpoint {
            main: 1_757_000,
            test: 953_000,
            alt: 0,
            make: || Box::new(SubscribePrivateValidator::disable_for_blocked()),
        },
    ]);

pub static SUBSCRIBE_CANCEL_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[Checkpoint {
        main: 0,
        test: 0,
        alt: 0,
        make: || Box::new(SubscribeCancelValidator),
    }]);
