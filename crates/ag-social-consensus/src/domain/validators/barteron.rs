//! Barter rules: trading accounts and offers.

use shared_types::TxKind;

use crate::domain::checkpoints::{Checkpoint, CheckpointSchedule};
use crate::domain::context::ConsensusContext;
use crate::domain::error::{ConsensusError, ConsensusResult};
use crate::domain::limits::LimitKey;
use crate::domain::model::{BarteronOffer, SocialTx, TxBody};
use crate::domain::validators::{check_payload_size, BlockView, SocialValidator};
use crate::ports::outbound::MempoolFilter;

/// `BARTERON_OFFER` rules.
pub struct BarteronOfferValidator;

impl BarteronOfferValidator {
    fn body<'t>(tx: &'t SocialTx) -> ConsensusResult<&'t BarteronOffer> {
        match &tx.body {
            TxBody::BarteronOffer(offer) => Ok(offer),
            _ => Err(ConsensusError::Failed),
        }
    }
}

impl SocialValidator for BarteronOfferValidator {
    fn check(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let offer = Self::body(tx)?;
        if offer.address.is_empty() || offer.root_tx_hash.is_empty() {
            return Err(ConsensusError::Failed);
        }
        if offer.payload.is_none() {
            return Err(ConsensusError::Failed);
        }
        check_payload_size(tx, LimitKey::MaxBarteronOfferSize, ctx)
    }

    fn validate_chain(
        &self,
        tx: &SocialTx,
        _block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let offer = Self::body(tx)?;

        if tx.is_edit() {
            // The edited root must still be a live offer of this author.
            let last = ctx
                .repo
                .get_last(&[TxKind::BarteronOffer, TxKind::ContentDelete], &offer.root_tx_hash)?;
            match last {
                Some(last)
                    if last.kind() == TxKind::BarteronOffer
                        && last.author() == Some(offer.address.as_str()) => {}
                _ => return Err(ConsensusError::ExceededLimit),
            }
        } else {
            let active = ctx.repo.count_active_offers(&offer.address)?;
            if i64::from(active) >= ctx.limit(LimitKey::BartOfferMaxActiveCount) {
                return Err(ConsensusError::ExceededLimit);
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
        let offer = Self::body(tx)?;
        for btx in block
            .iter()
            .filter(|btx| btx.kind() == TxKind::BarteronOffer)
        {
            if btx.author() == Some(offer.address.as_str())
                && btx.root_tx_hash() == Some(&offer.root_tx_hash)
            {
                return Err(ConsensusError::ManyTransactions);
            }
        }
        Ok(())
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let offer = Self::body(tx)?;
        if ctx.repo.count_mempool(
            &[TxKind::BarteronOffer],
            &offer.address,
            Some(MempoolFilter::RootTxHash(&offer.root_tx_hash)),
        )? > 0
        {
            return Err(ConsensusError::ManyTransactions);
        }
        Ok(())
    }
}

/// `BARTERON_ACCOUNT` rules.
///
/// The account-side rule set is not yet active on any network; only the
/// structural checks ship, staged behind the placeholder activation.
pub struct BarteronAccountValidator;

impl SocialValidator for BarteronAccountValidator {
    fn check(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        match &tx.body {
            TxBody::BarteronAccount(account)
                if !account.address.is_empty() && account.payload.is_some() =>
            {
                check_payload_size(tx, LimitKey::MaxBarteronOfferSize, ctx)
            }
            _ => Err(ConsensusError::Failed),
        }
    }

    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        _ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        for btx in block
            .iter()
            .filter(|btx| btx.kind() == TxKind::BarteronAccount)
        {
            if btx.author() == tx.author() {
                return Err(ConsensusError::ManyTransactions);
            }
        }
        Ok(())
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let author = tx.author().ok_or(ConsensusError::Failed)?;
        if ctx
            .repo
            .count_mempool(&[TxKind::BarteronAccount], author, None)?
            > 0
        {
            return Err(ConsensusError::ManyTransactions);
        }
        Ok(())
    }
}

pub static OFFER_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[Checkpoint {
        main: 2_930_000,
        test: 0,
        alt: 0,
        make: || Box::new(BarteronOfferValidator),
    }]);

// Staged: activates nowhere until the account rules are finalized.
pub static ACCOUNT_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[Checkpoint {
        main: 99_999_999,
        test: 99_999_999,
        alt: 99_999_999,
        make: || Box::new(BarteronAccountValidator),
    }]);
