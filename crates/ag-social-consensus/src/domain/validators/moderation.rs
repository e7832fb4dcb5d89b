//! Moderation rules: content flags, jury votes, moderator registration.
//!
//! Jury membership is decided by a deterministic assignment outside the
//! core; validators only consume the repository's answer.

use shared_types::TxKind;

use crate::domain::checkpoints::{Checkpoint, CheckpointSchedule};
use crate::domain::context::ConsensusContext;
use crate::domain::error::{ConsensusError, ConsensusResult};
use crate::domain::limits::LimitKey;
use crate::domain::model::{ModerationFlag, ModerationVote, SocialTx, TxBody};
use crate::domain::validators::{last_of_root, window_start, BlockView, SocialValidator};
use crate::domain::reputation;

const FLAGGABLE_KINDS: [TxKind; 6] = [
    TxKind::ContentPost,
    TxKind::ContentVideo,
    TxKind::ContentDelete,
    TxKind::ContentComment,
    TxKind::ContentCommentEdit,
    TxKind::ContentCommentDelete,
];

const DELETION_KINDS: [TxKind; 2] = [TxKind::ContentDelete, TxKind::ContentCommentDelete];

/// `MODERATION_FLAG` rules.
pub struct FlagValidator;

impl FlagValidator {
    fn body<'t>(tx: &'t SocialTx) -> ConsensusResult<&'t ModerationFlag> {
        match &tx.body {
            TxBody::ModerationFlag(flag) => Ok(flag),
            _ => Err(ConsensusError::Failed),
        }
    }

    fn chain_count(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult<u32> {
        let flag = Self::body(tx)?;
        let depth = ctx.limit(LimitKey::Depth);
        let from = window_start(true, depth, tx.time, ctx.height);
        Ok(ctx
            .repo
            .count_chain_window(&[TxKind::ModerationFlag], &flag.address, from)?)
    }

    fn check_daily_limit(&self, count: u32, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        if i64::from(count) >= ctx.limit(LimitKey::ModerationFlagMaxCount) {
            return Err(ConsensusError::ExceededLimit);
        }
        Ok(())
    }
}

impl SocialValidator for FlagValidator {
    fn check(&self, tx: &SocialTx, _ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let flag = Self::body(tx)?;
        if flag.address.is_empty() || flag.content_tx_hash.is_empty() || flag.reason < 1 {
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
        let flag = Self::body(tx)?;

        let target = match last_of_root(&flag.content_tx_hash, &FLAGGABLE_KINDS, block, ctx)? {
            Some(last) if !DELETION_KINDS.contains(&last.kind()) => last,
            _ => return Err(ConsensusError::NotFound),
        };

        if target.author() == Some(flag.address.as_str()) {
            return Err(ConsensusError::SelfComplain);
        }

        if ctx.repo.exists_score(
            &flag.address,
            &flag.content_tx_hash,
            TxKind::ModerationFlag,
            false,
        )? {
            return Err(ConsensusError::ManyTransactions);
        }

        let info = reputation::account_info(ctx, &flag.address)?;
        if info.reputation < ctx.limit(LimitKey::ThresholdReputationModerationFlag) {
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
        let flag = Self::body(tx)?;

        let mut count = self.chain_count(tx, ctx)?;
        for btx in block
            .iter()
            .filter(|btx| btx.kind() == TxKind::ModerationFlag)
        {
            if btx.author() != Some(flag.address.as_str()) {
                continue;
            }
            if btx.target_hash() == Some(flag.content_tx_hash.as_str()) {
                return Err(ConsensusError::ManyTransactions);
            }
            count += 1;
        }
        self.check_daily_limit(count, ctx)
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let flag = Self::body(tx)?;

        if ctx.repo.exists_score(
            &flag.address,
            &flag.content_tx_hash,
            TxKind::ModerationFlag,
            true,
        )? {
            return Err(ConsensusError::ManyTransactions);
        }

        let count = self.chain_count(tx, ctx)?
            + ctx
                .repo
                .count_mempool(&[TxKind::ModerationFlag], &flag.address, None)?;
        self.check_daily_limit(count, ctx)
    }
}

/// `MODERATION_VOTE` rules.
pub struct VoteValidator;

impl VoteValidator {
    fn body<'t>(tx: &'t SocialTx) -> ConsensusResult<&'t ModerationVote> {
        match &tx.body {
            TxBody::ModerationVote(vote) => Ok(vote),
            _ => Err(ConsensusError::Failed),
        }
    }
}

impl SocialValidator for VoteValidator {
    fn check(&self, tx: &SocialTx, _ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let vote = Self::body(tx)?;
        if vote.address.is_empty() || vote.flag_tx_hash.is_empty() {
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
        let vote = Self::body(tx)?;

        let flag_exists = ctx.repo.get_transaction(&vote.flag_tx_hash)?.is_some_and(|flag| {
            flag.kind() == TxKind::ModerationFlag
        }) || block.is_some_and(|block| {
            block
                .iter()
                .any(|btx| btx.kind() == TxKind::ModerationFlag && btx.hash == vote.flag_tx_hash)
        });
        if !flag_exists {
            return Err(ConsensusError::NotFound);
        }

        // Only the deterministically assigned jury may vote.
        if !ctx.repo.is_assigned_juror(&vote.address, &vote.flag_tx_hash)? {
            return Err(ConsensusError::NotAllowed);
        }

        if ctx.repo.exists_score(
            &vote.address,
            &vote.flag_tx_hash,
            TxKind::ModerationVote,
            false,
        )? {
            return Err(ConsensusError::ManyTransactions);
        }

        Ok(())
    }

    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        _ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let vote = Self::body(tx)?;
        for btx in block
            .iter()
            .filter(|btx| btx.kind() == TxKind::ModerationVote)
        {
            if btx.author() == Some(vote.address.as_str())
                && btx.target_hash() == Some(vote.flag_tx_hash.as_str())
            {
                return Err(ConsensusError::ManyTransactions);
            }
        }
        Ok(())
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let vote = Self::body(tx)?;
        if ctx.repo.exists_score(
            &vote.address,
            &vote.flag_tx_hash,
            TxKind::ModerationVote,
            true,
        )? {
            return Err(ConsensusError::ManyTransactions);
        }
        Ok(())
    }
}

/// `MODERATOR_REGISTER` rules.
pub struct ModeratorRegisterValidator;

impl SocialValidator for ModeratorRegisterValidator {
    fn check(&self, tx: &SocialTx, _ctx: &ConsensusContext<'_>) -> ConsensusResult {
        match &tx.body {
            TxBody::ModeratorRegister(register) if !register.address.is_empty() => Ok(()),
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
            .filter(|btx| btx.kind() == TxKind::ModeratorRegister)
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
            .count_mempool(&[TxKind::ModeratorRegister], author, None)?
            > 0
        {
            return Err(ConsensusError::ManyTransactions);
        }
        Ok(())
    }
}

/// `MODERATOR_REQUEST` rules.
pub struct ModeratorRequestValidator;

impl SocialValidator for ModeratorRequestValidator {
    fn check(&self, tx: &SocialTx, _ctx: &ConsensusContext<'_>) -> ConsensusResult {
        match &tx.body {
            TxBody::ModeratorRequest(request)
                if !request.address.is_empty()
                    && !request.destination_address.is_empty()
                    && request.destination_address != request.address =>
            {
                Ok(())
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
            .filter(|btx| btx.kind() == TxKind::ModeratorRequest)
        {
            if btx.author() == tx.author() && btx.target_address() == tx.target_address() {
                return Err(ConsensusError::ManyTransactions);
            }
        }
        Ok(())
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let author = tx.author().ok_or(ConsensusError::Failed)?;
        let destination = tx.target_address().ok_or(ConsensusError::Failed)?;
        if ctx.repo.count_mempool(
            &[TxKind::ModeratorRequest],
            author,
            Some(crate::ports::outbound::MempoolFilter::ToAddress(destination)),
        )? > 0
        {
            return Err(ConsensusError::ManyTransactions);
        }
        Ok(())
    }

    fn registration_addresses<'t>(&self, tx: &'t SocialTx) -> Vec<&'t str> {
        match &tx.body {
            TxBody::ModeratorRequest(request) => {
                vec![request.address.as_str(), request.destination_address.as_str()]
            }
            _ => Vec::new(),
        }
    }
}

pub static FLAG_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[Checkpoint {
        main: 2_162_400,
        test: 1_531_000,
        alt: 0,
        make: || Box::new(FlagValidator),
    }]);

pub static VOTE_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[Checkpoint {
        main: 2_162_400,
        test: 1_531_000,
        alt: 0,
        make: || Box::new(VoteValidator),
    }]);

pub static REGISTER_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[Checkpoint {
        main: 2_162_400,
        test: 1_531_000,
        alt: 0,
        make: || Box::new(ModeratorRegisterValidator),
    }]);

pub static REQUEST_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[Checkpoint {
        main: 2_162_400,
        test: 1_531_000,
        alt: 0,
        make: || Box::new(ModeratorRequestValidator),
    }]);
