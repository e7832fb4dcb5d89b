//! Content rules: posts and videos (new and edited) plus content deletion.
//!
//! Revision lineage for both content kinds: the base rules counted only
//! earlier-timestamped block transactions against the daily ceiling; the
//! next revision counts the whole block; the height-window revision
//! measures the daily window and the edit window in blocks instead of
//! envelope seconds.

use shared_types::TxKind;

use crate::domain::checkpoints::{Checkpoint, CheckpointSchedule};
use crate::domain::context::ConsensusContext;
use crate::domain::error::{ConsensusError, ConsensusResult};
use crate::domain::limits::LimitKey;
use crate::domain::model::{SocialTx, TxBody};
use crate::domain::validators::{
    check_payload_size, last_of_root, mode_limit, window_start, BlockView, SocialValidator,
};
use crate::ports::outbound::MempoolFilter;

const CONTENT_KINDS: [TxKind; 3] = [
    TxKind::ContentPost,
    TxKind::ContentVideo,
    TxKind::ContentDelete,
];

/// `CONTENT_POST` / `CONTENT_VIDEO` rules.
pub struct ContentValidator {
    kind: TxKind,
    count_all_block: bool,
    windows_by_height: bool,
}

impl ContentValidator {
    pub fn base(kind: TxKind) -> Self {
        Self {
            kind,
            count_all_block: false,
            windows_by_height: false,
        }
    }

    pub fn count_all_block(kind: TxKind) -> Self {
        Self {
            count_all_block: true,
            ..Self::base(kind)
        }
    }

    pub fn height_windows(kind: TxKind) -> Self {
        Self {
            windows_by_height: true,
            ..Self::count_all_block(kind)
        }
    }

    fn daily_limit_keys(&self) -> (LimitKey, LimitKey) {
        match self.kind {
            TxKind::ContentVideo => (LimitKey::FullVideoLimit, LimitKey::TrialVideoLimit),
            _ => (LimitKey::FullPostLimit, LimitKey::TrialPostLimit),
        }
    }

    fn author<'t>(&self, tx: &'t SocialTx) -> ConsensusResult<&'t str> {
        tx.author().ok_or(ConsensusError::Failed)
    }

    /// New content committed inside the daily window.
    fn chain_count(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult<u32> {
        let depth = ctx.limit(LimitKey::Depth);
        let from = window_start(self.windows_by_height, depth, tx.time, ctx.height);
        Ok(ctx
            .repo
            .count_chain_window(&[self.kind], self.author(tx)?, from)?)
    }

    fn check_daily_limit(
        &self,
        tx: &SocialTx,
        count: u32,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let (full, trial) = self.daily_limit_keys();
        if i64::from(count) >= mode_limit(ctx, self.author(tx)?, full, trial)? {
            return Err(ConsensusError::ContentLimit);
        }
        Ok(())
    }

    fn check_edit_count(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let root = tx.root_tx_hash().ok_or(ConsensusError::Failed)?;
        let count = ctx.repo.count_chain_edits(&[self.kind], root)?;
        let limit = mode_limit(
            ctx,
            self.author(tx)?,
            LimitKey::FullPostEditLimit,
            LimitKey::TrialPostEditLimit,
        )?;
        if i64::from(count) >= limit {
            return Err(ConsensusError::ContentEditLimit);
        }
        Ok(())
    }

    /// The edit window, measured from the original's commit.
    fn allow_edit_window(
        &self,
        tx: &SocialTx,
        original: &SocialTx,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult<bool> {
        let timeout = ctx.limit(LimitKey::EditPostTimeout);
        if self.windows_by_height {
            match ctx.repo.transaction_height(&original.hash)? {
                Some(height) => Ok(i64::from(ctx.height) - i64::from(height) <= timeout),
                // Original rides in the same block.
                None => Ok(true),
            }
        } else {
            Ok(tx.time - original.time <= timeout)
        }
    }

    fn validate_edit(
        &self,
        tx: &SocialTx,
        block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let root = tx.root_tx_hash().ok_or(ConsensusError::Failed)?;

        let mut original = ctx.repo.get_transaction(root)?;
        if original.is_none() {
            original = block.and_then(|block| {
                block.iter().find(|btx| btx.hash == root).cloned()
            });
        }
        let Some(original) = original else {
            return Err(ConsensusError::NotFound);
        };

        if original.kind() != tx.kind() {
            return Err(ConsensusError::NotAllowed);
        }
        if original.author() != tx.author() {
            return Err(ConsensusError::ContentEditUnauthorized);
        }
        if !self.allow_edit_window(tx, &original, ctx)? {
            return Err(ConsensusError::ContentEditLimit);
        }

        Ok(())
    }
}

impl SocialValidator for ContentValidator {
    fn check(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        match &tx.body {
            TxBody::Post(entry) | TxBody::Video(entry) if !entry.address.is_empty() => {
                check_payload_size(tx, LimitKey::MaxPostSize, ctx)
            }
            _ => Err(ConsensusError::Failed),
        }
    }

    fn validate_chain(
        &self,
        tx: &SocialTx,
        block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        if tx.is_edit() {
            self.validate_edit(tx, block, ctx)?;
        }
        Ok(())
    }

    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        if tx.is_edit() {
            for btx in block.iter().filter(|btx| btx.kind() == self.kind) {
                if btx.root_tx_hash() == tx.root_tx_hash() {
                    return Err(ConsensusError::DoubleContentEdit);
                }
            }
            return self.check_edit_count(tx, ctx);
        }

        let mut count = self.chain_count(tx, ctx)?;
        for btx in block.iter().filter(|btx| btx.kind() == self.kind) {
            if btx.author() == tx.author()
                && !btx.is_edit()
                && (self.count_all_block || btx.time <= tx.time)
            {
                count += 1;
            }
        }
        self.check_daily_limit(tx, count, ctx)
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let author = self.author(tx)?;

        if tx.is_edit() {
            let root = tx.root_tx_hash().ok_or(ConsensusError::Failed)?;
            if ctx
                .repo
                .count_mempool(&[self.kind], author, Some(MempoolFilter::RootTxHash(root)))?
                > 0
            {
                return Err(ConsensusError::DoubleContentEdit);
            }
            return self.check_edit_count(tx, ctx);
        }

        let count = self.chain_count(tx, ctx)? + ctx.repo.count_mempool(&[self.kind], author, None)?;
        self.check_daily_limit(tx, count, ctx)
    }
}

/// `CONTENT_DELETE` rules: tombstones for posts and videos.
pub struct ContentDeleteValidator;

impl SocialValidator for ContentDeleteValidator {
    fn check(&self, tx: &SocialTx, _ctx: &ConsensusContext<'_>) -> ConsensusResult {
        match &tx.body {
            TxBody::ContentDelete(del)
                if !del.address.is_empty() && !del.root_tx_hash.is_empty() =>
            {
                Ok(())
            }
            _ => Err(ConsensusError::Failed),
        }
    }

    fn validate_chain(
        &self,
        tx: &SocialTx,
        block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let root = tx.root_tx_hash().ok_or(ConsensusError::Failed)?;

        let Some(last) = last_of_root(root, &CONTENT_KINDS, block, ctx)? else {
            return Err(ConsensusError::NotFound);
        };
        if last.kind() == TxKind::ContentDelete {
            return Err(ConsensusError::NotAllowed);
        }
        if last.author() != tx.author() {
            return Err(ConsensusError::ContentEditUnauthorized);
        }
        Ok(())
    }

    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let _ = ctx;
        for btx in block.iter().filter(|btx| btx.kind() == TxKind::ContentDelete) {
            if btx.root_tx_hash() == tx.root_tx_hash() {
                return Err(ConsensusError::DoubleContentEdit);
            }
        }
        Ok(())
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let author = tx.author().ok_or(ConsensusError::Failed)?;
        let root = tx.root_tx_hash().ok_or(ConsensusError::Failed)?;
        if ctx.repo.count_mempool(
            &[TxKind::ContentDelete],
            author,
            Some(MempoolFilter::RootTxHash(root)),
        )? > 0
        {
            return Err(ConsensusError::DoubleContentEdit);
        }
        Ok(())
    }
}

pub static POST_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[
        Checkpoint {
            main: 0,
            test: -1,
            alt: -1,
            make: || Box::new(ContentValidator::base(TxKind::ContentPost)),
        },
        Checkpoint {
            main: 1_124_000,
            test: -1,
            alt: -1,
            make: || Box::new(ContentValidator::count_all_block(TxKind::ContentPost)),
        },
        Checkpoint {
            main: 1_180_000,
            test: 0,
            alt: 0,
            make: || Box::new(ContentValidator::height_windows(TxKind::ContentPost)),
        },
    ]);

pub static VIDEO_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[Checkpoint {
        main: 1_180_000,
        test: 0,
        alt: 0,
        make: || Box::new(ContentValidator::height_windows(TxKind::ContentVideo)),
    }]);

pub static CONTENT_DELETE_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[Checkpoint {
        main: 1_757_000,
        test: 953_000,
        alt: 0,
        make: || Box::new(ContentDeleteValidator),
    }]);
