//! Comment rules: new comments, edits, and delete tombstones.

use shared_types::TxKind;

use crate::domain::checkpoints::{Checkpoint, CheckpointSchedule};
use crate::domain::context::ConsensusContext;
use crate::domain::error::{ConsensusError, ConsensusResult};
use crate::domain::limits::LimitKey;
use crate::domain::model::{CommentEntry, SocialTx, TxBody};
use crate::domain::validators::{
    check_payload_size, last_of_root, mode_limit, window_start, BlockView, SocialValidator,
};
use crate::ports::outbound::MempoolFilter;

const CONTENT_KINDS: [TxKind; 3] = [
    TxKind::ContentPost,
    TxKind::ContentVideo,
    TxKind::ContentDelete,
];

const COMMENT_KINDS: [TxKind; 3] = [
    TxKind::ContentComment,
    TxKind::ContentCommentEdit,
    TxKind::ContentCommentDelete,
];

fn body<'t>(tx: &'t SocialTx) -> ConsensusResult<&'t CommentEntry> {
    match &tx.body {
        TxBody::Comment(entry) | TxBody::CommentEdit(entry) | TxBody::CommentDelete(entry) => {
            Ok(entry)
        }
        _ => Err(ConsensusError::Failed),
    }
}

/// The parent post must exist (chain or block) and not be deleted.
fn check_post_exists(
    entry: &CommentEntry,
    block: Option<BlockView<'_>>,
    ctx: &ConsensusContext<'_>,
) -> ConsensusResult {
    match last_of_root(&entry.post_tx_hash, &CONTENT_KINDS, block, ctx)? {
        Some(last) if last.kind() != TxKind::ContentDelete => Ok(()),
        _ => Err(ConsensusError::NotFound),
    }
}

/// A referenced comment (parent or answer) must exist and not be deleted.
fn check_comment_exists(
    comment_tx_hash: &str,
    block: Option<BlockView<'_>>,
    ctx: &ConsensusContext<'_>,
) -> ConsensusResult {
    match last_of_root(comment_tx_hash, &COMMENT_KINDS, block, ctx)? {
        Some(last) if last.kind() != TxKind::ContentCommentDelete => Ok(()),
        _ => Err(ConsensusError::NotFound),
    }
}

/// `CONTENT_COMMENT` rules.
pub struct CommentValidator {
    windows_by_height: bool,
}

impl CommentValidator {
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

    fn chain_count(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult<u32> {
        let depth = ctx.limit(LimitKey::Depth);
        let from = window_start(self.windows_by_height, depth, tx.time, ctx.height);
        let author = tx.author().ok_or(ConsensusError::Failed)?;
        Ok(ctx
            .repo
            .count_chain_window(&[TxKind::ContentComment], author, from)?)
    }

    fn check_daily_limit(
        &self,
        tx: &SocialTx,
        count: u32,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let author = tx.author().ok_or(ConsensusError::Failed)?;
        let limit = mode_limit(
            ctx,
            author,
            LimitKey::FullCommentLimit,
            LimitKey::TrialCommentLimit,
        )?;
        if i64::from(count) >= limit {
            return Err(ConsensusError::ContentLimit);
        }
        Ok(())
    }
}

impl SocialValidator for CommentValidator {
    fn check(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let entry = body(tx)?;
        if entry.address.is_empty() || entry.post_tx_hash.is_empty() {
            return Err(ConsensusError::Failed);
        }
        if entry.message.as_deref().unwrap_or_default().is_empty() {
            return Err(ConsensusError::Failed);
        }
        check_payload_size(tx, LimitKey::MaxCommentSize, ctx)
    }

    fn validate_chain(
        &self,
        tx: &SocialTx,
        block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let entry = body(tx)?;
        check_post_exists(entry, block, ctx)?;
        if let Some(parent) = &entry.parent_tx_hash {
            check_comment_exists(parent, block, ctx)?;
        }
        if let Some(answer) = &entry.answer_tx_hash {
            check_comment_exists(answer, block, ctx)?;
        }
        Ok(())
    }

    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let mut count = self.chain_count(tx, ctx)?;
        count += block
            .iter()
            .filter(|btx| {
                btx.kind() == TxKind::ContentComment && btx.author() == tx.author()
            })
            .count() as u32;
        self.check_daily_limit(tx, count, ctx)
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let author = tx.author().ok_or(ConsensusError::Failed)?;
        let count = self.chain_count(tx, ctx)?
            + ctx
                .repo
                .count_mempool(&[TxKind::ContentComment], author, None)?;
        self.check_daily_limit(tx, count, ctx)
    }
}

/// `CONTENT_COMMENT_EDIT` rules.
pub struct CommentEditValidator {
    windows_by_height: bool,
}

impl CommentEditValidator {
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

    fn check_edit_count(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let entry = body(tx)?;
        let count = ctx
            .repo
            .count_chain_edits(&[TxKind::ContentCommentEdit], &entry.root_tx_hash)?;
        let limit = mode_limit(
            ctx,
            &entry.address,
            LimitKey::FullCommentEditLimit,
            LimitKey::TrialCommentEditLimit,
        )?;
        if i64::from(count) >= limit {
            return Err(ConsensusError::ContentEditLimit);
        }
        Ok(())
    }
}

impl SocialValidator for CommentEditValidator {
    fn check(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let entry = body(tx)?;
        if entry.address.is_empty() || entry.post_tx_hash.is_empty() {
            return Err(ConsensusError::Failed);
        }
        if entry.message.as_deref().unwrap_or_default().is_empty() {
            return Err(ConsensusError::Failed);
        }
        check_payload_size(tx, LimitKey::MaxCommentSize, ctx)
    }

    fn validate_chain(
        &self,
        tx: &SocialTx,
        block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let entry = body(tx)?;

        let Some(last) = last_of_root(&entry.root_tx_hash, &COMMENT_KINDS, block, ctx)? else {
            return Err(ConsensusError::NotFound);
        };
        if last.kind() == TxKind::ContentCommentDelete {
            return Err(ConsensusError::NotAllowed);
        }
        if last.author() != tx.author() {
            return Err(ConsensusError::ContentEditUnauthorized);
        }

        check_post_exists(entry, block, ctx)?;

        // The edit window runs from the first version's commit.
        let timeout = ctx.limit(LimitKey::EditCommentTimeout);
        let within = if self.windows_by_height {
            match ctx.repo.transaction_height(&entry.root_tx_hash)? {
                Some(height) => i64::from(ctx.height) - i64::from(height) <= timeout,
                None => true,
            }
        } else {
            match ctx.repo.get_transaction(&entry.root_tx_hash)? {
                Some(original) => tx.time - original.time <= timeout,
                None => true,
            }
        };
        if !within {
            return Err(ConsensusError::ContentEditLimit);
        }

        Ok(())
    }

    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let entry = body(tx)?;
        for btx in block.iter().filter(|btx| {
            matches!(
                btx.kind(),
                TxKind::ContentCommentEdit | TxKind::ContentCommentDelete
            )
        }) {
            if btx.root_tx_hash() == Some(&entry.root_tx_hash) {
                return Err(ConsensusError::DoubleContentEdit);
            }
        }
        self.check_edit_count(tx, ctx)
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let entry = body(tx)?;
        if ctx.repo.count_mempool(
            &[TxKind::ContentCommentEdit, TxKind::ContentCommentDelete],
            &entry.address,
            Some(MempoolFilter::RootTxHash(&entry.root_tx_hash)),
        )? > 0
        {
            return Err(ConsensusError::DoubleContentEdit);
        }
        self.check_edit_count(tx, ctx)
    }
}

/// `CONTENT_COMMENT_DELETE` rules: the tombstone with an empty message.
pub struct CommentDeleteValidator;

impl SocialValidator for CommentDeleteValidator {
    fn check(&self, tx: &SocialTx, _ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let entry = body(tx)?;
        if entry.address.is_empty() || entry.post_tx_hash.is_empty() {
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
        let entry = body(tx)?;

        let Some(last) = last_of_root(&entry.root_tx_hash, &COMMENT_KINDS, block, ctx)? else {
            return Err(ConsensusError::NotFound);
        };
        if last.kind() == TxKind::ContentCommentDelete {
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
        _ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let entry = body(tx)?;
        for btx in block.iter().filter(|btx| {
            matches!(
                btx.kind(),
                TxKind::ContentCommentEdit | TxKind::ContentCommentDelete
            )
        }) {
            if btx.root_tx_hash() == Some(&entry.root_tx_hash) {
                return Err(ConsensusError::DoubleContentEdit);
            }
        }
        Ok(())
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let entry = body(tx)?;
        if ctx.repo.count_mempool(
            &[TxKind::ContentCommentEdit, TxKind::ContentCommentDelete],
            &entry.address,
            Some(MempoolFilter::RootTxHash(&entry.root_tx_hash)),
        )? > 0
        {
            return Err(ConsensusError::DoubleContentEdit);
        }
        Ok(())
    }
}

pub static COMMENT_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[
        Checkpoint {
            main: 0,
            test: 0,
            alt: 0,
            make: || Box::new(CommentValidator::base()),
        },
        Checkpoint {
            main: 1_180_000,
            test: 0,
            alt: 0,
            make: || Box::new(CommentValidator::height_windows()),
        },
    ]);

pub static COMMENT_EDIT_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[
        Checkpoint {
            main: 0,
            test: 0,
            alt: 0,
            make: || Box::new(CommentEditValidator::base()),
        },
        Checkpoint {
            main: 1_180_000,
            test: 0,
            alt: 0,
            make: || Box::new(CommentEditValidator::height_windows()),
        },
    ]);

pub static COMMENT_DELETE_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[Checkpoint {
        main: 0,
        test: 0,
        alt: 0,
        make: || Box::new(CommentDeleteValidator),
    }]);
