//! Account rules: registration, profile edits, the delete tombstone.
//!
//! Revision lineage: the base rules; window depth measured in blocks; the
//! daily edit count enforced from chain state; the strict login rules with
//! in-block name capture forbidden.

use shared_types::TxKind;

use crate::domain::checkpoints::{Checkpoint, CheckpointSchedule};
use crate::domain::context::ConsensusContext;
use crate::domain::error::{ConsensusError, ConsensusResult};
use crate::domain::limits::LimitKey;
use crate::domain::model::{AccountUser, SocialTx, TxBody};
use crate::domain::validators::{
    check_payload_size, fail_unless_escaped, window_start, BlockView, SocialValidator,
};

const ACCOUNT_KINDS: [TxKind; 2] = [TxKind::AccountUser, TxKind::AccountDelete];

/// `ACCOUNT_USER` rules.
pub struct UserValidator {
    depth_in_blocks: bool,
    count_chain_edits: bool,
    strict_login: bool,
}

impl UserValidator {
    pub fn base() -> Self {
        Self {
            depth_in_blocks: false,
            count_chain_edits: false,
            strict_login: false,
        }
    }

    pub fn depth_by_height() -> Self {
        Self {
            depth_in_blocks: true,
            ..Self::base()
        }
    }

    pub fn chain_count() -> Self {
        Self {
            count_chain_edits: true,
            ..Self::depth_by_height()
        }
    }

    pub fn login_limitation() -> Self {
        Self {
            strict_login: true,
            ..Self::chain_count()
        }
    }

    fn body<'t>(tx: &'t SocialTx) -> ConsensusResult<&'t AccountUser> {
        match &tx.body {
            TxBody::User(user) => Ok(user),
            _ => Err(ConsensusError::Failed),
        }
    }

    fn check_login(&self, tx: &SocialTx, user: &AccountUser, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        if self.strict_login {
            let Some(name) = user.name() else {
                return Err(ConsensusError::Failed);
            };
            let name = name.to_lowercase();
            if name.is_empty() {
                return Err(ConsensusError::Failed);
            }
            if name.len() > 20 {
                return Err(ConsensusError::NicknameLong);
            }
            if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(ConsensusError::Failed);
            }
            return Ok(());
        }

        // Early rules banned only pre-decoded spaces at the edges.
        if let Some(name) = user.name() {
            if name.starts_with("%20") || name.ends_with("%20") {
                fail_unless_escaped(tx, ctx, ConsensusError::Failed)?;
            }
        }
        Ok(())
    }

    /// Account edits committed inside the rolling depth window.
    fn chain_edits(&self, tx: &SocialTx, user: &AccountUser, ctx: &ConsensusContext<'_>) -> ConsensusResult<u32> {
        if !self.count_chain_edits {
            return Ok(0);
        }
        let depth = ctx.limit(LimitKey::EditAccountDepth);
        let from = window_start(self.depth_in_blocks, depth, tx.time, ctx.height);
        Ok(ctx
            .repo
            .count_chain_window(&[TxKind::AccountUser], &user.address, from)?)
    }
}

impl SocialValidator for UserValidator {
    fn check(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let user = Self::body(tx)?;

        if user.address.is_empty() {
            return Err(ConsensusError::Failed);
        }
        if user.payload.is_none() {
            return Err(ConsensusError::Failed);
        }
        if let Some(referrer) = &user.referrer {
            if *referrer == user.address {
                return Err(ConsensusError::ReferrerSelf);
            }
        }

        check_payload_size(tx, LimitKey::MaxUserSize, ctx)?;
        self.check_login(tx, user, ctx)
    }

    fn validate_chain(
        &self,
        tx: &SocialTx,
        _block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let user = Self::body(tx)?;

        if let Some(name) = user.name() {
            if ctx
                .repo
                .exists_another_by_name(&user.address, &name.to_lowercase())?
            {
                fail_unless_escaped(tx, ctx, ConsensusError::NicknameDouble)?;
            }
        }

        // The tombstone is terminal.
        if ctx.repo.get_last_account_kind(&user.address)? == Some(TxKind::AccountDelete) {
            return Err(ConsensusError::AccountDeleted);
        }

        Ok(())
    }

    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let user = Self::body(tx)?;

        for btx in block.iter().filter(|btx| ACCOUNT_KINDS.contains(&btx.kind())) {
            if btx.author() == Some(user.address.as_str()) {
                fail_unless_escaped(tx, ctx, ConsensusError::ChangeInfoDoubleInBlock)?;
            }

            // Capturing a name another account registers in the same block.
            if self.strict_login {
                if let (TxBody::User(other), Some(name)) = (&btx.body, user.name()) {
                    if other
                        .name()
                        .is_some_and(|o| o.to_lowercase() == name.to_lowercase())
                    {
                        return Err(ConsensusError::NicknameDouble);
                    }
                }
            }
        }

        if i64::from(self.chain_edits(tx, user, ctx)?) > ctx.limit(LimitKey::EditAccountDailyCount)
        {
            return Err(ConsensusError::ChangeInfoLimit);
        }

        Ok(())
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let user = Self::body(tx)?;

        if ctx.repo.count_mempool(&ACCOUNT_KINDS, &user.address, None)? > 0 {
            return Err(ConsensusError::ChangeInfoDoubleInMempool);
        }

        if i64::from(self.chain_edits(tx, user, ctx)?) > ctx.limit(LimitKey::EditAccountDailyCount)
        {
            return Err(ConsensusError::ChangeInfoLimit);
        }

        Ok(())
    }

    // Registration is the transaction being validated.
    fn registration_addresses<'t>(&self, _tx: &'t SocialTx) -> Vec<&'t str> {
        Vec::new()
    }
}

/// `ACCOUNT_DELETE` rules: the tombstone itself.
pub struct AccountDeleteValidator;

impl SocialValidator for AccountDeleteValidator {
    fn check(&self, tx: &SocialTx, _ctx: &ConsensusContext<'_>) -> ConsensusResult {
        match &tx.body {
            TxBody::AccountDelete(del) if !del.address.is_empty() => Ok(()),
            _ => Err(ConsensusError::Failed),
        }
    }

    fn validate_chain(
        &self,
        tx: &SocialTx,
        _block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let Some(address) = tx.author() else {
            return Err(ConsensusError::Failed);
        };
        if ctx.repo.get_last_account_kind(address)? == Some(TxKind::AccountDelete) {
            return Err(ConsensusError::AccountDeleted);
        }
        Ok(())
    }

    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        for btx in block.iter().filter(|btx| ACCOUNT_KINDS.contains(&btx.kind())) {
            if btx.author() == tx.author() {
                fail_unless_escaped(tx, ctx, ConsensusError::ChangeInfoDoubleInBlock)?;
            }
        }
        Ok(())
    }

    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let Some(address) = tx.author() else {
            return Err(ConsensusError::Failed);
        };
        if ctx.repo.count_mempool(&ACCOUNT_KINDS, address, None)? > 0 {
            return Err(ConsensusError::ChangeInfoDoubleInMempool);
        }
        Ok(())
    }
}

pub static USER_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[
        Checkpoint {
            main: 0,
            test: -1,
            alt: -1,
            make: || Box::new(UserValidator::base()),
        },
        Checkpoint {
            main: 1_180_000,
            test: 0,
            alt: -1,
            make: || Box::new(UserValidator::depth_by_height()),
        },
        Checkpoint {
            main: 1_381_841,
            test: 162_000,
            alt: -1,
            make: || Box::new(UserValidator::chain_count()),
        },
        Checkpoint {
            main: 1_647_000,
            test: 650_000,
            alt: 0,
            make: || Box::new(UserValidator::login_limitation()),
        },
    ]);

pub static ACCOUNT_DELETE_SCHEDULE: CheckpointSchedule<Box<dyn SocialValidator>> =
    CheckpointSchedule::new(&[Checkpoint {
        main: 2_162_400,
        test: 1_531_000,
        alt: 0,
        make: || Box::new(AccountDeleteValidator),
    }]);
