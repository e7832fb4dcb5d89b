//! Per-Kind Validators
//!
//! One rule set per social transaction kind, selected through the
//! checkpoint schedules. Every validator is an immutable value object;
//! behaviour differences between rule revisions are data on the validator
//! struct, never branches on anything but the construction-time version.
//!
//! The shared skeleton: `check` is context-free well-formedness plus the
//! OP_RETURN commitment; `validate` runs the registration gate, the
//! kind-specific chain rules, then either the in-block or the mempool
//! rules depending on the context the host supplied.

pub mod barteron;
pub mod blocking;
pub mod comment;
pub mod complain;
pub mod content;
pub mod moderation;
pub mod score_comment;
pub mod score_content;
pub mod subscribe;
pub mod user;

use shared_types::{BlockHeight, TxKind};

use crate::domain::context::ConsensusContext;
use crate::domain::error::{ConsensusError, ConsensusResult};
use crate::domain::limits::LimitKey;
use crate::domain::model::SocialTx;
use crate::domain::reputation::{self, AccountMode, ScoreEffect};
use crate::ports::outbound::WindowStart;

/// The transactions already accepted earlier in the block being validated.
pub type BlockView<'a> = &'a [SocialTx];

/// A rule set for one transaction kind at one checkpoint era.
pub trait SocialValidator: Send + Sync {
    /// Context-free well-formedness: required fields, value ranges,
    /// self-reference bans, payload size bounds.
    fn check(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult;

    /// Chain-context rules shared by both the block and the mempool path.
    fn validate_chain(
        &self,
        tx: &SocialTx,
        block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let _ = (tx, block, ctx);
        Ok(())
    }

    /// Rules against the transactions accepted earlier in the same block.
    fn validate_block(
        &self,
        tx: &SocialTx,
        block: BlockView<'_>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        let _ = (tx, block, ctx);
        Ok(())
    }

    /// Rules against the current mempool.
    fn validate_mempool(&self, tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
        let _ = (tx, ctx);
        Ok(())
    }

    /// The reputation side-effect of an admitted record, consumed by the
    /// reward layer after commit. Kinds that never touch reputation
    /// report `None`.
    fn reputation_effect(
        &self,
        tx: &SocialTx,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult<Option<ScoreEffect>> {
        let _ = (tx, ctx);
        Ok(None)
    }

    /// Addresses that must already be registered accounts. The default is
    /// the author; kinds naming counterparties add them, account
    /// registration itself returns none.
    fn registration_addresses<'t>(&self, tx: &'t SocialTx) -> Vec<&'t str> {
        tx.author().into_iter().collect()
    }

    /// Entry point: chain checks, then block or mempool context rules.
    fn validate(
        &self,
        tx: &SocialTx,
        block: Option<BlockView<'_>>,
        ctx: &ConsensusContext<'_>,
    ) -> ConsensusResult {
        check_registration(&self.registration_addresses(tx), block, ctx)?;
        self.validate_chain(tx, block, ctx)?;
        match block {
            Some(block) => self.validate_block(tx, block, ctx),
            None => self.validate_mempool(tx, ctx),
        }
    }
}

/// Selects the rule version for `(kind, height, network)`.
///
/// `None` means the kind has no rules active at this height; monetary
/// kinds never reach this table.
pub fn validator_for(
    kind: TxKind,
    height: BlockHeight,
    network: shared_types::Network,
) -> Option<Box<dyn SocialValidator>> {
    let schedule = match kind {
        TxKind::AccountUser => &user::USER_SCHEDULE,
        TxKind::AccountDelete => &user::ACCOUNT_DELETE_SCHEDULE,
        TxKind::ContentPost => &content::POST_SCHEDULE,
        TxKind::ContentVideo => &content::VIDEO_SCHEDULE,
        TxKind::ContentComment => &comment::COMMENT_SCHEDULE,
        TxKind::ContentCommentEdit => &comment::COMMENT_EDIT_SCHEDULE,
        TxKind::ContentCommentDelete => &comment::COMMENT_DELETE_SCHEDULE,
        TxKind::ContentDelete => &content::CONTENT_DELETE_SCHEDULE,
        TxKind::ActionScoreContent => &score_content::SCHEDULE,
        TxKind::ActionScoreComment => &score_comment::SCHEDULE,
        TxKind::ActionSubscribe => &subscribe::SUBSCRIBE_SCHEDULE,
        TxKind::ActionSubscribePrivate => &subscribe::SUBSCRIBE_PRIVATE_SCHEDULE,
        TxKind::ActionSubscribeCancel => &subscribe::SUBSCRIBE_CANCEL_SCHEDULE,
        TxKind::ActionBlocking => &blocking::BLOCKING_SCHEDULE,
        TxKind::ActionBlockingCancel => &blocking::BLOCKING_CANCEL_SCHEDULE,
        TxKind::ActionComplain => &complain::SCHEDULE,
        TxKind::BarteronAccount => &barteron::ACCOUNT_SCHEDULE,
        TxKind::BarteronOffer => &barteron::OFFER_SCHEDULE,
        TxKind::ModerationFlag => &moderation::FLAG_SCHEDULE,
        TxKind::ModerationVote => &moderation::VOTE_SCHEDULE,
        TxKind::ModeratorRegister => &moderation::REGISTER_SCHEDULE,
        TxKind::ModeratorRequest => &moderation::REQUEST_SCHEDULE,
        _ => return None,
    };
    schedule.instance(height, network)
}

// ---------------------------------------------------------------------------
// Shared rule fragments
// ---------------------------------------------------------------------------

/// Fails with `error` unless the historic escape table excuses this
/// transaction from it.
pub(crate) fn fail_unless_escaped(
    tx: &SocialTx,
    ctx: &ConsensusContext<'_>,
    error: ConsensusError,
) -> ConsensusResult {
    if ctx.escapes.allows(&tx.hash, tx.kind(), error) {
        Ok(())
    } else {
        Err(error)
    }
}

/// The registration precondition: every listed address must hold a live
/// account in chain, in the same block, or (for mempool candidates) in the
/// mempool.
pub(crate) fn check_registration(
    addresses: &[&str],
    block: Option<BlockView<'_>>,
    ctx: &ConsensusContext<'_>,
) -> ConsensusResult {
    for address in addresses {
        if ctx.repo.exists_account(address, block.is_none())? {
            continue;
        }

        let registered_in_block = block.is_some_and(|block| {
            block
                .iter()
                .any(|btx| btx.kind() == TxKind::AccountUser && btx.author() == Some(*address))
        });
        if !registered_in_block {
            return Err(ConsensusError::NotRegistered);
        }
    }
    Ok(())
}

/// The OP_RETURN commitment: the canonical bytes rebuilt from the record
/// must hash to what the envelope advertised. Accounts also accept the
/// referrer-free variant; a few historic transactions carry grandfathered
/// commitments.
pub(crate) fn check_op_return(tx: &SocialTx, ctx: &ConsensusContext<'_>) -> ConsensusResult {
    let Some(op_return) = &tx.op_return else {
        return Ok(());
    };

    let rebuilt = tx.build_hash();
    if rebuilt == op_return.data_hash {
        return Ok(());
    }
    if let Some(accepted) = ctx.escapes.op_return_override(&tx.hash) {
        if accepted == op_return.data_hash {
            return Ok(());
        }
    }
    if let Some(without_referrer) = tx.build_hash_without_referrer() {
        if without_referrer == op_return.data_hash {
            return Ok(());
        }
    }

    Err(ConsensusError::FailedOpReturn)
}

/// Payload size cap against the given limit key.
pub(crate) fn check_payload_size(
    tx: &SocialTx,
    key: LimitKey,
    ctx: &ConsensusContext<'_>,
) -> ConsensusResult {
    if tx.payload_size() as i64 > ctx.limit(key) {
        return Err(ConsensusError::ContentSizeLimit);
    }
    Ok(())
}

/// Start of the daily window: envelope seconds in the early eras, block
/// heights after the window checkpoint. The width comes from the limit
/// table either way.
pub(crate) fn window_start(
    by_height: bool,
    depth: i64,
    tx_time: i64,
    height: BlockHeight,
) -> WindowStart {
    if by_height {
        WindowStart::Height(height.saturating_sub(depth as BlockHeight))
    } else {
        WindowStart::Time(tx_time - depth)
    }
}

/// The daily ceiling for this author's mode.
pub(crate) fn mode_limit(
    ctx: &ConsensusContext<'_>,
    address: &str,
    full_key: LimitKey,
    trial_key: LimitKey,
) -> ConsensusResult<i64> {
    let info = reputation::account_info(ctx, &address.to_string())?;
    Ok(match info.mode {
        AccountMode::Full => ctx.limit(full_key),
        AccountMode::Trial => ctx.limit(trial_key),
    })
}

/// The newest version of an editable record, looked up in chain state and
/// then among the earlier transactions of the block being validated.
pub(crate) fn last_of_root(
    root_tx_hash: &str,
    kinds: &[TxKind],
    block: Option<BlockView<'_>>,
    ctx: &ConsensusContext<'_>,
) -> ConsensusResult<Option<SocialTx>> {
    let mut found = ctx.repo.get_last(kinds, root_tx_hash)?;

    if let Some(block) = block {
        if let Some(in_block) = block
            .iter()
            .rev()
            .find(|btx| kinds.contains(&btx.kind()) && btx.root_tx_hash() == Some(root_tx_hash))
        {
            found = Some(in_block.clone());
        }
    }

    Ok(found)
}

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validators::testing::*;
    use shared_types::Network;

    #[test]
    fn test_validator_for_money_kinds_is_none() {
        assert!(validator_for(TxKind::Coinbase, 1_000_000, Network::Main).is_none());
        assert!(validator_for(TxKind::Default, 1_000_000, Network::Main).is_none());
    }

    #[test]
    fn test_validator_for_staged_kind_is_none_below_activation() {
        // Barteron accounts are staged behind a far-future activation.
        assert!(validator_for(TxKind::BarteronAccount, 3_000_000, Network::Main).is_none());
        // Offers activate on mainnet at 2_930_000.
        assert!(validator_for(TxKind::BarteronOffer, 2_929_999, Network::Main).is_none());
        assert!(validator_for(TxKind::BarteronOffer, 2_930_000, Network::Main).is_some());
    }

    #[test]
    fn test_registration_gate_sees_block() {
        let repo = repo();
        let limits = limits();
        let escapes = no_escapes();
        let ctx = ctx_at(&repo, &limits, &escapes, 100);

        let registration = user_tx("u1", "alice", "alice");
        let block = vec![registration];

        assert!(check_registration(&["alice"], Some(&block), &ctx).is_ok());
        assert_eq!(
            check_registration(&["bob"], Some(&block), &ctx),
            Err(ConsensusError::NotRegistered)
        );
    }

    #[test]
    fn test_op_return_commitment() {
        let repo = repo();
        let limits = limits();
        let escapes = no_escapes();
        let ctx = ctx_at(&repo, &limits, &escapes, 100);

        let mut tx = post_tx("p1", "alice", 1000);
        tx.op_return = Some(shared_types::OpReturn {
            data_hash: tx.build_hash(),
            extra: None,
        });
        assert!(check_op_return(&tx, &ctx).is_ok());

        tx.op_return = Some(shared_types::OpReturn {
            data_hash: "ff".repeat(32),
            extra: None,
        });
        assert_eq!(check_op_return(&tx, &ctx), Err(ConsensusError::FailedOpReturn));
    }
}
