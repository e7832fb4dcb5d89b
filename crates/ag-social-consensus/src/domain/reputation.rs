//! Reputation Engine - Account Mode and Score Gates
//!
//! Pure functions over the repository: classify an account as `Full` or
//! `Trial` and decide whether a score may modify reputation or enter the
//! staking lottery. Nothing here mutates state; the reward layer consumes
//! the answers.

use serde::{Deserialize, Serialize};
use shared_types::Address;

use crate::domain::context::ConsensusContext;
use crate::domain::error::ConsensusResult;
use crate::domain::limits::LimitKey;

/// Which limit family applies to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountMode {
    /// Below both thresholds: the restrictive limits apply.
    Trial,
    /// Earned reputation or holds balance: the full limits apply.
    Full,
}

/// Mode plus the inputs it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub mode: AccountMode,
    pub reputation: i64,
    pub balance: i64,
}

/// The reputation side-effect of one admitted score.
///
/// Admissibility and weight are separate questions: a score past its
/// author's one-to-one cap still commits, it just carries none of this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreEffect {
    /// The score counts toward the target author's reputation.
    pub modifies_reputation: bool,
    /// The score enters the staking lottery draw.
    pub enters_lottery: bool,
}

/// Classifies an address at the context height.
///
/// Reputation is read at `height - 1` (the score that confirms in this very
/// block must not lift its own author), balance at `height`.
pub fn account_info(ctx: &ConsensusContext<'_>, address: &Address) -> ConsensusResult<AccountInfo> {
    let reputation = ctx
        .repo
        .user_reputation(address, ctx.height.saturating_sub(1))?;
    let balance = ctx.repo.user_balance(address, ctx.height)?;

    let mode = if reputation >= ctx.limit(LimitKey::ThresholdReputation)
        || balance >= ctx.limit(LimitKey::ThresholdBalance)
    {
        AccountMode::Full
    } else {
        AccountMode::Trial
    };

    Ok(AccountInfo {
        mode,
        reputation,
        balance,
    })
}

/// May a score from this address modify the target's reputation?
///
/// Scores from addresses below the score threshold still validate; they
/// just carry no reputation weight.
pub fn allow_modify_reputation(
    ctx: &ConsensusContext<'_>,
    scorer: &Address,
) -> ConsensusResult<bool> {
    let reputation = ctx.repo.user_reputation(scorer, ctx.height)?;
    Ok(reputation >= ctx.limit(LimitKey::ThresholdReputationScore))
}

/// One-to-one damping: a scorer lifts one author's reputation at most
/// `scores_one_to_one` times per day.
pub fn allow_reputation_one_to_one(
    ctx: &ConsensusContext<'_>,
    scorer: &Address,
    author: &Address,
    tx_hash: &str,
    tx_time: i64,
) -> ConsensusResult<bool> {
    let window = ctx.limit(LimitKey::ScoresOneToOneDepth);
    let count = ctx.repo.count_scores_one_to_one(
        scorer,
        author,
        tx_time - window,
        tx_time,
        &[],
        tx_hash,
    )?;
    Ok(i64::from(count) < ctx.limit(LimitKey::ScoresOneToOne))
}

/// Lottery eligibility: like the one-to-one gate, restricted to the score
/// values that enter the lottery, and requiring the scorer to clear the
/// reputation threshold.
pub fn allow_lottery(
    ctx: &ConsensusContext<'_>,
    scorer: &Address,
    author: &Address,
    tx_hash: &str,
    tx_time: i64,
) -> ConsensusResult<bool> {
    if !allow_modify_reputation(ctx, scorer)? {
        return Ok(false);
    }

    let window = ctx.limit(LimitKey::ScoresOneToOneDepth);
    let count = ctx.repo.count_scores_one_to_one(
        scorer,
        author,
        tx_time - window,
        tx_time,
        &[4, 5],
        tx_hash,
    )?;
    Ok(i64::from(count) < ctx.limit(LimitKey::ScoresOneToOne))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryRepository;
    use crate::domain::escapes::EscapeRegistry;
    use crate::domain::limits::LimitTable;
    use shared_types::Network;

    fn make_ctx<'a>(
        repo: &'a MemoryRepository,
        limits: &'a LimitTable,
        escapes: &'a EscapeRegistry,
        height: u32,
    ) -> ConsensusContext<'a> {
        ConsensusContext {
            repo,
            limits,
            escapes,
            network: Network::Main,
            height,
        }
    }

    #[test]
    fn test_mode_full_by_reputation() {
        let mut repo = MemoryRepository::new();
        repo.set_reputation("alice", 1500);
        let limits = LimitTable::default();
        let escapes = EscapeRegistry::empty();
        let ctx = make_ctx(&repo, &limits, &escapes, 200_000);

        let info = account_info(&ctx, &"alice".to_string()).unwrap();
        assert_eq!(info.mode, AccountMode::Full);
        assert_eq!(info.reputation, 1500);
    }

    #[test]
    fn test_mode_full_by_balance() {
        let mut repo = MemoryRepository::new();
        repo.set_balance("bob", 60_0000_0000);
        let limits = LimitTable::default();
        let escapes = EscapeRegistry::empty();
        let ctx = make_ctx(&repo, &limits, &escapes, 200_000);

        let info = account_info(&ctx, &"bob".to_string()).unwrap();
        assert_eq!(info.mode, AccountMode::Full);
    }

    #[test]
    fn test_mode_trial_below_both_thresholds() {
        let repo = MemoryRepository::new();
        let limits = LimitTable::default();
        let escapes = EscapeRegistry::empty();
        let ctx = make_ctx(&repo, &limits, &escapes, 200_000);

        let info = account_info(&ctx, &"carol".to_string()).unwrap();
        assert_eq!(info.mode, AccountMode::Trial);
    }

    #[test]
    fn test_low_reputation_cannot_modify() {
        let mut repo = MemoryRepository::new();
        repo.set_reputation("alice", 100);
        let limits = LimitTable::default();
        let escapes = EscapeRegistry::empty();

        // threshold_reputation_score is 500 at this height
        {
            let ctx = make_ctx(&repo, &limits, &escapes, 200_000);
            assert!(!allow_modify_reputation(&ctx, &"alice".to_string()).unwrap());
        }

        repo.set_reputation("alice", 500);
        let ctx = make_ctx(&repo, &limits, &escapes, 200_000);
        assert!(allow_modify_reputation(&ctx, &"alice".to_string()).unwrap());
    }

    #[test]
    fn test_one_to_one_damping() {
        use crate::domain::validators::testing::{post_tx, score_tx};

        let mut repo = MemoryRepository::new();
        repo.set_reputation("alice", 1000);
        repo.add_chain(post_tx("p1", "bob", 500), 10);
        repo.add_chain(post_tx("p2", "bob", 510), 11);
        repo.add_chain(score_tx("s1", "alice", "p1", 5, 1000), 20);
        repo.add_chain(score_tx("s2", "alice", "p2", 3, 1100), 21);
        let limits = LimitTable::default();
        let escapes = EscapeRegistry::empty();
        // scores_one_to_one is 2 at this height.
        let ctx = make_ctx(&repo, &limits, &escapes, 300_000);

        let scorer = "alice".to_string();
        let author = "bob".to_string();

        // Two earlier same-day scores to this author exhaust the cap.
        assert!(!allow_reputation_one_to_one(&ctx, &scorer, &author, "s3", 1200).unwrap());
        // Only one of them is a lottery-grade value, so the lottery gate
        // still has room.
        assert!(allow_lottery(&ctx, &scorer, &author, "s3", 1200).unwrap());
        // Other authors are unaffected.
        assert!(
            allow_reputation_one_to_one(&ctx, &scorer, &"carol".to_string(), "s3", 1200).unwrap()
        );
        // The judged transaction itself never counts: excluding one of the
        // two leaves room again.
        assert!(allow_reputation_one_to_one(&ctx, &scorer, &author, "s2", 1200).unwrap());
    }

    #[test]
    fn test_lottery_needs_reputation_and_grade_room() {
        use crate::domain::validators::testing::{post_tx, score_tx};

        let mut repo = MemoryRepository::new();
        repo.set_reputation("alice", 100);
        repo.add_chain(post_tx("p1", "bob", 500), 10);
        let limits = LimitTable::default();
        let escapes = EscapeRegistry::empty();

        // Below the score threshold: no lottery regardless of history.
        {
            let ctx = make_ctx(&repo, &limits, &escapes, 300_000);
            assert!(!allow_lottery(
                &ctx,
                &"alice".to_string(),
                &"bob".to_string(),
                "s9",
                1200
            )
            .unwrap());
        }

        // Above it, two lottery-grade scores close the draw.
        repo.set_reputation("alice", 1000);
        repo.add_chain(post_tx("p2", "bob", 510), 11);
        repo.add_chain(score_tx("s1", "alice", "p1", 5, 1000), 20);
        repo.add_chain(score_tx("s2", "alice", "p2", 4, 1100), 21);
        let ctx = make_ctx(&repo, &limits, &escapes, 300_000);
        assert!(!allow_lottery(
            &ctx,
            &"alice".to_string(),
            &"bob".to_string(),
            "s3",
            1200
        )
        .unwrap());
    }
}
