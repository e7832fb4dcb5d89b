//! Determinism and limit monotonicity over fixed snapshots.

#[cfg(test)]
mod tests {
    use crate::support::*;
    use ag_social_consensus::{ConsensusError, LimitKey, SocialConsensusHelper};
    use shared_types::Network;

    const H: u32 = 100_000;

    /// The same record against the same snapshot yields the same outcome,
    /// call after call.
    #[test]
    fn test_same_snapshot_same_outcome() {
        let mut world = World::at_height(H);
        world.register("alice");
        world.register("bob");
        world.repo.add_chain(post_tx("p1", "bob", 1000), 100);

        let score = score_tx("s1", "alice", "p1", 5, 2000);
        let first = SocialConsensusHelper::validate_transaction(&score, &world.ctx());
        for _ in 0..10 {
            assert_eq!(
                SocialConsensusHelper::validate_transaction(&score, &world.ctx()),
                first
            );
        }
    }

    /// Two hosts with identical snapshots and schedules agree.
    #[test]
    fn test_identical_hosts_agree() {
        let mut world = World::at_height(H);
        world.register("alice");
        world.repo.add_chain(post_tx("p1", "alice", 1000), 100);

        // The second host is an independent copy of the first.
        let other = World {
            repo: world.repo.clone(),
            limits: world.limits.clone(),
            escapes: world.escapes.clone(),
            network: world.network,
            height: world.height,
        };

        for record in [
            score_tx("s1", "alice", "p1", 5, 2000),
            post_edit_tx("e1", "p1", "alice", 2000),
            subscribe_tx("x1", "alice", "ghost"),
        ] {
            assert_eq!(
                SocialConsensusHelper::validate_transaction(&record, &world.ctx()),
                SocialConsensusHelper::validate_transaction(&record, &other.ctx()),
            );
        }
    }

    /// Accepting `n` records inside a window forces the `(n+1)`-th to fail
    /// with the kind's limit error, for every windowed kind.
    #[test]
    fn test_limit_monotonicity() {
        let mut world = World::at_height(H);
        world.limits.set(LimitKey::TrialScoreLimit, Network::Main, 0, 3);
        world.register("alice");
        world.register("bob");

        for i in 0..4 {
            world
                .repo
                .add_chain(post_tx(&format!("p{i}"), "bob", 500 + i), 50 + i as u32);
        }

        for i in 0..3 {
            let score = score_tx(&format!("s{i}"), "alice", &format!("p{i}"), 5, 1000 + i);
            assert_eq!(
                SocialConsensusHelper::validate_transaction(&score, &world.ctx()),
                Ok(()),
                "score {i} under the cap"
            );
            world.repo.add_chain(score, 100 + i as u32);
        }

        let over = score_tx("s3", "alice", "p3", 5, 1003);
        assert_eq!(
            SocialConsensusHelper::validate_transaction(&over, &world.ctx()),
            Err(ConsensusError::ScoreLimit)
        );
    }

    /// Validation never mutates the snapshot: a rejected candidate leaves
    /// subsequent decisions unchanged.
    #[test]
    fn test_no_partial_effects() {
        let mut world = World::at_height(H);
        world.register("alice");
        world.register("bob");
        world.repo.add_chain(post_tx("p1", "bob", 1000), 100);

        let rejected = score_tx("s1", "bob", "p1", 5, 2000);
        assert_eq!(
            SocialConsensusHelper::validate_transaction(&rejected, &world.ctx()),
            Err(ConsensusError::SelfScore)
        );

        // The failed attempt left no trace: a valid score still passes.
        let accepted = score_tx("s2", "alice", "p1", 5, 2000);
        assert_eq!(
            SocialConsensusHelper::validate_transaction(&accepted, &world.ctx()),
            Ok(())
        );
    }
}
