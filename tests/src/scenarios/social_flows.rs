//! Literal rule scenarios, each driven through `SocialConsensusHelper`
//! exactly the way the mempool and block-acceptance layers drive it.

#[cfg(test)]
mod tests {
    use crate::support::*;
    use ag_social_consensus::{ConsensusError, LimitKey, SocialConsensusHelper};
    use shared_types::{Network, OpReturn};

    // Mainnet heights: seconds-era windows, and the modern rule set.
    const H_TIME: u32 = 100_000;
    const H_MODERN: u32 = 2_000_000;

    /// Post limit, Trial mode: five posts pass, the sixth inside the
    /// window fails, a later one outside the window passes again.
    #[test]
    fn test_trial_post_limit_drains_with_the_window() {
        init_tracing();
        let mut world = World::at_height(H_TIME);
        world.limits.set(LimitKey::TrialPostLimit, Network::Main, 0, 5);
        world.register("alice");

        for i in 0..5 {
            let post = post_tx(&format!("p{i}"), "alice", 1000 + i);
            assert_eq!(
                SocialConsensusHelper::validate_transaction(&post, &world.ctx()),
                Ok(()),
                "post {i} should pass"
            );
            world.repo.add_chain(post, 100 + i as u32);
        }

        let sixth = post_tx("p5", "alice", 1005);
        assert_eq!(
            SocialConsensusHelper::validate_transaction(&sixth, &world.ctx()),
            Err(ConsensusError::ContentLimit)
        );

        let seventh = post_tx("p6", "alice", 1 + 86_400 + 1000);
        assert_eq!(
            SocialConsensusHelper::validate_transaction(&seventh, &world.ctx()),
            Ok(())
        );
    }

    /// Score self-rejection.
    #[test]
    fn test_score_to_own_post() {
        init_tracing();
        let mut world = World::at_height(H_TIME);
        world.register("alice");
        world.repo.add_chain(post_tx("p1", "alice", 1000), 100);

        let score = score_tx("s1", "alice", "p1", 5, 2000);
        assert_eq!(
            SocialConsensusHelper::validate_transaction(&score, &world.ctx()),
            Err(ConsensusError::SelfScore)
        );
    }

    /// OP_RETURN mismatch: internally consistent record, stale binding.
    #[test]
    fn test_score_op_return_binding_mismatch() {
        init_tracing();
        let mut world = World::at_height(H_TIME);
        world.register("alice");
        world.register("bob");
        world.repo.add_chain(post_tx("p1", "bob", 1000), 100);

        let mut score = score_tx("s1", "alice", "p1", 4, 2000);
        score.op_return = Some(OpReturn {
            data_hash: score.build_hash(),
            extra: Some(hex::encode("bob 5")),
        });
        assert_eq!(
            SocialConsensusHelper::validate_transaction(&score, &world.ctx()),
            Err(ConsensusError::FailedOpReturn)
        );
    }

    /// Subscribe toggle: subscribe, double-subscribe, cancel, re-cancel.
    #[test]
    fn test_subscribe_toggle() {
        init_tracing();
        let mut world = World::at_height(H_TIME);
        world.register("alice");
        world.register("bob");

        let subscribe = subscribe_tx("s1", "alice", "bob");
        assert_eq!(
            SocialConsensusHelper::validate_transaction(&subscribe, &world.ctx()),
            Ok(())
        );
        world.repo.add_chain(subscribe, 100);

        assert_eq!(
            SocialConsensusHelper::validate_transaction(
                &subscribe_tx("s2", "alice", "bob"),
                &world.ctx()
            ),
            Err(ConsensusError::DoubleSubscribe)
        );

        let cancel = subscribe_cancel_tx("x1", "alice", "bob");
        assert_eq!(
            SocialConsensusHelper::validate_transaction(&cancel, &world.ctx()),
            Ok(())
        );
        world.repo.add_chain(cancel, 101);

        assert_eq!(
            SocialConsensusHelper::validate_transaction(
                &subscribe_cancel_tx("x2", "alice", "bob"),
                &world.ctx()
            ),
            Err(ConsensusError::InvalidSubscribe)
        );
    }

    /// Name collision inside one block, case-insensitive.
    #[test]
    fn test_block_name_collision() {
        init_tracing();
        let world = World::at_height(H_MODERN);

        let block = vec![
            user_tx("u1", "addr-a", "alice"),
            user_tx("u2", "addr-b", "Alice"),
        ];
        assert_eq!(
            SocialConsensusHelper::validate_block(&block, &world.ctx()),
            Err(ConsensusError::NicknameDouble)
        );
    }

    /// Edit authority plus the edit window.
    #[test]
    fn test_edit_authority() {
        init_tracing();
        let mut world = World::at_height(H_TIME);
        world.register("alice");
        world.register("bob");
        world.repo.add_chain(post_tx("p1", "alice", 1000), 100);

        let foreign = post_edit_tx("e1", "p1", "bob", 2000);
        assert_eq!(
            SocialConsensusHelper::validate_transaction(&foreign, &world.ctx()),
            Err(ConsensusError::ContentEditUnauthorized)
        );

        let own = post_edit_tx("e2", "p1", "alice", 1000 + 3600);
        assert_eq!(
            SocialConsensusHelper::validate_transaction(&own, &world.ctx()),
            Ok(())
        );
    }

    /// A block whose first record registers the author lets the author's
    /// later records in the same block validate; the whole block fails on
    /// the first bad record.
    #[test]
    fn test_block_ordering_and_abort() {
        init_tracing();
        let mut world = World::at_height(H_MODERN);
        world.register("alice");

        let good = vec![
            user_tx("u1", "bob", "bob"),
            post_tx("p1", "bob", 1000),
            score_tx("s1", "alice", "p1", 5, 1100),
        ];
        assert_eq!(
            SocialConsensusHelper::validate_block(&good, &world.ctx()),
            Ok(())
        );

        // The same block in the wrong order: the score cannot see its
        // content yet.
        let reordered = vec![
            score_tx("s1", "alice", "p1", 5, 1100),
            user_tx("u1", "bob", "bob"),
            post_tx("p1", "bob", 1000),
        ];
        assert_eq!(
            SocialConsensusHelper::validate_block(&reordered, &world.ctx()),
            Err(ConsensusError::NotFound)
        );
    }

    /// Every kind that requires registration rejects an unknown author.
    #[test]
    fn test_registration_gate_across_kinds() {
        init_tracing();
        let mut world = World::at_height(H_MODERN);
        world.register("bob");
        world.repo.add_chain(post_tx("p1", "bob", 1000), 100);
        world.repo.add_chain(comment_tx("c1", "bob", "p1", 1100), 100);

        // "ghost" never registered.
        let records = vec![
            post_tx("r1", "ghost", 2000),
            comment_tx("r2", "ghost", "p1", 2000),
            score_tx("r3", "ghost", "p1", 5, 2000),
            subscribe_tx("r4", "ghost", "bob"),
            blocking_tx("r5", "ghost", "bob"),
            complain_tx("r6", "ghost", "p1", 2000),
        ];
        for record in records {
            assert_eq!(
                SocialConsensusHelper::validate_transaction(&record, &world.ctx()),
                Err(ConsensusError::NotRegistered),
                "kind {:?}",
                record.kind()
            );
        }
    }

    /// The historic escape registry short-circuits exactly its entries.
    #[test]
    fn test_historic_escape_applies() {
        init_tracing();
        let mut world = World::at_height(H_TIME);
        world.register("alice");
        world.register("bob");
        world.repo.add_chain(blocking_tx("b0", "alice", "bob"), 50);

        // A second block of the same pair is normally a double.
        let double = blocking_tx("b1", "alice", "bob");
        assert_eq!(
            SocialConsensusHelper::validate_transaction(&double, &world.ctx()),
            Err(ConsensusError::DoubleBlocking)
        );

        // The grandfathered cancel hash passes its InvalidBlocking check.
        let mut escaped = subscribe_cancel_tx("x1", "alice", "bob");
        escaped.hash =
            "92dca27ddfd42fa4ce2c8f4bb1a6c2b201b8fac29e49e8a42e3ac44bfda04f26".to_string();
        assert_eq!(
            SocialConsensusHelper::validate_transaction(&escaped, &world.ctx()),
            Ok(())
        );
    }
}
