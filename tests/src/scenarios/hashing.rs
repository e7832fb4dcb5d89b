//! Canonical hash stability and envelope round-trips.
//!
//! Every supported kind must rebuild to the exact id it advertises after a
//! trip through the envelope decoder, and the decoder must be the identity
//! on sealed records.

#[cfg(test)]
mod tests {
    use crate::support::*;
    use ag_social_consensus::domain::model::{SocialTx, TxBody};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_round_trip(record: SocialTx) {
        let sealed = sealed(record);
        assert_eq!(sealed.build_hash(), sealed.hash, "seal must be stable");

        let envelope = envelope_for(&sealed);
        let decoded = SocialTx::from_envelope(&envelope).expect("decodes");

        assert_eq!(decoded, sealed, "decode must be the identity");
        assert_eq!(decoded.build_hash(), envelope.tx_hash);
    }

    #[test]
    fn test_round_trip_every_supported_kind() {
        assert_round_trip(user_tx("t", "addr-a", "alice"));
        assert_round_trip(post_tx("t", "addr-a", 1000));
        assert_round_trip(post_edit_tx("t", "11".repeat(32).as_str(), "addr-a", 1500));
        assert_round_trip(comment_tx("t", "addr-a", "22".repeat(32).as_str(), 1000));
        assert_round_trip(comment_delete_tx(
            "t",
            "33".repeat(32).as_str(),
            "addr-a",
            "22".repeat(32).as_str(),
            1500,
        ));
        assert_round_trip(content_delete_tx("t", "44".repeat(32).as_str(), "addr-a", 1500));
        assert_round_trip(score_tx("t", "addr-a", "55".repeat(32).as_str(), 4, 1000));
        assert_round_trip(subscribe_tx("t", "addr-a", "addr-b"));
        assert_round_trip(subscribe_cancel_tx("t", "addr-a", "addr-b"));
        assert_round_trip(blocking_tx("t", "addr-a", "addr-b"));
        assert_round_trip(complain_tx("t", "addr-a", "66".repeat(32).as_str(), 1000));
    }

    /// The tombstone hash ignores whatever message the deleted comment
    /// carried: it is the empty-message canonicalization of the same slots.
    #[test]
    fn test_comment_delete_hash_is_message_free() {
        let deleted = comment_delete_tx("t", "root", "addr-a", "post", 1500);

        let mut with_message = deleted.clone();
        if let TxBody::CommentDelete(entry) = &mut with_message.body {
            entry.message = Some("the removed text".into());
        }

        assert_eq!(deleted.build_hash(), with_message.build_hash());
    }

    /// Comment ids commit to the slot fields alone: an edit with the same
    /// slots as a fresh comment hashes identically, root or no root. Only
    /// the post/video/offer chains fold the root in on edits.
    #[test]
    fn test_comment_hash_ignores_root() {
        let fresh = comment_tx("t", "addr-a", "post1", 1000);
        let mut edit = fresh.clone();
        if let TxBody::Comment(entry) = &mut edit.body {
            entry.root_tx_hash = "other-root".into();
        }
        assert_eq!(fresh.build_hash(), edit.build_hash());

        let post = post_tx("t", "addr-a", 1000);
        let mut post_edit = post.clone();
        if let TxBody::Post(entry) = &mut post_edit.body {
            entry.root_tx_hash = "other-root".into();
        }
        assert_ne!(post.build_hash(), post_edit.build_hash());
    }

    /// Account records accept the referrer-free commitment variant.
    #[test]
    fn test_user_referrer_free_variant() {
        let mut record = user_tx("t", "addr-a", "alice");
        if let TxBody::User(user) = &mut record.body {
            user.referrer = Some("addr-r".into());
        }

        let with = record.build_hash();
        let without = record.build_hash_without_referrer().expect("account kind");
        assert_ne!(with, without);

        if let TxBody::User(user) = &mut record.body {
            user.referrer = None;
        }
        assert_eq!(record.build_hash(), without);
    }

    /// Randomized payload sweep: sealing and decoding stay consistent for
    /// arbitrary field contents.
    #[test]
    fn test_round_trip_random_posts() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..64 {
            let mut record = post_tx("t", "addr-a", 1000);
            if let TxBody::Post(entry) = &mut record.body {
                let payload = entry.payload.as_mut().unwrap();
                payload.caption = Some(random_string(&mut rng));
                payload.message = Some(random_string(&mut rng));
                payload.url = Some(random_string(&mut rng));
            }
            assert_round_trip(record);
        }
    }

    fn random_string(rng: &mut StdRng) -> String {
        let len = rng.gen_range(1..80);
        (0..len)
            .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
            .collect()
    }
}
