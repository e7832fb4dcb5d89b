//! Limit Table - Height-Indexed Rule Parameters
//!
//! Every numeric consensus parameter lives here as an ordered map from
//! activation height to value, per network. `get` returns the value whose
//! activation height is the largest one at or below the queried height, so
//! a parameter change is just another table row, visible in diffs.

use std::collections::{BTreeMap, HashMap};

use shared_types::{BlockHeight, Network};

/// Names of the numeric rule parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitKey {
    // Account mode thresholds
    ThresholdReputation,
    ThresholdBalance,

    // Eligibility gates
    ThresholdReputationScore,
    ThresholdReputationComplains,
    ThresholdReputationBlocking,
    ThresholdReputationModerationFlag,
    ScoresOneToOne,
    ScoresOneToOneDepth,

    // Window sizes (seconds before the window checkpoint, blocks after)
    Depth,
    EditPostTimeout,
    EditCommentTimeout,
    EditAccountDepth,

    // Daily counts, per mode
    TrialPostLimit,
    FullPostLimit,
    TrialVideoLimit,
    FullVideoLimit,
    TrialCommentLimit,
    FullCommentLimit,
    TrialScoreLimit,
    FullScoreLimit,
    TrialCommentScoreLimit,
    FullCommentScoreLimit,
    TrialComplainLimit,
    FullComplainLimit,

    // Edit counts
    TrialPostEditLimit,
    FullPostEditLimit,
    TrialCommentEditLimit,
    FullCommentEditLimit,
    EditAccountDailyCount,

    // Size caps
    MaxPostSize,
    MaxUserSize,
    MaxCommentSize,
    MaxBarteronOfferSize,

    // Active record caps
    BartOfferMaxActiveCount,
    ModerationFlagMaxCount,
}

/// Height-indexed lookup of rule parameters per network.
#[derive(Debug, Clone)]
pub struct LimitTable {
    values: HashMap<(LimitKey, Network), BTreeMap<BlockHeight, i64>>,
}

impl LimitTable {
    /// An empty table. Tests seed exactly the keys they exercise.
    pub fn empty() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Adds or replaces an activation entry.
    pub fn set(&mut self, key: LimitKey, network: Network, activation: BlockHeight, value: i64) {
        self.values
            .entry((key, network))
            .or_default()
            .insert(activation, value);
    }

    /// Seeds one key with the same activation list on every network.
    fn set_all(&mut self, key: LimitKey, entries: &[(BlockHeight, i64)]) {
        for network in [Network::Main, Network::Test, Network::Alt] {
            for &(activation, value) in entries {
                self.set(key, network, activation, value);
            }
        }
    }

    /// The value active at `height`: the entry with the largest activation
    /// height at or below it.
    ///
    /// A missing key is a wiring bug, not a consensus condition; it reads
    /// as `0` and is reported once per call site via `tracing`.
    pub fn get(&self, key: LimitKey, network: Network, height: BlockHeight) -> i64 {
        match self
            .values
            .get(&(key, network))
            .and_then(|entries| entries.range(..=height).next_back())
        {
            Some((_, value)) => *value,
            None => {
                tracing::warn!(?key, ?network, height, "limit not configured");
                0
            }
        }
    }
}

impl Default for LimitTable {
    /// The production rule set.
    fn default() -> Self {
        let mut t = Self::empty();

        t.set_all(LimitKey::ThresholdReputation, &[(0, 500), (108_300, 1000)]);
        t.set_all(LimitKey::ThresholdBalance, &[(0, 50_0000_0000)]);
        t.set_all(
            LimitKey::ThresholdReputationScore,
            &[(0, -10_000), (108_300, 500)],
        );
        t.set_all(
            LimitKey::ThresholdReputationComplains,
            &[(0, 500), (108_300, 1000)],
        );
        t.set_all(LimitKey::ThresholdReputationBlocking, &[(0, 100)]);
        t.set_all(LimitKey::ThresholdReputationModerationFlag, &[(0, 1000)]);
        t.set_all(LimitKey::ScoresOneToOne, &[(0, 99_999), (225_000, 2)]);
        t.set_all(LimitKey::ScoresOneToOneDepth, &[(0, 86_400)]);

        // Window widths flip from seconds to blocks at the window
        // checkpoint; the era is the validator's decision, the width is
        // table data.
        t.set(LimitKey::Depth, Network::Main, 0, 86_400);
        t.set(LimitKey::Depth, Network::Main, 1_180_000, 1440);
        t.set(LimitKey::EditPostTimeout, Network::Main, 0, 86_400);
        t.set(LimitKey::EditPostTimeout, Network::Main, 1_180_000, 1440);
        t.set(LimitKey::EditCommentTimeout, Network::Main, 0, 86_400);
        t.set(LimitKey::EditCommentTimeout, Network::Main, 1_180_000, 1440);
        t.set(LimitKey::EditAccountDepth, Network::Main, 0, 86_400);
        t.set(LimitKey::EditAccountDepth, Network::Main, 1_180_000, 1440);
        for network in [Network::Test, Network::Alt] {
            t.set(LimitKey::Depth, network, 0, 1440);
            t.set(LimitKey::EditPostTimeout, network, 0, 1440);
            t.set(LimitKey::EditCommentTimeout, network, 0, 1440);
            t.set(LimitKey::EditAccountDepth, network, 0, 1440);
        }

        t.set_all(LimitKey::TrialPostLimit, &[(0, 15), (1_324_655, 5)]);
        t.set_all(LimitKey::FullPostLimit, &[(0, 30)]);
        t.set_all(LimitKey::TrialVideoLimit, &[(0, 5)]);
        t.set_all(LimitKey::FullVideoLimit, &[(0, 30)]);
        t.set_all(LimitKey::TrialCommentLimit, &[(0, 150)]);
        t.set_all(LimitKey::FullCommentLimit, &[(0, 300)]);
        t.set_all(LimitKey::TrialScoreLimit, &[(0, 45), (175_600, 100)]);
        t.set_all(LimitKey::FullScoreLimit, &[(0, 90), (175_600, 200)]);
        t.set_all(LimitKey::TrialCommentScoreLimit, &[(0, 300)]);
        t.set_all(LimitKey::FullCommentScoreLimit, &[(0, 600)]);
        t.set_all(LimitKey::TrialComplainLimit, &[(0, 6)]);
        t.set_all(LimitKey::FullComplainLimit, &[(0, 12)]);

        t.set_all(LimitKey::TrialPostEditLimit, &[(0, 5)]);
        t.set_all(LimitKey::FullPostEditLimit, &[(0, 5)]);
        t.set_all(LimitKey::TrialCommentEditLimit, &[(0, 4)]);
        t.set_all(LimitKey::FullCommentEditLimit, &[(0, 4)]);
        t.set_all(LimitKey::EditAccountDailyCount, &[(0, 10)]);

        t.set_all(LimitKey::MaxPostSize, &[(0, 60_000)]);
        t.set_all(LimitKey::MaxUserSize, &[(0, 2000)]);
        t.set_all(LimitKey::MaxCommentSize, &[(0, 2000)]);
        t.set(LimitKey::MaxBarteronOfferSize, Network::Main, 0, 60_000);
        t.set(LimitKey::MaxBarteronOfferSize, Network::Test, 0, 30_000);
        t.set(LimitKey::MaxBarteronOfferSize, Network::Alt, 0, 1024);

        t.set(LimitKey::BartOfferMaxActiveCount, Network::Main, 0, 30);
        t.set(LimitKey::BartOfferMaxActiveCount, Network::Test, 0, 50);
        t.set(LimitKey::BartOfferMaxActiveCount, Network::Alt, 0, 5000);
        t.set_all(LimitKey::ModerationFlagMaxCount, &[(0, 30)]);

        t
    }
}
