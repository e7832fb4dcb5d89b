//! # Checkpoint Registry
//!
//! Consensus behaviour changes only by height. Each transaction kind owns
//! an ordered list of checkpoints; a checkpoint names its activation height
//! per network and a factory for the rule version that takes over there.
//! Selecting a validator for a height picks the rightmost entry whose
//! activation is at or below it. This registry is the single permitted
//! mechanism for protocol evolution: validators themselves are immutable
//! value objects.

use shared_types::{BlockHeight, Network};

/// One rule revision: per-network activation heights plus the factory.
///
/// A negative activation means the revision never activates on that
/// network.
pub struct Checkpoint<T> {
    pub main: i64,
    pub test: i64,
    pub alt: i64,
    pub make: fn() -> T,
}

impl<T> Checkpoint<T> {
    /// The activation height on the given network.
    pub fn activation(&self, network: Network) -> i64 {
        match network {
            Network::Main => self.main,
            Network::Test => self.test,
            Network::Alt => self.alt,
        }
    }
}

/// Ordered checkpoint list for one transaction kind.
///
/// Entries must be sorted by ascending mainnet activation; the order is the
/// revision lineage, identical on every network that activates them.
pub struct CheckpointSchedule<T: 'static> {
    entries: &'static [Checkpoint<T>],
}

impl<T: 'static> CheckpointSchedule<T> {
    pub const fn new(entries: &'static [Checkpoint<T>]) -> Self {
        Self { entries }
    }

    /// Index of the revision active at `height`, if any entry has
    /// activated on this network yet.
    pub fn active_index(&self, height: BlockHeight, network: Network) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .rev()
            .find(|(_, entry)| {
                let activation = entry.activation(network);
                activation >= 0 && activation <= i64::from(height)
            })
            .map(|(index, _)| index)
    }

    /// Constructs the rule version active at `height`.
    pub fn instance(&self, height: BlockHeight, network: Network) -> Option<T> {
        self.active_index(height, network)
            .map(|index| (self.entries[index].make)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SCHEDULE: CheckpointSchedule<&'static str> = CheckpointSchedule::new(&[
        Checkpoint {
            main: 0,
            test: -1,
            alt: -1,
            make: || "base",
        },
        Checkpoint {
            main: 1000,
            test: 0,
            alt: -1,
            make: || "revised",
        },
        Checkpoint {
            main: 5000,
            test: 2000,
            alt: 0,
            make: || "latest",
        },
    ]);

    #[test]
    fn test_selects_largest_activation_at_or_below() {
        assert_eq!(SCHEDULE.instance(0, Network::Main), Some("base"));
        assert_eq!(SCHEDULE.instance(999, Network::Main), Some("base"));
        assert_eq!(SCHEDULE.instance(1000, Network::Main), Some("revised"));
        assert_eq!(SCHEDULE.instance(4999, Network::Main), Some("revised"));
        assert_eq!(SCHEDULE.instance(5000, Network::Main), Some("latest"));
    }

    #[test]
    fn test_negative_activation_never_fires() {
        // Alt only ever sees the last revision.
        assert_eq!(SCHEDULE.instance(0, Network::Alt), Some("latest"));
        assert_eq!(SCHEDULE.instance(1_000_000, Network::Alt), Some("latest"));
    }

    #[test]
    fn test_no_entry_active_yet() {
        static STAGED: CheckpointSchedule<&'static str> = CheckpointSchedule::new(&[Checkpoint {
            main: 99_999_999,
            test: 99_999_999,
            alt: 99_999_999,
            make: || "staged",
        }]);
        assert_eq!(STAGED.instance(2_000_000, Network::Main), None);
        assert_eq!(STAGED.active_index(2_000_000, Network::Main), None);
    }

    #[test]
    fn test_network_lineages_differ() {
        assert_eq!(SCHEDULE.instance(0, Network::Test), Some("revised"));
        assert_eq!(SCHEDULE.instance(2000, Network::Test), Some("latest"));
    }
}
