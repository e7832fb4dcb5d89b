//! The explicit validation context.
//!
//! Everything a validator may consult is carried in here; the core never
//! reads ambient globals, the clock, or the active chain tip directly.

use shared_types::{BlockHeight, Network};

use crate::domain::escapes::EscapeRegistry;
use crate::domain::limits::{LimitKey, LimitTable};
use crate::ports::outbound::ConsensusRepository;

/// Immutable context for one validation call.
///
/// `height` is the height the transaction is being judged at: the height of
/// the block being connected, or the next height for mempool candidates.
#[derive(Clone, Copy)]
pub struct ConsensusContext<'a> {
    pub repo: &'a dyn ConsensusRepository,
    pub limits: &'a LimitTable,
    pub escapes: &'a EscapeRegistry,
    pub network: Network,
    pub height: BlockHeight,
}

impl<'a> ConsensusContext<'a> {
    /// The limit value active at this context's height.
    pub fn limit(&self, key: LimitKey) -> i64 {
        self.limits.get(key, self.network, self.height)
    }
}
