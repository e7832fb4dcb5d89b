//! Pure domain logic: records, limits, reputation, checkpoints, validators.

pub mod checkpoints;
pub mod context;
pub mod error;
pub mod escapes;
pub mod limits;
pub mod model;
pub mod reputation;
pub mod validators;

pub use checkpoints::{Checkpoint, CheckpointSchedule};
pub use context::ConsensusContext;
pub use error::{ConsensusError, ConsensusResult, DecodeError};
pub use escapes::EscapeRegistry;
pub use limits::{LimitKey, LimitTable};
pub use model::{SocialTx, TxBody};
pub use reputation::{AccountInfo, AccountMode, ScoreEffect};
