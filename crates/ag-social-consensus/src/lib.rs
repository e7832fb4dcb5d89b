//! # Social Consensus Subsystem
//!
//! Decides whether each social transaction (accounts, posts, comments,
//! scores, subscriptions, complaints, blockings, barter offers, moderation
//! actions) is admissible at a given chain height. Monetary validity is the
//! envelope layer's problem; this crate owns the social rule set: per-account
//! rate limits, reputation gating, uniqueness and ordering invariants, and
//! height-activated rule changes.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | A record's id is the double-SHA256 of its canonical bytes | `domain/model` - `canonical_data()` / `build_hash()` |
//! | INVARIANT-2 | One live record per `(kind, root_tx_hash)` | repository `get_last` contract + edit validators |
//! | INVARIANT-3 | Daily windows never exceed the active ceiling | per-kind validators via `LimitTable` |
//! | INVARIANT-4 | One lower-cased account name per height | `validators/user.rs` chain + in-block checks |
//! | INVARIANT-5 | One score per `(scorer, target)` | `validators/score_content.rs` / `score_comment.rs` |
//! | INVARIANT-6 | Rule changes activate only by height | `domain/checkpoints.rs` schedules |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/ - in-memory repository (reference + test adapter)    │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/outbound.rs - ConsensusRepository trait                  │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/model/       - typed records, canonical hashing         │
//! │  domain/limits.rs    - height-indexed rule parameters           │
//! │  domain/reputation.rs- account mode and score gates             │
//! │  domain/checkpoints.rs - height-activated rule versions         │
//! │  domain/escapes.rs   - historic rule-violation escapes          │
//! │  domain/validators/  - one rule set per transaction kind        │
//! │  service.rs          - dispatch entry points                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The core is a pure, synchronous decision procedure: it holds no mutable
//! state between calls, reads no ambient globals, and never branches on
//! wall-clock time. Height and time are inputs; the injected repository and
//! limit table are immutable snapshots for the duration of one call.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::outbound::{ConsensusRepository, MempoolFilter, RepositoryError, WindowStart};
pub use service::SocialConsensusHelper;
