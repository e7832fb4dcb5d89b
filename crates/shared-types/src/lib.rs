//! # Shared Types Crate
//!
//! This crate contains the entity and envelope types shared between the
//! monetary layer and the social consensus subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type crossing the subsystem boundary
//!   is defined here.
//! - **Verified Envelope**: the social core never sees raw wire bytes; it
//!   reads a [`TxEnvelope`] whose monetary validity (inputs, signatures,
//!   fees) has already been established by the UTXO layer.
//! - **No Ambient State**: these are plain data types; nothing in this crate
//!   touches the chain, the clock, or the network.

pub mod entities;
pub mod envelope;
pub mod errors;

pub use entities::*;
pub use envelope::{OpReturn, TxEnvelope, TxInput, TxOutput};
pub use errors::*;
