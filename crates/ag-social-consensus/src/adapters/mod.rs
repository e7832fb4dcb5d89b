//! Adapters implementing the subsystem's ports.

pub mod memory;
