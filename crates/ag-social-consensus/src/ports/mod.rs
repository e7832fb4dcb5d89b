//! Ports for the social consensus subsystem.
//!
//! The core is library-shaped; its only dependency on the outside world is
//! the read-only repository defined here.

pub mod outbound;
