//! Shared vocabulary of the netbridge workspace.
//!
//! * **[`network`]**: address-family and socket-type codes, addresses and destinations.
//! * **[`config`]**: the configuration value handed to every socket and TUN handle.
//! * **[`error`]**: the single error type every native operation reports through.
//! * **[`utils`]**: buffer range checks and interface lookups.

pub mod config;
pub mod error;
pub mod network;
pub mod utils;
