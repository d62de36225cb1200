//! Feed content and voting engine for agora.
//!
//! Services over the single feed collection: content lifecycle, per-user
//! reaction toggling, single-choice poll ballots, multi-choice survey
//! ballots, and the monotonic view counter. Every mutation goes through the
//! store's conditional-write protocol, so concurrent writers on one item
//! serialize instead of overwriting each other's tallies.

pub mod services;

pub use services::*;
