//! Scenario and property tests for the movement core.
//!
//! - `helpers.rs`: navigation doubles and actor factories
//! - `scenarios.rs`: end-to-end walks, emotes and fields
//! - `properties.rs`: proptest invariants over speeds, distances and deltas

pub mod helpers;
