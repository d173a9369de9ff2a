//! Cross-module tests for instruction execution and replay.
//!
//! - `scenarios.rs`: end-to-end instruction scenarios
//! - `determinism.rs`: identical replays produce identical worlds
//! - `roundtrip.rs`: XML write-then-read is the identity
//! - `bracketing.rs`: modifier-map consistency and failure atomicity
//! - `helpers.rs`: shared world setup

pub(crate) mod helpers;
mod roundtrip;
