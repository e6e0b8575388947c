//! Behavioral specifications for the streambed workspace.
//!
//! These tests run whole producer/consumer jobs against the in-process
//! loopback broker and verify end-to-end behavior.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/round_trip.rs"]
mod round_trip;

#[path = "specs/lifecycle.rs"]
mod lifecycle;
