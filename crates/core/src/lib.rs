// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lattice-core: shared primitives for the lattice runtime
//!
//! This crate provides:
//! - `Clock` abstraction so cache expiry can be driven by a fake clock in tests
//! - `IdGen` abstraction for subscription and request identifiers
//! - `RunningMean` for the incremental averages both components report

pub mod clock;
pub mod id;
pub mod stats;

pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use stats::RunningMean;
