// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory collaborators.
//!
//! These back the daemon's standalone mode and every test harness.
//! State lives behind `parking_lot` locks in cheaply clone-able handles;
//! mutating calls are recorded so tests can assert on them, and each
//! collaborator can be flipped offline to exercise error paths.

mod cluster;
mod controller;
mod volume;

pub use cluster::{MemCluster, MemHost};
pub use controller::MemController;
pub use volume::MemVolumes;
