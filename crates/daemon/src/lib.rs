// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! herd-daemon: the `herdd` binary
//!
//! Bootstraps a scheduler over an in-memory cluster (standalone mode),
//! owns the pidfile, wires logging, and feeds the leadership flag from
//! signals: SIGUSR1 grants leadership, SIGUSR2 drops it.

pub mod config;
pub mod env;
pub mod lifecycle;

pub use config::{Config, ConfigError};
pub use lifecycle::{run, DaemonError};
