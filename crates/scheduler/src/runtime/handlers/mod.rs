// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue handlers, one per reconciliation operation.
//!
//! Every handler runs inside the actor's turn, mutates state directly,
//! and finishes by publishing its event (with any error attached).

mod formation_change;
mod job_request;
mod rectify;
mod sync_formations;
mod sync_jobs;
