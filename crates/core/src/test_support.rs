// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test builders and proptest strategies shared across crates.

/// Proptest strategies over the data model.
pub mod strategies {
    use crate::formation::Processes;
    use proptest::prelude::*;

    /// A process type name from a small closed set, so generated maps
    /// collide on keys often enough to exercise merge paths.
    pub fn process_kind() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("web".to_string()),
            Just("worker".to_string()),
            Just("clock".to_string()),
            Just("run".to_string()),
        ]
    }

    /// Process-count maps with 0–4 entries and small counts.
    pub fn processes() -> impl Strategy<Value = Processes> {
        prop::collection::vec((process_kind(), 0usize..5), 0..4)
            .prop_map(|entries| entries.into_iter().collect())
    }
}
