// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Formations: declared process counts per (app, release) pair.

use crate::records::{App, AppId, Artifact, Release, ReleaseId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identity of a formation: one (app, release) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormationKey {
    pub app_id: AppId,
    pub release_id: ReleaseId,
}

impl FormationKey {
    pub fn new(app_id: AppId, release_id: ReleaseId) -> Self {
        Self { app_id, release_id }
    }
}

impl std::fmt::Display for FormationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.app_id, self.release_id)
    }
}

/// Declared (or observed) process counts per type name.
pub type Processes = IndexMap<String, usize>;

/// Per-type signed scaling deltas produced by [`Formation::update`].
pub type ProcessDiff = IndexMap<String, i64>;

/// Compare process counts, treating missing and zero entries as equal.
pub fn counts_match(a: &Processes, b: &Processes) -> bool {
    let covered = |from: &Processes, to: &Processes| {
        from.iter()
            .filter(|(_, &n)| n > 0)
            .all(|(kind, &n)| to.get(kind).copied().unwrap_or(0) == n)
    };
    covered(a, b) && covered(b, a)
}

/// The declared process counts for one (app, release) pair, with the
/// app, release, and artifact descriptors resolved.
///
/// Never deleted: a formation scaled to all-zero stays in [`Formations`]
/// so later scale-ups reuse the same key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub app: App,
    pub release: Release,
    pub artifact: Artifact,
    pub processes: Processes,
}

impl Formation {
    pub fn new(app: App, release: Release, artifact: Artifact, processes: Processes) -> Self {
        Self { app, release, artifact, processes }
    }

    pub fn key(&self) -> FormationKey {
        FormationKey::new(self.app.id.clone(), self.release.id.clone())
    }

    /// Replace the declared counts with `next`, returning the per-type
    /// signed delta. Types absent from either side count as zero; zero
    /// deltas are omitted.
    pub fn update(&mut self, next: Processes) -> ProcessDiff {
        let mut diff = ProcessDiff::new();
        for (kind, &count) in &next {
            let previous = self.processes.get(kind).copied().unwrap_or(0);
            let delta = count as i64 - previous as i64;
            if delta != 0 {
                diff.insert(kind.clone(), delta);
            }
        }
        for (kind, &previous) in &self.processes {
            if previous > 0 && !next.contains_key(kind) {
                diff.insert(kind.clone(), -(previous as i64));
            }
        }
        self.processes = next;
        diff
    }
}

/// All formations the scheduler knows, keyed by (app, release).
///
/// Owned exclusively by the scheduler actor; at most one entry per key.
#[derive(Debug, Clone, Default)]
pub struct Formations {
    inner: IndexMap<FormationKey, Formation>,
}

impl Formations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &FormationKey) -> Option<&Formation> {
        self.inner.get(key)
    }

    pub fn get_mut(&mut self, key: &FormationKey) -> Option<&mut Formation> {
        self.inner.get_mut(key)
    }

    /// Insert a formation, replacing any existing entry for its key.
    pub fn insert(&mut self, formation: Formation) -> &mut Formation {
        match self.inner.entry(formation.key()) {
            indexmap::map::Entry::Occupied(mut entry) => {
                entry.insert(formation);
                entry.into_mut()
            }
            indexmap::map::Entry::Vacant(entry) => entry.insert(formation),
        }
    }

    pub fn contains_key(&self, key: &FormationKey) -> bool {
        self.inner.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FormationKey, &Formation)> {
        self.inner.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&FormationKey, &mut Formation)> {
        self.inner.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FormationKey> {
        self.inner.keys()
    }
}

/// A formation with app, release, and artifact fully resolved: the form
/// used for new-formation creation and formation-change requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandedFormation {
    pub app: App,
    pub release: Release,
    pub artifact: Artifact,
    pub processes: Processes,
}

impl ExpandedFormation {
    /// Carry an existing formation's descriptors with new process counts.
    pub fn from_formation(formation: &Formation, processes: Processes) -> Self {
        Self {
            app: formation.app.clone(),
            release: formation.release.clone(),
            artifact: formation.artifact.clone(),
            processes,
        }
    }

    pub fn key(&self) -> FormationKey {
        FormationKey::new(self.app.id.clone(), self.release.id.clone())
    }

    pub fn into_formation(self) -> Formation {
        Formation::new(self.app, self.release, self.artifact, self.processes)
    }
}

#[cfg(test)]
#[path = "formation_tests.rs"]
mod tests;
