//! Overlap analysis across audit test samples.
//!
//! For every combination of two or more test labels, reports the compromised
//! ballots that all of those tests sampled.
//!
//! # Policy
//!
//! - Runs sharing a label are merged (union of their samples) first, so each
//!   key appears once.
//! - Keys are the sorted labels joined by `∩`, e.g. `a∩b∩c`.
//! - Groups are ordered by size, then lexicographically by label.
//! - Groups with no shared compromised ballot are omitted.
//! - Above `max_lattice_labels` distinct labels only pairs are computed,
//!   since the full lattice grows as `2^k`.

use crate::election::Election;
use crate::runner::TestRun;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Separator placed between labels in a group key.
pub const KEY_SEPARATOR: char = '∩';

/// Compromised ballots shared by a combination of tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntersectionGroup {
    pub key: String,

    /// Shared compromised ballot indices, ascending
    pub compromises: BTreeSet<u64>,

    /// Ballots sampled by every test in the group
    pub tested: u64,

    #[serde(skip)]
    pub labels: Vec<char>,
}

impl IntersectionGroup {
    /// Builds the canonical key for a set of labels.
    pub fn key_for(labels: &[char]) -> String {
        let mut sorted = labels.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut key = String::new();
        for (i, label) in sorted.iter().enumerate() {
            if i > 0 {
                key.push(KEY_SEPARATOR);
            }
            key.push(*label);
        }
        key
    }
}

/// Computes intersection groups for a set of test runs.
pub fn intersections(
    election: &Election,
    test_runs: &[TestRun],
    max_lattice_labels: usize,
) -> Vec<IntersectionGroup> {
    let mut samples: BTreeMap<char, BTreeSet<u64>> = BTreeMap::new();
    for run in test_runs {
        samples
            .entry(run.label)
            .or_default()
            .extend(run.sampled_indices.iter().copied());
    }

    let labels: Vec<char> = samples.keys().copied().collect();
    let sets: Vec<&BTreeSet<u64>> = samples.values().collect();

    let largest = if labels.len() > max_lattice_labels {
        warn!(
            "{} distinct test labels exceeds lattice limit {}, computing pairs only",
            labels.len(),
            max_lattice_labels
        );
        2
    } else {
        labels.len()
    };

    let mut groups = Vec::new();
    for size in 2..=largest {
        for combo in combinations(labels.len(), size) {
            let shared = shared_indices(combo.iter().map(|&i| sets[i]));
            let compromises: BTreeSet<u64> = shared
                .iter()
                .copied()
                .filter(|&i| election.is_compromised(i))
                .collect();

            if compromises.is_empty() {
                continue;
            }

            let group_labels: Vec<char> = combo.iter().map(|&i| labels[i]).collect();
            groups.push(IntersectionGroup {
                key: IntersectionGroup::key_for(&group_labels),
                compromises,
                tested: shared.len() as u64,
                labels: group_labels,
            });
        }
    }

    debug!("Computed {} non-empty intersection groups", groups.len());
    groups
}

/// Values present in every set.
fn shared_indices<'a>(mut sets: impl Iterator<Item = &'a BTreeSet<u64>>) -> BTreeSet<u64> {
    let Some(first) = sets.next() else {
        return BTreeSet::new();
    };
    let mut shared = first.clone();
    for set in sets {
        shared.retain(|i| set.contains(i));
        if shared.is_empty() {
            break;
        }
    }
    shared
}

/// All `r`-element index combinations of `0..n`, in lexicographic order.
fn combinations(n: usize, r: usize) -> Vec<Vec<usize>> {
    if r == 0 || r > n {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut combo: Vec<usize> = (0..r).collect();
    loop {
        out.push(combo.clone());

        // Rightmost position that can still advance
        let mut i = r;
        while i > 0 && combo[i - 1] == n - r + (i - 1) {
            i -= 1;
        }
        if i == 0 {
            return out;
        }
        combo[i - 1] += 1;
        for j in i..r {
            combo[j] = combo[j - 1] + 1;
        }
    }
}
