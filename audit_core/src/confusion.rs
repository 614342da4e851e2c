//! Per-test classification statistics.
//!
//! Every ballot in the election is classified, not just the sampled ones:
//! a sampled ballot counts as predicted compromised, an unsampled ballot as
//! predicted clean, and ground truth is membership in the compromised set.
//! The four counts therefore always sum to `total_votes`.

use crate::election::Election;
use crate::runner::TestRun;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 2x2 outcome table for one test run over the full election.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfusionMatrix {
    pub label: char,

    /// Sampled and compromised
    pub true_positive: u64,

    /// Sampled and clean
    pub false_positive: u64,

    /// Not sampled and clean
    pub true_negative: u64,

    /// Not sampled but compromised
    pub false_negative: u64,
}

impl ConfusionMatrix {
    /// Classifies every ballot of `election` against one test run.
    pub fn compute(election: &Election, run: &TestRun) -> Self {
        let sampled: HashSet<u64> = run.sampled_indices.iter().copied().collect();
        let sampled_count = sampled.len() as u64;
        let compromised_count = election.compromised_count();

        let true_positive = sampled
            .iter()
            .filter(|&&i| election.is_compromised(i))
            .count() as u64;
        let false_positive = sampled_count - true_positive;
        let false_negative = compromised_count - true_positive;
        let true_negative = election.total_votes - true_positive - false_positive - false_negative;

        Self {
            label: run.label,
            true_positive,
            false_positive,
            true_negative,
            false_negative,
        }
    }

    /// Number of classified ballots.
    pub fn total(&self) -> u64 {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// Fraction of ballots classified correctly.
    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    /// Fraction of sampled ballots that are compromised.
    pub fn precision(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// Fraction of compromised ballots the test sampled (sensitivity).
    pub fn recall(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// Fraction of clean ballots the test left unsampled.
    pub fn specificity(&self) -> Option<f64> {
        ratio(self.true_negative, self.true_negative + self.false_positive)
    }
}

fn ratio(num: u64, den: u64) -> Option<f64> {
    if den == 0 {
        None
    } else {
        Some(num as f64 / den as f64)
    }
}

/// One matrix per test run, in run order.
pub fn confusion_matrices(election: &Election, test_runs: &[TestRun]) -> Vec<ConfusionMatrix> {
    test_runs
        .iter()
        .map(|run| ConfusionMatrix::compute(election, run))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn election(total: u64, compromised: &[u64]) -> Election {
        Election {
            seed: 0,
            total_votes: total,
            compromised_votes: compromised.iter().copied().collect(),
            compromised_percentage: 100.0 * compromised.len() as f64 / total as f64,
            winner_votes: total,
            runner_up_votes: 0,
            other_votes: 0,
        }
    }

    fn run(label: char, indices: &[u64]) -> TestRun {
        TestRun {
            label,
            sample_size: indices.len() as u64,
            sampled_indices: indices.to_vec(),
            compromises_found: 0,
        }
    }

    #[test]
    fn test_full_population_convention() {
        let e = election(10, &[0, 1, 2]);
        let m = ConfusionMatrix::compute(&e, &run('a', &[1, 2, 5, 6]));

        assert_eq!(m.true_positive, 2);
        assert_eq!(m.false_positive, 2);
        assert_eq!(m.false_negative, 1);
        assert_eq!(m.true_negative, 5);
        assert_eq!(m.total(), 10);
    }

    #[test]
    fn test_derived_rates() {
        let e = election(10, &[0, 1, 2]);
        let m = ConfusionMatrix::compute(&e, &run('a', &[1, 2, 5, 6]));

        assert_relative_eq!(m.accuracy().unwrap(), 0.7);
        assert_relative_eq!(m.precision().unwrap(), 0.5);
        assert_relative_eq!(m.recall().unwrap(), 2.0 / 3.0);
        assert_relative_eq!(m.specificity().unwrap(), 5.0 / 7.0);
    }

    #[test]
    fn test_zero_denominators() {
        let clean = election(4, &[]);
        let m = ConfusionMatrix::compute(&clean, &run('a', &[0]));

        assert_eq!(m.recall(), None);
        assert_eq!(m.precision(), Some(0.0));

        let all_bad = election(2, &[0, 1]);
        let m = ConfusionMatrix::compute(&all_bad, &run('b', &[0, 1]));
        assert_eq!(m.specificity(), None);
        assert_eq!(m.true_negative, 0);
    }

    #[test]
    fn test_matrices_follow_run_order() {
        let e = election(10, &[3]);
        let runs = vec![run('c', &[3]), run('a', &[4])];

        let matrices = confusion_matrices(&e, &runs);

        assert_eq!(matrices[0].label, 'c');
        assert_eq!(matrices[0].true_positive, 1);
        assert_eq!(matrices[1].label, 'a');
        assert_eq!(matrices[1].false_negative, 1);
    }

    #[test]
    fn test_serialized_field_names() {
        let e = election(10, &[3]);
        let value = serde_json::to_value(ConfusionMatrix::compute(&e, &run('a', &[3]))).unwrap();

        assert_eq!(value["label"], "a");
        assert_eq!(value["truePositive"], 1);
        assert_eq!(value["falsePositive"], 0);
        assert_eq!(value["trueNegative"], 9);
        assert_eq!(value["falseNegative"], 0);
    }
}
