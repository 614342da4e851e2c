//! Audit test execution.

use crate::election::Election;
use crate::error::SimError;
use crate::test_spec::TestSpec;
use audit_env::SimRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of sampling one audit test against an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    pub label: char,
    pub sample_size: u64,

    /// Ballots inspected, in draw order
    pub sampled_indices: Vec<u64>,

    /// Sampled ballots that are compromised
    pub compromises_found: u64,
}

/// Test runs for one request plus their combined coverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditOutcome {
    pub test_runs: Vec<TestRun>,

    /// Sum of `compromises_found`; a ballot seen by two tests counts twice
    pub total_compromises_seen: u64,
}

impl AuditOutcome {
    pub fn new(test_runs: Vec<TestRun>) -> Self {
        let total_compromises_seen = test_runs.iter().map(|r| r.compromises_found).sum();
        Self {
            test_runs,
            total_compromises_seen,
        }
    }
}

/// Runs audit tests against a fixed election.
pub struct TestRunner<'a> {
    election: &'a Election,
}

impl<'a> TestRunner<'a> {
    pub fn new(election: &'a Election) -> Self {
        Self { election }
    }

    /// Runs every spec in order, continuing the caller's draw stream.
    ///
    /// All specs are checked against the population before the first draw,
    /// so a failure leaves `rng` untouched.
    pub fn run(&self, specs: &[TestSpec], rng: &mut SimRng) -> Result<AuditOutcome, SimError> {
        let total_votes = self.election.total_votes;
        if let Some(spec) = specs.iter().find(|s| s.sample_size > total_votes) {
            return Err(SimError::SampleSizeExceedsPopulation {
                label: spec.label,
                sample_size: spec.sample_size,
                total_votes,
            });
        }

        let mut runs = Vec::with_capacity(specs.len());
        for spec in specs {
            runs.push(self.run_one(spec, rng)?);
        }

        Ok(AuditOutcome::new(runs))
    }

    fn run_one(&self, spec: &TestSpec, rng: &mut SimRng) -> Result<TestRun, SimError> {
        let sampled_indices =
            rng.sample_without_replacement(self.election.total_votes, spec.sample_size)?;
        let compromises_found = sampled_indices
            .iter()
            .filter(|&&i| self.election.is_compromised(i))
            .count() as u64;

        debug!(
            "  test {} sampled {} ballots, {} compromised",
            spec.label, spec.sample_size, compromises_found
        );

        Ok(TestRun {
            label: spec.label,
            sample_size: spec.sample_size,
            sampled_indices,
            compromises_found,
        })
    }
}
