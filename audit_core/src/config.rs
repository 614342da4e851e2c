//! Simulator configuration.

use crate::cost::CostTable;
use crate::error::SimError;
use audit_env::RngAlgorithm;
use serde::{Deserialize, Serialize};

/// Population size used when the caller does not choose one.
pub const DEFAULT_TOTAL_VOTES: u64 = 10_000;

/// Distinct labels above which intersections are restricted to pairs.
pub const DEFAULT_MAX_LATTICE_LABELS: usize = 8;

/// How many ballots an election marks as compromised.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "policy")]
pub enum CompromisePolicy {
    /// Uniform in `[0, winner - runnerUp)`: even odds of flipping the result
    #[default]
    MarginOfVictory,

    /// A target share of the population, jittered by up to `jitter` points
    TargetPercentage { percent: f64, jitter: f64 },
}

impl CompromisePolicy {
    /// Checks that the policy parameters are usable.
    pub fn validate(&self) -> Result<(), SimError> {
        match *self {
            CompromisePolicy::MarginOfVictory => Ok(()),
            CompromisePolicy::TargetPercentage { percent, jitter } => {
                if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
                    return Err(SimError::invalid(format!(
                        "target percentage must be within [0, 100], got {}",
                        percent
                    )));
                }
                if !jitter.is_finite() || jitter < 0.0 {
                    return Err(SimError::invalid(format!(
                        "jitter must be a non-negative number, got {}",
                        jitter
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Configuration shared by every simulator command.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Ballots in each generated election
    pub total_votes: u64,

    /// Frozen generator backing the draw stream
    pub rng_algorithm: RngAlgorithm,

    /// Compromised-count policy for election generation
    pub compromise_policy: CompromisePolicy,

    /// Full subset lattice up to this many distinct labels, pairs beyond
    pub max_lattice_labels: usize,

    /// Per-label unit costs for audit budgeting
    pub costs: CostTable,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            total_votes: DEFAULT_TOTAL_VOTES,
            rng_algorithm: RngAlgorithm::default(),
            compromise_policy: CompromisePolicy::default(),
            max_lattice_labels: DEFAULT_MAX_LATTICE_LABELS,
            costs: CostTable::default(),
        }
    }
}

impl SimulatorConfig {
    /// Sets the election population size.
    pub fn with_total_votes(mut self, total_votes: u64) -> Self {
        self.total_votes = total_votes;
        self
    }

    /// Sets the generator algorithm.
    pub fn with_rng_algorithm(mut self, algorithm: RngAlgorithm) -> Self {
        self.rng_algorithm = algorithm;
        self
    }

    /// Sets the compromise policy.
    pub fn with_compromise_policy(mut self, policy: CompromisePolicy) -> Self {
        self.compromise_policy = policy;
        self
    }

    /// Sets the lattice size limit.
    pub fn with_max_lattice_labels(mut self, max: usize) -> Self {
        self.max_lattice_labels = max;
        self
    }

    /// Sets the cost table.
    pub fn with_costs(mut self, costs: CostTable) -> Self {
        self.costs = costs;
        self
    }

    /// Rejects configurations no election can be generated from.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.total_votes == 0 {
            return Err(SimError::invalid("totalVotes must be positive"));
        }
        self.compromise_policy.validate()
    }
}
