//! A seeded simulation session.

use crate::config::SimulatorConfig;
use crate::confusion::{confusion_matrices, ConfusionMatrix};
use crate::election::{Election, ElectionGenerator};
use crate::error::SimError;
use crate::intersections::{intersections, IntersectionGroup};
use crate::runner::{AuditOutcome, TestRun, TestRunner};
use crate::test_spec::TestSpec;
use audit_env::SimRng;
use tracing::info;

/// Owns one draw stream and everything derived from it.
///
/// The election is generated on construction; each call to [`run_tests`]
/// continues the same stream, so the full sequence of calls determines the
/// result. Sessions share no state and can run on separate threads.
///
/// [`run_tests`]: Simulation::run_tests
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulatorConfig,
    rng: SimRng,
    election: Election,
    specs: Vec<TestSpec>,
    test_runs: Vec<TestRun>,
}

impl Simulation {
    /// Seeds a new session and generates its election.
    pub fn new(seed: u64, config: SimulatorConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut rng = SimRng::new(seed, config.rng_algorithm);
        let election = ElectionGenerator::from_config(&config)?.generate(&mut rng)?;

        info!(
            "Simulation seed={} rng={} (contract v{}) total_votes={} compromised={}",
            seed,
            rng.algorithm(),
            rng.algorithm().contract_version(),
            election.total_votes,
            election.compromised_count()
        );

        Ok(Self {
            config,
            rng,
            election,
            specs: Vec::new(),
            test_runs: Vec::new(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn election(&self) -> &Election {
        &self.election
    }

    /// Every spec run so far, in order.
    pub fn specs(&self) -> &[TestSpec] {
        &self.specs
    }

    /// Every test run so far, in order.
    pub fn test_runs(&self) -> &[TestRun] {
        &self.test_runs
    }

    /// Runs a batch of tests and returns that batch's outcome.
    ///
    /// On error the session is unchanged.
    pub fn run_tests(&mut self, specs: &[TestSpec]) -> Result<AuditOutcome, SimError> {
        let outcome = TestRunner::new(&self.election).run(specs, &mut self.rng)?;
        self.specs.extend_from_slice(specs);
        self.test_runs.extend(outcome.test_runs.iter().cloned());
        Ok(outcome)
    }

    /// Parses a compact test string and runs it.
    pub fn run_tests_str(&mut self, tests: &str) -> Result<AuditOutcome, SimError> {
        let specs = TestSpec::parse_list(tests)?;
        self.run_tests(&specs)
    }

    /// Coverage across every run so far.
    pub fn total_compromises_seen(&self) -> u64 {
        self.test_runs.iter().map(|r| r.compromises_found).sum()
    }

    /// Intersection groups across every run so far.
    pub fn intersections(&self) -> Vec<IntersectionGroup> {
        intersections(&self.election, &self.test_runs, self.config.max_lattice_labels)
    }

    /// One confusion matrix per run so far.
    pub fn confusion_matrices(&self) -> Vec<ConfusionMatrix> {
        confusion_matrices(&self.election, &self.test_runs)
    }

    /// Cost of every spec run so far.
    pub fn total_cost(&self) -> f64 {
        self.config.costs.total(&self.specs)
    }
}
