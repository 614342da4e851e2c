//! Election Audit Core - Seeded Election Integrity Simulation
//!
//! Generates a synthetic election in which some ballots have been tampered
//! with, then scores sampling audits against that ground truth:
//! 1. **Generation**: which ballots are compromised, derived from the seed
//! 2. **Auditing**: each test samples ballots without replacement and counts
//!    the compromised ones it finds
//! 3. **Analysis**: compromised ballots shared between tests, and a
//!    confusion matrix per test over the whole election
//!
//! All randomness comes from one explicit [`audit_env::SimRng`] stream owned
//! by a [`Simulation`], so every result is reproducible from its seed.

pub mod config;
pub mod confusion;
pub mod cost;
pub mod election;
pub mod error;
pub mod intersections;
pub mod runner;
pub mod simulation;
pub mod test_spec;

// Re-export key types for convenience
pub use config::{CompromisePolicy, SimulatorConfig, DEFAULT_TOTAL_VOTES};
pub use confusion::{confusion_matrices, ConfusionMatrix};
pub use cost::CostTable;
pub use election::{Election, ElectionGenerator};
pub use error::{ErrorKind, SimError};
pub use intersections::{intersections, IntersectionGroup};
pub use runner::{AuditOutcome, TestRun, TestRunner};
pub use simulation::Simulation;
pub use test_spec::TestSpec;
