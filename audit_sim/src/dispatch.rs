//! Routes requests to the simulation core.

use crate::error::HarnessError;
use crate::protocol::{
    ConfusionMatricesResponse, ElectionResponse, FullSimulationResponse, IntersectionsResponse,
    Request, Response, RunTestsResponse, SimCommand,
};
use audit_core::{Simulation, SimulatorConfig};
use rand::Rng;
use tracing::{debug, info};

/// Upper bound (exclusive) for seeds chosen on the caller's behalf.
const RANDOM_SEED_LIMIT: u64 = 1 << 20;

/// Picks a seed for requests that do not carry one.
pub fn random_seed() -> u64 {
    rand::thread_rng().gen_range(0..RANDOM_SEED_LIMIT)
}

/// Serves requests against a fixed configuration.
///
/// Each request builds its own [`Simulation`], so requests never share
/// draw-stream state.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: SimulatorConfig,
}

impl Dispatcher {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Handles one request.
    pub fn handle(&self, request: &Request) -> Result<Response, HarnessError> {
        let seed = request.seed.unwrap_or_else(|| {
            let seed = random_seed();
            debug!("No seed supplied, using {}", seed);
            seed
        });

        info!("Handling {} (seed={})", request.command, seed);

        let tests = match request.tests.as_deref() {
            Some(tests) if !tests.is_empty() => tests.to_string(),
            _ if request.command.requires_tests() => {
                return Err(HarnessError::missing_tests(request.command));
            }
            _ => String::new(),
        };

        let mut sim = Simulation::new(seed, self.config.clone())?;
        if request.command.requires_tests() {
            sim.run_tests_str(&tests)?;
        }

        let response = match request.command {
            SimCommand::Election => Response::Election(ElectionResponse {
                seed,
                election: sim.election().clone(),
            }),
            SimCommand::RunTests => Response::RunTests(RunTestsResponse {
                seed,
                tests,
                total_compromises_seen: sim.total_compromises_seen(),
                test_runs: sim.test_runs().to_vec(),
                total_cost: sim.total_cost(),
            }),
            SimCommand::Intersections => Response::Intersections(IntersectionsResponse {
                seed,
                tests,
                intersections: sim.intersections(),
            }),
            SimCommand::ConfusionMatrices => {
                Response::ConfusionMatrices(ConfusionMatricesResponse {
                    seed,
                    tests,
                    confusion_matrices: sim.confusion_matrices(),
                })
            }
            SimCommand::FullSimulation => Response::FullSimulation(FullSimulationResponse {
                seed,
                tests,
                election: sim.election().clone(),
                test_runs: sim.test_runs().to_vec(),
                total_compromises_seen: sim.total_compromises_seen(),
                intersections: sim.intersections(),
                confusion_matrices: sim.confusion_matrices(),
                total_cost: sim.total_cost(),
            }),
        };

        Ok(response)
    }
}
