//! Election Audit Simulator CLI
//!
//! Reads one JSON request from stdin, or builds it from arguments, and
//! prints the JSON response.

use audit_core::config::DEFAULT_MAX_LATTICE_LABELS;
use audit_core::{CompromisePolicy, SimulatorConfig, DEFAULT_TOTAL_VOTES};
use audit_env::RngAlgorithm;
use audit_sim::{Dispatcher, ErrorResponse, HarnessError, Request, Response, SimCommand};
use clap::{CommandFactory, Parser};
use std::io::{IsTerminal, Read};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Seeded election integrity simulator
#[derive(Parser, Debug)]
#[command(name = "election-sim", version)]
#[command(about = "Generate seeded elections and score sampling audits against them", long_about = None)]
#[command(after_help = "Examples:\n  \
    election-sim election --seed 12345\n  \
    election-sim run-tests --seed 12345 --tests a500b100\n  \
    election-sim full-simulation --seed 12345 --tests a500b100c50\n  \
    echo '{\"command\": \"election\", \"seed\": 12345}' | election-sim")]
struct Args {
    /// Command to run; reads a JSON request from stdin when omitted
    #[arg(value_enum)]
    command: Option<SimCommand>,

    /// Random seed (default: random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Test configuration, e.g. "a500b100c50"
    #[arg(short, long)]
    tests: Option<String>,

    /// Ballots in the generated election
    #[arg(long, default_value_t = DEFAULT_TOTAL_VOTES)]
    total_votes: u64,

    /// Generator algorithm (mt19937, chacha8)
    #[arg(long, default_value = "mt19937")]
    rng: RngAlgorithm,

    /// Distinct test labels above which only pairwise intersections are computed
    #[arg(long, default_value_t = DEFAULT_MAX_LATTICE_LABELS)]
    max_lattice_labels: usize,

    /// Compromise a fixed percentage of ballots instead of using the margin of victory
    #[arg(long)]
    target_percent: Option<f64>,

    /// Jitter (percentage points) applied to --target-percent
    #[arg(long, default_value_t = 0.0)]
    jitter: f64,

    /// Verbose logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,
}

impl Args {
    fn config(&self) -> SimulatorConfig {
        let policy = match self.target_percent {
            Some(percent) => CompromisePolicy::TargetPercentage {
                percent,
                jitter: self.jitter,
            },
            None => CompromisePolicy::MarginOfVictory,
        };

        SimulatorConfig::default()
            .with_total_votes(self.total_votes)
            .with_rng_algorithm(self.rng)
            .with_max_lattice_labels(self.max_lattice_labels)
            .with_compromise_policy(policy)
    }
}

fn read_request(args: &Args) -> Result<Option<Request>, HarnessError> {
    if let Some(command) = args.command {
        return Ok(Some(Request {
            command,
            seed: args.seed,
            tests: args.tests.clone(),
        }));
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut input = String::new();
    stdin.lock().read_to_string(&mut input)?;
    Ok(Some(serde_json::from_str(input.trim())?))
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String, HarnessError> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

fn run(args: &Args) -> Result<Option<Response>, HarnessError> {
    let Some(request) = read_request(args)? else {
        return Ok(None);
    };
    Dispatcher::new(args.config()).handle(&request).map(Some)
}

fn main() {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for the response
    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let outcome = run(&args).and_then(|response| match response {
        Some(response) => to_json(&response, args.compact).map(Some),
        None => Ok(None),
    });

    match outcome {
        Ok(Some(json)) => {
            println!("{}", json);
            info!("Response written");
        }
        Ok(None) => {
            let _ = Args::command().print_help();
        }
        Err(err) => {
            error!("{}", err);
            let body = ErrorResponse::new(err.to_string(), err.kind());
            match to_json(&body, args.compact) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", err),
            }
            std::process::exit(1);
        }
    }
}
