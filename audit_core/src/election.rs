//! Synthetic election generation.
//!
//! An [`Election`] is the ground truth every audit test is scored against:
//! which ballots were tampered with. It is derived from the seed alone, so
//! two generators fed the same seed and configuration produce identical
//! compromised sets.

use crate::config::{CompromisePolicy, SimulatorConfig};
use crate::error::SimError;
use audit_env::SimRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Other candidates share at most this fraction of the winner's weight.
const OTHER_SHARE_OF_WINNER: f64 = 0.2;

/// A generated election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Election {
    /// Seed the election was generated from
    pub seed: u64,

    /// Number of ballots, indexed `[0, total_votes)`
    pub total_votes: u64,

    /// Indices of tampered ballots
    pub compromised_votes: BTreeSet<u64>,

    /// `100 * |compromised_votes| / total_votes`
    pub compromised_percentage: f64,

    /// Reported tally of the winning candidate
    pub winner_votes: u64,

    /// Reported tally of the runner-up
    pub runner_up_votes: u64,

    /// Ballots for every other candidate
    pub other_votes: u64,
}

impl Election {
    /// Returns true if the ballot at `index` is compromised.
    pub fn is_compromised(&self, index: u64) -> bool {
        self.compromised_votes.contains(&index)
    }

    /// Number of compromised ballots.
    pub fn compromised_count(&self) -> u64 {
        self.compromised_votes.len() as u64
    }

    /// Reported margin between winner and runner-up.
    pub fn margin_of_victory(&self) -> u64 {
        self.winner_votes.saturating_sub(self.runner_up_votes)
    }

    /// True when moving every compromised ballot from winner to runner-up
    /// would overturn the reported result.
    pub fn could_flip(&self) -> bool {
        // Each moved ballot swings the margin by two
        2 * self.compromised_count() >= self.margin_of_victory()
    }
}

/// Reported tallies before compromise selection.
#[derive(Debug, Clone, Copy)]
struct Tallies {
    winner: u64,
    runner_up: u64,
    other: u64,
}

/// Generates elections from a seeded draw stream.
///
/// Draw order is fixed: three unit draws for the tallies, one unit draw for
/// the compromised count, then one word per compromised ballot.
#[derive(Debug, Clone)]
pub struct ElectionGenerator {
    total_votes: u64,
    policy: CompromisePolicy,
}

impl ElectionGenerator {
    /// Creates a generator for a population size and policy.
    pub fn new(total_votes: u64, policy: CompromisePolicy) -> Result<Self, SimError> {
        if total_votes == 0 {
            return Err(SimError::invalid("totalVotes must be positive"));
        }
        policy.validate()?;
        Ok(Self { total_votes, policy })
    }

    /// Creates a generator from the simulator configuration.
    pub fn from_config(config: &SimulatorConfig) -> Result<Self, SimError> {
        Self::new(config.total_votes, config.compromise_policy)
    }

    /// Generates an election, advancing `rng`.
    pub fn generate(&self, rng: &mut SimRng) -> Result<Election, SimError> {
        let tallies = self.draw_tallies(rng);
        let count = self.draw_compromised_count(rng, &tallies);
        self.assemble(rng, tallies, count)
    }

    /// Generates an election with exactly `count` compromised ballots.
    ///
    /// Consumes the same tally and compromise draws as [`generate`] so the
    /// sampling that follows stays aligned with policy-driven elections.
    ///
    /// [`generate`]: ElectionGenerator::generate
    pub fn generate_with_count(&self, rng: &mut SimRng, count: u64) -> Result<Election, SimError> {
        if count > self.total_votes {
            return Err(SimError::invalid(format!(
                "cannot compromise {} ballots in an election of {}",
                count, self.total_votes
            )));
        }
        let tallies = self.draw_tallies(rng);
        // Compromise draw is unused but keeps the sampling draws aligned
        let _ = rng.next_unit();
        self.assemble(rng, tallies, count)
    }

    fn draw_tallies(&self, rng: &mut SimRng) -> Tallies {
        let winner_weight = rng.next_unit();
        let runner_up_weight = rng.next_unit() * winner_weight;
        let other_weight = rng.next_unit() * OTHER_SHARE_OF_WINNER * winner_weight;

        let sum = winner_weight + runner_up_weight + other_weight;
        if sum <= 0.0 {
            return Tallies {
                winner: self.total_votes,
                runner_up: 0,
                other: 0,
            };
        }

        let total = self.total_votes as f64;
        let winner = ((total * winner_weight / sum).floor() as u64).min(self.total_votes);
        let runner_up = ((total * runner_up_weight / sum).floor() as u64).min(winner);
        let other = self.total_votes - winner - runner_up;

        Tallies {
            winner,
            runner_up,
            other,
        }
    }

    fn draw_compromised_count(&self, rng: &mut SimRng, tallies: &Tallies) -> u64 {
        let u = rng.next_unit();
        let count = match self.policy {
            CompromisePolicy::MarginOfVictory => {
                let margin = (tallies.winner - tallies.runner_up) as f64;
                (u * margin).floor() as u64
            }
            CompromisePolicy::TargetPercentage { percent, jitter } => {
                let pct = (percent + (2.0 * u - 1.0) * jitter).clamp(0.0, 100.0);
                (self.total_votes as f64 * pct / 100.0).floor() as u64
            }
        };
        count.min(self.total_votes)
    }

    fn assemble(&self, rng: &mut SimRng, tallies: Tallies, count: u64) -> Result<Election, SimError> {
        let compromised_votes: BTreeSet<u64> = rng
            .sample_without_replacement(self.total_votes, count)?
            .into_iter()
            .collect();
        let compromised_percentage = 100.0 * count as f64 / self.total_votes as f64;

        debug!(
            "Generated election seed={} total={} compromised={} ({:.2}%)",
            rng.seed(),
            self.total_votes,
            count,
            compromised_percentage
        );

        Ok(Election {
            seed: rng.seed(),
            total_votes: self.total_votes,
            compromised_votes,
            compromised_percentage,
            winner_votes: tallies.winner,
            runner_up_votes: tallies.runner_up,
            other_votes: tallies.other,
        })
    }
}
