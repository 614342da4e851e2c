//! Error types for the simulation core.

use audit_env::EnvError;
use serde::Serialize;
use thiserror::Error;

/// Failure classification reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    InvalidParameter,
    MalformedTestSpec,
    SampleSizeExceedsPopulation,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::InvalidParameter => "InvalidParameter",
            ErrorKind::MalformedTestSpec => "MalformedTestSpec",
            ErrorKind::SampleSizeExceedsPopulation => "SampleSizeExceedsPopulation",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Errors produced by core operations.
///
/// A failing operation never yields a partial election or test run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Bad seed, population size or generation policy
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Test definition string could not be parsed
    #[error("Malformed test spec {input:?}: {reason}")]
    MalformedTestSpec { input: String, reason: String },

    /// A test asked for more ballots than the election holds
    #[error("Test '{label}' requests {sample_size} ballots but the election only has {total_votes}")]
    SampleSizeExceedsPopulation {
        label: char,
        sample_size: u64,
        total_votes: u64,
    },
}

impl SimError {
    /// Creates an invalid-parameter error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Creates a malformed-spec error.
    pub fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTestSpec {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the stable classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            SimError::MalformedTestSpec { .. } => ErrorKind::MalformedTestSpec,
            SimError::SampleSizeExceedsPopulation { .. } => ErrorKind::SampleSizeExceedsPopulation,
        }
    }
}

impl From<EnvError> for SimError {
    fn from(err: EnvError) -> Self {
        SimError::InvalidParameter(err.to_string())
    }
}
