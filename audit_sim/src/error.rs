//! Error types for the harness boundary.

use audit_core::SimError;
use thiserror::Error;

/// Errors that can occur while serving one request.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A test-consuming command arrived without a test string
    #[error("Tests configuration required for {command} command")]
    MissingTests { command: String },

    /// Request body was not a valid request object
    #[error("Error parsing JSON input: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    /// Reading the request or writing the response failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The simulation itself rejected the request
    #[error(transparent)]
    Simulation(#[from] SimError),
}

impl HarnessError {
    /// Creates a missing-tests error for a command.
    pub fn missing_tests(command: impl std::fmt::Display) -> Self {
        Self::MissingTests {
            command: command.to_string(),
        }
    }

    /// Stable classification name reported in error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            HarnessError::MissingTests { .. } => "MissingTests",
            HarnessError::InvalidRequest(_) => "InvalidRequest",
            HarnessError::Io(_) => "Io",
            HarnessError::Simulation(err) => err.kind().name(),
        }
    }
}
