//! Election Audit Simulator Harness
//!
//! A thin request/response layer over [`audit_core`]: one JSON request in,
//! one JSON response out. The binary reads the request from stdin (or builds
//! it from CLI arguments), hands it to a [`Dispatcher`] and prints the
//! command-specific response.
//!
//! # Protocol
//!
//! ```text
//! {"command": "run-tests", "seed": 12345, "tests": "a500b100c50"}
//!   -> {"seed": 12345, "tests": "a500b100c50", "totalCompromisesSeen": .., "testRuns": [..], ..}
//! ```
//!
//! Failures are written to stderr as `{"success": false, "error": .., "kind": ..}`
//! with exit code 1.

mod dispatch;
mod error;
pub mod protocol;

pub use dispatch::{random_seed, Dispatcher};
pub use error::HarnessError;
pub use protocol::{ErrorResponse, Request, Response, SimCommand};
