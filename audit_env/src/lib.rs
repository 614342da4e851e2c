//! Election Audit Environment Layer
//!
//! Every random decision the simulator makes flows through one explicit
//! [`SimRng`] stream derived from a single 64-bit seed. Nothing in the
//! workspace touches a process-wide generator, so any result can be
//! reproduced from its seed number alone.
//!
//! # Frozen Algorithms
//!
//! The generator algorithm is part of the external contract: changing it
//! changes every recorded election. Each [`RngAlgorithm`] therefore carries a
//! contract version, and the draw primitives built on top of it
//! (`next_unit`, `below`, `sample_without_replacement`) consume a fixed,
//! documented number of 32-bit words.
//!
//! # Example
//!
//! ```
//! use audit_env::{RngAlgorithm, SimRng};
//!
//! let mut rng = SimRng::new(12345, RngAlgorithm::Mt19937);
//! let sample = rng.sample_without_replacement(10_000, 50).unwrap();
//! assert_eq!(sample.len(), 50);
//! ```

mod error;
mod mt19937;
mod rng;

pub use error::EnvError;
pub use mt19937::Mt19937;
pub use rng::{RngAlgorithm, SimRng};
