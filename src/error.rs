//! Error taxonomy for the training core.
//!
//! Configuration problems are rejected before any rollout begins; non-finite
//! training statistics abort the run rather than risk diverging the policy on
//! corrupted data. Checkpoint I/O failures are *not* represented here — they
//! are recoverable and only logged (see [`crate::checkpoint`]).

use std::fmt;

/// Fatal errors raised by the policy-gradient core.
#[derive(Debug)]
pub enum PgError {
    /// Invalid configuration, detected at setup.
    Config(String),
    /// A non-finite value appeared in the training signal.
    NonFinite {
        /// Which quantity went non-finite (e.g. "q-values", "policy loss").
        what: &'static str,
        /// Training iteration the value was produced in.
        iteration: usize,
    },
}

impl fmt::Display for PgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PgError::Config(msg) => write!(f, "invalid configuration: {}", msg),
            PgError::NonFinite { what, iteration } => {
                write!(f, "non-finite {} at iteration {}", what, iteration)
            }
        }
    }
}

impl std::error::Error for PgError {}
