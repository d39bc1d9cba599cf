//! SquareSum solver service client.
//!
//! Blocking reqwest client (no async runtime required) plus the
//! count-job lifecycle controller that owns the poll loop.

mod error;
mod job;
mod solver;

pub use error::ClientError;
pub use job::{CountJobController, CountOptions, JobPhase};
pub use solver::SolverClient;
