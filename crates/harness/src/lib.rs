//! Latency harness for multi-phase network operations
//!
//! This crate runs a number of sequential trials of an operation that is first submitted and then
//! confirmed on-chain, measures each phase, aggregates the results per target and renders them as
//! text tables and CSV files.

mod aggregate;
mod clock;
mod harness;
pub mod report;
mod trial;

pub use aggregate::{AggregateResult, Aggregates};
pub use clock::{Clock, SystemClock};
pub use harness::{run_targets, Harness, HarnessConfig, Inclusion, Operation, PreparationTiming};
pub use trial::{Trial, TrialError, TrialErrorKind, TrialRecord, TrialSet};
