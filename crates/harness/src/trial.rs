use std::fmt;
use thiserror::Error;

/// Phase of a trial in which an error occurred
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrialErrorKind {
    /// Building or signing the operation failed (before the trial clock started)
    Preparation,
    /// The submission collaborator rejected the operation
    Submission,
    /// Waiting for inclusion or fetching the block metadata failed
    Confirmation,
}

impl fmt::Display for TrialErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialErrorKind::Preparation => write!(f, "preparation"),
            TrialErrorKind::Submission => write!(f, "submission"),
            TrialErrorKind::Confirmation => write!(f, "confirmation"),
        }
    }
}

/// Error recorded for a failed trial
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind} failed: {message}")]
pub struct TrialError {
    pub kind: TrialErrorKind,
    pub message: String,
}

impl TrialError {
    pub fn new(kind: TrialErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// Captures the full cause chain of a report as the error message
    pub fn from_report(kind: TrialErrorKind, err: &eyre::Report) -> Self {
        let message = err.chain().map(|cause| cause.to_string()).collect::<Vec<_>>().join(": ");
        Self { kind, message }
    }
}

/// Measurements of a successful trial
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialRecord<H, C> {
    /// Handle returned by the submission (e.g. user operation hash)
    pub id: H,
    /// Time between issuing the submission and its acknowledgment
    pub submission_latency_ms: i64,
    /// Time between the trial start and the inclusion timestamp
    pub total_latency_ms: i64,
    /// Timestamp of the including block (external clock)
    pub inclusion_timestamp_ms: i64,
    /// Confirmation handle (e.g. transaction hash)
    pub confirmation: C,
}

impl<H, C> TrialRecord<H, C> {
    /// Time from acknowledgment to inclusion.
    ///
    /// Negative when the block clock runs behind the local clock; the value is kept as is.
    pub fn on_chain_latency_ms(&self) -> i64 {
        self.total_latency_ms - self.submission_latency_ms
    }
}

/// One attempt to submit and confirm an operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trial<H, C> {
    /// Position in the execution order (0-based)
    pub index: usize,
    pub outcome: Result<TrialRecord<H, C>, TrialError>,
}

impl<H, C> Trial<H, C> {
    pub fn success(index: usize, record: TrialRecord<H, C>) -> Self {
        Self { index, outcome: Ok(record) }
    }

    pub fn failure(index: usize, error: TrialError) -> Self {
        Self { index, outcome: Err(error) }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn record(&self) -> Option<&TrialRecord<H, C>> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&TrialError> {
        self.outcome.as_ref().err()
    }
}

/// Trials of one target in execution order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialSet<H, C> {
    pub target: String,
    pub trials: Vec<Trial<H, C>>,
}

impl<H, C> TrialSet<H, C> {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into(), trials: Vec::new() }
    }

    pub fn with_capacity(target: impl Into<String>, capacity: usize) -> Self {
        Self { target: target.into(), trials: Vec::with_capacity(capacity) }
    }

    pub fn push(&mut self, trial: Trial<H, C>) {
        self.trials.push(trial);
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Records of the successful trials, in execution order
    pub fn successes(&self) -> impl Iterator<Item = &TrialRecord<H, C>> {
        self.trials.iter().filter_map(Trial::record)
    }

    pub fn failures(&self) -> impl Iterator<Item = &TrialError> {
        self.trials.iter().filter_map(Trial::error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(submission: i64, total: i64) -> TrialRecord<u32, u32> {
        TrialRecord {
            id: 1,
            submission_latency_ms: submission,
            total_latency_ms: total,
            inclusion_timestamp_ms: 0,
            confirmation: 2,
        }
    }

    #[test]
    fn on_chain_latency_keeps_sign() {
        assert_eq!(record(120, 2_120).on_chain_latency_ms(), 2_000);
        assert_eq!(record(900, 400).on_chain_latency_ms(), -500);
    }

    #[test]
    fn error_from_report_keeps_cause_chain() {
        let err = eyre::eyre!("connection refused").wrap_err("eth_sendUserOperation failed");
        let err = TrialError::from_report(TrialErrorKind::Submission, &err);
        assert_eq!(err.message, "eth_sendUserOperation failed: connection refused");
        assert_eq!(
            err.to_string(),
            "submission failed: eth_sendUserOperation failed: connection refused"
        );
    }

    #[test]
    fn trial_set_splits_outcomes() {
        let mut set = TrialSet::new("pimlico");
        set.push(Trial::success(0, record(10, 20)));
        set.push(Trial::failure(1, TrialError::new(TrialErrorKind::Confirmation, "timeout")));
        set.push(Trial::success(2, record(30, 40)));

        assert_eq!(set.len(), 3);
        assert_eq!(set.successes().count(), 2);
        assert_eq!(set.failures().map(|e| e.message.as_str()).collect::<Vec<_>>(), vec!["timeout"]);
    }
}
