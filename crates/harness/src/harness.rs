use crate::{
    clock::{Clock, SystemClock},
    trial::{Trial, TrialError, TrialErrorKind, TrialRecord, TrialSet},
};
use std::fmt::Display;
use tracing::{error, info};

/// Inclusion metadata returned once an operation is confirmed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inclusion<C> {
    /// Timestamp of the including block in milliseconds (block clock, not the harness clock)
    pub timestamp_ms: i64,
    /// Confirmation handle (e.g. transaction hash)
    pub confirmation: C,
}

/// A two-phase asynchronous operation: submit, then wait for confirmation
#[async_trait::async_trait]
pub trait Operation: Send + Sync {
    /// Prepared (built and signed) operation
    type Request: Send;
    /// Handle returned by the submission
    type Handle: Clone + Display + Send + Sync;
    /// Handle returned by the confirmation
    type Confirmation: Clone + Display + Send + Sync;

    /// Builds the operation for the trial with the given index
    async fn prepare(&self, index: usize) -> eyre::Result<Self::Request>;

    /// Submits the operation and returns once the collaborator acknowledges it
    async fn submit(&self, request: Self::Request) -> eyre::Result<Self::Handle>;

    /// Waits until the operation is included. There is no timeout: this may block for as long as
    /// the external service takes.
    async fn confirm(&self, handle: &Self::Handle) -> eyre::Result<Inclusion<Self::Confirmation>>;
}

/// Whether preparing the operation counts towards the submission latency
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PreparationTiming {
    /// The operation is prepared before the trial clock starts
    #[default]
    Excluded,
    /// Preparation is part of the timed submission
    Included,
}

/// Harness configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Number of trials per target
    pub iterations: usize,
    pub preparation: PreparationTiming,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self { iterations: 100, preparation: PreparationTiming::Excluded }
    }
}

/// Runs sequential latency trials of one [Operation](Operation)
pub struct Harness<O, K = SystemClock>
where
    O: Operation,
    K: Clock,
{
    target: String,
    operation: O,
    config: HarnessConfig,
    clock: K,
}

impl<O> Harness<O, SystemClock>
where
    O: Operation,
{
    pub fn new(target: impl Into<String>, operation: O, config: HarnessConfig) -> Self {
        Self::with_clock(target, operation, config, SystemClock)
    }
}

impl<O, K> Harness<O, K>
where
    O: Operation,
    K: Clock,
{
    pub fn with_clock(
        target: impl Into<String>,
        operation: O,
        config: HarnessConfig,
        clock: K,
    ) -> Self {
        Self { target: target.into(), operation, config, clock }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn operation(&self) -> &O {
        &self.operation
    }

    /// Runs all trials strictly one after another.
    ///
    /// Every trial failure is recorded and the run continues, so the returned
    /// [TrialSet](TrialSet) always holds exactly `iterations` trials in execution order.
    pub async fn run(&self) -> TrialSet<O::Handle, O::Confirmation> {
        info!("Testing target: {}", self.target);

        let mut set = TrialSet::with_capacity(self.target.clone(), self.config.iterations);
        for index in 0..self.config.iterations {
            let trial = self.run_trial(index).await;
            set.push(trial);
        }

        info!(
            "Finished target {}: {} of {} trials succeeded",
            self.target,
            set.successes().count(),
            set.len()
        );
        set
    }

    /// Runs a single trial
    pub async fn run_trial(&self, index: usize) -> Trial<O::Handle, O::Confirmation> {
        info!("Submitting user operation #{}", index + 1);

        match self.measure(index).await {
            Ok(record) => {
                info!(
                    "User operation included on-chain, total latency: {} ms (submission: {} ms, inclusion: {} ms, tx hash: {})",
                    record.total_latency_ms,
                    record.submission_latency_ms,
                    record.on_chain_latency_ms(),
                    record.confirmation
                );
                Trial::success(index, record)
            }
            Err(err) => {
                error!("Error submitting user operation #{}: {}", index + 1, err);
                Trial::failure(index, err)
            }
        }
    }

    async fn measure(
        &self,
        index: usize,
    ) -> Result<TrialRecord<O::Handle, O::Confirmation>, TrialError> {
        let prepared = match self.config.preparation {
            PreparationTiming::Excluded => Some(
                self.operation
                    .prepare(index)
                    .await
                    .map_err(|err| TrialError::from_report(TrialErrorKind::Preparation, &err))?,
            ),
            PreparationTiming::Included => None,
        };

        let start = self.clock.now_ms();

        let submission_start = self.clock.now_ms();
        let request = match prepared {
            Some(request) => request,
            None => self
                .operation
                .prepare(index)
                .await
                .map_err(|err| TrialError::from_report(TrialErrorKind::Submission, &err))?,
        };
        let id = self
            .operation
            .submit(request)
            .await
            .map_err(|err| TrialError::from_report(TrialErrorKind::Submission, &err))?;
        let submission_end = self.clock.now_ms();
        let submission_latency_ms = submission_end - submission_start;

        info!("User operation submitted: {id} (submission latency: {submission_latency_ms} ms)");

        let inclusion = self
            .operation
            .confirm(&id)
            .await
            .map_err(|err| TrialError::from_report(TrialErrorKind::Confirmation, &err))?;

        Ok(TrialRecord {
            id,
            submission_latency_ms,
            total_latency_ms: inclusion.timestamp_ms - start,
            inclusion_timestamp_ms: inclusion.timestamp_ms,
            confirmation: inclusion.confirmation,
        })
    }
}

/// Runs the given targets one after another (never concurrently) and returns one
/// [TrialSet](TrialSet) per target, in the given order.
pub async fn run_targets<O, K>(
    targets: Vec<(String, O)>,
    config: &HarnessConfig,
    clock: &K,
) -> Vec<TrialSet<O::Handle, O::Confirmation>>
where
    O: Operation,
    K: Clock + Clone,
{
    let mut sets = Vec::with_capacity(targets.len());
    for (name, operation) in targets {
        let harness = Harness::with_clock(name, operation, config.clone(), clock.clone());
        sets.push(harness.run().await);
    }
    sets
}
