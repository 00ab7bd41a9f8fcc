use std::{
    future::pending,
    sync::{
        atomic::{AtomicI64, AtomicUsize, Ordering},
        Arc,
    },
};
use uobench_harness::{Clock, Inclusion, Operation};

/// Time the operation spends preparing
pub const PREPARE_MS: i64 = 50;
/// Time the operation spends submitting
pub const SUBMIT_MS: i64 = 200;
/// Distance between the submission acknowledgment and the block timestamp
pub const BLOCK_DELAY_MS: i64 = 1_000;

/// Clock that only moves when told to
#[derive(Clone, Debug)]
pub struct ManualClock(Arc<AtomicI64>);

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self(Arc::new(AtomicI64::new(start_ms)))
    }

    pub fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// What happens in a single trial
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Succeed,
    /// Block timestamp lies before the trial start by the given amount
    SucceedSkewed(i64),
    FailPrepare,
    FailSubmit,
    FailConfirm,
    Hang,
}

/// Operation that follows a script, one step per trial
#[derive(Clone)]
pub struct ScriptedOperation {
    pub name: String,
    script: Vec<Step>,
    clock: ManualClock,
    pub submissions: Arc<AtomicUsize>,
    pub confirmations: Arc<AtomicUsize>,
}

impl ScriptedOperation {
    pub fn new(name: &str, script: Vec<Step>, clock: ManualClock) -> Self {
        Self {
            name: name.to_string(),
            script,
            clock,
            submissions: Arc::new(AtomicUsize::new(0)),
            confirmations: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn step(&self, index: usize) -> Step {
        self.script.get(index).copied().unwrap_or(Step::Succeed)
    }
}

#[async_trait::async_trait]
impl Operation for ScriptedOperation {
    type Request = usize;
    type Handle = String;
    type Confirmation = String;

    async fn prepare(&self, index: usize) -> eyre::Result<usize> {
        self.clock.advance(PREPARE_MS);
        if self.step(index) == Step::FailPrepare {
            eyre::bail!("AA21 didn't pay prefund");
        }
        Ok(index)
    }

    async fn submit(&self, index: usize) -> eyre::Result<String> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        self.clock.advance(SUBMIT_MS);
        if self.step(index) == Step::FailSubmit {
            eyre::bail!("AA25 invalid account nonce");
        }
        Ok(format!("{}-op-{index}", self.name))
    }

    async fn confirm(&self, handle: &String) -> eyre::Result<Inclusion<String>> {
        self.confirmations.fetch_add(1, Ordering::SeqCst);
        let index = handle
            .rsplit('-')
            .next()
            .and_then(|index| index.parse::<usize>().ok())
            .ok_or_else(|| eyre::eyre!("unknown handle {handle}"))?;

        let timestamp_ms = match self.step(index) {
            Step::FailConfirm => eyre::bail!("user operation receipt has no block number"),
            Step::Hang => pending().await,
            Step::SucceedSkewed(skew) => self.clock.now_ms() - SUBMIT_MS - skew,
            _ => self.clock.now_ms() + BLOCK_DELAY_MS,
        };

        Ok(Inclusion { timestamp_ms, confirmation: format!("{}-tx-{index}", self.name) })
    }
}
