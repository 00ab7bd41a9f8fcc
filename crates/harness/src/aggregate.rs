use crate::trial::{TrialRecord, TrialSet};

/// Mean latencies of the successful trials of one target
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AggregateResult {
    pub submission_latency_ms: f64,
    pub on_chain_latency_ms: f64,
    pub total_latency_ms: f64,
    /// Number of successful trials the means were computed over
    pub successes: usize,
}

impl AggregateResult {
    /// Computes the means over the given records, `None` if there are none
    pub fn from_records<'a, H, C, I>(records: I) -> Option<Self>
    where
        H: 'a,
        C: 'a,
        I: IntoIterator<Item = &'a TrialRecord<H, C>>,
    {
        let (count, submission, on_chain, total) = records.into_iter().fold(
            (0usize, 0i64, 0i64, 0i64),
            |(count, submission, on_chain, total), record| {
                (
                    count + 1,
                    submission + record.submission_latency_ms,
                    on_chain + record.on_chain_latency_ms(),
                    total + record.total_latency_ms,
                )
            },
        );

        if count == 0 {
            return None;
        }

        let n = count as f64;
        Some(Self {
            submission_latency_ms: submission as f64 / n,
            on_chain_latency_ms: on_chain as f64 / n,
            total_latency_ms: total as f64 / n,
            successes: count,
        })
    }

    pub fn from_set<H, C>(set: &TrialSet<H, C>) -> Option<Self> {
        Self::from_records(set.successes())
    }
}

/// Aggregates keyed by target name, in the order the targets were run.
///
/// Targets without any successful trial have no entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aggregates {
    entries: Vec<(String, AggregateResult)>,
}

impl Aggregates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates every set independently
    pub fn from_sets<H, C>(sets: &[TrialSet<H, C>]) -> Self {
        sets.iter().fold(Self::new(), |mut aggregates, set| {
            if let Some(result) = AggregateResult::from_set(set) {
                aggregates.insert(set.target.clone(), result);
            }
            aggregates
        })
    }

    /// Inserts or replaces the aggregate of a target (a replaced target keeps its position)
    pub fn insert(&mut self, target: impl Into<String>, result: AggregateResult) {
        let target = target.into();
        match self.entries.iter_mut().find(|(name, _)| *name == target) {
            Some((_, existing)) => *existing = result,
            None => self.entries.push((target, result)),
        }
    }

    pub fn get(&self, target: &str) -> Option<&AggregateResult> {
        self.entries.iter().find(|(name, _)| name == target).map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AggregateResult)> {
        self.entries.iter().map(|(name, result)| (name.as_str(), result))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
