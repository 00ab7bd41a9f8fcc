use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock time used to timestamp trial phases
pub trait Clock: Send + Sync {
    /// Current time as milliseconds since the Unix epoch
    fn now_ms(&self) -> i64;
}

/// [Clock](Clock) backed by the system time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        // a system clock set before 1970 reads as negative time
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_millis() as i64,
            Err(err) => -(err.duration().as_millis() as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let first = clock.now_ms();
        let second = clock.now_ms();
        assert!(first > 1_600_000_000_000);
        assert!(second >= first);
    }
}
