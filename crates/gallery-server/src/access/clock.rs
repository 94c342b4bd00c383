use chrono::Utc;

/// Source of unix time (seconds) for grant windows and cookie ages.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Clock;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Manually driven clock for tests.
    #[derive(Debug)]
    pub struct FixedClock(AtomicI64);

    impl FixedClock {
        pub fn at(now: i64) -> Self {
            Self(AtomicI64::new(now))
        }

        pub fn set(&self, now: i64) {
            self.0.store(now, Ordering::SeqCst);
        }

        pub fn advance(&self, seconds: i64) {
            self.0.fetch_add(seconds, Ordering::SeqCst);
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }
}
