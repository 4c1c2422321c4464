//! Time sources and the repeating tick schedule.
//!
//! Nothing here sleeps or spawns. A host loop polls [`crate::animator::Animator::update`],
//! which asks its [`Clock`] for the time and fires every tick that has come due.

use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

/// A monotonic time source. Readings are measured from an arbitrary, fixed origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock time since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to. Clones share the same time, so a test can keep
/// one handle and give the other to an animator.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jumps to an absolute reading. Going backwards is allowed and simply makes no ticks
    /// due until time catches up again.
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// A repeating tick schedule started at a fixed instant.
///
/// Deadlines are `start + n * period`, so late polling never shifts later ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: Duration,
    period: Duration,
    fired: u64,
}

impl Interval {
    /// Starts a schedule at `now`. The first tick is due one `period` later.
    ///
    /// # Panics
    /// If `period` is zero.
    pub fn new(now: Duration, period: Duration) -> Self {
        assert!(!period.is_zero(), "interval period must be non-zero");
        Self {
            start: now,
            period,
            fired: 0,
        }
    }

    /// Total ticks handed out so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Returns how many ticks came due since the previous poll and marks them fired.
    pub fn poll(&mut self, now: Duration) -> u64 {
        let elapsed = now.saturating_sub(self.start);
        let due = u64::try_from(elapsed.as_nanos() / self.period.as_nanos()).unwrap_or(u64::MAX);
        let ticks = due.saturating_sub(self.fired);
        self.fired = self.fired.max(due);
        ticks
    }

    /// The instant the next tick comes due.
    pub fn next_deadline(&self) -> Duration {
        let nanos = (u128::from(self.fired) + 1)
            .checked_mul(self.period.as_nanos())
            .and_then(|offset| offset.checked_add(self.start.as_nanos()));
        nanos.map_or(Duration::MAX, |nanos| {
            let secs = nanos / 1_000_000_000;
            match u64::try_from(secs) {
                Ok(secs) => Duration::new(secs, (nanos % 1_000_000_000) as u32),
                Err(_) => Duration::MAX,
            }
        })
    }

    /// Time left until the next tick, zero if one is already due.
    pub fn remaining(&self, now: Duration) -> Duration {
        self.next_deadline().saturating_sub(now)
    }
}
