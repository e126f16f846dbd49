use chrono::{DateTime, Local, TimeDelta};
use std::cell::Cell;
use std::rc::Rc;

/// Source of "now" for the session engine
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Manually advanced clock for headless runs. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Local>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance(TimeDelta::milliseconds((secs * 1000.0) as i64));
    }

    pub fn advance(&self, delta: TimeDelta) {
        self.now.set(self.now.get() + delta);
    }

    pub fn set(&self, now: DateTime<Local>) {
        self.now.set(now);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Local::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}

/// Seconds from `start` to `end`, with millisecond resolution
pub fn seconds_between(start: DateTime<Local>, end: DateTime<Local>) -> f64 {
    (end - start).num_milliseconds() as f64 / 1000.0
}
