//! Auto-advance scheduler
//!
//! A repeating deadline that asks the controller for the next card. The
//! carousel actor stops it while paused and restarts it with a full interval
//! on resume, so a resumed carousel never advances early.

use tokio::time::{Duration, Instant};
use tracing::debug;

const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct AutoAdvance {
    period: Duration,
    next_due: Option<Instant>,
}

impl AutoAdvance {
    /// Creates a stopped scheduler
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next_due
    }

    /// (Re)starts the timer; the first tick is one full period after `now`
    pub fn start(&mut self, now: Instant) {
        debug!("Auto-advance armed, next tick in {:?}", self.period);
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        if self.next_due.take().is_some() {
            debug!("Auto-advance cancelled");
        }
    }

    /// Returns true if a tick is due. Missed ticks collapse into one.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if due <= now => {
                let mut next = due + self.period;
                while next <= now {
                    next += self.period;
                }
                self.next_due = Some(next);
                true
            }
            _ => false,
        }
    }
}
