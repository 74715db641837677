//! Periodic position reports.

use std::future;
use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

pub const DEFAULT_PERIOD: Duration = Duration::from_millis(200);

/// Shortest period a heartbeat runs at; shorter ones are raised to this.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Timer that ticks every `period` once armed and never before.
#[derive(Debug)]
pub struct PositionHeartbeat {
    period: Duration,
    interval: Option<Interval>,
}

impl PositionHeartbeat {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Start ticking; the first tick comes one period from now. Arming an
    /// armed heartbeat keeps the running schedule.
    pub fn arm(&mut self) {
        if self.interval.is_some() {
            return;
        }
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    pub fn disarm(&mut self) {
        self.interval = None;
    }

    /// Wait for the next tick. Pending forever while disarmed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => future::pending().await,
        }
    }
}

impl Default for PositionHeartbeat {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD)
    }
}
