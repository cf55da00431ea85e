use {
    crate::utils::AppInstant,
    std::time::Duration,
    tokio::time::{Interval, MissedTickBehavior, interval_at},
};

/// A fixed number of evenly spaced waits. The first attempt is one period away.
pub struct PollBudget {
    interval: Interval,
    attempts: u32,
    spent: u32,
}

impl PollBudget {
    pub fn new(period: Duration, attempts: u32) -> Self {
        // tokio intervals reject a zero period
        let period = period.max(Duration::from_millis(1));
        let mut interval = interval_at(AppInstant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            attempts,
            spent: 0,
        }
    }

    /// Resolves once every attempt has been used. Safe to drop and call again.
    pub async fn exhausted(&mut self) {
        while self.spent < self.attempts {
            self.interval.tick().await;
            self.spent += 1;
        }
    }

    pub fn attempts_spent(&self) -> u32 {
        self.spent
    }
}
