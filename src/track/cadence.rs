use std::time::{Duration, Instant};

/// A cooperative polling timer.
///
/// `due` fires on the first poll and then at most once per `period`.
/// A stopped cadence never fires again.
#[derive(Debug, Clone)]
pub struct Cadence {
    period: Duration,
    next_due: Option<Instant>,
    stopped: bool,
}

impl Cadence {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
            stopped: false,
        }
    }

    pub fn due(&mut self, now: Instant) -> bool {
        if self.stopped {
            return false;
        }
        match self.next_due {
            Some(at) if now < at => false,
            _ => {
                self.next_due = Some(now + self.period);
                true
            }
        }
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
