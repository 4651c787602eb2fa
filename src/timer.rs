//! Restartable coalescing timer
//!
//! Debounce state machine with cancel-and-reschedule semantics: every
//! restart pushes the deadline out by the full delay, and the timer fires at
//! most once per arming. Time is injected by the caller, so the fast and
//! slow analysis triggers can be tested without real timing.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CoalescingTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl CoalescingTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer, or push an armed timer's deadline out by the full
    /// delay from `now`.
    pub fn restart(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Disarm without firing
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, for hosts that want to sleep until the next
    /// trigger instead of polling.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True exactly once when the deadline has passed; disarms the timer.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(750);

    #[test]
    fn test_unarmed_timer_never_fires() {
        let mut timer = CoalescingTimer::new(DELAY);
        assert!(!timer.is_armed());
        assert!(!timer.fire_due(Instant::now() + Duration::from_secs(60)));
    }

    #[test]
    fn test_fires_once_after_delay() {
        let now = Instant::now();
        let mut timer = CoalescingTimer::new(DELAY);
        timer.restart(now);

        assert!(!timer.fire_due(now + Duration::from_millis(749)));
        assert!(timer.fire_due(now + DELAY));
        // Disarmed after firing
        assert!(!timer.fire_due(now + Duration::from_secs(10)));
    }

    #[test]
    fn test_restart_pushes_deadline_out() {
        let now = Instant::now();
        let mut timer = CoalescingTimer::new(DELAY);
        timer.restart(now);
        timer.restart(now + Duration::from_millis(700));

        // The original deadline has passed but the restart superseded it
        assert!(!timer.fire_due(now + DELAY));
        assert!(timer.fire_due(now + Duration::from_millis(700) + DELAY));
    }

    #[test]
    fn test_cancel_disarms() {
        let now = Instant::now();
        let mut timer = CoalescingTimer::new(DELAY);
        timer.restart(now);
        timer.cancel();
        assert!(!timer.is_armed());
        assert!(!timer.fire_due(now + Duration::from_secs(10)));
    }

    #[test]
    fn test_next_deadline() {
        let now = Instant::now();
        let mut timer = CoalescingTimer::new(DELAY);
        assert_eq!(timer.next_deadline(), None);
        timer.restart(now);
        assert_eq!(timer.next_deadline(), Some(now + DELAY));
    }
}
