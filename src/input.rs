use std::time::{Duration, Instant};

/// Edge-triggered hotkey latch
///
/// Samples the host's raw key state at a bounded rate and fires once per
/// key-down transition, not once per frame held. The raw key query itself
/// is the host's job; this only does the edge and throttle discipline.
#[derive(Debug)]
pub struct HotkeyTrigger {
    check_interval: Duration,
    last_check: Option<Instant>,
    was_pressed: bool,
}

impl HotkeyTrigger {
    /// Create a trigger that samples at most once per `check_interval`
    pub fn new(check_interval: Duration) -> Self {
        Self {
            check_interval,
            last_check: None,
            was_pressed: false,
        }
    }

    /// Feed the current key state. Returns true exactly once per observed
    /// key-down transition. Samples between check intervals are dropped,
    /// matching the bounded poll rate.
    pub fn poll(&mut self, now: Instant, pressed: bool) -> bool {
        if let Some(last) = self.last_check {
            if now.saturating_duration_since(last) < self.check_interval {
                return false;
            }
        }
        self.last_check = Some(now);

        let fired = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        fired
    }

    /// Forget the latch and throttle state
    pub fn reset(&mut self) {
        self.last_check = None;
        self.was_pressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(start: Instant, ms: u64) -> Instant {
        start + Duration::from_millis(ms)
    }

    #[test]
    fn test_fires_once_per_press() {
        let start = Instant::now();
        let mut trigger = HotkeyTrigger::new(Duration::from_millis(100));

        assert!(trigger.poll(at(start, 0), true));
        // Still held on later samples, no re-fire
        assert!(!trigger.poll(at(start, 100), true));
        assert!(!trigger.poll(at(start, 200), true));
    }

    #[test]
    fn test_rearms_after_release() {
        let start = Instant::now();
        let mut trigger = HotkeyTrigger::new(Duration::from_millis(100));

        assert!(trigger.poll(at(start, 0), true));
        assert!(!trigger.poll(at(start, 100), false));
        assert!(trigger.poll(at(start, 200), true));
    }

    #[test]
    fn test_samples_are_throttled() {
        let start = Instant::now();
        let mut trigger = HotkeyTrigger::new(Duration::from_millis(100));

        assert!(!trigger.poll(at(start, 0), false));
        // Within the check interval the press is not even sampled
        assert!(!trigger.poll(at(start, 10), true));
        assert!(!trigger.poll(at(start, 50), true));
        // First sample at or past the interval sees the press
        assert!(trigger.poll(at(start, 100), true));
    }

    #[test]
    fn test_reset_clears_latch() {
        let start = Instant::now();
        let mut trigger = HotkeyTrigger::new(Duration::from_millis(100));

        assert!(trigger.poll(at(start, 0), true));
        trigger.reset();
        assert!(trigger.poll(at(start, 1), true));
    }
}
