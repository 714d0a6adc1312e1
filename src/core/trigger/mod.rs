//! Press-and-hold activation logic with no platform dependencies.
//!
//! The caller supplies the clock as a millisecond counter, so the state
//! machine is testable on the host and indifferent to where its events
//! come from (UI gesture callbacks, a timer task, a test loop).

use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    /// No press in progress.
    Idle,
    /// A press is being held; activation fires once the hold reaches the
    /// threshold without an intervening release.
    Holding { pressed_at_ms: u64 },
    /// The threshold was reached and activation has fired. Stays here until
    /// the press is released, which arms the next session.
    Activated,
}

/// One press-and-hold session at a time. A session produces at most one
/// activation; releasing early cancels with no side effect, and a fresh
/// press always starts timing from zero.
#[derive(Debug, Clone)]
pub struct HoldTrigger {
    state: TriggerState,
    threshold_ms: u64,
}

impl HoldTrigger {
    pub fn new(threshold_ms: u64) -> Self {
        Self {
            state: TriggerState::Idle,
            threshold_ms,
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn threshold_ms(&self) -> u64 {
        self.threshold_ms
    }

    /// Begins a session. Ignored while a press is already down; the gesture
    /// surface accepts one active press at a time.
    pub fn press(&mut self, now_ms: u64) {
        if self.state == TriggerState::Idle {
            self.state = TriggerState::Holding {
                pressed_at_ms: now_ms,
            };
        }
    }

    /// Ends the session. Cancels timing if the threshold was not reached;
    /// safe to call repeatedly.
    pub fn release(&mut self, _now_ms: u64) {
        self.state = TriggerState::Idle;
    }

    /// Advances the clock. Returns `true` exactly once per session, on the
    /// transition into `Activated`.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.state {
            TriggerState::Holding { pressed_at_ms }
                if now_ms.saturating_sub(pressed_at_ms) >= self.threshold_ms =>
            {
                self.state = TriggerState::Activated;
                true
            }
            _ => false,
        }
    }

    /// Elapsed hold time, clamped to zero outside a session. Embedding UIs
    /// use this for progress feedback.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.state {
            TriggerState::Holding { pressed_at_ms } => now_ms.saturating_sub(pressed_at_ms),
            _ => 0,
        }
    }
}

/// Thread-safe wrapper for embedders whose timeout callback and release
/// handler run on different threads. The lock makes the
/// timeout-vs-late-release race serialize, so activation still fires at
/// most once per session.
#[derive(Clone)]
pub struct SharedHoldTrigger {
    inner: Arc<Mutex<HoldTrigger>>,
}

impl SharedHoldTrigger {
    pub fn new(threshold_ms: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HoldTrigger::new(threshold_ms))),
        }
    }

    pub fn press(&self, now_ms: u64) {
        self.inner.lock().press(now_ms);
    }

    pub fn release(&self, now_ms: u64) {
        self.inner.lock().release(now_ms);
    }

    pub fn poll(&self, now_ms: u64) -> bool {
        self.inner.lock().poll(now_ms)
    }

    pub fn state(&self) -> TriggerState {
        self.inner.lock().state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: u64 = 2000;

    #[test]
    fn test_short_hold_never_activates() {
        let mut trigger = HoldTrigger::new(THRESHOLD);
        trigger.press(0);

        for now in (0..2000).step_by(50) {
            assert!(!trigger.poll(now));
        }
        trigger.release(1999);
        assert_eq!(trigger.state(), TriggerState::Idle);
    }

    #[test]
    fn test_threshold_hold_activates_exactly_once() {
        let mut trigger = HoldTrigger::new(THRESHOLD);
        trigger.press(100);

        assert!(!trigger.poll(2099));
        assert!(trigger.poll(2100));
        // Subsequent polls must not fire again.
        assert!(!trigger.poll(2200));
        assert!(!trigger.poll(10_000));
        assert_eq!(trigger.state(), TriggerState::Activated);
    }

    #[test]
    fn test_release_before_threshold_cancels() {
        let mut trigger = HoldTrigger::new(THRESHOLD);
        trigger.press(0);
        trigger.release(1500);

        assert!(!trigger.poll(5000));
        assert_eq!(trigger.state(), TriggerState::Idle);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut trigger = HoldTrigger::new(THRESHOLD);
        trigger.release(0);
        trigger.release(1);
        assert_eq!(trigger.state(), TriggerState::Idle);

        trigger.press(10);
        trigger.release(20);
        trigger.release(21);
        assert_eq!(trigger.state(), TriggerState::Idle);
    }

    #[test]
    fn test_consecutive_short_holds_do_not_accumulate() {
        let mut trigger = HoldTrigger::new(THRESHOLD);

        // Two 1500 ms holds, back to back: 3000 ms total held, but never
        // 2000 ms within one session.
        trigger.press(0);
        assert!(!trigger.poll(1500));
        trigger.release(1500);

        trigger.press(1600);
        assert!(!trigger.poll(3100));
        assert!(trigger.poll(3600));
    }

    #[test]
    fn test_repress_after_activation_starts_fresh_session() {
        let mut trigger = HoldTrigger::new(THRESHOLD);
        trigger.press(0);
        assert!(trigger.poll(2000));

        trigger.release(2500);
        trigger.press(3000);
        assert!(!trigger.poll(4999));
        assert!(trigger.poll(5000));
    }

    #[test]
    fn test_press_while_holding_is_ignored() {
        let mut trigger = HoldTrigger::new(THRESHOLD);
        trigger.press(0);
        // A second press-down event must not restart the clock.
        trigger.press(1900);
        assert!(trigger.poll(2000));
    }

    #[test]
    fn test_elapsed_reports_progress() {
        let mut trigger = HoldTrigger::new(THRESHOLD);
        assert_eq!(trigger.elapsed_ms(500), 0);

        trigger.press(1000);
        assert_eq!(trigger.elapsed_ms(1600), 600);

        trigger.release(1600);
        assert_eq!(trigger.elapsed_ms(1700), 0);
    }

    #[test]
    fn test_shared_trigger_single_activation_across_threads() {
        let trigger = SharedHoldTrigger::new(THRESHOLD);
        trigger.press(0);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let t = trigger.clone();
            handles.push(std::thread::spawn(move || t.poll(2500)));
        }

        let fired: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum();
        assert_eq!(fired, 1);
    }
}
