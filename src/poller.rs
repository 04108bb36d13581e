use std::thread;
use std::time::{Duration, Instant};

use log::debug;

/// Time source seam for the poller. Production code uses SystemClock;
/// tests drive the timeout path with a fake clock.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Ready,
    TimedOut,
}

/// Bounded-time condition poller.
///
/// Probes the predicate at a fixed interval until it reports true or the
/// timeout elapses. A timeout is an ordinary outcome value, never a panic;
/// callers treat it as "no results yet" and move on.
pub struct WaitPoller {
    timeout: Duration,
    poll_interval: Duration,
}

impl WaitPoller {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        WaitPoller {
            timeout,
            poll_interval,
        }
    }

    pub fn await_condition<F>(&self, predicate: F) -> PollOutcome
    where
        F: FnMut() -> bool,
    {
        self.await_condition_with_clock(&SystemClock, predicate)
    }

    pub fn await_condition_with_clock<C, F>(&self, clock: &C, mut predicate: F) -> PollOutcome
    where
        C: Clock,
        F: FnMut() -> bool,
    {
        let deadline = clock.now() + self.timeout;

        loop {
            if predicate() {
                return PollOutcome::Ready;
            }
            if clock.now() >= deadline {
                debug!("Condition not met within {:?}.", self.timeout);
                return PollOutcome::TimedOut;
            }
            clock.sleep(self.poll_interval);
        }
    }
}
