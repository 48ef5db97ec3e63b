//! Sources of "now" for the task store.

use std::rc::Rc;

use chrono::{DateTime, Local};

/// Provides the current local time.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

/// A clock that only moves when told to.
///
/// Interior mutability lets a test keep an `Rc` handle and advance time while
/// the store owns another handle to the same clock.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: std::cell::Cell<DateTime<Local>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(now: DateTime<Local>) -> Self {
        ManualClock {
            now: std::cell::Cell::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_manual_clock_advances_through_shared_handle() {
        let start = Local::now();
        let clock = Rc::new(ManualClock::new(start));
        let handle = Rc::clone(&clock);

        handle.advance(Duration::seconds(90));
        assert_eq!(clock.now(), start + Duration::seconds(90));

        handle.set(start);
        assert_eq!(Clock::now(&clock), start);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let a = SystemClock.now();
        let b = SystemClock.now();
        assert!(b >= a);
    }
}
