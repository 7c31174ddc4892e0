//! The engine's tick counter.
//!
//! Tick 0 is the state before the first tick; [`TickClock::advance`] is
//! called at the start of every tick, so the first tick to run is tick 1.
//! Per-ritual cadence is derived from the counter, never stored.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Monotonic tick counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickClock {
    /// The last tick that started.
    tick: u64,
}

impl TickClock {
    /// A clock that has not ticked yet.
    pub const fn new() -> Self {
        Self { tick: 0 }
    }

    /// Advance by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// The current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }
}

/// Whether something started at `since` with period `interval` is due at
/// `tick`. Ticks before `since` are never due; an interval of zero is
/// treated as one.
pub const fn is_due(tick: u64, since: u64, interval: u64) -> bool {
    let Some(elapsed) = tick.checked_sub(since) else {
        return false;
    };
    let period = if interval == 0 { 1 } else { interval };
    match elapsed.checked_rem(period) {
        Some(rem) => rem == 0,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_from_zero() {
        let mut clock = TickClock::new();
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.advance().ok(), Some(1));
        assert_eq!(clock.advance().ok(), Some(2));
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn overflow_is_an_error() {
        let mut clock = TickClock { tick: u64::MAX };
        assert!(matches!(clock.advance(), Err(ClockError::TickOverflow)));
        assert_eq!(clock.tick(), u64::MAX);
    }

    #[test]
    fn cadence_counts_from_activation() {
        assert!(is_due(10, 10, 4));
        assert!(!is_due(11, 10, 4));
        assert!(is_due(14, 10, 4));
        assert!(!is_due(9, 10, 4));
        assert!(is_due(7, 3, 0));
        assert!(is_due(7, 3, 1));
    }
}
