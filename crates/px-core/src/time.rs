//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter, one tick per simulated
//! second.  `DayClock` layers the operational calendar on top: a day is a
//! fixed number of seconds, and days wrap within a fixed cycle (day 1 follows
//! the last day of the cycle).  Using an integer tick as the canonical unit
//! keeps all schedule arithmetic exact and comparisons O(1).

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter (one tick = one simulated second).
///
/// Stored as `u64`: at one tick per second a u64 lasts ~585 billion years,
/// so overflow is not a practical concern.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── DayClock ──────────────────────────────────────────────────────────────────

/// The engine's operational clock: absolute tick plus a derived
/// (day, second-of-day) pair.
///
/// Days are numbered `1..=cycle_days` and wrap.  `DayClock` is cheap to copy
/// and holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayClock {
    /// Length of one operational day in seconds.
    pub seconds_per_day: u32,
    /// Number of days in the repeating cycle.
    pub cycle_days: u32,
    /// The current absolute tick — advanced by [`DayClock::advance`].
    pub now: Tick,
    /// Current day, `1..=cycle_days`.
    pub day: u32,
    /// Seconds elapsed within the current day, `0..seconds_per_day`.
    pub second_of_day: u32,
}

impl DayClock {
    /// Create a clock at tick 0, day 1, second 0.
    pub fn new(seconds_per_day: u32, cycle_days: u32) -> Self {
        Self {
            seconds_per_day,
            cycle_days,
            now: Tick::ZERO,
            day: 1,
            second_of_day: 0,
        }
    }

    /// Advance the clock by one tick.
    ///
    /// Returns `true` when this tick crossed a day boundary (the day counter
    /// advanced, wrapping back to 1 after the last day of the cycle).  The
    /// caller performs its rollover work exactly when this returns `true`.
    pub fn advance(&mut self) -> bool {
        self.now = Tick(self.now.0 + 1);
        self.second_of_day += 1;
        if self.second_of_day >= self.seconds_per_day {
            self.second_of_day = 0;
            self.day += 1;
            if self.day > self.cycle_days {
                self.day = 1;
            }
            return true;
        }
        false
    }
}

impl fmt::Display for DayClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (day {} {:03}s)", self.now, self.day, self.second_of_day)
    }
}
