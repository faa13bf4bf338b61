//! Parcel entity, priority classes, and the delivery status state machine.

use std::fmt;

use px_core::{CityId, OfficeId, Tick, TrackingId};

use crate::{ModelError, ModelResult};

// ── Priority ──────────────────────────────────────────────────────────────────

/// Service priority class, ordered most urgent first.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Priority {
    /// Next-morning delivery; bypasses every soft weight cap.
    Overnight,
    /// Two-day delivery.
    TwoDay,
    /// Standard delivery.
    Standard,
}

impl Priority {
    /// Numeric rank, 1 = most urgent.  Used as the stable-sort key in the
    /// dispatch batching pass.
    #[inline]
    pub fn rank(self) -> u8 {
        match self {
            Priority::Overnight => 1,
            Priority::TwoDay    => 2,
            Priority::Standard  => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Overnight => "overnight",
            Priority::TwoDay    => "2-day",
            Priority::Standard  => "standard",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = ModelError;

    /// Parse the customer-facing 1/2/3 encoding.
    fn try_from(rank: u8) -> ModelResult<Self> {
        match rank {
            1 => Ok(Priority::Overnight),
            2 => Ok(Priority::TwoDay),
            3 => Ok(Priority::Standard),
            other => Err(ModelError::Config(format!("priority {other} is not 1, 2, or 3"))),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ParcelStatus ──────────────────────────────────────────────────────────────

/// Delivery lifecycle of a parcel.
///
/// Transitions are monotone along:
///
/// ```text
/// Booked ──→ Cancelled
///    └─────→ InTransit ──→ Delivered
///                  └─────→ Lost
/// ```
///
/// `Cancelled`, `Delivered`, and `Lost` are terminal.  [`Parcel`]'s mutators
/// enforce the machine; a parcel can never move backward.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParcelStatus {
    Booked,
    Cancelled,
    InTransit,
    Delivered,
    Lost,
}

impl ParcelStatus {
    /// `true` once no further transition is possible.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, ParcelStatus::Cancelled | ParcelStatus::Delivered | ParcelStatus::Lost)
    }

    /// Whether the state machine allows `self → next`.
    pub fn can_transition_to(self, next: ParcelStatus) -> bool {
        use ParcelStatus::*;
        matches!(
            (self, next),
            (Booked, Cancelled) | (Booked, InTransit) | (InTransit, Delivered) | (InTransit, Lost)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParcelStatus::Booked    => "Booked",
            ParcelStatus::Cancelled => "Cancelled",
            ParcelStatus::InTransit => "In Transit",
            ParcelStatus::Delivered => "Delivered",
            ParcelStatus::Lost      => "Lost",
        }
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Parcel ────────────────────────────────────────────────────────────────────

/// One booked parcel.
///
/// Immutable booking fields plus the mutable delivery state.  `dispatched_at`
/// and `route_km` are stamped exactly once, when the parcel leaves on a trip.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parcel {
    pub id:         TrackingId,
    pub src_city:   CityId,
    pub src_office: OfficeId,
    pub dst_city:   CityId,
    pub dst_office: OfficeId,
    pub weight_kg:  u32,
    pub priority:   Priority,
    /// Operational day (within the cycle) the booking was taken.
    pub booked_day: u32,

    pub status: ParcelStatus,
    /// Absolute tick the parcel was loaded onto a trip.
    pub dispatched_at: Option<Tick>,
    /// Total route distance assigned at dispatch.
    pub route_km: Option<u32>,
}

impl Parcel {
    #[allow(clippy::too_many_arguments)]
    pub fn book(
        id:         TrackingId,
        src_city:   CityId,
        src_office: OfficeId,
        dst_city:   CityId,
        dst_office: OfficeId,
        weight_kg:  u32,
        priority:   Priority,
        booked_day: u32,
    ) -> Self {
        Self {
            id,
            src_city,
            src_office,
            dst_city,
            dst_office,
            weight_kg,
            priority,
            booked_day,
            status: ParcelStatus::Booked,
            dispatched_at: None,
            route_km: None,
        }
    }

    fn transition(&mut self, next: ParcelStatus) -> ModelResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(ModelError::InvalidTransition { from: self.status, to: next });
        }
        self.status = next;
        Ok(())
    }

    /// `Booked → Cancelled`.
    pub fn cancel(&mut self) -> ModelResult<()> {
        self.transition(ParcelStatus::Cancelled)
    }

    /// `Booked → InTransit`, stamping dispatch time and route distance.
    pub fn dispatch(&mut self, now: Tick, route_km: u32) -> ModelResult<()> {
        self.transition(ParcelStatus::InTransit)?;
        self.dispatched_at = Some(now);
        self.route_km = Some(route_km);
        Ok(())
    }

    /// `InTransit → Delivered`.
    pub fn deliver(&mut self) -> ModelResult<()> {
        self.transition(ParcelStatus::Delivered)
    }

    /// `InTransit → Lost`.
    pub fn mark_lost(&mut self) -> ModelResult<()> {
        self.transition(ParcelStatus::Lost)
    }

    /// Estimated distance traveled so far, clamped to the total route.
    ///
    /// `None` unless the parcel is in transit.  One distance unit takes
    /// `seconds_per_km` ticks, so `elapsed / seconds_per_km` kilometres have
    /// been covered at tick `now`.
    pub fn traveled_km(&self, now: Tick, seconds_per_km: u32) -> Option<f64> {
        if self.status != ParcelStatus::InTransit {
            return None;
        }
        let dispatched = self.dispatched_at?;
        let total = self.route_km? as f64;
        let traveled = now.since(dispatched) as f64 / seconds_per_km as f64;
        Some(traveled.min(total))
    }
}
