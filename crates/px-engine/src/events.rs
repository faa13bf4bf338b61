//! Engine events — the append-only notification stream.
//!
//! Each event records when it happened (operational day + second-of-day),
//! where it originated (a city, or none for system-wide events), what kind of
//! occurrence it was, and a free-text message.  Emission order within a tick
//! follows the tick phases: rollover, then trip arrivals, then dispatches.

use std::fmt;

use px_core::CityId;

/// Category of an engine event.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// A customer booked a parcel.
    Booking,
    /// A customer cancelled a booking.
    Cancellation,
    /// A vehicle departed with a batch.
    Dispatch,
    /// A ready batch found no vehicle capacity and waits for the next pass.
    Deferral,
    /// A trip reached its destination.
    Arrival,
    /// A parcel was lost in transit.
    Loss,
    /// No route exists to the destination; the batch stays booked.
    RouteFailure,
    /// Daily rollover.
    NewDay,
}

impl EventKind {
    /// Log tag as it appears in the notification stream.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Booking      => "BOOKING",
            EventKind::Cancellation => "UNDO",
            EventKind::Dispatch     => "DISPATCH",
            EventKind::Deferral     => "DEFER",
            EventKind::Arrival      => "ARRIVAL",
            EventKind::Loss         => "CRITICAL",
            EventKind::RouteFailure => "FAILURE",
            EventKind::NewDay       => "NEW-DAY",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the engine's event stream.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// Operational day the event occurred on.
    pub day: u32,
    /// Second-of-day the event occurred at.
    pub second: u32,
    /// Originating city; `None` for system-wide events (e.g. new-day).
    pub city: Option<CityId>,
    pub kind: EventKind,
    pub message: String,
}
