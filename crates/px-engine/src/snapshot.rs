//! Monitor-facing state snapshot.
//!
//! A `Snapshot` is a pure projection of engine state — it can be re-derived
//! at any time and carries no state of its own.  External monitors read the
//! latest published snapshot; they never see a live transactional view.

use px_core::CityId;
use px_model::VehicleAssignment;

/// Progress of one active trip at snapshot time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripRow {
    pub src_city: CityId,
    pub dst_city: CityId,
    pub vehicle:  VehicleAssignment,
    /// Distance covered so far, clamped to `route_km`.
    pub traveled_km: u32,
    pub route_km:    u32,
}

/// Point-in-time view of engine state for external monitors.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub day: u32,
    pub second_of_day: u32,
    /// Parcels currently `Booked`.
    pub booked: usize,
    /// Parcels currently `InTransit`.
    pub in_transit: usize,
    /// Cumulative parcels lost since engine start.
    pub lost_total: u64,
    /// All active trips, finished ones included until the next rollover.
    pub trips: Vec<TripRow>,
}
