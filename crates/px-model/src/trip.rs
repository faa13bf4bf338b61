//! Trip entity — one vehicle departure and its manifest.

use px_core::{CityId, ParcelIdx, Tick};

use crate::vehicle::VehicleAssignment;

/// One vehicle departure.
///
/// Distance and vehicle are fixed at creation; only `finished` and the
/// parcels' statuses change afterward.  A finished trip stays visible (for
/// tracking and the monitor snapshot) until the next daily rollover retires
/// it from the engine's active list.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trip {
    pub src_city: CityId,
    pub dst_city: CityId,
    pub vehicle:  VehicleAssignment,
    /// Total route distance in km.
    pub route_km: u32,
    /// Absolute tick the vehicle departed.
    pub departed_at: Tick,
    pub finished: bool,
    /// Parcels riding this trip, in batch order.
    pub manifest: Vec<ParcelIdx>,
}

impl Trip {
    pub fn depart(
        src_city: CityId,
        dst_city: CityId,
        vehicle:  VehicleAssignment,
        route_km: u32,
        now:      Tick,
        manifest: Vec<ParcelIdx>,
    ) -> Self {
        Self {
            src_city,
            dst_city,
            vehicle,
            route_km,
            departed_at: now,
            finished: false,
            manifest,
        }
    }

    /// Ticks the full route takes at `seconds_per_km` ticks per kilometre.
    #[inline]
    pub fn required_ticks(&self, seconds_per_km: u32) -> u64 {
        self.route_km as u64 * seconds_per_km as u64
    }

    /// `true` once the vehicle has been on the road long enough to arrive.
    #[inline]
    pub fn is_due(&self, now: Tick, seconds_per_km: u32) -> bool {
        now.since(self.departed_at) >= self.required_ticks(seconds_per_km)
    }

    /// Distance covered so far in km, clamped to the route total.
    pub fn traveled_km(&self, now: Tick, seconds_per_km: u32) -> u32 {
        let traveled = now.since(self.departed_at) / seconds_per_km as u64;
        (traveled as u32).min(self.route_km)
    }

    /// Fraction of the route completed at `now`, in `[0.0, 1.0]`.
    pub fn progress(&self, now: Tick, seconds_per_km: u32) -> f32 {
        if self.route_km == 0 {
            return 1.0;
        }
        self.traveled_km(now, seconds_per_km) as f32 / self.route_km as f32
    }
}
