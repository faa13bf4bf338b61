//! The `Engine` struct — all mutable simulation state and the tick loop.
//!
//! # Tick order
//!
//! ```text
//! tick():
//!   ① Clock    — advance the day clock by one second.
//!   ② Rollover — on a day boundary: retire finished trips, refill every
//!                city's vehicle pools, emit a new-day event.
//!   ③ Arrivals — mark due trips finished; resolve each carried parcel to
//!                Delivered or (with small probability) Lost.
//!   ④ Dispatch — at the fixed dispatch second: batch booked parcels per
//!                (source, destination) pair and allocate vehicles.
//!   ⑤ Publish  — hand a consistent snapshot to the observer.
//! ```
//!
//! The engine itself is single-threaded; [`SharedEngine`][crate::SharedEngine]
//! wraps it in the process-wide state lock.

use px_core::{CityId, DayClock, OfficeId, ParcelIdx, SimRng, Tick, TrackingId};
use px_model::{
    CityPools, NetworkConfig, Parcel, ParcelStatus, ParcelStore, Priority, Trip,
    VehicleAssignment,
};
use px_routing::CityGraph;

use crate::error::{BookingError, CancelError, EngineResult, TrackError};
use crate::events::{Event, EventKind};
use crate::observer::EngineObserver;
use crate::snapshot::{Snapshot, TripRow};

// ── Requests and views ────────────────────────────────────────────────────────

/// A booking request as the front end hands it over.
///
/// The front end validates raw user input; the engine still range-checks the
/// indices so a buggy caller cannot corrupt state.
#[derive(Copy, Clone, Debug)]
pub struct BookingRequest {
    pub src_city:   CityId,
    pub src_office: OfficeId,
    pub dst_city:   CityId,
    pub dst_office: OfficeId,
    pub weight_kg:  u32,
    pub priority:   Priority,
}

/// In-transit progress attached to a tracking view.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransitProgress {
    /// Estimated km covered, clamped to `route_km`.
    pub traveled_km: f64,
    pub route_km:    u32,
    /// `traveled_km / route_km`, for progress bars.
    pub fraction:    f64,
}

/// Read-only answer to a tracking query.
#[derive(Clone, Debug, PartialEq)]
pub struct ParcelView {
    pub id:         TrackingId,
    pub src_city:   CityId,
    pub src_office: OfficeId,
    pub dst_city:   CityId,
    pub dst_office: OfficeId,
    pub weight_kg:  u32,
    pub priority:   Priority,
    pub status:     ParcelStatus,
    pub booked_day: u32,
    /// Populated only while the parcel is in transit.
    pub progress:   Option<TransitProgress>,
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// The dispatch engine.  Owns every piece of mutable simulation state:
/// parcels, trips, vehicle pools, the clock, and the RNG.
pub struct Engine {
    config: NetworkConfig,
    graph:  CityGraph,
    store:  ParcelStore,
    /// Active trips; finished ones linger until the next rollover.
    trips:  Vec<Trip>,
    pools:  CityPools,
    clock:  DayClock,
    lost_total: u64,
    rng:    SimRng,
    observer: Box<dyn EngineObserver + Send>,
}

impl Engine {
    /// Build an engine with no monitoring output.
    pub fn new(config: NetworkConfig) -> EngineResult<Self> {
        Self::with_observer(config, Box::new(crate::NoopObserver))
    }

    /// Build an engine that publishes events and snapshots to `observer`.
    pub fn with_observer(
        config:   NetworkConfig,
        observer: Box<dyn EngineObserver + Send>,
    ) -> EngineResult<Self> {
        config.validate()?;
        let graph =
            CityGraph::from_matrix_with_blocks(&config.distances_km, &config.blocked_roads)?;
        let pools = CityPools::new(config.city_count(), config.pool_allotment);
        let clock = DayClock::new(config.seconds_per_day, config.cycle_days);
        let rng = SimRng::new(config.seed);
        Ok(Self {
            config,
            graph,
            store: ParcelStore::new(),
            trips: Vec::new(),
            pools,
            clock,
            lost_total: 0,
            rng,
            observer,
        })
    }

    // ── Read-only accessors ───────────────────────────────────────────────

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Current absolute tick.
    pub fn now(&self) -> Tick {
        self.clock.now
    }

    /// Current operational day.
    pub fn day(&self) -> u32 {
        self.clock.day
    }

    /// Total parcels ever booked (all statuses).
    pub fn parcel_count(&self) -> usize {
        self.store.len()
    }

    // ── Customer operations ───────────────────────────────────────────────

    /// Book a parcel.  Returns the allocated tracking id.
    pub fn book(&mut self, request: BookingRequest) -> Result<TrackingId, BookingError> {
        if !self.config.contains_city(request.src_city) {
            return Err(BookingError::CityOutOfRange(request.src_city));
        }
        if !self.config.contains_city(request.dst_city) {
            return Err(BookingError::CityOutOfRange(request.dst_city));
        }
        if !self.config.contains_office(request.src_office) {
            return Err(BookingError::OfficeOutOfRange(request.src_office));
        }
        if !self.config.contains_office(request.dst_office) {
            return Err(BookingError::OfficeOutOfRange(request.dst_office));
        }
        if request.src_city == request.dst_city && request.src_office == request.dst_office {
            return Err(BookingError::SameOffice);
        }

        let id = self.store.allocate_id(&mut self.rng);
        let parcel = Parcel::book(
            id,
            request.src_city,
            request.src_office,
            request.dst_city,
            request.dst_office,
            request.weight_kg,
            request.priority,
            self.clock.day,
        );
        self.store.insert(parcel)?;

        self.emit(
            Some(request.src_city),
            EventKind::Booking,
            format!(
                "Customer booked parcel {id} to {}",
                self.config.city_name(request.dst_city)
            ),
        );
        Ok(id)
    }

    /// Cancel a booking.  Only `Booked` parcels can be cancelled.
    pub fn cancel(&mut self, id: TrackingId) -> Result<(), CancelError> {
        let parcel = self.store.get_mut(id).ok_or(CancelError::NotFound(id))?;
        let current = parcel.status;
        parcel
            .cancel()
            .map_err(|_| CancelError::InvalidState(current))?;
        let src = parcel.src_city;

        self.emit(
            Some(src),
            EventKind::Cancellation,
            format!("Parcel {id} cancelled by customer"),
        );
        Ok(())
    }

    /// Look up a parcel by tracking id.
    pub fn track(&self, id: TrackingId) -> Result<ParcelView, TrackError> {
        let parcel = self.store.get(id).ok_or(TrackError::NotFound(id))?;
        let progress = parcel
            .traveled_km(self.clock.now, self.config.seconds_per_km)
            .zip(parcel.route_km)
            .map(|(traveled_km, route_km)| TransitProgress {
                traveled_km,
                route_km,
                fraction: if route_km == 0 { 1.0 } else { traveled_km / route_km as f64 },
            });
        Ok(ParcelView {
            id:         parcel.id,
            src_city:   parcel.src_city,
            src_office: parcel.src_office,
            dst_city:   parcel.dst_city,
            dst_office: parcel.dst_office,
            weight_kg:  parcel.weight_kg,
            priority:   parcel.priority,
            status:     parcel.status,
            booked_day: parcel.booked_day,
            progress,
        })
    }

    // ── Clock ─────────────────────────────────────────────────────────────

    /// Advance the simulation by one second.
    ///
    /// Driven by the background clock actor in production and called
    /// directly in tests.
    pub fn tick(&mut self) -> EngineResult<()> {
        if self.clock.advance() {
            self.rollover();
        }
        self.advance_trips()?;
        if self.clock.second_of_day == self.config.dispatch_second {
            self.dispatch_pass()?;
        }
        let snapshot = self.snapshot();
        self.observer.on_snapshot(&snapshot);
        Ok(())
    }

    /// Daily rollover: retire finished trips and refill every city's pools.
    fn rollover(&mut self) {
        self.trips.retain(|trip| !trip.finished);
        self.pools.reset();
        self.emit(
            None,
            EventKind::NewDay,
            format!("Day {} started", self.clock.day),
        );
    }

    // ── Trip advancement ──────────────────────────────────────────────────

    /// Finish every trip whose travel time has elapsed and resolve its
    /// parcels to `Delivered` or, with the configured probability, `Lost`.
    fn advance_trips(&mut self) -> EngineResult<()> {
        let now = self.clock.now;
        let seconds_per_km = self.config.seconds_per_km;

        for trip_idx in 0..self.trips.len() {
            if self.trips[trip_idx].finished
                || !self.trips[trip_idx].is_due(now, seconds_per_km)
            {
                continue;
            }
            self.trips[trip_idx].finished = true;

            let src = self.trips[trip_idx].src_city;
            let dst = self.trips[trip_idx].dst_city;
            let vehicle = self.trips[trip_idx].vehicle;
            let manifest = self.trips[trip_idx].manifest.clone();

            for parcel_idx in manifest {
                let lost = self.rng.gen_bool(self.config.loss_probability);
                let parcel = self.store.by_idx_mut(parcel_idx);
                let id = parcel.id;
                if lost {
                    parcel.mark_lost()?;
                    self.lost_total += 1;
                    self.emit(
                        Some(dst),
                        EventKind::Loss,
                        format!("Parcel {id} lost in transit"),
                    );
                } else {
                    parcel.deliver()?;
                }
            }

            self.emit(
                Some(dst),
                EventKind::Arrival,
                format!(
                    "Trip from {} arrived ({})",
                    self.config.city_name(src),
                    vehicle.label()
                ),
            );
        }
        Ok(())
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    /// The batching and vehicle-allocation pass, run once per day at the
    /// configured dispatch second.
    fn dispatch_pass(&mut self) -> EngineResult<()> {
        let city_count = self.config.city_count();
        let policy = self.config.policy_for_day(self.clock.day);
        let now = self.clock.now;

        for src_idx in 0..city_count {
            for dst_idx in 0..city_count {
                let src = CityId(src_idx as u16);
                let dst = CityId(dst_idx as u16);

                // Booked parcels on this pair, in booking order.
                let mut candidates: Vec<(ParcelIdx, Priority, u32)> = self
                    .store
                    .iter_indexed()
                    .filter(|(_, p)| {
                        p.status == ParcelStatus::Booked
                            && p.src_city == src
                            && p.dst_city == dst
                    })
                    .map(|(idx, p)| (idx, p.priority, p.weight_kg))
                    .collect();
                if candidates.is_empty() {
                    continue;
                }

                // Stable sort: urgent first, booking order within a priority.
                candidates.sort_by_key(|&(_, priority, _)| priority.rank());

                let mut batch: Vec<ParcelIdx> = Vec::new();
                let mut load_kg = 0u32;
                for (idx, priority, weight_kg) in candidates {
                    if policy.admits(priority, load_kg, weight_kg) {
                        batch.push(idx);
                        load_kg += weight_kg;
                    }
                }
                if batch.is_empty() {
                    continue;
                }

                // Same-city pairs ride the fixed local loop; everything else
                // asks the graph.
                let (route_km, reroute) = if src == dst {
                    (self.config.local_loop_km, false)
                } else {
                    match self.graph.shortest_distance(src, dst) {
                        Some(km) => (km, self.graph.is_reroute(src, dst, km)),
                        None => {
                            self.emit(
                                Some(src),
                                EventKind::RouteFailure,
                                format!(
                                    "Route to {} blocked or unreachable",
                                    self.config.city_name(dst)
                                ),
                            );
                            continue;
                        }
                    }
                };

                // First ladder rung that covers the load and has pool units.
                let Some(vehicle) = VehicleAssignment::LADDER
                    .iter()
                    .copied()
                    .find(|v| v.fits(load_kg) && self.pools.can_afford(src, v.pool_cost()))
                else {
                    self.emit(
                        Some(src),
                        EventKind::Deferral,
                        format!(
                            "Resource shortage for {} (need {load_kg} kg); batch deferred",
                            self.config.city_name(dst)
                        ),
                    );
                    continue;
                };

                self.pools.consume(src, vehicle.pool_cost());
                for &idx in &batch {
                    self.store.by_idx_mut(idx).dispatch(now, route_km)?;
                }
                self.trips
                    .push(Trip::depart(src, dst, vehicle, route_km, now, batch));

                let reason = dispatch_reason(vehicle, load_kg);
                let reroute_tag = if reroute { " [REROUTE]" } else { "" };
                self.emit(
                    Some(src),
                    EventKind::Dispatch,
                    format!(
                        "Sent {} to {} (load: {load_kg} kg). {reason}{reroute_tag}",
                        vehicle.label(),
                        self.config.city_name(dst)
                    ),
                );
            }
        }
        Ok(())
    }

    // ── Snapshot ──────────────────────────────────────────────────────────

    /// Derive the monitor snapshot from current state.
    pub fn snapshot(&self) -> Snapshot {
        let mut booked = 0;
        let mut in_transit = 0;
        for parcel in self.store.iter() {
            match parcel.status {
                ParcelStatus::Booked    => booked += 1,
                ParcelStatus::InTransit => in_transit += 1,
                _ => {}
            }
        }
        let trips = self
            .trips
            .iter()
            .map(|trip| TripRow {
                src_city: trip.src_city,
                dst_city: trip.dst_city,
                vehicle:  trip.vehicle,
                traveled_km: trip.traveled_km(self.clock.now, self.config.seconds_per_km),
                route_km: trip.route_km,
            })
            .collect();
        Snapshot {
            day: self.clock.day,
            second_of_day: self.clock.second_of_day,
            booked,
            in_transit,
            lost_total: self.lost_total,
            trips,
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn emit(&mut self, city: Option<CityId>, kind: EventKind, message: String) {
        let event = Event {
            day: self.clock.day,
            second: self.clock.second_of_day,
            city,
            kind,
            message,
        };
        self.observer.on_event(&event);
    }
}

/// Human-readable allocation reason carried in dispatch events.
fn dispatch_reason(vehicle: VehicleAssignment, load_kg: u32) -> &'static str {
    match vehicle {
        VehicleAssignment::Small => "Standard Overnight",
        VehicleAssignment::Medium if load_kg > 300 => "Capacity Upgrade",
        VehicleAssignment::Medium
        | VehicleAssignment::MediumPlusSmall
        | VehicleAssignment::DoubleMedium => "Standard",
        VehicleAssignment::Heavy | VehicleAssignment::HeavyConvoy => "Heavy Load Upgrade",
    }
}
