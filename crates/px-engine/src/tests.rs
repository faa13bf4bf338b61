//! Integration tests for px-engine.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use px_core::{CityId, OfficeId, TrackingId};
use px_model::{AdmissionPolicy, NetworkConfig, ParcelStatus, PoolAllotment, Priority};

use crate::{
    BookingError, BookingRequest, CancelError, ClockDriver, Engine, EngineObserver, Event,
    EventKind, SharedEngine, TrackError,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Three cities in a triangle: 0-1 = 10 km, 1-2 = 10 km, 0-2 = 5 km.
/// Long days with an early dispatch second keep tick arithmetic simple.
fn test_config() -> NetworkConfig {
    NetworkConfig {
        city_names: ["Alpha", "Beta", "Gamma"].iter().map(|s| s.to_string()).collect(),
        offices_per_city: 3,
        distances_km: vec![
            vec![0, 10, 5],
            vec![10, 0, 10],
            vec![5, 10, 0],
        ],
        blocked_roads: Vec::new(),
        seconds_per_day: 1_000,
        cycle_days: 5,
        dispatch_second: 5,
        seconds_per_km: 2,
        local_loop_km: 5,
        loss_probability: 0.0,
        pool_allotment: PoolAllotment::default(),
        day_policies: vec![
            AdmissionPolicy::Light,
            AdmissionPolicy::Medium,
            AdmissionPolicy::Light,
            AdmissionPolicy::Medium,
            AdmissionPolicy::Open,
        ],
        seed: 7,
    }
}

fn request(src: u16, dst: u16, weight_kg: u32, priority: Priority) -> BookingRequest {
    BookingRequest {
        src_city:   CityId(src),
        src_office: OfficeId(0),
        dst_city:   CityId(dst),
        dst_office: OfficeId(1),
        weight_kg,
        priority,
    }
}

/// Observer that appends every event to a shared vector.
struct EventSink(Arc<Mutex<Vec<Event>>>);

impl EngineObserver for EventSink {
    fn on_event(&mut self, event: &Event) {
        self.0.lock().unwrap().push(event.clone());
    }
}

fn observed_engine(config: NetworkConfig) -> (Engine, Arc<Mutex<Vec<Event>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let engine = Engine::with_observer(config, Box::new(EventSink(Arc::clone(&events)))).unwrap();
    (engine, events)
}

fn tick_n(engine: &mut Engine, n: u64) {
    for _ in 0..n {
        engine.tick().unwrap();
    }
}

fn events_of_kind(events: &Arc<Mutex<Vec<Event>>>, kind: EventKind) -> Vec<Event> {
    events.lock().unwrap().iter().filter(|e| e.kind == kind).cloned().collect()
}

// ── Booking, tracking, cancellation ───────────────────────────────────────────

#[cfg(test)]
mod booking_tests {
    use super::*;

    #[test]
    fn book_then_track_round_trip() {
        let mut engine = Engine::new(test_config()).unwrap();
        let id = engine.book(request(0, 1, 120, Priority::TwoDay)).unwrap();

        let view = engine.track(id).unwrap();
        assert_eq!(view.id, id);
        assert_eq!(view.src_city, CityId(0));
        assert_eq!(view.dst_city, CityId(1));
        assert_eq!(view.weight_kg, 120);
        assert_eq!(view.priority, Priority::TwoDay);
        assert_eq!(view.status, ParcelStatus::Booked);
        assert_eq!(view.booked_day, 1);
        assert!(view.progress.is_none());
    }

    #[test]
    fn tracking_is_idempotent() {
        let mut engine = Engine::new(test_config()).unwrap();
        let id = engine.book(request(0, 2, 50, Priority::Standard)).unwrap();
        assert_eq!(engine.track(id).unwrap(), engine.track(id).unwrap());
    }

    #[test]
    fn same_office_rejected() {
        let mut engine = Engine::new(test_config()).unwrap();
        let mut req = request(1, 1, 10, Priority::Standard);
        req.dst_office = req.src_office;
        assert!(matches!(engine.book(req), Err(BookingError::SameOffice)));
    }

    #[test]
    fn out_of_range_city_rejected() {
        let mut engine = Engine::new(test_config()).unwrap();
        let req = request(0, 9, 10, Priority::Standard);
        assert!(matches!(engine.book(req), Err(BookingError::CityOutOfRange(CityId(9)))));
    }

    #[test]
    fn out_of_range_office_rejected() {
        let mut engine = Engine::new(test_config()).unwrap();
        let mut req = request(0, 1, 10, Priority::Standard);
        req.src_office = OfficeId(99);
        assert!(matches!(engine.book(req), Err(BookingError::OfficeOutOfRange(_))));
    }

    #[test]
    fn unknown_id_not_found() {
        let engine = Engine::new(test_config()).unwrap();
        assert!(matches!(engine.track(TrackingId(42)), Err(TrackError::NotFound(_))));
    }

    #[test]
    fn cancel_booked_parcel() {
        let mut engine = Engine::new(test_config()).unwrap();
        let id = engine.book(request(0, 1, 10, Priority::Standard)).unwrap();
        engine.cancel(id).unwrap();
        assert_eq!(engine.track(id).unwrap().status, ParcelStatus::Cancelled);
    }

    #[test]
    fn double_cancel_reports_current_status() {
        let mut engine = Engine::new(test_config()).unwrap();
        let id = engine.book(request(0, 1, 10, Priority::Standard)).unwrap();
        engine.cancel(id).unwrap();
        assert!(matches!(
            engine.cancel(id),
            Err(CancelError::InvalidState(ParcelStatus::Cancelled))
        ));
    }

    #[test]
    fn cancel_unknown_id_not_found() {
        let mut engine = Engine::new(test_config()).unwrap();
        assert!(matches!(engine.cancel(TrackingId(1)), Err(CancelError::NotFound(_))));
    }

    #[test]
    fn cancel_after_dispatch_rejected() {
        let mut engine = Engine::new(test_config()).unwrap();
        let id = engine.book(request(0, 1, 10, Priority::Overnight)).unwrap();
        tick_n(&mut engine, 5); // past the dispatch second
        assert_eq!(engine.track(id).unwrap().status, ParcelStatus::InTransit);
        assert!(matches!(
            engine.cancel(id),
            Err(CancelError::InvalidState(ParcelStatus::InTransit))
        ));
    }

    #[test]
    fn cancelled_parcel_never_dispatched() {
        let mut engine = Engine::new(test_config()).unwrap();
        let id = engine.book(request(0, 1, 10, Priority::Overnight)).unwrap();
        engine.cancel(id).unwrap();
        tick_n(&mut engine, 10);
        assert_eq!(engine.track(id).unwrap().status, ParcelStatus::Cancelled);
    }
}

// ── Dispatch pass ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch_tests {
    use super::*;

    #[test]
    fn overnight_bypasses_light_day_cap() {
        // Five overnight parcels totalling 500 kg on a light (300 kg) day:
        // priority 1 bypasses the cap, so all five ride together.
        let (mut engine, events) = observed_engine(test_config());
        let ids: Vec<_> = (0..5)
            .map(|_| engine.book(request(0, 1, 100, Priority::Overnight)).unwrap())
            .collect();

        tick_n(&mut engine, 5);

        for id in &ids {
            assert_eq!(engine.track(*id).unwrap().status, ParcelStatus::InTransit);
        }
        let dispatches = events_of_kind(&events, EventKind::Dispatch);
        assert_eq!(dispatches.len(), 1);
        assert!(dispatches[0].message.contains("load: 500 kg"));
    }

    #[test]
    fn light_day_cap_filters_standard_parcels() {
        // Three 200 kg standard parcels: only the first fits under 300 kg.
        let mut engine = Engine::new(test_config()).unwrap();
        let ids: Vec<_> = (0..3)
            .map(|_| engine.book(request(0, 1, 200, Priority::Standard)).unwrap())
            .collect();

        tick_n(&mut engine, 5);

        assert_eq!(engine.track(ids[0]).unwrap().status, ParcelStatus::InTransit);
        assert_eq!(engine.track(ids[1]).unwrap().status, ParcelStatus::Booked);
        assert_eq!(engine.track(ids[2]).unwrap().status, ParcelStatus::Booked);
    }

    #[test]
    fn urgent_parcels_sort_ahead_of_earlier_bookings() {
        // A standard parcel booked first loses its batch slot to an
        // overnight parcel booked later once the cap bites.
        let mut engine = Engine::new(test_config()).unwrap();
        let standard = engine.book(request(0, 1, 200, Priority::Standard)).unwrap();
        let overnight = engine.book(request(0, 1, 250, Priority::Overnight)).unwrap();

        tick_n(&mut engine, 5);

        assert_eq!(engine.track(overnight).unwrap().status, ParcelStatus::InTransit);
        // 250 + 200 > 300 and standard does not bypass the cap.
        assert_eq!(engine.track(standard).unwrap().status, ParcelStatus::Booked);
    }

    #[test]
    fn small_batch_rides_small_vehicle() {
        let (mut engine, events) = observed_engine(test_config());
        engine.book(request(0, 1, 100, Priority::Overnight)).unwrap();
        tick_n(&mut engine, 5);

        let dispatches = events_of_kind(&events, EventKind::Dispatch);
        assert_eq!(dispatches.len(), 1);
        assert!(dispatches[0].message.contains("Bus-300"));
        assert!(dispatches[0].message.contains("Standard Overnight"));
    }

    #[test]
    fn medium_batch_is_a_capacity_upgrade() {
        let (mut engine, events) = observed_engine(test_config());
        for _ in 0..5 {
            engine.book(request(0, 1, 100, Priority::Overnight)).unwrap();
        }
        tick_n(&mut engine, 5);

        let dispatches = events_of_kind(&events, EventKind::Dispatch);
        assert!(dispatches[0].message.contains("Bus-600"));
        assert!(dispatches[0].message.contains("Capacity Upgrade"));
    }

    #[test]
    fn oversize_batch_rides_heavy_convoy() {
        let (mut engine, events) = observed_engine(test_config());
        engine.book(request(0, 1, 2_500, Priority::Overnight)).unwrap();
        tick_n(&mut engine, 5);

        let dispatches = events_of_kind(&events, EventKind::Dispatch);
        assert!(dispatches[0].message.contains("Truck+Convoy"));
        assert!(dispatches[0].message.contains("Heavy Load Upgrade"));
    }

    #[test]
    fn empty_small_pool_falls_through_to_medium() {
        let mut config = test_config();
        config.pool_allotment = PoolAllotment { small: 0, medium: 14, heavy: 7 };
        let (mut engine, events) = observed_engine(config);
        engine.book(request(0, 1, 250, Priority::Overnight)).unwrap();
        tick_n(&mut engine, 5);

        let dispatches = events_of_kind(&events, EventKind::Dispatch);
        assert_eq!(dispatches.len(), 1);
        assert!(dispatches[0].message.contains("Bus-600"));
    }

    #[test]
    fn exhausted_pools_defer_the_batch() {
        let mut config = test_config();
        config.pool_allotment = PoolAllotment { small: 0, medium: 0, heavy: 0 };
        let (mut engine, events) = observed_engine(config);
        let id = engine.book(request(0, 1, 250, Priority::Overnight)).unwrap();
        tick_n(&mut engine, 5);

        assert_eq!(events_of_kind(&events, EventKind::Dispatch).len(), 0);
        assert_eq!(events_of_kind(&events, EventKind::Deferral).len(), 1);
        assert_eq!(engine.track(id).unwrap().status, ParcelStatus::Booked);
    }

    #[test]
    fn same_city_pairs_use_the_local_loop() {
        let mut engine = Engine::new(test_config()).unwrap();
        let mut req = request(1, 1, 10, Priority::Overnight);
        req.dst_office = OfficeId(2);
        engine.book(req).unwrap();
        tick_n(&mut engine, 5);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.trips.len(), 1);
        assert_eq!(snapshot.trips[0].route_km, 5);
    }

    #[test]
    fn blocked_direct_road_triggers_reroute() {
        // With the 0-2 road closed the path runs via city 1 (20 km) while
        // the matrix still advertises 5 km direct, so the dispatch is
        // flagged as a reroute.
        let mut config = test_config();
        config.blocked_roads = vec![(CityId(0), CityId(2))];
        let (mut engine, events) = observed_engine(config);
        let id = engine.book(request(0, 2, 10, Priority::Overnight)).unwrap();
        tick_n(&mut engine, 5);

        let dispatches = events_of_kind(&events, EventKind::Dispatch);
        assert_eq!(dispatches.len(), 1);
        assert!(dispatches[0].message.contains("[REROUTE]"));
        assert_eq!(engine.track(id).unwrap().progress.unwrap().route_km, 20);
    }

    #[test]
    fn unreachable_destination_keeps_parcels_booked() {
        // Close both of Gamma's roads: no route from Alpha at all.
        let mut config = test_config();
        config.blocked_roads = vec![(CityId(0), CityId(2)), (CityId(1), CityId(2))];
        let (mut engine, events) = observed_engine(config);
        let id = engine.book(request(0, 2, 10, Priority::Overnight)).unwrap();
        tick_n(&mut engine, 5);

        assert_eq!(events_of_kind(&events, EventKind::RouteFailure).len(), 1);
        assert_eq!(events_of_kind(&events, EventKind::Dispatch).len(), 0);
        assert_eq!(engine.track(id).unwrap().status, ParcelStatus::Booked);
    }

    #[test]
    fn separate_destinations_get_separate_trips() {
        let mut engine = Engine::new(test_config()).unwrap();
        engine.book(request(0, 1, 10, Priority::Overnight)).unwrap();
        engine.book(request(0, 2, 10, Priority::Overnight)).unwrap();
        tick_n(&mut engine, 5);

        assert_eq!(engine.snapshot().trips.len(), 2);
    }
}

// ── Trip advancement ──────────────────────────────────────────────────────────

#[cfg(test)]
mod trip_tests {
    use super::*;

    #[test]
    fn arrival_lands_on_the_exact_due_tick() {
        // 10 km at 2 ticks/km: dispatched at tick 5, due at tick 25.
        let mut engine = Engine::new(test_config()).unwrap();
        let id = engine.book(request(0, 1, 10, Priority::Overnight)).unwrap();

        tick_n(&mut engine, 24);
        assert_eq!(engine.track(id).unwrap().status, ParcelStatus::InTransit);

        engine.tick().unwrap();
        assert_eq!(engine.track(id).unwrap().status, ParcelStatus::Delivered);
    }

    #[test]
    fn transit_progress_advances_and_clamps() {
        let mut engine = Engine::new(test_config()).unwrap();
        let id = engine.book(request(0, 1, 10, Priority::Overnight)).unwrap();

        tick_n(&mut engine, 15); // 10 ticks in flight = 5 of 10 km
        let progress = engine.track(id).unwrap().progress.unwrap();
        assert_eq!(progress.route_km, 10);
        assert!((progress.traveled_km - 5.0).abs() < f64::EPSILON);
        assert!((progress.fraction - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn certain_loss_marks_parcels_lost() {
        let mut config = test_config();
        config.loss_probability = 1.0;
        let (mut engine, events) = observed_engine(config);
        let id = engine.book(request(0, 1, 10, Priority::Overnight)).unwrap();

        tick_n(&mut engine, 25);

        assert_eq!(engine.track(id).unwrap().status, ParcelStatus::Lost);
        assert_eq!(engine.snapshot().lost_total, 1);
        assert_eq!(events_of_kind(&events, EventKind::Loss).len(), 1);
        assert_eq!(events_of_kind(&events, EventKind::Arrival).len(), 1);
    }

    #[test]
    fn zero_loss_delivers_everything() {
        let (mut engine, events) = observed_engine(test_config());
        let ids: Vec<_> = (0..4)
            .map(|_| engine.book(request(0, 1, 10, Priority::Overnight)).unwrap())
            .collect();

        tick_n(&mut engine, 25);

        for id in &ids {
            assert_eq!(engine.track(*id).unwrap().status, ParcelStatus::Delivered);
        }
        assert_eq!(engine.snapshot().lost_total, 0);
        assert_eq!(events_of_kind(&events, EventKind::Arrival).len(), 1);
    }

    #[test]
    fn snapshot_counts_by_status() {
        let mut engine = Engine::new(test_config()).unwrap();
        engine.book(request(0, 1, 10, Priority::Overnight)).unwrap();
        engine.book(request(0, 1, 500, Priority::Standard)).unwrap(); // over the cap

        tick_n(&mut engine, 5);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.in_transit, 1);
        assert_eq!(snapshot.booked, 1);
        assert_eq!(snapshot.trips.len(), 1);
    }
}

// ── Daily rollover ────────────────────────────────────────────────────────────

#[cfg(test)]
mod rollover_tests {
    use super::*;

    /// Shorter days so rollovers are cheap to reach: 30 km to the only other
    /// city would not finish within one 50-tick day.
    fn short_day_config() -> NetworkConfig {
        let mut config = test_config();
        config.seconds_per_day = 50;
        config.dispatch_second = 10;
        config
    }

    #[test]
    fn finished_trips_retire_at_rollover_in_flight_survive() {
        let mut config = short_day_config();
        config.pool_allotment = PoolAllotment { small: 1, medium: 0, heavy: 0 };
        let (mut engine, events) = observed_engine(config);

        // Finishes at tick 10 + 5*2 = 20, well inside day 1.
        let mut local = request(0, 0, 10, Priority::Overnight);
        local.dst_office = OfficeId(2);
        engine.book(local).unwrap();
        // 10 km = 20 ticks: departs at tick 10, lands at tick 30 — but uses
        // city 1's pool, so book it from city 1 to keep city 0's pool free.
        engine.book(request(1, 0, 10, Priority::Overnight)).unwrap();

        tick_n(&mut engine, 25);
        assert_eq!(engine.snapshot().trips.len(), 2);

        tick_n(&mut engine, 25); // through the day boundary at tick 50
        assert_eq!(events_of_kind(&events, EventKind::NewDay).len(), 1);

        // The local trip (finished tick 20) was retired; the 10 km trip
        // finished at tick 30, also before rollover. Book fresh on day 2 to
        // show the pools refilled.
        assert_eq!(engine.snapshot().trips.len(), 0);
        let id = engine.book(request(0, 1, 10, Priority::Overnight)).unwrap();
        tick_n(&mut engine, 15); // dispatch second of day 2 is tick 60
        assert_eq!(engine.track(id).unwrap().status, ParcelStatus::InTransit);
    }

    #[test]
    fn in_flight_trip_crosses_the_day_boundary() {
        // Close the direct 0-2 road so the trip runs 20 km (40 ticks):
        // departs at tick 10, due at tick 90, past the day boundary at 50.
        let mut config = short_day_config();
        config.blocked_roads = vec![(CityId(0), CityId(2))];
        let mut engine = Engine::new(config).unwrap();

        let id = engine.book(request(0, 2, 10, Priority::Overnight)).unwrap();
        tick_n(&mut engine, 55); // day 2, trip still in flight (due tick 90)

        assert_eq!(engine.day(), 2);
        assert_eq!(engine.snapshot().trips.len(), 1);
        assert_eq!(engine.track(id).unwrap().status, ParcelStatus::InTransit);

        tick_n(&mut engine, 35); // tick 90
        assert_eq!(engine.track(id).unwrap().status, ParcelStatus::Delivered);
    }

    #[test]
    fn day_wraps_to_one_after_the_cycle() {
        let mut config = short_day_config();
        config.cycle_days = 2;
        config.day_policies = vec![AdmissionPolicy::Light, AdmissionPolicy::Open];
        let mut engine = Engine::new(config).unwrap();

        tick_n(&mut engine, 50);
        assert_eq!(engine.day(), 2);
        tick_n(&mut engine, 50);
        assert_eq!(engine.day(), 1);
    }

    #[test]
    fn deferred_batch_dispatches_after_pools_refill() {
        let mut config = short_day_config();
        config.pool_allotment = PoolAllotment { small: 1, medium: 0, heavy: 0 };
        let (mut engine, events) = observed_engine(config);

        // Two batches from city 0 but only one small unit per day.
        engine.book(request(0, 1, 10, Priority::Overnight)).unwrap();
        engine.book(request(0, 2, 10, Priority::Overnight)).unwrap();

        tick_n(&mut engine, 10);
        assert_eq!(events_of_kind(&events, EventKind::Dispatch).len(), 1);
        assert_eq!(events_of_kind(&events, EventKind::Deferral).len(), 1);

        tick_n(&mut engine, 50); // day 2's dispatch pass at tick 60
        assert_eq!(events_of_kind(&events, EventKind::Dispatch).len(), 2);
    }
}

// ── Determinism ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod determinism_tests {
    use super::*;

    fn run_once(seed: u64) -> Vec<ParcelStatus> {
        let mut config = test_config();
        config.seed = seed;
        config.loss_probability = 0.5;
        let mut engine = Engine::new(config).unwrap();
        let ids: Vec<_> = (0..20)
            .map(|_| engine.book(request(0, 1, 10, Priority::Overnight)).unwrap())
            .collect();
        tick_n(&mut engine, 30);
        ids.iter().map(|id| engine.track(*id).unwrap().status).collect()
    }

    #[test]
    fn same_seed_same_run() {
        assert_eq!(run_once(1234), run_once(1234));
    }

    #[test]
    fn seed_changes_loss_outcomes() {
        // 20 coin flips per run: overwhelmingly unlikely to match exactly.
        assert_ne!(run_once(1), run_once(2));
    }
}

// ── Shared engine and clock actor ─────────────────────────────────────────────

#[cfg(test)]
mod concurrency_tests {
    use super::*;

    #[test]
    fn clock_driver_advances_and_stops() {
        let engine = SharedEngine::new(Engine::new(test_config()).unwrap());
        let clock = ClockDriver::spawn(engine.clone(), Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(50));
        clock.stop().unwrap();

        let ticked = engine.lock().now();
        assert!(ticked > px_core::Tick::ZERO);
        // Stopped: no further ticks.
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(engine.lock().now(), ticked);
    }

    #[test]
    fn bookings_from_another_thread_land() {
        let engine = SharedEngine::new(Engine::new(test_config()).unwrap());
        let worker = {
            let engine = engine.clone();
            std::thread::spawn(move || {
                engine.book(request(0, 1, 10, Priority::Standard)).unwrap()
            })
        };
        let id = worker.join().unwrap();
        assert_eq!(engine.track(id).unwrap().status, ParcelStatus::Booked);
    }

    #[test]
    fn booking_during_clock_run_is_trackable() {
        let engine = SharedEngine::new(Engine::new(test_config()).unwrap());
        let clock = ClockDriver::spawn(engine.clone(), Duration::from_millis(1));
        let id = engine.book(request(0, 1, 10, Priority::Overnight)).unwrap();
        std::thread::sleep(Duration::from_millis(30));
        clock.stop().unwrap();

        // Dispatched by the background clock somewhere past the dispatch
        // second; either still booked (slow machine) or further along.
        let status = engine.track(id).unwrap().status;
        assert_ne!(status, ParcelStatus::Cancelled);
    }
}
