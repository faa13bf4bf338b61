//! Network configuration.
//!
//! Everything fixed for a deployment lives here: the city table, the direct
//! distance matrix, the operational calendar, dispatch constants, pool
//! allotments, and the per-day batching admission policies.
//! [`NetworkConfig::reference`] is the reference deployment the simulator
//! ships with.

use px_core::{CityId, OfficeId};

use crate::vehicle::PoolAllotment;
use crate::{ModelError, ModelResult, Priority};

// ── AdmissionPolicy ───────────────────────────────────────────────────────────

/// Day-dependent batching admission rule.
///
/// During a dispatch pass, candidates are taken urgent-first; a candidate is
/// admitted when its priority bypasses the day's soft cap, or the running
/// batch weight (including it) stays within the cap.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdmissionPolicy {
    /// Overnight parcels ride unconditionally; everything else only while
    /// the batch stays within 300 kg.
    Light,
    /// Overnight and 2-day parcels ride unconditionally; standard parcels
    /// only while the batch stays within 600 kg.
    Medium,
    /// Clear-out day: everything rides.
    Open,
}

impl AdmissionPolicy {
    /// Soft weight cap applied to non-bypassing parcels; `None` = no cap.
    #[inline]
    pub fn soft_cap_kg(self) -> Option<u32> {
        match self {
            AdmissionPolicy::Light  => Some(300),
            AdmissionPolicy::Medium => Some(600),
            AdmissionPolicy::Open   => None,
        }
    }

    /// Whether `priority` bypasses the soft cap entirely.
    #[inline]
    pub fn bypasses_cap(self, priority: Priority) -> bool {
        match self {
            AdmissionPolicy::Light  => priority == Priority::Overnight,
            AdmissionPolicy::Medium => priority <= Priority::TwoDay,
            AdmissionPolicy::Open   => true,
        }
    }

    /// Admission decision for one candidate given the running batch weight.
    pub fn admits(self, priority: Priority, batch_kg: u32, parcel_kg: u32) -> bool {
        if self.bypasses_cap(priority) {
            return true;
        }
        match self.soft_cap_kg() {
            Some(cap) => batch_kg + parcel_kg <= cap,
            None => true,
        }
    }
}

// ── NetworkConfig ─────────────────────────────────────────────────────────────

/// Fixed deployment parameters for one simulated network.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkConfig {
    /// City names; city ids index this table.
    pub city_names: Vec<String>,
    /// Offices per city, hub included.  Office 0 is the hub.
    pub offices_per_city: u16,
    /// Symmetric direct-distance matrix in km; 0 = no direct road.
    pub distances_km: Vec<Vec<u32>>,
    /// Roads closed for the current deployment.  The matrix entry stays and
    /// serves as the direct-distance reference for reroute detection.
    pub blocked_roads: Vec<(CityId, CityId)>,

    /// Length of one operational day in seconds (= ticks).
    pub seconds_per_day: u32,
    /// Days in the repeating cycle; also the length of `day_policies`.
    pub cycle_days: u32,
    /// Second-of-day at which the dispatch pass runs.
    pub dispatch_second: u32,
    /// Ticks one kilometre of travel takes.
    pub seconds_per_km: u32,
    /// Fixed route distance for same-city (inter-office) trips.
    pub local_loop_km: u32,

    /// Independent probability that a parcel is lost at trip arrival.
    pub loss_probability: f64,
    /// Daily vehicle allotment per city.
    pub pool_allotment: PoolAllotment,
    /// Admission policy for each day of the cycle (index 0 = day 1).
    pub day_policies: Vec<AdmissionPolicy>,
    /// Master RNG seed; the same seed always produces identical runs.
    pub seed: u64,
}

impl NetworkConfig {
    /// The reference deployment: eight cities, 180-second days on a five-day
    /// cycle, dispatch at second 150, 2 ticks per km.
    pub fn reference() -> Self {
        let cities = [
            "Lahore", "Karachi", "Islamabad", "Multan",
            "Faisalabad", "Peshawar", "Quetta", "Sialkot",
        ];
        let distances_km = vec![
            vec![0, 15, 8, 6, 4, 10, 14, 3],
            vec![15, 0, 12, 10, 13, 14, 6, 14],
            vec![8, 12, 0, 6, 7, 4, 13, 10],
            vec![6, 10, 6, 0, 5, 9, 12, 7],
            vec![4, 13, 7, 5, 0, 8, 14, 5],
            vec![10, 14, 4, 9, 8, 0, 13, 11],
            vec![14, 6, 13, 12, 14, 13, 0, 15],
            vec![3, 14, 10, 7, 5, 11, 15, 0],
        ];
        Self {
            city_names: cities.iter().map(|s| s.to_string()).collect(),
            offices_per_city: 6,
            distances_km,
            blocked_roads: Vec::new(),
            seconds_per_day: 180,
            cycle_days: 5,
            dispatch_second: 150,
            seconds_per_km: 2,
            local_loop_km: 5,
            loss_probability: 0.005,
            pool_allotment: PoolAllotment::default(),
            day_policies: vec![
                AdmissionPolicy::Light,
                AdmissionPolicy::Medium,
                AdmissionPolicy::Light,
                AdmissionPolicy::Medium,
                AdmissionPolicy::Open,
            ],
            seed: 0,
        }
    }

    /// Sanity-check the configuration.
    pub fn validate(&self) -> ModelResult<()> {
        if self.city_names.is_empty() {
            return Err(ModelError::Config("no cities configured".into()));
        }
        if self.distances_km.len() != self.city_names.len() {
            return Err(ModelError::Config(format!(
                "distance matrix has {} rows for {} cities",
                self.distances_km.len(),
                self.city_names.len()
            )));
        }
        if self.offices_per_city == 0 {
            return Err(ModelError::Config("cities need at least one office".into()));
        }
        if self.seconds_per_day == 0 || self.cycle_days == 0 || self.seconds_per_km == 0 {
            return Err(ModelError::Config("clock constants must be non-zero".into()));
        }
        if self.dispatch_second >= self.seconds_per_day {
            return Err(ModelError::Config(format!(
                "dispatch second {} is outside the {}-second day",
                self.dispatch_second, self.seconds_per_day
            )));
        }
        if self.day_policies.len() != self.cycle_days as usize {
            return Err(ModelError::Config(format!(
                "{} day policies for a {}-day cycle",
                self.day_policies.len(),
                self.cycle_days
            )));
        }
        for &(a, b) in &self.blocked_roads {
            if !self.contains_city(a) || !self.contains_city(b) {
                return Err(ModelError::Config(format!(
                    "blocked road {a}-{b} references an unknown city"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.loss_probability) {
            return Err(ModelError::Config("loss probability must be within [0, 1]".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn city_count(&self) -> usize {
        self.city_names.len()
    }

    /// `true` when `city` indexes the city table.
    #[inline]
    pub fn contains_city(&self, city: CityId) -> bool {
        city.index() < self.city_count()
    }

    /// `true` when `office` is valid within any city.
    #[inline]
    pub fn contains_office(&self, office: OfficeId) -> bool {
        office.0 < self.offices_per_city
    }

    /// Display name for `city`.
    pub fn city_name(&self, city: CityId) -> &str {
        &self.city_names[city.index()]
    }

    /// Admission policy in force on `day` (1-based within the cycle).
    pub fn policy_for_day(&self, day: u32) -> AdmissionPolicy {
        self.day_policies[(day as usize - 1) % self.day_policies.len()]
    }
}
