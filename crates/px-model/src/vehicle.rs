//! Vehicle classes, the allocation ladder, and per-city daily pools.
//!
//! The ladder is a closed enum iterated in a fixed preference order
//! (smaller/cheaper first), each tier carrying its weight ceiling and the
//! pool units it consumes.

use std::fmt;

use px_core::CityId;

// ── VehicleClass ──────────────────────────────────────────────────────────────

/// The three physical vehicle classes a city keeps in its daily pools.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleClass {
    /// 300 kg van.
    Small,
    /// 600 kg bus.
    Medium,
    /// 2000 kg truck.
    Heavy,
}

impl VehicleClass {
    /// Weight ceiling for one vehicle of this class.
    #[inline]
    pub fn capacity_kg(self) -> u32 {
        match self {
            VehicleClass::Small  => 300,
            VehicleClass::Medium => 600,
            VehicleClass::Heavy  => 2000,
        }
    }
}

// ── The allocation ladder ─────────────────────────────────────────────────────

/// Pool units one dispatch consumes, per class.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct PoolCost {
    pub small:  u16,
    pub medium: u16,
    pub heavy:  u16,
}

/// One rung of the vehicle-allocation ladder: a concrete combination of
/// vehicles sent out as a single trip.
///
/// Tried in [`VehicleAssignment::LADDER`] order; the first rung whose weight
/// ceiling covers the batch and whose pool units are available wins, so
/// smaller, cheaper vehicles are always preferred.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleAssignment {
    /// One small van, ≤ 300 kg.
    Small,
    /// One medium bus, ≤ 600 kg.
    Medium,
    /// One medium plus one small, ≤ 900 kg.
    MediumPlusSmall,
    /// Two medium buses, ≤ 1200 kg.
    DoubleMedium,
    /// One heavy truck, ≤ 2000 kg.
    Heavy,
    /// A heavy truck with an implied convoy; no ceiling.  Still consumes a
    /// single heavy pool unit — the deployment does not model convoy capacity
    /// as a separate resource.
    HeavyConvoy,
}

impl VehicleAssignment {
    /// Fixed preference order for allocation.
    pub const LADDER: [VehicleAssignment; 6] = [
        VehicleAssignment::Small,
        VehicleAssignment::Medium,
        VehicleAssignment::MediumPlusSmall,
        VehicleAssignment::DoubleMedium,
        VehicleAssignment::Heavy,
        VehicleAssignment::HeavyConvoy,
    ];

    /// Physical vehicles this rung sends out.
    pub fn units(self) -> &'static [VehicleClass] {
        match self {
            VehicleAssignment::Small           => &[VehicleClass::Small],
            VehicleAssignment::Medium          => &[VehicleClass::Medium],
            VehicleAssignment::MediumPlusSmall => &[VehicleClass::Medium, VehicleClass::Small],
            VehicleAssignment::DoubleMedium    => &[VehicleClass::Medium, VehicleClass::Medium],
            VehicleAssignment::Heavy           => &[VehicleClass::Heavy],
            VehicleAssignment::HeavyConvoy     => &[VehicleClass::Heavy],
        }
    }

    /// Weight ceiling of this rung: the summed capacity of its vehicles.
    /// `None` means unbounded (the convoy absorbs any overflow).
    pub fn max_load_kg(self) -> Option<u32> {
        match self {
            VehicleAssignment::HeavyConvoy => None,
            _ => Some(self.units().iter().map(|unit| unit.capacity_kg()).sum()),
        }
    }

    /// Pool units this rung consumes from the source city.
    pub fn pool_cost(self) -> PoolCost {
        let mut cost = PoolCost::default();
        for unit in self.units() {
            match unit {
                VehicleClass::Small  => cost.small += 1,
                VehicleClass::Medium => cost.medium += 1,
                VehicleClass::Heavy  => cost.heavy += 1,
            }
        }
        cost
    }

    /// Fleet label as it appears in events and monitor output.
    pub fn label(self) -> &'static str {
        match self {
            VehicleAssignment::Small           => "Bus-300",
            VehicleAssignment::Medium          => "Bus-600",
            VehicleAssignment::MediumPlusSmall => "Bus-600+300",
            VehicleAssignment::DoubleMedium    => "2xBus-600",
            VehicleAssignment::Heavy           => "Truck",
            VehicleAssignment::HeavyConvoy     => "Truck+Convoy",
        }
    }

    /// `true` for a rung that can carry `load_kg`.
    #[inline]
    pub fn fits(self, load_kg: u32) -> bool {
        self.max_load_kg().is_none_or(|max| load_kg <= max)
    }
}

impl fmt::Display for VehicleAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Daily pools ───────────────────────────────────────────────────────────────

/// Fresh departures each city receives per class at every daily rollover.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolAllotment {
    pub small:  u16,
    pub medium: u16,
    pub heavy:  u16,
}

impl Default for PoolAllotment {
    /// Reference deployment: 14 small, 14 medium, 7 heavy per city per day.
    fn default() -> Self {
        Self { small: 14, medium: 14, heavy: 7 }
    }
}

/// Remaining departures for one city today.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayPools {
    pub small:  u16,
    pub medium: u16,
    pub heavy:  u16,
}

/// Per-city vehicle pools for the current operational day.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CityPools {
    pools: Vec<DayPools>,
    allotment: PoolAllotment,
}

impl CityPools {
    /// Create pools for `city_count` cities, filled to the full allotment.
    pub fn new(city_count: usize, allotment: PoolAllotment) -> Self {
        let mut pools = Self { pools: vec![DayPools::default(); city_count], allotment };
        pools.reset();
        pools
    }

    /// Refill every city to its per-day allotment (daily rollover).
    pub fn reset(&mut self) {
        let full = DayPools {
            small:  self.allotment.small,
            medium: self.allotment.medium,
            heavy:  self.allotment.heavy,
        };
        self.pools.fill(full);
    }

    /// Remaining pools for `city`.
    #[inline]
    pub fn remaining(&self, city: CityId) -> DayPools {
        self.pools[city.index()]
    }

    /// Whether `city` can pay `cost` in full.
    pub fn can_afford(&self, city: CityId, cost: PoolCost) -> bool {
        let p = &self.pools[city.index()];
        p.small >= cost.small && p.medium >= cost.medium && p.heavy >= cost.heavy
    }

    /// Deduct `cost` from `city`'s pools.
    ///
    /// Callers must check [`can_afford`][Self::can_afford] first; the check
    /// and the deduction happen under the same engine lock, so counts can
    /// never go negative.
    ///
    /// # Panics
    /// Panics in debug mode if the city cannot afford the cost.
    pub fn consume(&mut self, city: CityId, cost: PoolCost) {
        debug_assert!(self.can_afford(city, cost));
        let p = &mut self.pools[city.index()];
        p.small -= cost.small;
        p.medium -= cost.medium;
        p.heavy -= cost.heavy;
    }
}
