//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into dense `Vec`s via `id.0 as usize`, but callers should
//! prefer the `.index()` helpers for clarity.
//!
//! `TrackingId` is not an index — it is a customer-facing random identifier —
//! so it gets its own implementation below instead of the macro.

use std::fmt;

use crate::SimRng;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — the type's maximum value.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a city in the network's fixed city table.
    pub struct CityId(u16);
}

typed_id! {
    /// Index of an office within a city (0 is the hub).
    pub struct OfficeId(u16);
}

typed_id! {
    /// Index of a parcel in the engine's authoritative parcel store.
    ///
    /// Parcels are never removed, so a `ParcelIdx` stays valid for the whole
    /// process lifetime.
    pub struct ParcelIdx(u32);
}

// ── TrackingId ────────────────────────────────────────────────────────────────

/// Customer-facing tracking identifier for a parcel.
///
/// Drawn uniformly from the full non-zero `u64` space, which makes collisions
/// astronomically unlikely; the parcel store still re-draws on the off chance
/// a duplicate comes up, so lookups are guaranteed unique.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackingId(pub u64);

impl TrackingId {
    /// Draw a fresh non-zero id from `rng`.
    pub fn generate(rng: &mut SimRng) -> Self {
        loop {
            let raw: u64 = rng.random();
            if raw != 0 {
                return TrackingId(raw);
            }
        }
    }
}

impl fmt::Display for TrackingId {
    /// Printed the way customers see it on a receipt, e.g. `P-00A3F29B1C44D2E7`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{:016X}", self.0)
    }
}
