//! `px-core` — foundational types for the `px` parcel-network simulator.
//!
//! This crate is a dependency of every other `px-*` crate.  It intentionally
//! has no `px-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module   | Contents                                          |
//! |----------|---------------------------------------------------|
//! | [`ids`]  | `CityId`, `OfficeId`, `ParcelIdx`, `TrackingId`   |
//! | [`time`] | `Tick`, `DayClock`                                |
//! | [`rng`]  | `SimRng` (seeded simulation RNG)                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{CityId, OfficeId, ParcelIdx, TrackingId};
pub use rng::SimRng;
pub use time::{DayClock, Tick};
