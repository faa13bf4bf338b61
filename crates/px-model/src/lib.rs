//! `px-model` — the data model for the `px` parcel-network simulator.
//!
//! # What lives here
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`config`]  | `NetworkConfig`, per-day `AdmissionPolicy`               |
//! | [`parcel`]  | `Parcel`, `Priority`, `ParcelStatus` state machine       |
//! | [`trip`]    | `Trip` — one vehicle departure and its manifest          |
//! | [`vehicle`] | `VehicleClass`, the `VehicleAssignment` ladder, pools    |
//! | [`store`]   | `ParcelStore` — ordered collection + O(1) tracking index |
//! | [`error`]   | `ModelError`, `ModelResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod config;
pub mod error;
pub mod parcel;
pub mod store;
pub mod trip;
pub mod vehicle;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AdmissionPolicy, NetworkConfig};
pub use error::{ModelError, ModelResult};
pub use parcel::{Parcel, ParcelStatus, Priority};
pub use store::ParcelStore;
pub use trip::Trip;
pub use vehicle::{CityPools, DayPools, PoolAllotment, PoolCost, VehicleAssignment, VehicleClass};
