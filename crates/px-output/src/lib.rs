//! `px-output` — monitor output writers for the px parcel-network simulator.
//!
//! Two backends implement [`MonitorWriter`] and are driven by
//! [`MonitorObserver`], which implements `px_engine::EngineObserver`:
//!
//! | Backend               | Persists                                        |
//! |-----------------------|-------------------------------------------------|
//! | [`FileMonitorWriter`] | `state.txt` (latest snapshot), `events.csv`     |
//! | [`MemoryMonitor`]     | in-memory vectors, for tests and embedding      |
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::{Arc, Mutex};
//!
//! use px_output::{FileMonitorWriter, MonitorObserver};
//!
//! let writer = FileMonitorWriter::new(Path::new("./monitor"), config.city_names.clone())?;
//! let observer = Arc::new(Mutex::new(MonitorObserver::new(writer)));
//! let engine = Engine::with_observer(config, Box::new(Arc::clone(&observer)))?;
//! // ... run ...
//! if let Some(e) = observer.lock().unwrap().take_error() {
//!     eprintln!("monitor output error: {e}");
//! }
//! ```

pub mod error;
pub mod file;
pub mod memory;
pub mod observer;
pub mod writer;


pub use error::{OutputError, OutputResult};
pub use file::FileMonitorWriter;
pub use memory::MemoryMonitor;
pub use observer::MonitorObserver;
pub use writer::MonitorWriter;
