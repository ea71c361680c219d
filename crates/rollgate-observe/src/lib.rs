//! rollgate-observe — observation layer for the rollgate rollout monitor.
//!
//! Defines the read-only snapshot types the monitor consumes each poll
//! and the [`ObservationService`] seam through which it watches a
//! workload. Production implementations wrap the platform API client;
//! [`ScriptedObservation`] provides an in-memory implementation for
//! tests.
//!
//! The monitor issues exactly two reads through this seam — workload
//! status and pod listing — and never mutates anything.

pub mod error;
pub mod script;
pub mod service;
pub mod types;

pub use error::{ObserveError, ObserveResult};
pub use script::ScriptedObservation;
pub use service::ObservationService;
pub use types::*;
