//! Durable run state tracking for the Vignette documentary pipeline.
//!
//! [`RunStore`] persists full-run snapshots to a run-scoped directory on the
//! filesystem; [`RunTracker`] owns the in-memory [`Run`](vignette_core::Run),
//! applies every mutation through it, and persists a snapshot after each one
//! (write-through durability). Optional [`RunObserver`](vignette_interface::RunObserver)
//! sinks receive mutation events; their failures never affect core behavior.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod store;
mod tracker;

pub use store::RunStore;
pub use tracker::RunTracker;
