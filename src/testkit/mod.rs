//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`runtime`] - `RecordingRuntime`, an in-memory implementation of every
//!   runtime port that logs calls and fails on demand.
//! - [`reporter`] - `RecordingReporter`, which keeps every progress event.

pub mod reporter;
pub mod runtime;

pub use reporter::RecordingReporter;
pub use runtime::RecordingRuntime;
