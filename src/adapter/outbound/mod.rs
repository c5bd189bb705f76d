//! Outbound adapters (driven side).

pub mod docker;
