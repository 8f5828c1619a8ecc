//! Core types, errors, configuration, and observability for the Orbit
//! scoring engine.
//!
//! Orbit tracks systemic issues discovered from web sources and scores
//! them with Beta-distribution posteriors. This crate carries the
//! cross-cutting pieces shared by the scoring and storage crates:
//! one error enum per subsystem, the `ScoringConfig` knobs, tracing
//! setup, and small shared helpers.

pub mod config;
pub mod constants;
pub mod errors;
pub mod time;
pub mod tracing;
