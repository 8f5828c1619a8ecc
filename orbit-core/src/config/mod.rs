//! Configuration for the Orbit scoring engine.

pub mod scoring_config;

pub use scoring_config::ScoringConfig;
