//! # solarsim-runner
//!
//! Pipelines and CLI for the Philadelphia rooftop solar workflow:
//!
//! 1. [`sync_tiles`] mirrors the LiDAR point-cloud tiles into a local cache.
//! 2. [`run_dsm`] builds a LAS dataset from the cache and rasterizes it into
//!    a digital surface model.
//! 3. [`run_solar`] clips and resamples an elevation model, masks it to
//!    building footprints and runs an annual solar radiation simulation.
//!
//! The DSM and solar stages drive any [`GisEngine`](solarsim_engine::GisEngine);
//! [`open_engine`] picks the vendor bridge or a dry-run recorder.

pub mod config;
mod dsm;
mod error;
mod fetch;
mod launch;
mod solar;

pub use config::{DsmConfig, EngineConfig, RunnerConfig, SolarConfig, TilesConfig};
pub use dsm::{run_dsm, DsmOutcome};
pub use error::{Result, RunnerError};
pub use fetch::sync_tiles;
pub use launch::open_engine;
pub use solar::{check_inputs, run_solar, InputReport, SolarOutcome};
