//! # solarsim-engine
//!
//! Typed access to an external, licensed desktop GIS engine.
//!
//! All raster work (LAS dataset rasterization, clipping, resampling and solar
//! radiation modeling) happens inside the vendor runtime. This crate turns
//! each call into a serializable [`Operation`], sends it through a
//! [`GisEngine`], and reports failures as [`EngineError`]s.
//!
//! ## Engines
//!
//! - [`BridgeEngine`]: a child process running the vendor's Python
//!   interpreter with a bundled request server, spoken to over JSON lines
//!   (see [`protocol`]).
//! - [`DryRunEngine`]: records operations and tracks license state without
//!   running anything.
//!
//! ## Example
//!
//! ```rust,ignore
//! use solarsim_engine::{BridgeConfig, BridgeEngine, Extension, GisEngine, write_bridge_script};
//!
//! let script = write_bridge_script(r"C:\Temp\ArcPyScratch")?;
//! let mut engine = BridgeEngine::spawn(&BridgeConfig::new(script))?;
//!
//! engine.require_extension(Extension::Spatial)?;
//! // ... run operations ...
//! engine.check_in(Extension::Spatial)?;
//! ```

mod bridge;
mod dry_run;
mod engine;
mod error;
mod operation;
pub mod protocol;
mod types;

pub use bridge::{
    write_bridge_script, BridgeConfig, BridgeEngine, BRIDGE_SCRIPT, BRIDGE_SCRIPT_NAME,
    DEFAULT_INTERPRETER,
};
pub use dry_run::DryRunEngine;
pub use engine::GisEngine;
pub use error::{EngineError, EngineResult};
pub use operation::{Operation, Reply};
pub use types::{
    CellAssignment, ComputeStats, EnvSetting, Extension, ExtensionStatus, RasterDataType,
    ResamplingType, SamplingType, TimeConfiguration, ValueField,
};
