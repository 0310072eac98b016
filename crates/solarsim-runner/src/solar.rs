//! Solar pipeline: clip the DEM to the zones, resample it, mask to building
//! footprints and run the area solar radiation simulation.
//!
//! Like the DSM pipeline, the `Spatial` extension is only checked in on
//! success.

use crate::config::SolarConfig;
use crate::error::Result;
use solarsim_engine::{EnvSetting, Extension, GisEngine, Operation};
use solarsim_metrics::metric_defs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Which inputs exist on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputReport {
    /// Elevation model found.
    pub dem: bool,
    /// Clip polygons found.
    pub zones: bool,
    /// Building footprints found.
    pub buildings: bool,
}

impl InputReport {
    /// Whether every input exists.
    pub fn all_present(&self) -> bool {
        self.dem && self.zones && self.buildings
    }
}

/// Report whether the DEM, zones and building footprints exist.
///
/// Missing inputs are logged, not fatal; the engine reports the real error.
pub fn check_inputs(config: &SolarConfig) -> InputReport {
    let report = InputReport {
        dem: exists(config, &config.dem, "DEM"),
        zones: exists(config, &config.zones, "Empowerment Zones"),
        buildings: exists(config, &config.buildings, "Buildings"),
    };
    if !report.all_present() {
        warn!("Some solar inputs are missing; the engine will likely fail");
    }
    report
}

fn exists(config: &SolarConfig, path: &Path, label: &str) -> bool {
    let resolved = config.resolve(path);
    let found = resolved.exists();
    info!("{:<18} exists? {}", label, found);
    if !found {
        warn!("{} not found at {}", label, resolved.display());
    }
    found
}

/// Artifacts and timing of [`run_solar`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolarOutcome {
    /// Input existence at the start of the run.
    pub inputs: InputReport,
    /// Clipped DEM.
    pub clipped: PathBuf,
    /// Resampled DEM fed to the simulation.
    pub resampled: PathBuf,
    /// Solar radiation raster.
    pub output: PathBuf,
    /// Wall-clock time of the radiation simulation alone.
    pub elapsed: Duration,
}

/// Run the solar pipeline.
pub fn run_solar<E: GisEngine + ?Sized>(engine: &mut E, config: &SolarConfig) -> Result<SolarOutcome> {
    engine.require_extension(Extension::Spatial)?;

    engine.set_env(EnvSetting::ScratchWorkspace(config.scratch_workspace.clone()))?;
    engine.set_env(EnvSetting::Workspace(config.workspace.clone()))?;
    engine.set_env(EnvSetting::OverwriteOutput(true))?;

    let inputs = check_inputs(config);

    info!("→ Clipping DEM…");
    engine.run(&Operation::ClipRaster {
        in_raster: config.resolve(&config.dem),
        out_raster: config.clipped_dem.clone(),
        in_template_dataset: config.resolve(&config.zones),
        nodata_value: config.nodata_value,
        clipping_geometry: config.clipping_geometry,
        maintain_clipping_extent: config.maintain_clipping_extent,
    })?;
    info!("Clip complete: {}", config.clipped_dem.display());

    info!("→ Resampling to {} m…", config.resample_cell_size);
    engine.run(&Operation::Resample {
        in_raster: config.clipped_dem.clone(),
        out_raster: config.resampled_dem.clone(),
        cell_size: config.resample_cell_size,
        resampling_type: config.resampling_type,
    })?;
    info!("Resample complete: {}", config.resampled_dem.display());

    engine.set_env(EnvSetting::Mask(config.resolve(&config.buildings)))?;

    let time_configuration = config.time_configuration();
    info!(
        "→ Starting solar radiation on {} ({} days, sky size {})…",
        config.resampled_dem.display(),
        time_configuration.days(),
        config.sky_size
    );
    let started = Instant::now();
    engine.run(&Operation::AreaSolarRadiation {
        in_surface_raster: config.resampled_dem.clone(),
        latitude: config.latitude,
        sky_size: config.sky_size,
        time_configuration,
        out_raster: config.output.clone(),
    })?;
    let elapsed = started.elapsed();
    metrics::histogram!(metric_defs::SOLAR_RADIATION_TIME.name).record(elapsed.as_secs_f64());
    info!("→ Solar calculation took {:.1} minutes", elapsed.as_secs_f64() / 60.0);
    info!("Solar radiation complete and saved as: {}", config.output.display());

    engine.check_in(Extension::Spatial)?;

    Ok(SolarOutcome {
        inputs,
        clipped: config.clipped_dem.clone(),
        resampled: config.resampled_dem.clone(),
        output: config.output.clone(),
        elapsed,
    })
}
