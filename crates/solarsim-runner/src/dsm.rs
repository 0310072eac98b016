//! DSM pipeline: cached tiles → LAS dataset → surface raster.
//!
//! The `3D` extension is checked in only after the raster is built. Any
//! failure after the checkout returns early and leaves it checked out.

use crate::config::{DsmConfig, TilesConfig};
use crate::error::{Result, RunnerError};
use solarsim_engine::{EnvSetting, Extension, GisEngine, Operation};
use solarsim_tiles::TileCache;
use std::path::PathBuf;
use tracing::info;

/// Artifacts produced by [`run_dsm`].
#[derive(Debug, Clone, PartialEq)]
pub struct DsmOutcome {
    /// Number of tiles in the dataset.
    pub tile_count: usize,
    /// The `.lasd` dataset.
    pub dataset: PathBuf,
    /// The DSM raster.
    pub raster: PathBuf,
}

/// Build the LAS dataset and DSM raster from the cached tiles.
pub fn run_dsm<E: GisEngine + ?Sized>(
    engine: &mut E,
    tiles: &TilesConfig,
    dsm: &DsmConfig,
) -> Result<DsmOutcome> {
    let cache = TileCache::open(&tiles.download_folder, &tiles.extension)?;
    let tile_files = cache.existing_tiles()?;
    if tile_files.is_empty() {
        return Err(RunnerError::NoTiles {
            dir: tiles.download_folder.clone(),
            extension: tiles.extension.clone(),
        });
    }

    let dataset = tiles.download_folder.join(&dsm.dataset_name);
    let raster = tiles.download_folder.join(&dsm.raster_name);

    engine.set_env(EnvSetting::OverwriteOutput(true))?;
    engine.require_extension(Extension::ThreeD)?;

    info!("Creating LAS Dataset for {} tiles…", tile_files.len());
    let tile_count = tile_files.len();
    engine.run(&Operation::CreateLasDataset {
        in_files: tile_files,
        out_las_dataset: dataset.clone(),
        compute_stats: dsm.compute_stats,
    })?;
    info!("LAS Dataset created at: {}", dataset.display());

    info!("Building {} m DSM raster…", dsm.cell_size);
    engine.run(&Operation::LasDatasetToRaster {
        in_las_dataset: dataset.clone(),
        out_raster: raster.clone(),
        value_field: dsm.value_field,
        cell_assignment: dsm.cell_assignment,
        sampling_type: dsm.sampling_type,
        sampling_value: dsm.cell_size,
        data_type: dsm.data_type,
    })?;
    info!("DSM raster created at: {}", raster.display());

    engine.check_in(Extension::ThreeD)?;
    info!("All done! Feed this DSM into the solar pipeline.");

    Ok(DsmOutcome {
        tile_count,
        dataset,
        raster,
    })
}
