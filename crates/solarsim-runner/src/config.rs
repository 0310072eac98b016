//! Runner configuration.
//!
//! Every field defaults to the values of the Philadelphia 2022 survey, so an
//! empty (or absent) config file reproduces the reference run. A YAML file
//! only needs the keys it changes:
//!
//! ```yaml
//! tiles:
//!   download_folder: /data/lidar/philly2022
//! solar:
//!   sky_size: 100
//!   end_day: 31
//! ```

use crate::error::{Result, RunnerError};
use serde::{Deserialize, Serialize};
use solarsim_engine::{
    CellAssignment, ComputeStats, RasterDataType, ResamplingType, SamplingType,
    TimeConfiguration, ValueField, DEFAULT_INTERPRETER,
};
use solarsim_tiles::{SyncPolicy, DEFAULT_TILE_EXTENSION};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    pub tiles: TilesConfig,
    pub dsm: DsmConfig,
    pub solar: SolarConfig,
    pub engine: EngineConfig,
}

impl RunnerConfig {
    /// Load a YAML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&text).map_err(|source| RunnerError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a YAML document. An empty document yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Where tiles come from and where they are cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TilesConfig {
    /// Local tile cache directory.
    pub download_folder: PathBuf,
    /// Remote directory holding the tiles and the listing.
    pub base_url: String,
    /// Listing file name within `base_url`.
    pub index_file: String,
    /// Tile file-name suffix.
    pub extension: String,
    /// HTTP connect timeout.
    pub connect_timeout_secs: u64,
    /// Download missing tiles even when some are cached.
    pub top_up: bool,
}

impl Default for TilesConfig {
    fn default() -> Self {
        Self {
            download_folder: PathBuf::from(r"C:\LiDAR\Philly2022"),
            base_url: "https://noaa-nos-coastal-lidar-pds.s3.amazonaws.com/laz/geoid18/9848/"
                .to_string(),
            index_file: "index.html".to_string(),
            extension: DEFAULT_TILE_EXTENSION.to_string(),
            connect_timeout_secs: 30,
            top_up: false,
        }
    }
}

impl TilesConfig {
    /// Sync policy, with `force_top_up` overriding the config value.
    pub fn policy(&self, force_top_up: bool) -> SyncPolicy {
        if self.top_up || force_top_up {
            SyncPolicy::TopUp
        } else {
            SyncPolicy::SkipIfAnyPresent
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// LAS dataset and DSM raster parameters.
///
/// Output names are relative to the tile folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DsmConfig {
    pub dataset_name: PathBuf,
    pub raster_name: PathBuf,
    pub value_field: ValueField,
    pub cell_assignment: CellAssignment,
    pub sampling_type: SamplingType,
    /// Cell size in map units when `sampling_type` is `CELLSIZE`.
    pub cell_size: f64,
    pub data_type: RasterDataType,
    pub compute_stats: ComputeStats,
}

impl Default for DsmConfig {
    fn default() -> Self {
        Self {
            dataset_name: PathBuf::from("Philly2022.lasd"),
            raster_name: PathBuf::from("DSM_Philadelphia_1m.tif"),
            value_field: ValueField::Elevation,
            cell_assignment: CellAssignment::Maximum,
            sampling_type: SamplingType::CellSize,
            cell_size: 1.0,
            data_type: RasterDataType::Float,
            compute_stats: ComputeStats::None,
        }
    }
}

/// Inputs, intermediates and simulation parameters of the solar pipeline.
///
/// Relative paths are resolved by the engine against `workspace`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    pub workspace: PathBuf,
    /// Kept off synced folders; the engine writes many temporary rasters.
    pub scratch_workspace: PathBuf,
    /// Bare-earth elevation model.
    pub dem: PathBuf,
    /// Polygons the DEM is clipped to.
    pub zones: PathBuf,
    /// Building footprints used as the analysis mask.
    pub buildings: PathBuf,
    pub clipped_dem: PathBuf,
    pub nodata_value: f64,
    pub clipping_geometry: bool,
    pub maintain_clipping_extent: bool,
    pub resampled_dem: PathBuf,
    pub resample_cell_size: f64,
    pub resampling_type: ResamplingType,
    /// `None` lets the engine derive the latitude from the raster.
    pub latitude: Option<f64>,
    pub sky_size: u32,
    pub year: i32,
    pub start_day: u32,
    pub end_day: u32,
    pub output: PathBuf,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            workspace: PathBuf::from(r"C:\PhillySolar"),
            scratch_workspace: PathBuf::from(r"C:\Temp\ArcPyScratch"),
            dem: PathBuf::from(r"Philadelphia_dem_3ft_2022\Philadelphia_dem_3ft_2022.tif"),
            zones: PathBuf::from(
                r"PhiladelphiaEmpowermentZones201201\Philadelphia Empowerment Zones\PhiladelphiaEmpowermentZones201201.shp",
            ),
            buildings: PathBuf::from(r"LI_BUILDING_FOOTPRINTS\LI_BUILDING_FOOTPRINTS.shp"),
            clipped_dem: PathBuf::from("Clipped_DEM_EZ.tif"),
            nodata_value: -9999.0,
            clipping_geometry: true,
            maintain_clipping_extent: true,
            resampled_dem: PathBuf::from("Resampled_DEM_3m.tif"),
            resample_cell_size: 3.0,
            resampling_type: ResamplingType::Bilinear,
            latitude: None,
            sky_size: 200,
            year: 2025,
            start_day: 1,
            end_day: 365,
            output: PathBuf::from("SolarRadiation_EZ_3m.tif"),
        }
    }
}

impl SolarConfig {
    pub fn time_configuration(&self) -> TimeConfiguration {
        TimeConfiguration::MultipleDays {
            year: self.year,
            start_day: self.start_day,
            end_day: self.end_day,
        }
    }

    /// Resolve an input path against the workspace.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }
}

/// How the vendor runtime is launched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Vendor Python interpreter.
    pub interpreter: PathBuf,
    /// Use this bridge script instead of the bundled one.
    pub bridge_script: Option<PathBuf>,
    /// Directory the bundled bridge script is written to.
    pub script_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from(DEFAULT_INTERPRETER),
            bridge_script: None,
            script_dir: PathBuf::from(r"C:\Temp\ArcPyScratch"),
        }
    }
}
