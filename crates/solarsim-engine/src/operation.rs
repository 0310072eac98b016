//! Operations the GIS engine can execute
//!
//! Every call into the engine is one [`Operation`]. Operations are plain data:
//! they serialize to the JSON request the bridge understands and can be
//! recorded and compared in tests.

use crate::error::{EngineError, EngineResult};
use crate::types::{
    CellAssignment, ComputeStats, EnvSetting, Extension, ExtensionStatus, RasterDataType,
    ResamplingType, SamplingType, TimeConfiguration, ValueField,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single engine call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Query whether an extension can be checked out
    CheckExtension {
        /// Extension to query
        extension: Extension,
    },
    /// Check out a licensed extension
    CheckOutExtension {
        /// Extension to check out
        extension: Extension,
    },
    /// Return a licensed extension
    CheckInExtension {
        /// Extension to check in
        extension: Extension,
    },
    /// Change an environment setting
    SetEnv {
        /// New setting
        setting: EnvSetting,
    },
    /// Build a LAS dataset referencing point-cloud files
    CreateLasDataset {
        /// Point-cloud files
        in_files: Vec<PathBuf>,
        /// Output `.lasd`
        out_las_dataset: PathBuf,
        /// Statistics computation
        compute_stats: ComputeStats,
    },
    /// Rasterize a LAS dataset
    LasDatasetToRaster {
        /// Input `.lasd`
        in_las_dataset: PathBuf,
        /// Output raster
        out_raster: PathBuf,
        /// Attribute stored in the cells
        value_field: ValueField,
        /// How points in a cell are combined
        cell_assignment: CellAssignment,
        /// Meaning of `sampling_value`
        sampling_type: SamplingType,
        /// Cell size or column count
        sampling_value: f64,
        /// Output pixel type
        data_type: RasterDataType,
    },
    /// Clip a raster to a template dataset
    ClipRaster {
        /// Input raster
        in_raster: PathBuf,
        /// Output raster
        out_raster: PathBuf,
        /// Feature class whose geometry or extent is used for clipping
        in_template_dataset: PathBuf,
        /// Value written outside the clip geometry
        nodata_value: f64,
        /// Clip to the template's geometry rather than its extent
        clipping_geometry: bool,
        /// Keep the template's extent instead of snapping to cells
        maintain_clipping_extent: bool,
    },
    /// Change a raster's cell size
    Resample {
        /// Input raster
        in_raster: PathBuf,
        /// Output raster
        out_raster: PathBuf,
        /// New cell size in map units
        cell_size: f64,
        /// Interpolation
        resampling_type: ResamplingType,
    },
    /// Compute incoming solar radiation over a surface and save the result
    AreaSolarRadiation {
        /// Elevation raster
        in_surface_raster: PathBuf,
        /// Site latitude; `None` lets the engine derive it from the raster
        latitude: Option<f64>,
        /// Resolution of the viewshed, sky map and sun map rasters
        sky_size: u32,
        /// Simulated time span
        time_configuration: TimeConfiguration,
        /// Where the result raster is saved
        out_raster: PathBuf,
    },
}

impl Operation {
    /// Short name used in logs, metrics and errors
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CheckExtension { .. } => "check_extension",
            Operation::CheckOutExtension { .. } => "check_out_extension",
            Operation::CheckInExtension { .. } => "check_in_extension",
            Operation::SetEnv { .. } => "set_env",
            Operation::CreateLasDataset { .. } => "create_las_dataset",
            Operation::LasDatasetToRaster { .. } => "las_dataset_to_raster",
            Operation::ClipRaster { .. } => "clip_raster",
            Operation::Resample { .. } => "resample",
            Operation::AreaSolarRadiation { .. } => "area_solar_radiation",
        }
    }

    /// Check parameters before the operation is sent to the engine
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            Operation::CreateLasDataset { in_files, .. } => {
                if in_files.is_empty() {
                    return Err(EngineError::invalid("in_files", "no point-cloud files"));
                }
            }
            Operation::LasDatasetToRaster { sampling_value, .. } => {
                check_positive("sampling_value", *sampling_value)?;
            }
            Operation::ClipRaster { nodata_value, .. } => {
                if !nodata_value.is_finite() {
                    return Err(EngineError::invalid("nodata_value", "must be finite"));
                }
            }
            Operation::Resample { cell_size, .. } => {
                check_positive("cell_size", *cell_size)?;
            }
            Operation::AreaSolarRadiation {
                latitude,
                sky_size,
                time_configuration,
                ..
            } => {
                if *sky_size == 0 {
                    return Err(EngineError::invalid("sky_size", "must be at least 1"));
                }
                if let Some(lat) = latitude {
                    if !(-90.0..=90.0).contains(lat) {
                        return Err(EngineError::invalid(
                            "latitude",
                            format!("{} is outside -90..=90", lat),
                        ));
                    }
                }
                check_time_configuration(time_configuration)?;
            }
            Operation::CheckExtension { .. }
            | Operation::CheckOutExtension { .. }
            | Operation::CheckInExtension { .. }
            | Operation::SetEnv { .. } => {}
        }
        Ok(())
    }
}

fn check_positive(name: &'static str, value: f64) -> EngineResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid(name, format!("{} is not a positive size", value)))
    }
}

fn check_time_configuration(config: &TimeConfiguration) -> EngineResult<()> {
    match *config {
        TimeConfiguration::MultipleDays {
            year,
            start_day,
            end_day,
        } => {
            if start_day == 0 || chrono::NaiveDate::from_yo_opt(year, start_day).is_none() {
                return Err(EngineError::invalid(
                    "start_day",
                    format!("{} is not a day of {}", start_day, year),
                ));
            }
            if chrono::NaiveDate::from_yo_opt(year, end_day).is_none() {
                return Err(EngineError::invalid(
                    "end_day",
                    format!("{} is not a day of {}", end_day, year),
                ));
            }
            if start_day > end_day {
                return Err(EngineError::invalid(
                    "start_day",
                    format!("day {} is after end day {}", start_day, end_day),
                ));
            }
        }
    }
    Ok(())
}

/// Successful result of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// The operation completed
    Done,
    /// Answer to [`Operation::CheckExtension`]
    Extension(ExtensionStatus),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn solar(sky_size: u32, start_day: u32, end_day: u32) -> Operation {
        Operation::AreaSolarRadiation {
            in_surface_raster: PathBuf::from("Resampled_DEM_3m.tif"),
            latitude: None,
            sky_size,
            time_configuration: TimeConfiguration::MultipleDays {
                year: 2025,
                start_day,
                end_day,
            },
            out_raster: PathBuf::from("SolarRadiation_EZ_3m.tif"),
        }
    }

    #[test]
    fn test_request_shape() {
        let op = Operation::Resample {
            in_raster: PathBuf::from("Clipped_DEM_EZ.tif"),
            out_raster: PathBuf::from("Resampled_DEM_3m.tif"),
            cell_size: 3.0,
            resampling_type: ResamplingType::Bilinear,
        };

        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({
                "op": "resample",
                "in_raster": "Clipped_DEM_EZ.tif",
                "out_raster": "Resampled_DEM_3m.tif",
                "cell_size": 3.0,
                "resampling_type": "BILINEAR"
            })
        );
    }

    #[test]
    fn test_name_matches_tag() {
        let op = solar(200, 1, 365);
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], op.name());
        assert_eq!(json["time_configuration"]["kind"], "multiple_days");
    }

    #[test]
    fn test_validate_solar() {
        assert!(solar(200, 1, 365).validate().is_ok());
        assert!(solar(0, 1, 365).validate().is_err());
        assert!(solar(200, 0, 365).validate().is_err());
        // 2025 is not a leap year
        assert!(solar(200, 1, 366).validate().is_err());
        assert!(solar(200, 200, 100).validate().is_err());
    }

    #[test]
    fn test_validate_sizes() {
        let op = Operation::Resample {
            in_raster: PathBuf::from("a.tif"),
            out_raster: PathBuf::from("b.tif"),
            cell_size: 0.0,
            resampling_type: ResamplingType::Nearest,
        };
        assert!(matches!(
            op.validate(),
            Err(EngineError::InvalidParameter { name: "cell_size", .. })
        ));

        let op = Operation::CreateLasDataset {
            in_files: vec![],
            out_las_dataset: PathBuf::from("x.lasd"),
            compute_stats: ComputeStats::None,
        };
        assert!(op.validate().is_err());
    }
}
