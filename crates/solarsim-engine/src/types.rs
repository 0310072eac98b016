//! Parameter types for engine operations
//!
//! Each enum serializes to the keyword the vendor tools expect, so the bridge
//! can pass values through untouched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Licensed engine extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Extension {
    /// 3D Analyst, needed for LAS dataset rasterization
    #[serde(rename = "3D")]
    ThreeD,
    /// Spatial Analyst, needed for solar radiation
    #[serde(rename = "Spatial")]
    Spatial,
}

impl Extension {
    /// Human-readable product name
    pub fn product_name(&self) -> &'static str {
        match self {
            Extension::ThreeD => "3D Analyst",
            Extension::Spatial => "Spatial Analyst",
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.product_name())
    }
}

/// Availability of a licensed extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtensionStatus {
    /// The extension can be checked out
    Available,
    /// All licenses are in use
    Unavailable,
    /// The extension is not licensed on this machine
    NotLicensed,
    /// The license manager could not be queried
    Failed,
}

impl ExtensionStatus {
    /// Status string as reported by the engine
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtensionStatus::Available => "Available",
            ExtensionStatus::Unavailable => "Unavailable",
            ExtensionStatus::NotLicensed => "NotLicensed",
            ExtensionStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for ExtensionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtensionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(ExtensionStatus::Available),
            "Unavailable" => Ok(ExtensionStatus::Unavailable),
            "NotLicensed" => Ok(ExtensionStatus::NotLicensed),
            "Failed" => Ok(ExtensionStatus::Failed),
            other => Err(format!("unknown extension status '{}'", other)),
        }
    }
}

/// Engine environment setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "value", rename_all = "snake_case")]
pub enum EnvSetting {
    /// Allow tools to overwrite existing outputs
    OverwriteOutput(bool),
    /// Directory relative outputs are written to
    Workspace(PathBuf),
    /// Directory for intermediate data
    ScratchWorkspace(PathBuf),
    /// Feature class or raster limiting the cells tools process
    Mask(PathBuf),
}

/// LAS attribute rasterized into cell values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueField {
    /// Point elevation
    #[default]
    Elevation,
    /// Return intensity
    Intensity,
}

/// How points falling in one cell are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellAssignment {
    /// Highest point (top of canopy / structure)
    #[default]
    Maximum,
    /// Lowest point
    Minimum,
    /// Mean of all points
    Average,
    /// Point closest to the cell center
    Nearest,
    /// Inverse-distance weighted
    Idw,
}

/// How the output resolution is specified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingType {
    /// Sampling value is the cell size in map units
    #[default]
    #[serde(rename = "CELLSIZE")]
    CellSize,
    /// Sampling value is the number of columns along the longest side
    #[serde(rename = "OBSERVATIONS")]
    Observations,
}

/// Pixel type of an output raster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RasterDataType {
    /// 32-bit floating point
    #[default]
    Float,
    /// Integer
    Int,
}

/// Whether dataset statistics are computed on creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComputeStats {
    /// Skip statistics
    #[default]
    None,
    /// Compute statistics for every file
    ComputeStats,
}

/// Interpolation used when resampling a raster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResamplingType {
    /// Nearest neighbor
    Nearest,
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Cubic convolution
    Cubic,
    /// Majority of the surrounding cells
    Majority,
}

/// Time span simulated by the solar radiation tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeConfiguration {
    /// Every day from `start_day` to `end_day` (day of year, inclusive)
    MultipleDays {
        /// Calendar year
        year: i32,
        /// First day of year
        start_day: u32,
        /// Last day of year
        end_day: u32,
    },
}

impl TimeConfiguration {
    /// Number of simulated days
    pub fn days(&self) -> u32 {
        match self {
            TimeConfiguration::MultipleDays {
                start_day, end_day, ..
            } => end_day.saturating_sub(*start_day) + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(serde_json::to_string(&CellAssignment::Maximum).unwrap(), "\"MAXIMUM\"");
        assert_eq!(serde_json::to_string(&SamplingType::CellSize).unwrap(), "\"CELLSIZE\"");
        assert_eq!(serde_json::to_string(&ValueField::Elevation).unwrap(), "\"ELEVATION\"");
        assert_eq!(serde_json::to_string(&RasterDataType::Float).unwrap(), "\"FLOAT\"");
        assert_eq!(serde_json::to_string(&ComputeStats::None).unwrap(), "\"NONE\"");
        assert_eq!(serde_json::to_string(&ResamplingType::Bilinear).unwrap(), "\"BILINEAR\"");
        assert_eq!(serde_json::to_string(&Extension::ThreeD).unwrap(), "\"3D\"");
    }

    #[test]
    fn test_env_setting_shape() {
        let json = serde_json::to_value(EnvSetting::OverwriteOutput(true)).unwrap();
        assert_eq!(json, serde_json::json!({"name": "overwrite_output", "value": true}));
    }

    #[test]
    fn test_extension_status_parse() {
        assert_eq!("Available".parse::<ExtensionStatus>(), Ok(ExtensionStatus::Available));
        assert_eq!("NotLicensed".parse::<ExtensionStatus>(), Ok(ExtensionStatus::NotLicensed));
        assert!("CheckedOut".parse::<ExtensionStatus>().is_err());
    }

    #[test]
    fn test_days_inclusive() {
        let config = TimeConfiguration::MultipleDays {
            year: 2024,
            start_day: 1,
            end_day: 366,
        };
        assert_eq!(config.days(), 366);
    }
}
