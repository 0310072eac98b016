//! Errors for the pipeline runner.

use solarsim_engine::EngineError;
use solarsim_tiles::TileError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// I/O error reading the config or the tile cache.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A config file that is not valid YAML for [`RunnerConfig`](crate::RunnerConfig).
    #[error("Invalid config {}: {source}", path.display())]
    Config {
        /// Config file path.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_yaml::Error,
    },

    /// An in-memory YAML document failed to parse.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Listing or tile download failure.
    #[error("Tile sync failed: {0}")]
    Tiles(#[from] TileError),

    /// The GIS engine failed or rejected an operation.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// The DSM was requested but the cache holds no tiles.
    #[error("No {extension} tiles found in {}", dir.display())]
    NoTiles {
        /// Tile cache directory.
        dir: PathBuf,
        /// Tile file-name suffix searched for.
        extension: String,
    },
}
