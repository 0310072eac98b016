//! On-disk tile cache.

use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix of the Cloud Optimized Point Cloud tiles published by NOAA.
pub const DEFAULT_TILE_EXTENSION: &str = ".copc.laz";

/// Suffix appended to a tile while it is being streamed to disk.
pub const PARTIAL_SUFFIX: &str = ".part";

/// A directory of point-cloud tiles identified by file name.
///
/// A tile counts as cached as soon as a regular file (or a symlink to one)
/// with its name exists.
/// Tiles are written as `<name>.part` and renamed once complete, so an
/// interrupted download never looks cached.
#[derive(Debug, Clone)]
pub struct TileCache {
    /// Cache directory.
    dir: PathBuf,
    /// File-name suffix that identifies a tile (e.g. `.copc.laz`).
    extension: String,
}

impl TileCache {
    /// Open a cache directory, creating it (and its parents) if needed.
    pub fn open<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            extension: extension.to_string(),
        })
    }

    /// Get the cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get the tile file-name suffix.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Whether a file name carries the tile suffix.
    pub fn is_tile_name(&self, file_name: &str) -> bool {
        file_name.len() > self.extension.len() && file_name.ends_with(&self.extension)
    }

    /// List the tiles currently in the cache, sorted by path.
    pub fn existing_tiles(&self) -> Result<Vec<PathBuf>> {
        let mut tiles = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            // Follows symlinks, matching `contains`.
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                if self.is_tile_name(name) {
                    tiles.push(path);
                }
            }
        }

        tiles.sort();
        Ok(tiles)
    }

    /// Path a tile with this file name is stored at.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Path a tile is streamed to before it is complete.
    pub fn partial_path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(format!("{}{}", file_name, PARTIAL_SUFFIX))
    }

    /// Check if a tile is cached locally.
    pub fn contains(&self, file_name: &str) -> bool {
        self.path_for(file_name).is_file()
    }
}
