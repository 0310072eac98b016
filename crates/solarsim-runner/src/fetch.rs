//! Tile download stage.

use crate::config::TilesConfig;
use crate::error::Result;
use solarsim_tiles::{SyncPolicy, SyncReport, TileCache, TileSync, Transport};
use tracing::info;

/// Open the configured cache and sync it with the remote listing.
pub fn sync_tiles(
    config: &TilesConfig,
    policy: SyncPolicy,
    transport: &dyn Transport,
) -> Result<SyncReport> {
    let cache = TileCache::open(&config.download_folder, &config.extension)?;
    let sync = TileSync::new(&cache, transport, &config.base_url, &config.index_file)?;

    info!(
        "Syncing {} tiles into {} ({:?})",
        config.extension,
        cache.dir().display(),
        policy
    );
    Ok(sync.sync(policy)?)
}
