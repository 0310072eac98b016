//! Syncing the tile cache against a remote index listing.

use crate::{IndexPage, Result, TileCache, TileError, TileLink, Transport};
use solarsim_metrics::metric_defs;
use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use tracing::{debug, info};
use url::Url;

/// Callback for tile download progress.
pub type DownloadCallback = Box<dyn Fn(&str) + Send + Sync>;

/// When the remote listing is consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Skip the whole fetch phase if the cache already holds any tile.
    #[default]
    SkipIfAnyPresent,
    /// Always fetch the listing and download whichever tiles are missing.
    TopUp,
}

/// Download statistics for one sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadStats {
    /// Number of tiles downloaded.
    pub tiles_downloaded: usize,
    /// Total bytes downloaded.
    pub bytes_downloaded: u64,
}

/// Outcome of [`TileSync::sync`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncReport {
    /// Tiles were already present; the listing was not fetched.
    Skipped {
        /// Number of tiles found locally.
        existing: usize,
    },
    /// The listing was fetched and missing tiles downloaded.
    Fetched {
        /// Tile links found in the listing.
        listed: usize,
        /// Listed tiles that were already cached.
        already_present: usize,
        /// Bytes and tiles transferred.
        stats: DownloadStats,
    },
}

impl SyncReport {
    /// Number of tiles downloaded during the sync.
    pub fn downloaded(&self) -> usize {
        match self {
            SyncReport::Skipped { .. } => 0,
            SyncReport::Fetched { stats, .. } => stats.tiles_downloaded,
        }
    }

    /// Whether the remote listing was fetched.
    pub fn fetched_listing(&self) -> bool {
        matches!(self, SyncReport::Fetched { .. })
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncReport::Skipped { existing } => {
                write!(f, "Found {} tiles; skipping download.", existing)
            }
            SyncReport::Fetched {
                listed,
                already_present,
                stats,
            } => write!(
                f,
                "Download complete: {} listed, {} downloaded ({} bytes), {} already present.",
                listed, stats.tiles_downloaded, stats.bytes_downloaded, already_present
            ),
        }
    }
}

/// Syncs a [`TileCache`] with a remote index page.
pub struct TileSync<'a> {
    cache: &'a TileCache,
    transport: &'a dyn Transport,
    /// Directory URL the listing lives in; always ends with `/`.
    base_url: Url,
    /// Absolute URL of the listing page.
    index_url: Url,
    callback: Option<DownloadCallback>,
}

impl fmt::Debug for TileSync<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileSync")
            .field("cache", &self.cache)
            .field("base_url", &self.base_url.as_str())
            .field("index_url", &self.index_url.as_str())
            .finish()
    }
}

impl<'a> TileSync<'a> {
    /// Create a sync for `base_url` (the directory holding the tiles) and
    /// the listing file name within it.
    pub fn new(
        cache: &'a TileCache,
        transport: &'a dyn Transport,
        base_url: &str,
        index_file: &str,
    ) -> Result<Self> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| TileError::invalid_url(&base, e))?;
        let index_url = base_url
            .join(index_file)
            .map_err(|e| TileError::invalid_url(index_file, e))?;

        Ok(Self {
            cache,
            transport,
            base_url,
            index_url,
            callback: None,
        })
    }

    /// Set a callback that receives a line per downloaded tile.
    pub fn with_callback(mut self, callback: DownloadCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// URL of the listing page.
    pub fn index_url(&self) -> &Url {
        &self.index_url
    }

    fn notify(&self, msg: &str) {
        if let Some(cb) = &self.callback {
            cb(msg);
        }
    }

    /// Ensure every listed tile exists locally.
    ///
    /// Any transport or I/O error aborts the run; tiles completed before the
    /// failure stay in the cache.
    pub fn sync(&self, policy: SyncPolicy) -> Result<SyncReport> {
        let existing = self.cache.existing_tiles()?;
        metrics::gauge!(metric_defs::TILES_CACHED.name).set(existing.len() as f64);

        if policy == SyncPolicy::SkipIfAnyPresent && !existing.is_empty() {
            info!("Found {} tiles; skipping download.", existing.len());
            return Ok(SyncReport::Skipped {
                existing: existing.len(),
            });
        }

        info!("Fetching tile listing {}", self.index_url);
        let links = self.fetch_links()?;
        info!("Listing has {} tiles", links.len());

        let mut stats = DownloadStats::default();
        let mut already_present = 0;

        for link in &links {
            if self.cache.contains(&link.file_name) {
                debug!("{} already cached", link.file_name);
                already_present += 1;
                metrics::counter!(metric_defs::TILES_SKIPPED.name).increment(1);
                continue;
            }

            info!(" → {}", link.file_name);
            self.notify(&format!(" → {}", link.file_name));

            let bytes = self.download_tile(link)?;
            stats.tiles_downloaded += 1;
            stats.bytes_downloaded += bytes;
            metrics::counter!(metric_defs::TILES_DOWNLOADED.name).increment(1);
            metrics::counter!(metric_defs::TILES_BYTES.name).increment(bytes);
        }

        let report = SyncReport::Fetched {
            listed: links.len(),
            already_present,
            stats,
        };
        info!("{}", report);
        Ok(report)
    }

    /// Fetch and parse the listing, returning its tile links.
    pub fn fetch_links(&self) -> Result<Vec<TileLink>> {
        let html = self.transport.get_text(&self.index_url)?;
        IndexPage::parse(&html, &self.base_url).tile_links(self.cache.extension())
    }

    /// Stream one tile to `<name>.part`, then move it into place.
    fn download_tile(&self, link: &TileLink) -> Result<u64> {
        let partial = self.cache.partial_path_for(&link.file_name);
        let target = self.cache.path_for(&link.file_name);

        let result: Result<u64> = (|| {
            let mut out = BufWriter::new(fs::File::create(&partial)?);
            let bytes = self.transport.download(&link.url, &mut out)?;
            out.flush()?;
            drop(out);
            fs::rename(&partial, &target)?;
            Ok(bytes)
        })();

        if result.is_err() {
            let _ = fs::remove_file(&partial);
        }
        result
    }
}
