//! # solarsim-tiles
//!
//! Local cache of LiDAR point-cloud tiles (`.copc.laz`) synced from a remote
//! HTML directory listing, such as the NOAA coastal LiDAR bucket:
//! `https://noaa-nos-coastal-lidar-pds.s3.amazonaws.com/laz/geoid18/9848/index.html`
//!
//! ## Overview
//!
//! A [`TileCache`] is a plain directory; a tile is identified by its file
//! name and a file that is present never needs to be downloaded again.
//! [`TileSync`] compares the cache against the links of an [`IndexPage`] and
//! streams whatever is missing through a [`Transport`].
//!
//! Two policies decide when the listing is consulted at all:
//!
//! - [`SyncPolicy::SkipIfAnyPresent`]: if the cache holds at least one tile,
//!   the whole fetch phase is skipped.
//! - [`SyncPolicy::TopUp`]: the listing is always fetched and only the
//!   missing files are downloaded.
//!
//! ## Example
//!
//! ```no_run
//! use solarsim_tiles::{HttpTransport, SyncPolicy, TileCache, TileSync};
//!
//! let cache = TileCache::open("./Philly2022", ".copc.laz")?;
//! let transport = HttpTransport::new()?;
//! let sync = TileSync::new(
//!     &cache,
//!     &transport,
//!     "https://noaa-nos-coastal-lidar-pds.s3.amazonaws.com/laz/geoid18/9848/",
//!     "index.html",
//! )?;
//!
//! let report = sync.sync(SyncPolicy::SkipIfAnyPresent)?;
//! println!("{}", report);
//! # Ok::<(), solarsim_tiles::TileError>(())
//! ```

mod cache;
mod error;
mod index;
mod sync;
mod transport;

pub use cache::{TileCache, DEFAULT_TILE_EXTENSION, PARTIAL_SUFFIX};
pub use error::TileError;
pub use index::{IndexPage, TileLink};
pub use sync::{DownloadCallback, DownloadStats, SyncPolicy, SyncReport, TileSync};
pub use transport::{HttpTransport, Transport, DEFAULT_CONNECT_TIMEOUT};

/// Result type for tile operations.
pub type Result<T> = std::result::Result<T, TileError>;
