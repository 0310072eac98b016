//! Error types for the tile crate.

use thiserror::Error;

/// Errors that can occur while syncing the tile cache.
#[derive(Debug, Error)]
pub enum TileError {
    /// I/O error reading the cache directory or writing a tile.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error (connection, TLS, body read).
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Status code returned by the server.
        status: u16,
    },

    /// A base URL or href could not be parsed.
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// A tile link resolved to a URL without a usable file name.
    #[error("Tile link has no file name: {0}")]
    InvalidLink(String),
}

impl TileError {
    pub(crate) fn invalid_url(url: &str, err: url::ParseError) -> Self {
        TileError::InvalidUrl {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}
