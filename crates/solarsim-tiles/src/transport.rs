//! HTTP access to the index page and tile files.

use crate::{Result, TileError};
use std::io::Write;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default connect timeout. There is no overall timeout: tiles are large and
/// a download may legitimately take minutes.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking access to remote resources.
///
/// Implemented by [`HttpTransport`]; tests substitute an in-memory fake.
pub trait Transport {
    /// Fetch a resource as text. Non-success statuses are errors.
    fn get_text(&self, url: &Url) -> Result<String>;

    /// Stream a resource into `out`, returning the number of bytes written.
    fn download(&self, url: &Url, out: &mut dyn Write) -> Result<u64>;
}

/// [`Transport`] backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Create a transport with the default connect timeout.
    pub fn new() -> Result<Self> {
        Self::with_connect_timeout(DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a transport with a specific connect timeout.
    pub fn with_connect_timeout(connect_timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(connect_timeout)
            // Blocking clients default to a 30s total timeout.
            .timeout(None)
            .build()?;
        Ok(Self { client })
    }

    fn get(&self, url: &Url) -> Result<reqwest::blocking::Response> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send()?;

        if !response.status().is_success() {
            return Err(TileError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}

impl Transport for HttpTransport {
    fn get_text(&self, url: &Url) -> Result<String> {
        Ok(self.get(url)?.text()?)
    }

    fn download(&self, url: &Url, out: &mut dyn Write) -> Result<u64> {
        let mut response = self.get(url)?;
        Ok(std::io::copy(&mut response, out)?)
    }
}
