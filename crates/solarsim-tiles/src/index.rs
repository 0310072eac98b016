//! Parsing of remote directory listings.
//!
//! The NOAA bucket publishes an `index.html` per survey with one anchor per
//! file. Hrefs are usually bare file names, occasionally absolute URLs.

use crate::{Result, TileError};
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use url::Url;

/// A downloadable tile found in an index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLink {
    /// Absolute download URL.
    pub url: Url,
    /// Basename of the href, used as the local file name.
    pub file_name: String,
}

impl TileLink {
    /// Resolve an href against the listing's base URL.
    ///
    /// Hrefs starting with `http` are taken verbatim; anything else is
    /// joined onto `base`. The file name is the last `/`-separated part of
    /// the href as written.
    pub fn resolve(base: &Url, href: &str) -> Result<Self> {
        let url = if href.starts_with("http") {
            Url::parse(href).map_err(|e| TileError::invalid_url(href, e))?
        } else {
            base.join(href).map_err(|e| TileError::invalid_url(href, e))?
        };

        // Taken from the href text, not the parsed URL, whose path segments
        // are percent-encoded.
        let file_name = href
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .ok_or_else(|| TileError::InvalidLink(href.to_string()))?;

        Ok(Self { url, file_name })
    }
}

/// A parsed HTML directory listing.
#[derive(Debug, Clone)]
pub struct IndexPage {
    /// URL the relative hrefs are resolved against.
    base: Url,
    /// Every anchor href, in document order.
    hrefs: Vec<String>,
}

impl IndexPage {
    /// Parse an HTML listing.
    pub fn parse(html: &str, base: &Url) -> Self {
        let document = Html::parse_document(html);
        let hrefs = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "a")
            .filter_map(|el| el.value().attr("href"))
            .map(str::to_string)
            .collect();

        Self {
            base: base.clone(),
            hrefs,
        }
    }

    /// All hrefs in the page.
    pub fn hrefs(&self) -> &[String] {
        &self.hrefs
    }

    /// Links whose href ends in `extension`, deduplicated by file name.
    pub fn tile_links(&self, extension: &str) -> Result<Vec<TileLink>> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for href in self.hrefs.iter().filter(|h| h.ends_with(extension)) {
            let link = TileLink::resolve(&self.base, href)?;
            if seen.insert(link.file_name.clone()) {
                links.push(link);
            }
        }

        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://noaa-nos-coastal-lidar-pds.s3.amazonaws.com/laz/geoid18/9848/";

    fn base() -> Url {
        Url::parse(BASE).unwrap()
    }

    #[test]
    fn test_tile_links_relative_and_absolute() {
        let html = r#"
            <html><body>
              <a href="../">Parent</a>
              <a href="tile_001.copc.laz">tile_001.copc.laz</a>
              <a href="https://mirror.example.com/data/tile_002.copc.laz">mirror</a>
              <a href="9848_metadata.xml">metadata</a>
              <a name="anchor-without-href">nothing</a>
              <a href="tile_003.laz">not copc</a>
            </body></html>
        "#;

        let page = IndexPage::parse(html, &base());
        let links = page.tile_links(".copc.laz").unwrap();

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].file_name, "tile_001.copc.laz");
        assert_eq!(links[0].url.as_str(), format!("{}tile_001.copc.laz", BASE));
        assert_eq!(links[1].file_name, "tile_002.copc.laz");
        assert_eq!(
            links[1].url.as_str(),
            "https://mirror.example.com/data/tile_002.copc.laz"
        );
    }

    #[test]
    fn test_hrefs_preserve_document_order() {
        let html = r#"<ul><li><a href="b.copc.laz">b</a></li><li><a href="a.copc.laz">a</a></li></ul>"#;
        let page = IndexPage::parse(html, &base());

        assert_eq!(page.hrefs(), &["b.copc.laz".to_string(), "a.copc.laz".to_string()]);
    }

    #[test]
    fn test_duplicate_links_are_listed_once() {
        let html = r#"<a href="t.copc.laz">t</a><a href="t.copc.laz">again</a>"#;
        let page = IndexPage::parse(html, &base());

        assert_eq!(page.tile_links(".copc.laz").unwrap().len(), 1);
    }

    #[test]
    fn test_empty_listing() {
        let page = IndexPage::parse("<html><body>No files</body></html>", &base());
        assert!(page.tile_links(".copc.laz").unwrap().is_empty());
    }

    #[test]
    fn test_resolve_subdirectory_href() {
        let link = TileLink::resolve(&base(), "sub/dir/x.copc.laz").unwrap();
        assert_eq!(link.file_name, "x.copc.laz");
        assert_eq!(link.url.as_str(), format!("{}sub/dir/x.copc.laz", BASE));
    }

    #[test]
    fn test_file_name_keeps_literal_characters() {
        let link = TileLink::resolve(&base(), "Philly tile 01.copc.laz").unwrap();
        assert_eq!(link.file_name, "Philly tile 01.copc.laz");
        assert_eq!(link.url.as_str(), format!("{}Philly%20tile%2001.copc.laz", BASE));

        let link = TileLink::resolve(&base(), "Füße_2022.copc.laz").unwrap();
        assert_eq!(link.file_name, "Füße_2022.copc.laz");

        let link = TileLink::resolve(&base(), "already%20encoded.copc.laz").unwrap();
        assert_eq!(link.file_name, "already%20encoded.copc.laz");
    }

    #[test]
    fn test_href_whitespace_is_not_trimmed() {
        let html = r#"<a href=" padded.copc.laz ">padded</a><a href="plain.copc.laz">plain</a>"#;
        let page = IndexPage::parse(html, &base());

        let links = page.tile_links(".copc.laz").unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].file_name, "plain.copc.laz");
    }

    #[test]
    fn test_resolve_invalid_absolute_url() {
        let err = TileLink::resolve(&base(), "http://[broken/x.copc.laz").unwrap_err();
        assert!(matches!(err, TileError::InvalidUrl { .. }));
    }
}
