//! # Tide Table Retrieval
//!
//! Downloads the published tide tables and resolves which of them covers a
//! requested year.
//!
//! ## Data Source
//! - **Publisher**: Bangor University CAMS free tide tables
//! - **URL**: `{base_url}/{present|next}/{site}.htm`, where `site` is the site name
//!   with whitespace removed, lower-cased and cut to eight characters
//! - **Coverage**: only two years at a time, "present" and "next" relative to
//!   the publication date
//!
//! ## Year Resolution
//! The present table is fetched first; if its year is not the one requested the
//! next table is tried, and if that does not match either the request fails with
//! [`TideError::YearUnavailable`].
//!
//! ## Error Handling
//! Transport failures and non-2xx responses surface as [`TideError::Fetch`] and
//! are never retried here. Parse errors from either table pass through unchanged.

use crate::config::SourceConfig;
use crate::tide_table::{self, TideTable};
use crate::TideError;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Which of the two published tables to fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Publication {
    Present,
    Next,
}

impl fmt::Display for Publication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Publication::Present => "present",
            Publication::Next => "next",
        })
    }
}

/// Anything that can turn a URI into text.
#[allow(async_fn_in_trait)]
pub trait TextSource {
    async fn fetch_text(&self, uri: &str) -> Result<String, TideError>;
}

/// HTTP text source backed by reqwest
#[derive(Clone, Debug)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self, TideError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpSource { client })
    }
}

impl TextSource for HttpSource {
    async fn fetch_text(&self, uri: &str) -> Result<String, TideError> {
        let response = self.client.get(uri).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Published tide tables reachable through a [`TextSource`]
#[derive(Clone, Debug)]
pub struct TideTables<S> {
    source: S,
    base_url: String,
}

impl TideTables<HttpSource> {
    /// Tables over HTTP using the configured root URL and timeout
    pub fn from_config(config: &SourceConfig) -> Result<Self, TideError> {
        let source = HttpSource::new(Duration::from_secs(config.timeout_secs))?;
        Ok(TideTables::new(source, &config.base_url))
    }
}

impl<S: TextSource> TideTables<S> {
    pub fn new(source: S, base_url: &str) -> Self {
        TideTables {
            source,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URI of one published table for a site
    pub fn table_uri(&self, site: &str, publication: Publication) -> String {
        format!("{}/{}/{}.htm", self.base_url, publication, site_slug(site))
    }

    /// Fetch and parse one published table
    pub async fn get_table(
        &self,
        site: &str,
        publication: Publication,
    ) -> Result<TideTable, TideError> {
        let uri = self.table_uri(site, publication);
        debug!(%uri, "fetching tide table");
        let text = self.source.fetch_text(&uri).await?;
        tide_table::parse(&text)
    }

    /// Fetch the table for `year`, trying the present table before the next one
    pub async fn get_tides(&self, site: &str, year: i32) -> Result<TideTable, TideError> {
        for publication in [Publication::Present, Publication::Next] {
            let table = self.get_table(site, publication).await?;
            if table.year() == year {
                info!(site, year, %publication, days = table.days().len(), "found tide table");
                return Ok(table);
            }
            debug!(site, %publication, found = table.year(), wanted = year, "table year mismatch");
        }
        Err(TideError::YearUnavailable { year })
    }
}

/// `Menai Bridge` → `menaibri`
fn site_slug(site: &str) -> String {
    site.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .take(8)
        .collect()
}
