//! Configuration for the CMR search client.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

/// Default granule search endpoint returning UMM-JSON.
pub const DEFAULT_SEARCH_URL: &str = "https://cmr.earthdata.nasa.gov/search/granules.umm_json";

/// Largest page size the catalog accepts.
pub const MAX_PAGE_SIZE: usize = 2000;

/// Configuration for [`crate::CmrClient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmrConfig {
    /// Granule search endpoint.
    pub search_url: String,

    /// Granules requested per page (1-2000).
    pub page_size: usize,

    /// Upper bound on pages fetched for one search.
    pub max_pages: usize,

    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,

    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for CmrConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            page_size: MAX_PAGE_SIZE,
            max_pages: 50,
            timeout_secs: 60,
            connect_timeout_secs: 30,
            user_agent: concat!("viirs-tiled-granules/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl CmrConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CMR_SEARCH_URL") {
            config.search_url = val;
        }

        if let Ok(val) = std::env::var("CMR_PAGE_SIZE") {
            if let Ok(size) = val.parse() {
                config.page_size = size;
            }
        }

        if let Ok(val) = std::env::var("CMR_MAX_PAGES") {
            if let Ok(pages) = val.parse() {
                config.max_pages = pages;
            }
        }

        if let Ok(val) = std::env::var("CMR_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.timeout_secs = secs;
            }
        }

        config
    }

    /// Parse a configuration from YAML. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> QueryResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> QueryResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> QueryResult<()> {
        if !self.search_url.starts_with("http://") && !self.search_url.starts_with("https://") {
            return Err(QueryError::Config(format!(
                "search_url must be an http(s) URL, got '{}'",
                self.search_url
            )));
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(QueryError::Config(format!(
                "page_size must be 1-{}",
                MAX_PAGE_SIZE
            )));
        }

        if self.max_pages == 0 {
            return Err(QueryError::Config("max_pages must be > 0".to_string()));
        }

        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(QueryError::Config("timeouts must be > 0".to_string()));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
