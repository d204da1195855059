//! Transports that carry a [`GranuleQuery`] to a catalog.

use reqwest::blocking::{Client, Request};
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

use crate::config::CmrConfig;
use crate::error::{QueryError, QueryResult, TransportError};
use crate::query::GranuleQuery;
use crate::record::{parse_umm_response, GranuleRecord};

/// Header carrying the paging cursor between CMR search requests.
pub const SEARCH_AFTER_HEADER: &str = "CMR-Search-After";

/// Executes granule searches.
pub trait GranuleSearch {
    fn search(&self, query: &GranuleQuery) -> Result<Vec<GranuleRecord>, TransportError>;
}

impl<S: GranuleSearch + ?Sized> GranuleSearch for &S {
    fn search(&self, query: &GranuleQuery) -> Result<Vec<GranuleRecord>, TransportError> {
        (**self).search(query)
    }
}

/// Blocking HTTP client for the CMR granule search API.
#[derive(Debug, Clone)]
pub struct CmrClient {
    client: Client,
    config: CmrConfig,
}

impl CmrClient {
    pub fn new(config: CmrConfig) -> QueryResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .tcp_nodelay(true)
            .build()
            .map_err(|e| QueryError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CmrConfig {
        &self.config
    }

    /// The GET request for one page of `query`.
    pub fn build_request(
        &self,
        query: &GranuleQuery,
        search_after: Option<&str>,
    ) -> Result<Request, TransportError> {
        let mut params = query.to_params();
        params.push(("page_size".to_string(), self.config.page_size.to_string()));

        let mut builder = self.client.get(&self.config.search_url).query(&params);
        if let Some(cursor) = search_after {
            builder = builder.header(SEARCH_AFTER_HEADER, cursor);
        }
        Ok(builder.build()?)
    }
}

impl GranuleSearch for CmrClient {
    #[instrument(skip(self, query), fields(concept_id = %query.concept_id()))]
    fn search(&self, query: &GranuleQuery) -> Result<Vec<GranuleRecord>, TransportError> {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 1..=self.config.max_pages {
            let request = self.build_request(query, cursor.as_deref())?;
            debug!(page, url = %request.url(), "Requesting granule page");

            let response = self.client.execute(request)?;
            let status = response.status();
            if status != StatusCode::OK {
                let body = response.text().unwrap_or_default();
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let next = response
                .headers()
                .get(SEARCH_AFTER_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let page_records = parse_umm_response(&response.text()?)?;
            let count = page_records.len();
            records.extend(page_records);

            debug!(page, count, total = records.len(), "Received granule page");

            if count < self.config.page_size || next.is_none() {
                return Ok(records);
            }
            cursor = next;
        }

        warn!(
            max_pages = self.config.max_pages,
            total = records.len(),
            "Stopped paging at max_pages, results may be incomplete"
        );
        Ok(records)
    }
}
