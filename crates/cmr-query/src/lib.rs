//! Catalog search for VIIRS tiled granules.
//!
//! Builds CMR granule searches from a collection, a range of calendar days
//! and optional spatial and tile filters, runs them through a
//! [`GranuleSearch`] transport and returns the matching granules in temporal
//! order.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use cmr_query::{search_granules, CmrClient, CmrConfig, SpatialFilter};
//!
//! let client = CmrClient::new(CmrConfig::default())?;
//! let day = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
//! let records = search_granules(
//!     &client,
//!     "C2631841556-LPCLOUD",
//!     day,
//!     day,
//!     Some(&SpatialFilter::point(-100.0, 35.0)),
//!     None,
//! )?;
//! for record in &records {
//!     println!("{} {:?}", record.native_id, record.data_urls());
//! }
//! # Ok::<(), cmr_query::QueryError>(())
//! ```

pub mod config;
pub mod error;
pub mod query;
pub mod record;
pub mod transport;

pub use config::{CmrConfig, DEFAULT_SEARCH_URL, MAX_PAGE_SIZE};
pub use error::{QueryError, QueryResult, TransportError};
pub use query::{build_query, tile_pattern, GranuleQuery, SpatialFilter};
pub use record::{parse_umm_response, GranuleRecord};
pub use transport::{CmrClient, GranuleSearch, SEARCH_AFTER_HEADER};

use std::str::FromStr;

use tracing::{info, instrument};
use viirs_common::CalendarDay;

/// Search `concept_id` for granules acquired between two calendar days.
///
/// Any transport failure is reported as [`QueryError::CatalogUnreachable`]
/// with the original error as its source. Results are sorted by the start of
/// their temporal extent; granules with equal starts keep the catalog order.
#[instrument(skip(transport, start, end, spatial))]
pub fn search_granules<S: GranuleSearch + ?Sized>(
    transport: &S,
    concept_id: &str,
    start: impl Into<CalendarDay>,
    end: impl Into<CalendarDay>,
    spatial: Option<&SpatialFilter>,
    tile: Option<&str>,
) -> QueryResult<Vec<GranuleRecord>> {
    let query = build_query(concept_id, start, end, spatial, tile)?;

    let mut records = transport
        .search(&query)
        .map_err(QueryError::CatalogUnreachable)?;
    records.sort_by_key(|record| record.begin);

    for record in &records {
        info!(native_id = %record.native_id, begin = %record.begin, "Granule found");
    }
    info!(count = records.len(), "Granule search complete");

    Ok(records)
}

/// Parse a calendar day given as `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_day(text: &str) -> QueryResult<CalendarDay> {
    Ok(CalendarDay::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_day() {
        assert_eq!(
            parse_day("2021-01-01").unwrap().date(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
        );
        assert_eq!(
            parse_day("2021-01-01T22:30:00Z").unwrap().date(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
        );
        assert!(matches!(parse_day("01/02/2021"), Err(QueryError::InvalidDate(_))));
    }
}
