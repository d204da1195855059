//! Granule records parsed from UMM-JSON search responses.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::TransportError;

/// One granule returned by a catalog search.
#[derive(Debug, Clone, PartialEq)]
pub struct GranuleRecord {
    /// Producer granule id, e.g. `VNP09GA.A2021001.h10v05.002.2021002`.
    pub native_id: String,
    pub concept_id: Option<String>,
    /// Start of the temporal extent.
    pub begin: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    data_urls: Vec<String>,
    umm: Value,
}

impl GranuleRecord {
    /// Minimal record, as a transport that does not speak UMM would build it.
    pub fn new(native_id: impl Into<String>, begin: DateTime<Utc>) -> Self {
        Self {
            native_id: native_id.into(),
            concept_id: None,
            begin,
            end: None,
            data_urls: Vec::new(),
            umm: Value::Null,
        }
    }

    /// Parse one entry of a UMM-JSON `items` array.
    pub fn from_umm_item(item: Value) -> Result<Self, TransportError> {
        let parsed: UmmItem = serde_json::from_value(item.clone())?;

        let (begin, end) = match parsed.umm.temporal_extent {
            Some(TemporalExtent {
                range_date_time: Some(range),
                ..
            }) => (range.beginning_date_time, range.ending_date_time),
            Some(TemporalExtent {
                single_date_time: Some(single),
                ..
            }) => (single, Some(single)),
            _ => {
                return Err(TransportError::InvalidResponse(format!(
                    "granule {} has no temporal extent",
                    parsed.meta.native_id
                )))
            }
        };

        let data_urls = parsed
            .umm
            .related_urls
            .into_iter()
            .filter(|u| u.kind.as_deref() == Some("GET DATA"))
            .map(|u| u.url)
            .collect();

        Ok(Self {
            native_id: parsed.meta.native_id,
            concept_id: parsed.meta.concept_id,
            begin,
            end,
            data_urls,
            umm: item.get("umm").cloned().unwrap_or(Value::Null),
        })
    }

    /// URLs of the granule's data files.
    pub fn data_urls(&self) -> &[String] {
        &self.data_urls
    }

    /// The UMM-G document as returned by the catalog.
    pub fn umm(&self) -> &Value {
        &self.umm
    }
}

/// Parse a UMM-JSON search response body.
pub fn parse_umm_response(body: &str) -> Result<Vec<GranuleRecord>, TransportError> {
    let response: UmmResponse = serde_json::from_str(body)?;
    response
        .items
        .into_iter()
        .map(GranuleRecord::from_umm_item)
        .collect()
}

#[derive(Deserialize)]
struct UmmResponse {
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Deserialize)]
struct UmmItem {
    meta: UmmMeta,
    umm: UmmGranule,
}

#[derive(Deserialize)]
struct UmmMeta {
    #[serde(rename = "native-id")]
    native_id: String,
    #[serde(rename = "concept-id", default)]
    concept_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UmmGranule {
    #[serde(default)]
    temporal_extent: Option<TemporalExtent>,
    #[serde(default)]
    related_urls: Vec<RelatedUrl>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TemporalExtent {
    #[serde(default)]
    range_date_time: Option<RangeDateTime>,
    #[serde(default)]
    single_date_time: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RangeDateTime {
    beginning_date_time: DateTime<Utc>,
    #[serde(default)]
    ending_date_time: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RelatedUrl {
    #[serde(rename = "URL")]
    url: String,
    #[serde(rename = "Type", default)]
    kind: Option<String>,
}
