//! Granule search requests.
//!
//! [`build_query`] turns a collection, a day range and optional spatial and
//! tile filters into a [`GranuleQuery`]. The query can be inspected or turned
//! into CMR request parameters without touching the network.

use chrono::SecondsFormat;
use projection::corner_polygon_latlon;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use viirs_common::{CalendarDay, GeoPoint, LinearRing, Polygon, RasterGrid, TimeRange, Winding};

use crate::error::{QueryError, QueryResult};

/// Spatial restriction of a granule search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialFilter {
    /// Granules covering a lon/lat point.
    Point(GeoPoint),
    /// Granules intersecting a lon/lat polygon. Holes are ignored.
    Polygon(Polygon),
    /// Granules intersecting the footprint of a raster grid.
    Footprint(RasterGrid),
}

impl SpatialFilter {
    pub fn point(lon: f64, lat: f64) -> Self {
        Self::Point(GeoPoint::new(lon, lat))
    }

    /// Exterior ring in lon/lat, wound counter-clockwise.
    fn ccw_ring(&self) -> QueryResult<Option<LinearRing>> {
        let polygon = match self {
            SpatialFilter::Point(_) => return Ok(None),
            SpatialFilter::Polygon(polygon) => polygon.clone(),
            SpatialFilter::Footprint(grid) => corner_polygon_latlon(grid)
                .map_err(|e| QueryError::InvalidGeometry(format!("grid footprint: {}", e)))?,
        };

        if !polygon.interiors().is_empty() {
            warn!(holes = polygon.interiors().len(), "Polygon holes are not sent to the catalog");
        }

        let ring = polygon.exterior().clone();
        if ring.coords().iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(QueryError::InvalidGeometry("ring has non-finite coordinates".to_string()));
        }
        match ring.winding() {
            Winding::Clockwise => debug!("Reversing clockwise ring"),
            Winding::Degenerate => warn!(
                vertices = ring.vertex_count(),
                "Ring encloses no area, sending it unchanged"
            ),
            Winding::CounterClockwise => {}
        }
        Ok(Some(ring.into_ccw()))
    }
}

/// A granule search against one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GranuleQuery {
    concept_id: String,
    temporal: Option<TimeRange>,
    point: Option<GeoPoint>,
    polygon: Option<LinearRing>,
    readable_granule_name: Option<String>,
}

impl GranuleQuery {
    /// Empty query scoped to a collection concept id, e.g. `C2631841556-LPCLOUD`.
    pub fn new(concept_id: impl Into<String>) -> Self {
        Self {
            concept_id: concept_id.into(),
            temporal: None,
            point: None,
            polygon: None,
            readable_granule_name: None,
        }
    }

    pub fn temporal(mut self, range: TimeRange) -> Self {
        self.temporal = Some(range);
        self
    }

    pub fn point(mut self, point: GeoPoint) -> Self {
        self.point = Some(point);
        self
    }

    /// Attach a polygon ring as given. Callers are expected to pass a
    /// counter-clockwise ring; [`build_query`] guarantees that.
    pub fn polygon(mut self, ring: LinearRing) -> Self {
        self.polygon = Some(ring);
        self
    }

    /// Match granule names against a glob (`*` and `?`).
    pub fn readable_granule_name(mut self, pattern: impl Into<String>) -> Self {
        self.readable_granule_name = Some(pattern.into());
        self
    }

    pub fn concept_id(&self) -> &str {
        &self.concept_id
    }

    pub fn temporal_range(&self) -> Option<&TimeRange> {
        self.temporal.as_ref()
    }

    pub fn point_filter(&self) -> Option<&GeoPoint> {
        self.point.as_ref()
    }

    pub fn polygon_filter(&self) -> Option<&LinearRing> {
        self.polygon.as_ref()
    }

    pub fn granule_name_pattern(&self) -> Option<&str> {
        self.readable_granule_name.as_deref()
    }

    /// CMR search parameters, in a stable order.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("collection_concept_id".to_string(), self.concept_id.clone())];

        if let Some(range) = &self.temporal {
            params.push((
                "temporal[]".to_string(),
                format!(
                    "{},{}",
                    range.start.to_rfc3339_opts(SecondsFormat::Secs, true),
                    range.end.to_rfc3339_opts(SecondsFormat::Secs, true)
                ),
            ));
        }

        if let Some(point) = &self.point {
            params.push(("point".to_string(), format!("{},{}", point.x, point.y)));
        }

        if let Some(ring) = &self.polygon {
            let coords: Vec<String> = ring
                .coords()
                .iter()
                .flat_map(|(x, y)| [x.to_string(), y.to_string()])
                .collect();
            params.push(("polygon".to_string(), coords.join(",")));
        }

        if let Some(pattern) = &self.readable_granule_name {
            params.push(("readable_granule_name[]".to_string(), pattern.clone()));
            params.push((
                "options[readable_granule_name][pattern]".to_string(),
                "true".to_string(),
            ));
        }

        params
    }
}

/// Glob matching every granule of a tile, e.g. `*.h10v05.*`.
pub fn tile_pattern(tile: &str) -> String {
    format!("*.{}.*", tile)
}

/// Build the search for `concept_id` between two calendar days.
///
/// The window runs from 00:00:00 UTC on `start` to 23:59:59 UTC on `end`
/// whatever time of day the inputs carry. Polygon and footprint filters are
/// sent counter-clockwise.
pub fn build_query(
    concept_id: &str,
    start: impl Into<CalendarDay>,
    end: impl Into<CalendarDay>,
    spatial: Option<&SpatialFilter>,
    tile: Option<&str>,
) -> QueryResult<GranuleQuery> {
    let range = TimeRange::whole_days(start.into(), end.into());
    if !range.is_ordered() {
        return Err(QueryError::InvalidTemporalRange {
            start: range.start,
            end: range.end,
        });
    }

    let mut query = GranuleQuery::new(concept_id).temporal(range);

    match spatial {
        None => {}
        Some(SpatialFilter::Point(point)) => {
            if !point.x.is_finite() || !point.y.is_finite() {
                return Err(QueryError::InvalidGeometry("point has non-finite coordinates".to_string()));
            }
            query = query.point(*point);
        }
        Some(filter @ (SpatialFilter::Polygon(_) | SpatialFilter::Footprint(_))) => {
            if let Some(ring) = filter.ccw_ring()? {
                query = query.polygon(ring);
            }
        }
    }

    if let Some(tile) = tile {
        query = query.readable_granule_name(tile_pattern(tile));
    }

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_day_window_ignores_time_of_day() {
        let start = Utc.with_ymd_and_hms(2021, 1, 1, 17, 45, 12).unwrap();
        let end = Utc.with_ymd_and_hms(2021, 1, 1, 3, 0, 0).unwrap();
        let query = build_query("C123", start, end, None, None).unwrap();

        let params = query.to_params();
        assert_eq!(
            param(&params, "temporal[]"),
            Some("2021-01-01T00:00:00Z,2021-01-01T23:59:59Z")
        );
    }

    #[test]
    fn test_inverted_window_rejected() {
        let err = build_query("C123", day(2021, 1, 2), day(2021, 1, 1), None, None).unwrap_err();
        assert!(matches!(err, QueryError::InvalidTemporalRange { .. }));
    }

    #[test]
    fn test_point_filter() {
        let filter = SpatialFilter::point(10.0, 20.0);
        let query = build_query("C123", day(2021, 1, 1), day(2021, 1, 1), Some(&filter), None).unwrap();
        assert_eq!(query.point_filter(), Some(&GeoPoint::new(10.0, 20.0)));
        assert_eq!(param(&query.to_params(), "point"), Some("10,20"));
        assert!(query.polygon_filter().is_none());
    }

    #[test]
    fn test_non_finite_point_rejected() {
        let filter = SpatialFilter::point(f64::NAN, 20.0);
        let err = build_query("C123", day(2021, 1, 1), day(2021, 1, 1), Some(&filter), None).unwrap_err();
        assert!(matches!(err, QueryError::InvalidGeometry(_)));
    }

    #[test]
    fn test_clockwise_polygon_is_reversed() {
        let cw = Polygon::from_exterior(vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        assert_eq!(cw.exterior().winding(), Winding::Clockwise);

        let filter = SpatialFilter::Polygon(cw.clone());
        let query = build_query("C123", day(2021, 1, 1), day(2021, 1, 1), Some(&filter), None).unwrap();
        let ring = query.polygon_filter().unwrap();
        assert!(ring.is_ccw());
        assert_eq!(ring, &cw.exterior().reversed());
        assert_eq!(param(&query.to_params(), "polygon"), Some("0,0,1,0,1,1,0,1,0,0"));
    }

    #[test]
    fn test_ccw_polygon_is_kept() {
        let ccw = Polygon::from_exterior(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let filter = SpatialFilter::Polygon(ccw.clone());
        let query = build_query("C123", day(2021, 1, 1), day(2021, 1, 1), Some(&filter), None).unwrap();
        assert_eq!(query.polygon_filter(), Some(ccw.exterior()));
    }

    #[test]
    fn test_degenerate_polygon_sent_unchanged() {
        let line = Polygon::from_exterior(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(line.exterior().winding(), Winding::Degenerate);

        let filter = SpatialFilter::Polygon(line.clone());
        let query = build_query("C123", day(2021, 1, 1), day(2021, 1, 1), Some(&filter), None).unwrap();
        assert_eq!(query.polygon_filter(), Some(line.exterior()));
        assert_eq!(param(&query.to_params(), "polygon"), Some("0,0,1,1,2,2,0,0"));
    }

    #[test]
    fn test_non_finite_polygon_rejected() {
        let ring = Polygon::from_exterior(vec![(0.0, 0.0), (f64::INFINITY, 0.0), (1.0, 1.0)]);
        let filter = SpatialFilter::Polygon(ring);
        let err = build_query("C123", day(2021, 1, 1), day(2021, 1, 1), Some(&filter), None).unwrap_err();
        assert!(matches!(err, QueryError::InvalidGeometry(_)));
    }

    #[test]
    fn test_tile_glob() {
        let query = build_query("C123", day(2021, 1, 1), day(2021, 1, 3), None, Some("h10v05")).unwrap();
        let params = query.to_params();
        assert_eq!(param(&params, "readable_granule_name[]"), Some("*.h10v05.*"));
        assert_eq!(param(&params, "options[readable_granule_name][pattern]"), Some("true"));
        assert_eq!(param(&params, "collection_concept_id"), Some("C123"));
    }

    #[test]
    fn test_no_optional_filters() {
        let query = build_query("C123", day(2021, 1, 1), day(2021, 1, 1), None, None).unwrap();
        let params = query.to_params();
        assert_eq!(params.len(), 2);
        assert!(param(&params, "point").is_none());
        assert!(param(&params, "polygon").is_none());
    }
}
