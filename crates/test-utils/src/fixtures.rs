//! Common fixtures for VIIRS tile and catalog tests.

/// Known MODLAND tiles and what they cover.
pub mod tiles {
    /// Central United States, 30-40°N
    pub const CONUS_H10V05: TileFixture = TileFixture {
        token: "h10v05",
        h: 10,
        v: 5,
        min_lat: 30.0,
        max_lat: 40.0,
    };

    /// A tile token with its expected indices and latitude band.
    #[derive(Debug, Clone, Copy)]
    pub struct TileFixture {
        pub token: &'static str,
        pub h: u32,
        pub v: u32,
        pub min_lat: f64,
        pub max_lat: f64,
    }
}

/// Sample granule names.
pub mod granules {
    /// Daily surface reflectance, 2020 day 123 (May 2)
    pub const VNP09GA: &str = "VNP09GA.A2020123.h10v05.001.2020125082235.h5";

    /// Minimal conforming name
    pub const MINIMAL: &str = "VNP.A2020123.h10v05.001.h5";

    /// 1 km grid of the daily reflectance product
    pub const GRID_1KM: &str = "VNP_Grid_1km_2D";

    /// 500 m grid of the daily reflectance product
    pub const GRID_500M: &str = "VNP_Grid_500m_2D";
}

/// CMR identifiers and response bodies.
pub mod catalog {
    /// Collection concept id used in tests
    pub const CONCEPT_ID: &str = "C2631841556-LPCLOUD";

    /// A two-item UMM-JSON search response, items out of temporal order.
    pub const UMM_RESPONSE: &str = r#"{
  "hits": 2,
  "items": [
    {
      "meta": { "concept-id": "G2", "native-id": "VNP09GA.A2021002.h10v05.002.2021003" },
      "umm": {
        "TemporalExtent": { "RangeDateTime": {
          "BeginningDateTime": "2021-01-02T00:00:00.000Z",
          "EndingDateTime": "2021-01-02T23:59:59.000Z" } },
        "RelatedUrls": [
          { "URL": "https://data.example/VNP09GA.A2021002.h10v05.002.2021003.h5", "Type": "GET DATA" },
          { "URL": "https://data.example/browse.jpg", "Type": "GET RELATED VISUALIZATION" }
        ]
      }
    },
    {
      "meta": { "concept-id": "G1", "native-id": "VNP09GA.A2021001.h10v05.002.2021002" },
      "umm": {
        "TemporalExtent": { "RangeDateTime": {
          "BeginningDateTime": "2021-01-01T00:00:00.000Z",
          "EndingDateTime": "2021-01-01T23:59:59.000Z" } },
        "RelatedUrls": []
      }
    }
  ]
}"#;
}
