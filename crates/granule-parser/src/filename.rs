//! Filename codec for tiled granules.
//!
//! Granule names start with four dot-separated fields:
//!
//! ```text
//! VNP09GA.A2020123.h10v05.001.2020125082235.h5
//! ^^^^^^^ ^^^^^^^^ ^^^^^^ ^^^
//! product  date    tile   build
//! ```
//!
//! The date field is a calendar marker (`A`) followed by year and
//! day-of-year. Anything after the build field is ignored. Directories in
//! the path are stripped before parsing.

use std::fmt;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{GranuleError, GranuleResult};

const PRODUCT_FIELD: usize = 0;
const DATE_FIELD: usize = 1;
const TILE_FIELD: usize = 2;
const BUILD_FIELD: usize = 3;

/// The four leading fields of a granule filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GranuleIdentity {
    pub product: String,
    pub acquisition_date: NaiveDate,
    pub tile: String,
    pub build: u32,
}

impl fmt::Display for GranuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.A{:04}{:03}.{}.{:03}",
            self.product,
            self.acquisition_date.year(),
            self.acquisition_date.ordinal(),
            self.tile,
            self.build
        )
    }
}

/// Build a conforming granule name, optionally followed by more dot-separated
/// fields such as a production timestamp and extension.
pub fn format_filename(identity: &GranuleIdentity, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) if !suffix.is_empty() => format!("{}.{}", identity, suffix),
        _ => identity.to_string(),
    }
}

/// Product short name, e.g. `VNP09GA`.
pub fn parse_product<P: AsRef<Path>>(path: P) -> GranuleResult<String> {
    let name = base_name(path.as_ref())?;
    Ok(field(name, PRODUCT_FIELD, "product")?.to_string())
}

/// Acquisition date from the `AYYYYDDD` field.
pub fn parse_date<P: AsRef<Path>>(path: P) -> GranuleResult<NaiveDate> {
    let name = base_name(path.as_ref())?;
    let token = field(name, DATE_FIELD, "date")?;
    parse_year_day(token)
}

/// Tile token, e.g. `h10v05`. The token is not validated here; see
/// [`crate::tile::resolve_tile_address`].
pub fn parse_tile<P: AsRef<Path>>(path: P) -> GranuleResult<String> {
    let name = base_name(path.as_ref())?;
    Ok(field(name, TILE_FIELD, "tile")?.to_string())
}

/// Collection build number, e.g. `1` for `001`.
pub fn parse_build<P: AsRef<Path>>(path: P) -> GranuleResult<u32> {
    let name = base_name(path.as_ref())?;
    let token = field(name, BUILD_FIELD, "build")?;
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GranuleError::parse("build", token, "expected decimal digits"));
    }
    token
        .parse::<u32>()
        .map_err(|e| GranuleError::parse("build", token, e.to_string()))
}

/// All four fields at once.
pub fn parse_identity<P: AsRef<Path>>(path: P) -> GranuleResult<GranuleIdentity> {
    let path = path.as_ref();
    Ok(GranuleIdentity {
        product: parse_product(path)?,
        acquisition_date: parse_date(path)?,
        tile: parse_tile(path)?,
        build: parse_build(path)?,
    })
}

fn base_name(path: &Path) -> GranuleResult<&str> {
    let raw = path.to_string_lossy();
    let name = path
        .file_name()
        .ok_or_else(|| GranuleError::parse("filename", raw.as_ref(), "path has no file name"))?;
    name.to_str()
        .ok_or_else(|| GranuleError::parse("filename", raw.as_ref(), "file name is not valid UTF-8"))
}

fn field<'a>(name: &'a str, index: usize, label: &'static str) -> GranuleResult<&'a str> {
    match name.split('.').nth(index) {
        Some(token) if !token.is_empty() => Ok(token),
        Some(token) => Err(GranuleError::parse(label, token, format!("field {} of '{}' is empty", index + 1, name))),
        None => Err(GranuleError::parse(label, name, format!("missing field {}", index + 1))),
    }
}

/// Parse `AYYYYDDD` (marker letter, 4-digit year, 3-digit day of year).
fn parse_year_day(token: &str) -> GranuleResult<NaiveDate> {
    let mut chars = token.chars();
    match chars.next() {
        Some(marker) if marker.is_ascii_alphabetic() => {}
        _ => return Err(GranuleError::parse("date", token, "missing calendar marker")),
    }

    let digits = chars.as_str();
    if digits.len() != 7 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GranuleError::parse("date", token, "expected YYYYDDD after the marker"));
    }

    let year: i32 = digits[0..4]
        .parse()
        .map_err(|_| GranuleError::parse("date", token, "invalid year"))?;
    let day_of_year: u32 = digits[4..7]
        .parse()
        .map_err(|_| GranuleError::parse("date", token, "invalid day of year"))?;

    NaiveDate::from_yo_opt(year, day_of_year).ok_or_else(|| {
        GranuleError::parse("date", token, format!("day {} does not exist in {}", day_of_year, year))
    })
}
