use serde::{Deserialize, Serialize};

use super::key::IdentityKey;

/// Scale of the fixed-point coordinate representation (1e-7 degree)
pub const COORD_SCALE: f64 = 10_000_000.0;

/// Radio access technology of a tower
///
/// Parsed case-insensitively. OpenCellID's `CDMA` and anything not listed
/// here collapse to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadioType {
    Gsm,
    Umts,
    Lte,
    Nr,
    Unknown,
}

impl RadioType {
    /// Parse a radio label such as `"LTE"` or `" gsm "`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "gsm" => RadioType::Gsm,
            "umts" => RadioType::Umts,
            "lte" => RadioType::Lte,
            "nr" => RadioType::Nr,
            _ => RadioType::Unknown,
        }
    }

    /// Canonical lower-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            RadioType::Gsm => "gsm",
            RadioType::Umts => "umts",
            RadioType::Lte => "lte",
            RadioType::Nr => "nr",
            RadioType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RadioType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record - one valid, normalized tower observation
///
/// Coordinates are held as integers in units of 1e-7 degree so that key
/// derivation, hashing and diffing all see exactly the value that the
/// canonical form prints.
///
/// `source_index` is the position of the raw row this record came from. It
/// drives last-occurrence deduplication and is not part of the record's
/// content: two records that differ only in `source_index` compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Carrier cell identifier, trimmed and lower-cased
    pub tower_id: Option<String>,

    /// Latitude in 1e-7 degree
    pub lat_e7: i32,

    /// Longitude in 1e-7 degree
    pub lon_e7: i32,

    /// Mobile country code
    pub mcc: Option<u16>,

    /// Mobile network code
    pub mnc: Option<u16>,

    /// Location/tracking area code
    pub lac: Option<u32>,

    pub radio: RadioType,

    /// Average signal in dBm
    pub signal_quality: Option<i32>,

    /// Estimated coverage radius in metres
    pub range_m: Option<u32>,

    /// Last observation, unix seconds
    pub observed_at: Option<i64>,

    /// Input row this record was parsed from
    #[serde(skip)]
    pub source_index: usize,
}

impl Record {
    /// Create a record at the given position with every optional field absent
    pub fn at(lat_e7: i32, lon_e7: i32) -> Self {
        Self {
            tower_id: None,
            lat_e7,
            lon_e7,
            mcc: None,
            mnc: None,
            lac: None,
            radio: RadioType::Unknown,
            signal_quality: None,
            range_m: None,
            observed_at: None,
            source_index: 0,
        }
    }

    /// Latitude in degrees
    pub fn lat(&self) -> f64 {
        f64::from(self.lat_e7) / COORD_SCALE
    }

    /// Longitude in degrees
    pub fn lon(&self) -> f64 {
        f64::from(self.lon_e7) / COORD_SCALE
    }

    /// Derive the identity key used for dedupe and diff
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::for_record(self)
    }

    /// Compare every content field, ignoring `source_index`
    pub fn same_content(&self, other: &Record) -> bool {
        self.tower_id == other.tower_id
            && self.lat_e7 == other.lat_e7
            && self.lon_e7 == other.lon_e7
            && self.mcc == other.mcc
            && self.mnc == other.mnc
            && self.lac == other.lac
            && self.radio == other.radio
            && self.signal_quality == other.signal_quality
            && self.range_m == other.range_m
            && self.observed_at == other.observed_at
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.same_content(other)
    }
}

impl Eq for Record {}

/// Render a fixed-point coordinate as a decimal with exactly seven places
pub fn format_coord(value_e7: i32) -> String {
    let sign = if value_e7 < 0 { "-" } else { "" };
    let abs = i64::from(value_e7).abs();
    format!("{}{}.{:07}", sign, abs / 10_000_000, abs % 10_000_000)
}
