//! Canonical snapshot serialization.
//!
//! Compact JSON with a fixed layout:
//!
//! ```text
//! {"format":"celldelta.snapshot.v1","records":[
//!   {"key":..,"radio":..,"lat":"48.1371540","lon":"11.5754940",
//!    "mcc":..,"mnc":..,"lac":..,"tower_id":..,"signal":..,
//!    "range_m":..,"observed_at":..}, ...]}
//! ```
//!
//! Field order is fixed by struct declaration order. Coordinates are
//! printed from their fixed-point integers with exactly seven decimals, so
//! encoding never depends on float formatting. Absent optionals are `null`.
//! These bytes are both the hash input for the snapshot id and the CAS blob.

use serde::{Deserialize, Serialize};

use crate::errors::{CellDeltaError, Result};
use crate::model::record::{format_coord, COORD_SCALE};
use crate::model::{RadioType, Record};

/// Format tag written into every canonical document
pub const FORMAT_VERSION: &str = "celldelta.snapshot.v1";

#[derive(Serialize)]
struct Document<'a> {
    format: &'a str,
    records: Vec<CanonicalRecord<'a>>,
}

#[derive(Serialize)]
struct CanonicalRecord<'a> {
    key: String,
    radio: RadioType,
    lat: String,
    lon: String,
    mcc: Option<u16>,
    mnc: Option<u16>,
    lac: Option<u32>,
    tower_id: Option<&'a str>,
    signal: Option<i32>,
    range_m: Option<u32>,
    observed_at: Option<i64>,
}

#[derive(Deserialize)]
struct OwnedDocument {
    format: String,
    records: Vec<OwnedRecord>,
}

#[derive(Deserialize)]
struct OwnedRecord {
    key: String,
    radio: RadioType,
    lat: String,
    lon: String,
    mcc: Option<u16>,
    mnc: Option<u16>,
    lac: Option<u32>,
    tower_id: Option<String>,
    signal: Option<i32>,
    range_m: Option<u32>,
    observed_at: Option<i64>,
}

/// Encode an ordered record sequence into canonical bytes
///
/// # Errors
///
/// Returns `Serialization` if JSON encoding fails.
pub fn encode(records: &[Record]) -> Result<Vec<u8>> {
    let doc = Document {
        format: FORMAT_VERSION,
        records: records
            .iter()
            .map(|r| CanonicalRecord {
                key: r.identity_key().to_string(),
                radio: r.radio,
                lat: format_coord(r.lat_e7),
                lon: format_coord(r.lon_e7),
                mcc: r.mcc,
                mnc: r.mnc,
                lac: r.lac,
                tower_id: r.tower_id.as_deref(),
                signal: r.signal_quality,
                range_m: r.range_m,
                observed_at: r.observed_at,
            })
            .collect(),
    };
    Ok(serde_json::to_vec(&doc)?)
}

/// Decode canonical bytes back into records
///
/// Restored records take their position in the document as `source_index`.
///
/// # Errors
///
/// Returns `Serialization` when the bytes are not a canonical document of a
/// known format, or when a stored key does not match its record.
pub fn decode(bytes: &[u8]) -> Result<Vec<Record>> {
    let doc: OwnedDocument = serde_json::from_slice(bytes)?;
    if doc.format != FORMAT_VERSION {
        return Err(CellDeltaError::Serialization {
            message: format!("unsupported snapshot format '{}'", doc.format),
        });
    }

    doc.records
        .into_iter()
        .enumerate()
        .map(|(position, stored)| {
            let record = Record {
                tower_id: stored.tower_id,
                lat_e7: parse_coord(&stored.lat)?,
                lon_e7: parse_coord(&stored.lon)?,
                mcc: stored.mcc,
                mnc: stored.mnc,
                lac: stored.lac,
                radio: stored.radio,
                signal_quality: stored.signal,
                range_m: stored.range_m,
                observed_at: stored.observed_at,
                source_index: position,
            };
            let derived = record.identity_key().to_string();
            if derived != stored.key {
                return Err(CellDeltaError::Serialization {
                    message: format!(
                        "record {} stores key '{}' but derives '{}'",
                        position, stored.key, derived
                    ),
                });
            }
            Ok(record)
        })
        .collect()
}

fn parse_coord(text: &str) -> Result<i32> {
    let degrees: f64 = text.parse().map_err(|_| CellDeltaError::Serialization {
        message: format!("invalid coordinate '{}'", text),
    })?;
    if !degrees.is_finite() || degrees.abs() > 180.0 {
        return Err(CellDeltaError::Serialization {
            message: format!("coordinate out of range '{}'", text),
        });
    }
    Ok((degrees * COORD_SCALE).round() as i32)
}
