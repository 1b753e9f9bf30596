//! Record normalizer
//!
//! Turns untyped [`RawRow`]s into typed [`Record`]s. A row that cannot be
//! typed is rejected with a [`RejectReason`]; it is never repaired.
//!
//! Rules applied to every row:
//! - blank optional columns mean "absent"
//! - identifiers are trimmed and lower-cased before keying
//! - integer columns accept integral decimals (`"262.0"`) but reject
//!   fractions (`"262.5"`)
//! - `averageSignal == 0` is OpenCellID's "unknown" marker and becomes absent

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::{CellDeltaError, ExError};
use crate::model::record::COORD_SCALE;
use crate::model::{RadioType, RawRow, Record};

/// Why a row was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// `lat` or `lon` column blank or missing
    MissingCoordinates,
    /// Coordinates parsed but fall outside [-90,90] / [-180,180]
    OutOfRange,
    /// A numeric column does not coerce to its type
    UnparseableNumeric,
    /// Every column is blank
    EmptyRow,
}

impl RejectReason {
    pub const ALL: [RejectReason; 4] = [
        RejectReason::MissingCoordinates,
        RejectReason::OutOfRange,
        RejectReason::UnparseableNumeric,
        RejectReason::EmptyRow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::MissingCoordinates => "missing_coordinates",
            RejectReason::OutOfRange => "out_of_range",
            RejectReason::UnparseableNumeric => "unparseable_numeric",
            RejectReason::EmptyRow => "empty_row",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-reason rejection counts for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub rows_read: usize,
    pub rejected: BTreeMap<RejectReason, usize>,
}

impl NormalizeReport {
    pub fn rows_rejected(&self) -> usize {
        self.rejected.values().sum()
    }

    pub fn count(&self, reason: RejectReason) -> usize {
        self.rejected.get(&reason).copied().unwrap_or(0)
    }

    fn record(&mut self, reason: RejectReason) {
        *self.rejected.entry(reason).or_insert(0) += 1;
    }
}

/// Normalize a single raw row
///
/// # Errors
///
/// Returns the [`RejectReason`] for a row that cannot become a valid record.
pub fn normalize(raw: &RawRow) -> std::result::Result<Record, RejectReason> {
    if raw.is_blank() {
        return Err(RejectReason::EmptyRow);
    }

    let (lat, lon) = match (present(&raw.lat), present(&raw.lon)) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(RejectReason::MissingCoordinates),
    };
    let lat = parse_degrees(lat)?;
    let lon = parse_degrees(lon)?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(RejectReason::OutOfRange);
    }

    let signal_quality = parse_int::<i32>(&raw.average_signal)?.filter(|s| *s != 0);

    Ok(Record {
        tower_id: present(&raw.cell).map(str::to_ascii_lowercase),
        lat_e7: to_e7(lat),
        lon_e7: to_e7(lon),
        mcc: parse_int(&raw.mcc)?,
        mnc: parse_int(&raw.net)?,
        lac: parse_int(&raw.area)?,
        radio: present(&raw.radio).map_or(RadioType::Unknown, RadioType::parse),
        signal_quality,
        range_m: parse_int(&raw.range)?,
        observed_at: parse_int(&raw.updated)?,
        source_index: raw.index,
    })
}

/// Normalize a batch, keeping valid records and counting rejections
///
/// Each rejected row is traced with its `ERR_ROW_REJECTED` code; one
/// warning is emitted per non-zero rejection reason. Never fails.
pub fn normalize_all(rows: &[RawRow]) -> (Vec<Record>, NormalizeReport) {
    let mut report = NormalizeReport {
        rows_read: rows.len(),
        ..NormalizeReport::default()
    };
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        match normalize(row) {
            Ok(record) => records.push(record),
            Err(reason) => {
                let rejection = ExError::from(CellDeltaError::RowRejected {
                    row_index: row.index,
                    reason,
                });
                tracing::trace!(
                    component = module_path!(),
                    op = "normalize",
                    row_index = row.index,
                    reason = reason.as_str(),
                    err_code = rejection.code(),
                    "{}",
                    rejection.message()
                );
                report.record(reason);
            }
        }
    }

    for (reason, count) in &report.rejected {
        tracing::warn!(
            component = module_path!(),
            op = "normalize",
            reason = reason.as_str(),
            rows_rejected = *count,
            "rows rejected"
        );
    }

    (records, report)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_degrees(value: &str) -> std::result::Result<f64, RejectReason> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| RejectReason::UnparseableNumeric)?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(RejectReason::UnparseableNumeric)
    }
}

fn to_e7(degrees: f64) -> i32 {
    // In range by construction: |degrees| <= 180 keeps the product within i32.
    (degrees * COORD_SCALE).round() as i32
}

/// Parse an optional integer column, accepting integral decimals
fn parse_int<T: TryFrom<i64>>(value: &Option<String>) -> std::result::Result<Option<T>, RejectReason> {
    let Some(text) = present(value) else {
        return Ok(None);
    };
    let wide = match text.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let f: f64 = text.parse().map_err(|_| RejectReason::UnparseableNumeric)?;
            if !f.is_finite() || f.fract() != 0.0 || f.abs() > i64::MAX as f64 {
                return Err(RejectReason::UnparseableNumeric);
            }
            f as i64
        }
    };
    T::try_from(wide)
        .map(Some)
        .map_err(|_| RejectReason::UnparseableNumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> RawRow {
        RawRow::from_fields(0, fields)
    }

    fn full_row(lat: &str, lon: &str) -> RawRow {
        row(&[
            "LTE", "262", "1", "40100", " 1A2B ", "0", lon, lat, "500", "12", "1", "1500000000",
            "1600000000", "-85",
        ])
    }

    #[test]
    fn test_normalize_valid_row() {
        let r = normalize(&full_row("48.137154", "11.575494")).unwrap();
        assert_eq!(r.lat_e7, 481_371_540);
        assert_eq!(r.lon_e7, 115_754_940);
        assert_eq!(r.tower_id.as_deref(), Some("1a2b"));
        assert_eq!(r.mcc, Some(262));
        assert_eq!(r.mnc, Some(1));
        assert_eq!(r.lac, Some(40_100));
        assert_eq!(r.radio, RadioType::Lte);
        assert_eq!(r.signal_quality, Some(-85));
        assert_eq!(r.range_m, Some(500));
        assert_eq!(r.observed_at, Some(1_600_000_000));
    }

    #[test]
    fn test_missing_lat_rejected() {
        assert_eq!(
            normalize(&full_row("", "11.5")),
            Err(RejectReason::MissingCoordinates)
        );
        assert_eq!(
            normalize(&row(&["GSM", "262"])),
            Err(RejectReason::MissingCoordinates)
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            normalize(&full_row("90.5", "11.5")),
            Err(RejectReason::OutOfRange)
        );
        assert_eq!(
            normalize(&full_row("48.1", "-180.0001")),
            Err(RejectReason::OutOfRange)
        );
        assert!(normalize(&full_row("-90", "180")).is_ok());
    }

    #[test]
    fn test_unparseable_numbers_rejected() {
        assert_eq!(
            normalize(&full_row("north", "11.5")),
            Err(RejectReason::UnparseableNumeric)
        );
        assert_eq!(
            normalize(&full_row("NaN", "11.5")),
            Err(RejectReason::UnparseableNumeric)
        );

        let mut bad_mcc = full_row("48.1", "11.5");
        bad_mcc.mcc = Some("262.5".to_string());
        assert_eq!(normalize(&bad_mcc), Err(RejectReason::UnparseableNumeric));

        let mut overflow = full_row("48.1", "11.5");
        overflow.net = Some("70000".to_string());
        assert_eq!(normalize(&overflow), Err(RejectReason::UnparseableNumeric));
    }

    #[test]
    fn test_integral_decimal_accepted() {
        let mut r = full_row("48.1", "11.5");
        r.mcc = Some("262.0".to_string());
        assert_eq!(normalize(&r).unwrap().mcc, Some(262));
    }

    #[test]
    fn test_empty_row_rejected() {
        assert_eq!(normalize(&RawRow::new(4)), Err(RejectReason::EmptyRow));
        assert_eq!(normalize(&row(&["", " "])), Err(RejectReason::EmptyRow));
    }

    #[test]
    fn test_zero_signal_is_absent() {
        let mut r = full_row("48.1", "11.5");
        r.average_signal = Some("0".to_string());
        assert_eq!(normalize(&r).unwrap().signal_quality, None);
    }

    #[test]
    fn test_blank_optionals_are_absent() {
        let r = normalize(&row(&["", "", "", "", "", "", "11.5", "48.1"])).unwrap();
        assert_eq!(r.mcc, None);
        assert_eq!(r.tower_id, None);
        assert_eq!(r.radio, RadioType::Unknown);
        assert!(!r.identity_key().is_carrier());
    }

    #[test]
    fn test_normalize_all_counts_by_reason() {
        let rows = vec![
            RawRow::from_fields(0, &["GSM", "262", "1", "1", "a", "", "11.5", "48.1"]),
            RawRow::from_fields(1, &["GSM", "262", "1", "1", "b", "", "11.5", ""]),
            RawRow::new(2),
            RawRow::from_fields(3, &["GSM", "262", "1", "1", "c", "", "11.5", "95"]),
            RawRow::from_fields(4, &["GSM", "262", "1", "1", "d", "", "", "48.1"]),
        ];
        let (records, report) = normalize_all(&rows);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_index, 0);
        assert_eq!(report.rows_read, 5);
        assert_eq!(report.rows_rejected(), 4);
        assert_eq!(report.count(RejectReason::MissingCoordinates), 2);
        assert_eq!(report.count(RejectReason::EmptyRow), 1);
        assert_eq!(report.count(RejectReason::OutOfRange), 1);
        assert_eq!(report.count(RejectReason::UnparseableNumeric), 0);
    }

    #[test]
    fn test_reason_display_is_snake_case() {
        assert_eq!(RejectReason::MissingCoordinates.to_string(), "missing_coordinates");
        assert_eq!(
            serde_json::to_string(&RejectReason::UnparseableNumeric).unwrap(),
            "\"unparseable_numeric\""
        );
    }
}
