use celldelta_core::{build, dedupe, normalize_all, RawRow, Snapshot};

/// A geo-keyed OpenCellID row: radio, coordinates and an optional signal
#[allow(dead_code)]
pub fn geo_row(index: usize, radio: &str, lat: &str, lon: &str, signal: &str) -> RawRow {
    RawRow::from_fields(
        index,
        &[radio, "", "", "", "", "", lon, lat, "", "", "", "", "", signal],
    )
}

/// A carrier-keyed OpenCellID row
#[allow(dead_code)]
pub fn cell_row(index: usize, cell: &str, lat: &str, lon: &str, signal: &str) -> RawRow {
    RawRow::from_fields(
        index,
        &["LTE", "262", "1", "4711", cell, "", lon, lat, "", "", "", "", "", signal],
    )
}

/// Normalize, dedupe and build in one go
#[allow(dead_code)]
pub fn snapshot_of(rows: &[RawRow]) -> Snapshot {
    let (records, _) = normalize_all(rows);
    let (records, _) = dedupe(records);
    build(records, "test").unwrap()
}
