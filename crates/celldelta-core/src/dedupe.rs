//! Deduplicator
//!
//! Collapses records sharing an [`IdentityKey`]. The record with the
//! greatest `source_index` wins; records tied on `source_index` are ranked
//! by their content, so the outcome never depends on the order records
//! arrive here. Output is in ascending key order, ready for the snapshot
//! builder.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{IdentityKey, RadioType, Record};

/// How many records the deduplicator collapsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupeReport {
    pub records_in: usize,
    pub records_out: usize,
    pub duplicates_collapsed: usize,
}

type Precedence<'a> = (
    usize,
    Option<&'a str>,
    i32,
    i32,
    Option<u16>,
    Option<u16>,
    Option<u32>,
    RadioType,
    Option<i32>,
    Option<u32>,
    Option<i64>,
);

/// Total order used to pick the surviving record of a key
fn precedence(record: &Record) -> Precedence<'_> {
    (
        record.source_index,
        record.tower_id.as_deref(),
        record.lat_e7,
        record.lon_e7,
        record.mcc,
        record.mnc,
        record.lac,
        record.radio,
        record.signal_quality,
        record.range_m,
        record.observed_at,
    )
}

/// Deduplicate records by identity key, last occurrence wins
pub fn dedupe(records: Vec<Record>) -> (Vec<Record>, DedupeReport) {
    let records_in = records.len();
    let mut by_key: BTreeMap<IdentityKey, Record> = BTreeMap::new();

    for record in records {
        let key = record.identity_key();
        match by_key.get(&key) {
            Some(existing) if precedence(existing) >= precedence(&record) => {}
            _ => {
                by_key.insert(key, record);
            }
        }
    }

    let out: Vec<Record> = by_key.into_values().collect();
    let report = DedupeReport {
        records_in,
        records_out: out.len(),
        duplicates_collapsed: records_in - out.len(),
    };
    (out, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(tower_id: &str, index: usize, signal: i32) -> Record {
        let mut r = Record::at(100_000_000, 200_000_000);
        r.mcc = Some(262);
        r.mnc = Some(1);
        r.lac = Some(7);
        r.tower_id = Some(tower_id.to_string());
        r.signal_quality = Some(signal);
        r.source_index = index;
        r
    }

    #[test]
    fn test_later_row_wins() {
        let (out, report) = dedupe(vec![cell("a", 0, -90), cell("a", 1, -70)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].signal_quality, Some(-70));
        assert_eq!(report.duplicates_collapsed, 1);
    }

    #[test]
    fn test_winner_independent_of_arrival_order() {
        let (out, _) = dedupe(vec![cell("a", 5, -70), cell("a", 2, -90)]);
        assert_eq!(out[0].signal_quality, Some(-70));
        assert_eq!(out[0].source_index, 5);
    }

    #[test]
    fn test_tied_source_index_resolved_by_content() {
        let weak = cell("a", 3, -90);
        let strong = cell("a", 3, -70);

        let (forward, _) = dedupe(vec![weak.clone(), strong.clone()]);
        let (backward, report) = dedupe(vec![strong, weak]);

        assert_eq!(forward[0].signal_quality, Some(-70));
        assert_eq!(backward[0].signal_quality, Some(-70));
        assert_eq!(report.duplicates_collapsed, 1);
    }

    #[test]
    fn test_output_sorted_and_unique() {
        let (out, report) = dedupe(vec![cell("c", 0, -1), cell("a", 1, -1), cell("b", 2, -1)]);
        let keys: Vec<String> = out.iter().map(|r| r.identity_key().to_string()).collect();
        assert_eq!(
            keys,
            vec!["cell:262:1:7:a", "cell:262:1:7:b", "cell:262:1:7:c"]
        );
        assert_eq!(report.duplicates_collapsed, 0);
        assert_eq!(report.records_out, 3);
    }

    #[test]
    fn test_empty_input() {
        let (out, report) = dedupe(Vec::new());
        assert!(out.is_empty());
        assert_eq!(report, DedupeReport::default());
    }
}
