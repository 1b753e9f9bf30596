use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diff::DiffResult;
use crate::model::record::COORD_SCALE;
use crate::model::Record;

/// Format tag of the serialized change set
pub const CHANGE_SET_FORMAT: &str = "celldelta.changeset.v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeClass {
    Added,
    Removed,
    Modified,
    Unchanged,
}

/// One map point: every tower of one change class at one position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePoint {
    pub lat: f64,
    pub lon: f64,
    pub class: ChangeClass,
    /// Identity keys of the towers at this point, ascending
    pub keys: Vec<String>,
    /// Number of towers merged into the point
    pub weight: usize,
    /// Largest coverage radius among the towers, in metres
    pub range_m: Option<u32>,
}

/// Tower counts per change class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
}

/// Serializable change set consumed by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderableChangeSet {
    pub format: String,
    pub previous_id: Option<String>,
    pub current_id: String,
    pub summary: ChangeSummary,
    /// Ordered by class, then latitude, then longitude
    pub points: Vec<ChangePoint>,
}

impl RenderableChangeSet {
    /// Points of one class
    pub fn points_of(&self, class: ChangeClass) -> impl Iterator<Item = &ChangePoint> {
        self.points.iter().filter(move |p| p.class == class)
    }
}

struct Accumulator {
    keys: Vec<String>,
    range_m: Option<u32>,
}

/// Materialize a diff into a renderable change set
///
/// Added, modified and unchanged towers are placed at their current
/// position, removed towers at their previous one. Towers sharing a
/// position and class collapse into one point.
pub fn report(diff: &DiffResult) -> RenderableChangeSet {
    let mut grouped: BTreeMap<(ChangeClass, i32, i32), Accumulator> = BTreeMap::new();

    let mut place = |class: ChangeClass, record: &Record| {
        let entry = grouped
            .entry((class, record.lat_e7, record.lon_e7))
            .or_insert_with(|| Accumulator {
                keys: Vec::new(),
                range_m: None,
            });
        entry.keys.push(record.identity_key().to_string());
        entry.range_m = entry.range_m.max(record.range_m);
    };

    for r in &diff.added {
        place(ChangeClass::Added, r);
    }
    for r in &diff.removed {
        place(ChangeClass::Removed, r);
    }
    for m in &diff.modified {
        place(ChangeClass::Modified, &m.current);
    }
    for r in &diff.unchanged {
        place(ChangeClass::Unchanged, r);
    }

    let points = grouped
        .into_iter()
        .map(|((class, lat_e7, lon_e7), acc)| ChangePoint {
            lat: f64::from(lat_e7) / COORD_SCALE,
            lon: f64::from(lon_e7) / COORD_SCALE,
            class,
            weight: acc.keys.len(),
            keys: acc.keys,
            range_m: acc.range_m,
        })
        .collect();

    let counts = diff.counts();
    RenderableChangeSet {
        format: CHANGE_SET_FORMAT.to_string(),
        previous_id: diff.previous_id.clone(),
        current_id: diff.current_id.clone(),
        summary: ChangeSummary {
            added: counts.added,
            removed: counts.removed,
            modified: counts.modified,
            unchanged: counts.unchanged,
        },
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;
    use crate::model::RadioType;
    use crate::snapshot::build;

    fn at(lat_e7: i32, lon_e7: i32, radio: RadioType, range_m: Option<u32>) -> Record {
        let mut r = Record::at(lat_e7, lon_e7);
        r.radio = radio;
        r.range_m = range_m;
        r
    }

    #[test]
    fn test_co_sited_towers_merge_into_one_point() {
        let mut records = vec![
            at(100_000_000, 200_000_000, RadioType::Gsm, Some(300)),
            at(100_000_000, 200_000_000, RadioType::Lte, Some(900)),
            at(110_000_000, 210_000_000, RadioType::Lte, None),
        ];
        records.sort_by_key(Record::identity_key);
        let cur = build(records, "t").unwrap();

        let set = report(&diff(None, &cur));
        assert_eq!(set.format, CHANGE_SET_FORMAT);
        assert_eq!(set.summary.added, 3);
        assert_eq!(set.points.len(), 2);

        let merged = &set.points[0];
        assert_eq!(merged.class, ChangeClass::Added);
        assert_eq!(merged.weight, 2);
        assert_eq!(merged.keys.len(), 2);
        assert_eq!(merged.range_m, Some(900));
        assert!((merged.lat - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_removed_uses_previous_position() {
        let prev = build(vec![at(100_000_000, 200_000_000, RadioType::Gsm, None)], "a").unwrap();
        let cur = build(vec![at(120_000_000, 220_000_000, RadioType::Gsm, None)], "b").unwrap();

        let set = report(&diff(Some(&prev), &cur));
        let removed: Vec<_> = set.points_of(ChangeClass::Removed).collect();
        assert_eq!(removed.len(), 1);
        assert!((removed[0].lat - 10.0).abs() < 1e-9);
        assert_eq!(set.points_of(ChangeClass::Added).count(), 1);
        assert_eq!(set.previous_id.as_deref(), Some(prev.snapshot_id()));
    }

    #[test]
    fn test_every_key_appears_once() {
        let cur = build(
            vec![
                at(1_000, 1_000, RadioType::Gsm, None),
                at(1_000, 1_000, RadioType::Umts, None),
            ],
            "t",
        )
        .unwrap();
        let set = report(&diff(Some(&cur), &cur));
        let total: usize = set.points.iter().map(|p| p.weight).sum();
        assert_eq!(total, 2);
        assert_eq!(set.summary.unchanged, 2);
    }
}
