// Property tests: snapshot determinism, order independence, diff symmetry
// and partition completeness.

use std::collections::BTreeSet;

use celldelta_core::{build, dedupe, diff, IdentityKey, RadioType, Record, Snapshot};
use proptest::prelude::*;

/// Which parts of the carrier hierarchy a generated row carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyShape {
    Full,
    NoLac,
    NoTowerId,
}

/// (cell id, lat_e7, lon_e7, signal, key shape)
type Tower = (u32, i32, i32, i32, KeyShape);

fn shape_strategy() -> impl Strategy<Value = KeyShape> {
    prop_oneof![
        3 => Just(KeyShape::Full),
        1 => Just(KeyShape::NoLac),
        1 => Just(KeyShape::NoTowerId),
    ]
}

fn tower_strategy() -> impl Strategy<Value = Tower> {
    (
        0u32..40,
        -900_000_000i32..=900_000_000,
        -1_800_000_000i32..=1_800_000_000,
        -120i32..-40,
        shape_strategy(),
    )
}

/// Rows without a full carrier key are placed inside a grid cell derived
/// from their cell id, so equal ids collide on the quantized key.
fn to_record((cell, lat_e7, lon_e7, signal, shape): Tower, index: usize) -> Record {
    let (lat_e7, lon_e7) = match shape {
        KeyShape::Full => (lat_e7, lon_e7),
        KeyShape::NoLac | KeyShape::NoTowerId => {
            let base = cell as i32 * 20_000;
            (base + lat_e7.rem_euclid(400), base + lon_e7.rem_euclid(400))
        }
    };
    let mut r = Record::at(lat_e7, lon_e7);
    r.mcc = Some(262);
    r.mnc = Some(2);
    r.lac = (shape != KeyShape::NoLac).then_some(100);
    r.tower_id = (shape != KeyShape::NoTowerId).then(|| format!("{:x}", cell));
    r.radio = RadioType::Lte;
    r.signal_quality = Some(signal);
    r.source_index = index;
    r
}

fn snapshot_of(towers: &[Tower]) -> Option<Snapshot> {
    let records = towers
        .iter()
        .enumerate()
        .map(|(i, t)| to_record(*t, i))
        .collect();
    let (records, _) = dedupe(records);
    build(records, "prop").ok()
}

fn keys(records: &[Record]) -> Vec<IdentityKey> {
    records.iter().map(Record::identity_key).collect()
}

proptest! {
    /// Property: building twice from the same input yields the same id.
    #[test]
    fn prop_snapshot_id_deterministic(towers in prop::collection::vec(tower_strategy(), 1..30)) {
        let a = snapshot_of(&towers).unwrap();
        let b = snapshot_of(&towers).unwrap();
        prop_assert_eq!(a.snapshot_id(), b.snapshot_id());
    }

    /// Property: no two records of a snapshot share a key.
    #[test]
    fn prop_snapshot_keys_unique(towers in prop::collection::vec(tower_strategy(), 1..30)) {
        let snap = snapshot_of(&towers).unwrap();
        let k = keys(snap.records());
        let unique: BTreeSet<_> = k.iter().cloned().collect();
        prop_assert_eq!(unique.len(), k.len());
    }

    /// Property: carrier-keyed records precede quantized ones, and rows
    /// sharing a grid cell collapse to one record.
    #[test]
    fn prop_quantized_keys_follow_carrier_keys(towers in prop::collection::vec(tower_strategy(), 1..30)) {
        let snap = snapshot_of(&towers).unwrap();
        let k = keys(snap.records());
        let first_quantized = k.iter().position(|key| !key.is_carrier()).unwrap_or(k.len());
        prop_assert!(k[first_quantized..].iter().all(|key| !key.is_carrier()));

        let partial_cells: BTreeSet<u32> = towers
            .iter()
            .filter(|t| t.4 != KeyShape::Full)
            .map(|t| t.0)
            .collect();
        prop_assert_eq!(k.len() - first_quantized, partial_cells.len());
    }

    /// Property: with unique keys, permuting input rows does not change the id.
    #[test]
    fn prop_snapshot_id_order_independent(
        (towers, shuffled) in prop::collection::btree_map(0u32..200, (
            -900_000_000i32..=900_000_000,
            -1_800_000_000i32..=1_800_000_000,
            -120i32..-40,
            shape_strategy(),
        ), 1..30)
        .prop_map(|m| {
            m.into_iter()
                .map(|(c, (lat, lon, s, shape))| (c, lat, lon, s, shape))
                .collect::<Vec<_>>()
        })
        .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let a = snapshot_of(&towers).unwrap();
        let b = snapshot_of(&shuffled).unwrap();
        prop_assert_eq!(a.snapshot_id(), b.snapshot_id());
    }

    /// Property: diff(A, B) and diff(B, A) mirror each other.
    #[test]
    fn prop_diff_symmetry(
        a in prop::collection::vec(tower_strategy(), 1..30),
        b in prop::collection::vec(tower_strategy(), 1..30),
    ) {
        let sa = snapshot_of(&a).unwrap();
        let sb = snapshot_of(&b).unwrap();
        let ab = diff(Some(&sa), &sb);
        let ba = diff(Some(&sb), &sa);

        prop_assert_eq!(keys(&ab.added), keys(&ba.removed));
        prop_assert_eq!(keys(&ab.removed), keys(&ba.added));
        prop_assert_eq!(ab.modified_keys(), ba.modified_keys());
        for (x, y) in ab.modified.iter().zip(ba.modified.iter()) {
            prop_assert_eq!(&x.previous, &y.current);
            prop_assert_eq!(&x.current, &y.previous);
        }
    }

    /// Property: every key of either side lands in exactly one bucket.
    #[test]
    fn prop_diff_partition_complete(
        a in prop::collection::vec(tower_strategy(), 1..30),
        b in prop::collection::vec(tower_strategy(), 1..30),
    ) {
        let sa = snapshot_of(&a).unwrap();
        let sb = snapshot_of(&b).unwrap();
        let result = diff(Some(&sa), &sb);

        let union: BTreeSet<IdentityKey> = keys(sa.records())
            .into_iter()
            .chain(keys(sb.records()))
            .collect();

        let mut seen = BTreeSet::new();
        let buckets = [
            result.added_keys(),
            result.removed_keys(),
            result.modified_keys(),
            result.unchanged_keys(),
        ];
        for key in buckets.iter().flatten() {
            prop_assert!(seen.insert(key.clone()), "key {} in two buckets", key);
        }
        prop_assert_eq!(result.counts().total(), seen.len());
        prop_assert_eq!(seen, union);
    }

    /// Property: each bucket comes out in ascending key order.
    #[test]
    fn prop_diff_buckets_sorted(
        a in prop::collection::vec(tower_strategy(), 1..30),
        b in prop::collection::vec(tower_strategy(), 1..30),
    ) {
        let sa = snapshot_of(&a).unwrap();
        let sb = snapshot_of(&b).unwrap();
        let result = diff(Some(&sa), &sb);
        for bucket in [result.added_keys(), result.removed_keys(), result.unchanged_keys()] {
            prop_assert!(bucket.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
