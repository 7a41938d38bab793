use colonnade_columnar::{Column, ColumnData};
use colonnade_scan::{scan, AggregationKind, AggregationSpec, NullHandling, ScanMode};
use proptest::prelude::*;

fn spec_for(kind: AggregationKind) -> AggregationSpec {
    match kind {
        AggregationKind::Sum => AggregationSpec::sum(),
        AggregationKind::Min => AggregationSpec::min(),
        AggregationKind::Max => AggregationSpec::max(),
        AggregationKind::Product => AggregationSpec::product(),
    }
}

fn kind_strategy() -> impl Strategy<Value = AggregationKind> {
    prop_oneof![
        Just(AggregationKind::Sum),
        Just(AggregationKind::Min),
        Just(AggregationKind::Max),
        Just(AggregationKind::Product),
    ]
}

fn mode_strategy() -> impl Strategy<Value = ScanMode> {
    prop_oneof![Just(ScanMode::Inclusive), Just(ScanMode::Exclusive)]
}

fn nulls_strategy() -> impl Strategy<Value = NullHandling> {
    prop_oneof![Just(NullHandling::Exclude), Just(NullHandling::Include)]
}

/// One row of nullable input: the value and whether it is valid.
fn rows_strategy() -> impl Strategy<Value = Vec<(i64, bool)>> {
    prop::collection::vec((any::<i64>(), prop::bool::weighted(0.8)), 0..512)
}

fn reference_scan(
    rows: &[(i64, bool)],
    kind: AggregationKind,
    mode: ScanMode,
) -> Vec<i64> {
    let identity: i64 = match kind {
        AggregationKind::Sum => 0,
        AggregationKind::Product => 1,
        AggregationKind::Min => i64::MAX,
        AggregationKind::Max => i64::MIN,
    };
    let combine = |a: i64, b: i64| -> i64 {
        match kind {
            AggregationKind::Sum => a.wrapping_add(b),
            AggregationKind::Product => a.wrapping_mul(b),
            AggregationKind::Min => a.min(b),
            AggregationKind::Max => a.max(b),
        }
    };

    let mut out = Vec::with_capacity(rows.len());
    let mut acc = identity;
    for &(value, valid) in rows {
        let substituted = if valid { value } else { identity };
        match mode {
            ScanMode::Inclusive => {
                acc = combine(acc, substituted);
                out.push(acc);
            }
            ScanMode::Exclusive => {
                out.push(acc);
                acc = combine(acc, substituted);
            }
        }
    }
    out
}

fn column_from_rows(rows: &[(i64, bool)]) -> Column {
    let values: Vec<i64> = rows.iter().map(|&(v, _)| v).collect();
    let valid: Vec<bool> = rows.iter().map(|&(_, b)| b).collect();
    if valid.iter().all(|&b| b) {
        Column::from_data(values)
    } else {
        Column::from_nullable(values, &valid).expect("lengths match")
    }
}

fn i64_values(col: &Column) -> Vec<i64> {
    match col.data() {
        ColumnData::Int64(values) => values.clone(),
        other => panic!("expected Int64 output, got {:?}", other.element_type()),
    }
}

proptest! {
    /// The engine agrees with a plain sequential fold for every kind, mode,
    /// and null layout.
    #[test]
    fn scan_matches_sequential_reference(
        rows in rows_strategy(),
        kind in kind_strategy(),
        mode in mode_strategy(),
        nulls in nulls_strategy(),
    ) {
        let input = column_from_rows(&rows);
        let out = scan(&input, &spec_for(kind), mode, nulls)
            .expect("numeric combinations are always supported");
        prop_assert_eq!(i64_values(&out), reference_scan(&rows, kind, mode));
    }

    /// Re-running a scan on the same input is bit-identical: the engine has
    /// no hidden mutable state across calls.
    #[test]
    fn scan_is_idempotent(
        rows in rows_strategy(),
        kind in kind_strategy(),
        mode in mode_strategy(),
        nulls in nulls_strategy(),
    ) {
        let input = column_from_rows(&rows);
        let first = scan(&input, &spec_for(kind), mode, nulls)
            .expect("numeric combinations are always supported");
        let second = scan(&input, &spec_for(kind), mode, nulls)
            .expect("numeric combinations are always supported");
        prop_assert_eq!(first, second);
    }

    /// Output validity follows the spec invariant exactly: a copy of the
    /// input bits under Exclude, the (mode-matching) AND-prefix under
    /// Include.
    #[test]
    fn output_validity_invariant_holds(
        rows in rows_strategy(),
        kind in kind_strategy(),
        mode in mode_strategy(),
        nulls in nulls_strategy(),
    ) {
        let input = column_from_rows(&rows);
        let out = scan(&input, &spec_for(kind), mode, nulls)
            .expect("numeric combinations are always supported");

        let in_valid: Vec<bool> = rows.iter().map(|&(_, b)| b).collect();
        let expected: Option<Vec<bool>> = if in_valid.iter().all(|&b| b) {
            None
        } else {
            Some(match nulls {
                NullHandling::Exclude => in_valid.clone(),
                NullHandling::Include => {
                    let mut acc = true;
                    in_valid
                        .iter()
                        .map(|&b| {
                            match mode {
                                ScanMode::Inclusive => {
                                    acc = acc && b;
                                    acc
                                }
                                ScanMode::Exclusive => {
                                    let before = acc;
                                    acc = acc && b;
                                    before
                                }
                            }
                        })
                        .collect()
                }
            })
        };

        prop_assert_eq!(out.validity().map(|v| v.to_bools()), expected);
    }
}
