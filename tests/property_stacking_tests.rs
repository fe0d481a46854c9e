use proptest::collection::vec;
use proptest::prelude::*;
use scalestack::core::{Datum, Series, compute_stack};

fn series_from(name: &str, records: &[(i16, f64)]) -> Series {
    Series::new(
        name,
        records
            .iter()
            .map(|(key, value)| Datum::new(f64::from(*key), *value))
            .collect(),
    )
}

/// Value the stacker should see for `key`: the last record wins.
fn last_value_at(records: &[(i16, f64)], key: f64) -> f64 {
    records
        .iter()
        .rev()
        .find(|(candidate, _)| f64::from(*candidate) == key)
        .map_or(0.0, |(_, value)| *value)
}

fn record_strategy() -> impl Strategy<Value = Vec<(i16, f64)>> {
    vec((-50i16..50, -100.0f64..100.0), 0..30)
}

proptest! {
    #[test]
    fn last_series_top_is_the_column_sum(
        a in record_strategy(),
        b in record_strategy(),
        c in record_strategy()
    ) {
        let input = [
            series_from("a", &a),
            series_from("b", &b),
            series_from("c", &c),
        ];
        let records = [&a, &b, &c];

        let output = compute_stack(&input);

        for (slot, key) in output.keys.iter().enumerate() {
            let expected: f64 = records
                .iter()
                .map(|records| last_value_at(records, *key))
                .sum();
            let top = output.series[2].points[slot].top();
            prop_assert!((top - expected).abs() <= 1e-9 * expected.abs().max(1.0));
        }
    }

    #[test]
    fn offsets_accumulate_in_series_order(
        a in record_strategy(),
        b in record_strategy()
    ) {
        let input = [series_from("a", &a), series_from("b", &b)];

        let output = compute_stack(&input);

        for slot in 0..output.keys.len() {
            let first = output.series[0].points[slot];
            let second = output.series[1].points[slot];
            prop_assert_eq!(first.offset, 0.0);
            prop_assert_eq!(second.offset, first.top());
        }
    }

    #[test]
    fn every_series_is_aligned_to_the_key_union(
        a in record_strategy(),
        b in record_strategy(),
        c in record_strategy()
    ) {
        let input = [
            series_from("a", &a),
            series_from("b", &b),
            series_from("c", &c),
        ];

        let output = compute_stack(&input);

        for stacked in &output.series {
            prop_assert_eq!(stacked.points.len(), output.keys.len());
            for (point, key) in stacked.points.iter().zip(&output.keys) {
                prop_assert_eq!(point.key, *key);
            }
        }
    }

    #[test]
    fn total_extent_contains_zero_and_every_band_top(
        a in record_strategy(),
        b in record_strategy()
    ) {
        let input = [series_from("a", &a), series_from("b", &b)];

        let output = compute_stack(&input);
        let total = output.total_extent;

        prop_assert!(total.contains(0.0));
        for stacked in &output.series {
            for point in &stacked.points {
                prop_assert!(total.contains(point.top()));
            }
        }
    }

    #[test]
    fn stacking_is_deterministic(
        a in record_strategy(),
        b in record_strategy()
    ) {
        let input = [series_from("a", &a), series_from("b", &b)];

        let first = compute_stack(&input);
        let second = compute_stack(&input);

        prop_assert_eq!(first, second);
    }
}
