use approx::assert_relative_eq;
use scalestack::api::{ChartEngine, ChartEngineConfig, DuplicateKeyPolicy, SeriesComposition};
use scalestack::core::{Datum, Domainer, Series, Viewport};
use scalestack::error::ScaleError;

fn config() -> ChartEngineConfig {
    ChartEngineConfig::new(Viewport::new(800, 600))
}

fn engine() -> ChartEngine {
    ChartEngine::new(config()).expect("engine init")
}

fn stacked_engine() -> ChartEngine {
    let config = config()
        .with_composition(SeriesComposition::Stacked)
        .with_value_padding_proportion(0.0);
    ChartEngine::new(config).expect("engine init")
}

fn series(name: &str, records: &[(f64, f64)]) -> Series {
    Series::new(
        name,
        records
            .iter()
            .map(|(key, value)| Datum::new(*key, *value))
            .collect(),
    )
}

#[test]
fn rejects_zero_sized_viewport() {
    let result = ChartEngine::new(ChartEngineConfig::new(Viewport::new(0, 600)));

    assert!(matches!(
        result,
        Err(ScaleError::InvalidViewport {
            width: 0,
            height: 600
        })
    ));
}

#[test]
fn rejects_invalid_config_values() {
    let negative_padding = config().with_value_padding_proportion(-0.5);
    assert!(ChartEngine::new(negative_padding).is_err());

    let zero_ticks = config().with_tick_count(0);
    assert!(ChartEngine::new(zero_ticks).is_err());
}

#[test]
fn fresh_engine_fits_ranges_to_the_viewport() {
    let engine = engine();

    assert_eq!(engine.key_scale().range(), (0.0, 800.0));
    assert_eq!(engine.value_scale().range(), (600.0, 0.0));
    assert_eq!(engine.key_scale().domain(), (0.0, 1.0));

    let (min, max) = engine.value_scale().domain();
    assert_relative_eq!(min, -0.05, max_relative = 1e-12);
    assert_relative_eq!(max, 1.05, max_relative = 1e-12);
}

#[test]
fn insert_series_updates_scales_and_version() {
    let mut engine = engine();

    engine
        .insert_series(series("a", &[(0.0, 10.0), (10.0, 20.0)]))
        .expect("insert");

    assert_eq!(engine.data_version(), 1);
    assert_eq!(engine.series_count(), 1);
    assert_eq!(engine.key_scale().domain(), (0.0, 10.0));
    assert_eq!(engine.value_scale().domain(), (9.5, 20.5));
}

#[test]
fn duplicate_series_name_is_rejected() {
    let mut engine = engine();
    engine
        .insert_series(series("a", &[(1.0, 1.0)]))
        .expect("first insert");

    let result = engine.insert_series(series("a", &[(2.0, 2.0)]));

    assert!(matches!(result, Err(ScaleError::InvalidData(_))));
    assert_eq!(engine.series_count(), 1);
    assert_eq!(engine.data_version(), 1);
}

#[test]
fn blank_series_name_is_rejected() {
    let mut engine = engine();

    let result = engine.insert_series(series("   ", &[(1.0, 1.0)]));

    assert!(matches!(result, Err(ScaleError::InvalidData(_))));
}

#[test]
fn overwrite_policy_keeps_last_record_at_first_position() {
    let mut engine = engine();

    engine
        .insert_series(series("a", &[(1.0, 1.0), (2.0, 2.0), (1.0, 5.0)]))
        .expect("insert");

    let records = engine.series()[0].data().to_vec();
    assert_eq!(records, vec![Datum::new(1.0, 5.0), Datum::new(2.0, 2.0)]);
}

#[test]
fn reject_policy_refuses_duplicate_keys() {
    let config = config().with_duplicate_key_policy(DuplicateKeyPolicy::Reject);
    let mut engine = ChartEngine::new(config).expect("engine init");

    let result = engine.insert_series(series("a", &[(1.0, 1.0), (1.0, 2.0)]));

    match result {
        Err(ScaleError::DuplicateKey {
            series: series_name,
            key,
        }) => {
            assert_eq!(series_name, "a");
            assert_eq!(key, 1.0);
        }
        other => panic!("expected duplicate key error, got {other:?}"),
    }
    assert_eq!(engine.series_count(), 0);
    assert_eq!(engine.data_version(), 0);
}

#[test]
fn non_finite_records_are_dropped_on_insert() {
    let mut engine = engine();

    engine
        .insert_series(series(
            "a",
            &[(f64::NAN, 1.0), (1.0, 2.0), (2.0, f64::INFINITY)],
        ))
        .expect("insert");

    assert_eq!(engine.series()[0].len(), 1);
    assert_eq!(engine.series()[0].data()[0], Datum::new(1.0, 2.0));
}

#[test]
fn stacked_composition_drives_the_value_domain_from_the_total() {
    let mut engine = stacked_engine();

    engine
        .insert_series(series("a", &[(1.0, 3.0), (2.0, 5.0)]))
        .expect("insert a");
    engine
        .insert_series(series("b", &[(1.0, 2.0), (2.0, 1.0)]))
        .expect("insert b");

    assert_eq!(engine.total_extent().as_tuple(), (0.0, 6.0));
    assert_eq!(engine.value_scale().domain(), (0.0, 6.0));

    let stacked = engine.stacked_series();
    assert_eq!(stacked[1].points[0].offset, 3.0);
    assert_eq!(stacked[1].points[1].offset, 5.0);
}

#[test]
fn stacked_padding_pins_the_zero_edge() {
    let config = config()
        .with_composition(SeriesComposition::Stacked)
        .with_value_padding_proportion(0.2);
    let mut engine = ChartEngine::new(config).expect("engine init");

    engine
        .insert_series(series("a", &[(1.0, 3.0), (2.0, 5.0)]))
        .expect("insert a");
    engine
        .insert_series(series("b", &[(1.0, 2.0), (2.0, 1.0)]))
        .expect("insert b");

    let (min, max) = engine.value_scale().domain();
    assert_eq!(min, 0.0);
    assert_relative_eq!(max, 6.6, max_relative = 1e-12);
}

#[test]
fn switching_composition_rederives_the_value_domain() {
    let config = config().with_value_padding_proportion(0.0);
    let mut engine = ChartEngine::new(config).expect("engine init");
    engine
        .insert_series(series("a", &[(1.0, 3.0), (2.0, 5.0)]))
        .expect("insert a");
    engine
        .insert_series(series("b", &[(1.0, 2.0), (2.0, 1.0)]))
        .expect("insert b");

    assert_eq!(engine.value_scale().domain(), (1.0, 5.0));

    engine.set_composition(SeriesComposition::Stacked);
    assert_eq!(engine.value_scale().domain(), (0.0, 6.0));

    engine.set_composition(SeriesComposition::Overlaid);
    assert_eq!(engine.value_scale().domain(), (1.0, 5.0));
}

#[test]
fn remove_series_restacks_the_remainder() {
    let mut engine = stacked_engine();
    engine
        .insert_series(series("a", &[(1.0, 3.0), (2.0, 5.0)]))
        .expect("insert a");
    engine
        .insert_series(series("b", &[(1.0, 2.0), (2.0, 1.0)]))
        .expect("insert b");

    let removed = engine.remove_series("a").expect("remove");

    assert_eq!(removed.name(), "a");
    assert_eq!(removed.len(), 2);
    assert_eq!(engine.series_names(), vec!["b"]);
    assert_eq!(engine.data_version(), 3);
    assert_eq!(engine.total_extent().as_tuple(), (0.0, 2.0));
    assert_eq!(engine.value_scale().domain(), (0.0, 2.0));
}

#[test]
fn move_series_reorders_the_stack() {
    let mut engine = stacked_engine();
    engine
        .insert_series(series("a", &[(1.0, 3.0), (2.0, 5.0)]))
        .expect("insert a");
    engine
        .insert_series(series("b", &[(1.0, 2.0), (2.0, 1.0)]))
        .expect("insert b");

    engine.move_series("b", 0).expect("move");

    assert_eq!(engine.series_names(), vec!["b", "a"]);
    let stacked = engine.stacked_series();
    assert_eq!(stacked[0].name, "b");
    assert_eq!(stacked[0].points[0].offset, 0.0);
    assert_eq!(stacked[1].points[0].offset, 2.0);
}

#[test]
fn move_series_rejects_out_of_range_index() {
    let mut engine = engine();
    engine
        .insert_series(series("a", &[(1.0, 1.0)]))
        .expect("insert");

    assert!(matches!(
        engine.move_series("a", 5),
        Err(ScaleError::InvalidData(_))
    ));
}

#[test]
fn replace_series_data_keeps_the_slot() {
    let mut engine = engine();
    engine
        .insert_series(series("a", &[(1.0, 1.0)]))
        .expect("insert a");
    engine
        .insert_series(series("b", &[(2.0, 2.0)]))
        .expect("insert b");

    engine
        .replace_series_data("a", vec![Datum::new(5.0, 50.0)])
        .expect("replace");

    assert_eq!(engine.series_names(), vec!["a", "b"]);
    assert_eq!(engine.series()[0].data()[0], Datum::new(5.0, 50.0));
    assert_eq!(engine.data_version(), 3);
}

#[test]
fn clear_series_resets_to_defaults() {
    let mut engine = stacked_engine();
    engine
        .insert_series(series("a", &[(1.0, 3.0)]))
        .expect("insert a");
    engine
        .insert_series(series("b", &[(1.0, 2.0)]))
        .expect("insert b");

    engine.clear_series();

    assert_eq!(engine.series_count(), 0);
    assert!(engine.stack_output().keys.is_empty());
    assert_eq!(engine.key_scale().domain(), (0.0, 1.0));
    assert_eq!(engine.value_scale().domain(), (0.0, 1.0));
}

#[test]
fn unknown_series_operations_error() {
    let mut engine = engine();

    assert!(engine.remove_series("ghost").is_err());
    assert!(engine.replace_series_data("ghost", Vec::new()).is_err());
    assert!(engine.move_series("ghost", 0).is_err());
}

#[test]
fn user_domainer_wins_over_the_engine_baseline() {
    let mut engine = engine();
    engine.value_scale_mut().set_domainer(Domainer::new());

    engine
        .insert_series(series("a", &[(0.0, 10.0), (10.0, 20.0)]))
        .expect("insert");

    assert_eq!(engine.value_scale().domain(), (10.0, 20.0));
}

#[test]
fn manual_value_domain_freezes_until_auto_domain() {
    let mut engine = engine();
    engine
        .insert_series(series("a", &[(0.0, 10.0), (10.0, 20.0)]))
        .expect("insert a");

    engine.value_scale_mut().set_domain((0.0, 1000.0));
    engine
        .insert_series(series("b", &[(0.0, 100.0), (10.0, 50.0)]))
        .expect("insert b");

    assert_eq!(engine.value_scale().domain(), (0.0, 1000.0));

    engine.auto_domain_all();

    assert_eq!(engine.value_scale().domain(), (5.5, 104.5));
}

#[test]
fn set_viewport_refits_both_ranges() {
    let mut engine = engine();

    engine
        .set_viewport(Viewport::new(1000, 500))
        .expect("resize");

    assert_eq!(engine.viewport(), Viewport::new(1000, 500));
    assert_eq!(engine.key_scale().range(), (0.0, 1000.0));
    assert_eq!(engine.value_scale().range(), (500.0, 0.0));

    assert!(engine.set_viewport(Viewport::new(0, 500)).is_err());
    assert_eq!(engine.key_scale().range(), (0.0, 1000.0));
}

#[test]
fn pixel_projection_uses_the_inverted_value_axis() {
    let config = config().with_value_padding_proportion(0.0);
    let mut engine = ChartEngine::new(config).expect("engine init");
    engine
        .insert_series(series("a", &[(0.0, 0.0), (10.0, 100.0)]))
        .expect("insert");

    assert_eq!(engine.value_to_pixel(0.0), 600.0);
    assert_eq!(engine.value_to_pixel(100.0), 0.0);
    assert_eq!(engine.key_to_pixel(0.0), 0.0);
    assert_eq!(engine.key_to_pixel(10.0), 800.0);

    let recovered = engine.pixel_to_value(engine.value_to_pixel(42.0));
    assert!((recovered - 42.0).abs() <= 1e-9);
}

#[test]
fn configured_tick_count_drives_both_axes() {
    let config = config()
        .with_tick_count(5)
        .with_value_padding_proportion(0.0);
    let mut engine = ChartEngine::new(config).expect("engine init");
    engine
        .insert_series(series("a", &[(0.0, 0.0), (10.0, 10.0)]))
        .expect("insert");

    assert_eq!(engine.key_ticks(), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    assert_eq!(engine.value_ticks(), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
}

#[test]
fn nice_value_domain_rounds_the_derived_bounds() {
    let config = config()
        .with_nice_value_domain(true)
        .with_value_padding_proportion(0.0);
    let mut engine = ChartEngine::new(config).expect("engine init");

    engine
        .insert_series(series("a", &[(0.0, 0.3), (10.0, 9.7)]))
        .expect("insert");

    assert_eq!(engine.value_scale().domain(), (0.0, 10.0));
}

#[test]
fn config_json_round_trip() {
    let config = config()
        .with_composition(SeriesComposition::Stacked)
        .with_duplicate_key_policy(DuplicateKeyPolicy::Reject)
        .with_value_padding_proportion(0.25)
        .with_nice_value_domain(true)
        .with_tick_count(7);

    let json = config.to_json_pretty().expect("serialize");
    let restored = ChartEngineConfig::from_json_str(&json).expect("deserialize");

    assert_eq!(restored, config);
}

#[test]
fn config_json_defaults_missing_fields() {
    let json = r#"{ "viewport": { "width": 640, "height": 480 } }"#;

    let config = ChartEngineConfig::from_json_str(json).expect("deserialize");

    assert_eq!(config.viewport, Viewport::new(640, 480));
    assert_eq!(config.composition, SeriesComposition::Overlaid);
    assert_eq!(config.duplicate_key_policy, DuplicateKeyPolicy::Overwrite);
    assert_eq!(config.tick_count, 10);
}
