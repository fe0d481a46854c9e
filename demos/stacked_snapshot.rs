use scalestack::api::{ChartEngine, ChartEngineConfig, SeriesComposition};
use scalestack::core::{Datum, Series, Viewport};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = scalestack::telemetry::init_default_tracing();

    let config = ChartEngineConfig::new(Viewport::new(1000, 600))
        .with_composition(SeriesComposition::Stacked)
        .with_nice_value_domain(true);
    let mut engine = ChartEngine::new(config)?;

    for (name, phase) in [("requests", 0.0), ("retries", 1.3), ("errors", 2.6)] {
        let data: Vec<Datum> = (0..60)
            .map(|i| {
                let key = i as f64;
                let value = 20.0 + ((key / 6.0) + phase).sin() * 12.0 + key * 0.2;
                Datum::new(key, value)
            })
            .collect();
        engine.insert_series(Series::new(name, data))?;
    }

    let snapshot = engine.snapshot();
    println!("series: {:?}", engine.series_names());
    println!("key domain: {:?}", snapshot.key_scale.domain);
    println!("value domain: {:?}", snapshot.value_scale.domain);
    println!("value ticks: {:?}", snapshot.value_scale.ticks);
    println!(
        "stack: {} keys, total extent {:?}",
        snapshot.stack_keys.len(),
        snapshot.total_extent.as_tuple()
    );

    engine.set_composition(SeriesComposition::Overlaid);
    println!(
        "overlaid value domain: {:?}",
        engine.value_scale().domain()
    );

    Ok(())
}
