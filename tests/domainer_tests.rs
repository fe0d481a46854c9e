use approx::assert_relative_eq;
use scalestack::core::{Domainer, Extent, QuantitativeScale};

fn scale() -> QuantitativeScale {
    QuantitativeScale::new()
}

#[test]
fn combines_extents_across_sources() {
    let domainer = Domainer::new();
    let extents = [Extent::new(5.0, 10.0), Extent::new(-2.0, 7.0)];

    let domain = domainer.compute_domain(&extents, &scale());

    assert_eq!(domain, (-2.0, 10.0));
}

#[test]
fn no_extents_fall_back_to_default_extent() {
    let domainer = Domainer::new();

    let domain = domainer.compute_domain(&[], &scale());

    assert_eq!(domain, (0.0, 1.0));
}

#[test]
fn included_values_are_forced_into_domain() {
    let domainer = Domainer::new().with_included_value(0.0);
    let extents = [Extent::new(3.0, 8.0)];

    let domain = domainer.compute_domain(&extents, &scale());

    assert_eq!(domain, (0.0, 8.0));
}

#[test]
fn included_value_inside_extent_changes_nothing() {
    let domainer = Domainer::new().with_included_value(5.0);
    let extents = [Extent::new(3.0, 8.0)];

    let domain = domainer.compute_domain(&extents, &scale());

    assert_eq!(domain, (3.0, 8.0));
}

#[test]
fn padding_splits_proportion_across_both_sides() {
    let domainer = Domainer::new()
        .with_padding_proportion(0.2)
        .expect("valid padding");
    let extents = [Extent::new(0.0, 100.0)];

    let (min, max) = domainer.compute_domain(&extents, &scale());

    assert_relative_eq!(min, -10.0, max_relative = 1e-12);
    assert_relative_eq!(max, 110.0, max_relative = 1e-12);
}

#[test]
fn padding_exception_pins_matching_edge() {
    let domainer = Domainer::new()
        .with_padding_proportion(0.2)
        .expect("valid padding")
        .with_padding_exception(0.0);
    let extents = [Extent::new(0.0, 100.0)];

    let (min, max) = domainer.compute_domain(&extents, &scale());

    assert_eq!(min, 0.0);
    assert_relative_eq!(max, 110.0, max_relative = 1e-12);
}

#[test]
fn include_runs_before_padding() {
    let domainer = Domainer::new()
        .with_padding_proportion(0.2)
        .expect("valid padding")
        .with_included_value(0.0);
    let extents = [Extent::new(50.0, 100.0)];

    let (min, max) = domainer.compute_domain(&extents, &scale());

    assert_relative_eq!(min, -10.0, max_relative = 1e-12);
    assert_relative_eq!(max, 110.0, max_relative = 1e-12);
}

#[test]
fn zero_width_extent_is_widened_to_a_usable_domain() {
    let domainer = Domainer::new();
    let extents = [Extent::point(2.0)];

    let domain = domainer.compute_domain(&extents, &scale());

    assert_eq!(domain, (1.0, 3.0));
}

#[test]
fn zero_width_extent_is_widened_even_without_padding() {
    let domainer = Domainer::new()
        .with_padding_proportion(0.0)
        .expect("valid padding");
    let extents = [Extent::point(-7.5)];

    let (min, max) = domainer.compute_domain(&extents, &scale());

    assert!(min < -7.5);
    assert!(max > -7.5);
    assert_eq!((min, max), (-8.5, -6.5));
}

#[test]
fn nice_rounds_outward_to_step_multiples() {
    let domainer = Domainer::new().with_nice();
    let extents = [Extent::new(0.3, 9.7)];

    let domain = domainer.compute_domain(&extents, &scale());

    assert_eq!(domain, (0.0, 10.0));
}

#[test]
fn nice_count_controls_step_granularity() {
    let coarse = Domainer::new().with_nice_count(2);
    let fine = Domainer::new().with_nice_count(50);
    let extents = [Extent::new(0.3, 9.7)];

    let (coarse_lo, coarse_hi) = coarse.compute_domain(&extents, &scale());
    let (fine_lo, fine_hi) = fine.compute_domain(&extents, &scale());

    assert!(coarse_lo <= fine_lo);
    assert!(coarse_hi >= fine_hi);
    assert!(fine_lo <= 0.3);
    assert!(fine_hi >= 9.7);
}

#[test]
fn negative_or_non_finite_padding_proportion_is_rejected() {
    assert!(Domainer::new().with_padding_proportion(-0.1).is_err());
    assert!(Domainer::new().with_padding_proportion(f64::NAN).is_err());
    assert!(
        Domainer::new()
            .with_padding_proportion(f64::INFINITY)
            .is_err()
    );
}

#[test]
fn non_finite_included_values_are_skipped() {
    let domainer = Domainer::new()
        .with_included_value(f64::NAN)
        .with_included_value(f64::NEG_INFINITY);
    let extents = [Extent::new(3.0, 8.0)];

    let domain = domainer.compute_domain(&extents, &scale());

    assert_eq!(domain, (3.0, 8.0));
}

#[test]
fn repeated_configuration_values_are_deduplicated() {
    let domainer = Domainer::new()
        .with_included_value(0.0)
        .with_included_value(0.0);

    assert_eq!(domainer.include_values(), &[0.0]);
}

#[test]
fn identical_inputs_yield_identical_domains() {
    let domainer = Domainer::new()
        .with_padding_proportion(0.05)
        .expect("valid padding")
        .with_included_value(0.0)
        .with_nice();
    let extents = [Extent::new(12.3, 456.7)];

    let first = domainer.compute_domain(&extents, &scale());
    let second = domainer.compute_domain(&extents, &scale());

    assert_eq!(first, second);
}
