use std::fmt;

use tracing::warn;

use crate::core::scale::{DEFAULT_NUM_TICKS, QuantitativeScale};
use crate::error::{ScaleError, ScaleResult};

/// Produces tick positions for a scale's current domain.
///
/// Generators are read-only views over the scale: swapping one never mutates
/// domain state. Output order follows the domain direction, so a reversed
/// domain yields descending ticks.
pub trait TickGenerator: fmt::Debug + Send + Sync {
    fn ticks(&self, scale: &QuantitativeScale) -> Vec<f64>;
}

/// Default generator: spans the domain with a 1/2/5-snapped step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NiceTickGenerator {
    target_count: usize,
}

impl Default for NiceTickGenerator {
    fn default() -> Self {
        Self {
            target_count: DEFAULT_NUM_TICKS,
        }
    }
}

impl NiceTickGenerator {
    #[must_use]
    pub fn new(target_count: usize) -> Self {
        Self { target_count }
    }
}

impl TickGenerator for NiceTickGenerator {
    fn ticks(&self, scale: &QuantitativeScale) -> Vec<f64> {
        linear_ticks(scale.domain(), self.target_count)
    }
}

/// Ticks at multiples of a fixed interval, with the domain endpoints added
/// when they are not multiples themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalTickGenerator {
    interval: f64,
}

impl IntervalTickGenerator {
    pub fn new(interval: f64) -> ScaleResult<Self> {
        if !interval.is_finite() || interval <= 0.0 {
            return Err(ScaleError::InvalidData(
                "tick interval must be finite and > 0".to_owned(),
            ));
        }
        Ok(Self { interval })
    }

    #[must_use]
    pub fn interval(self) -> f64 {
        self.interval
    }
}

impl TickGenerator for IntervalTickGenerator {
    fn ticks(&self, scale: &QuantitativeScale) -> Vec<f64> {
        let (start, end) = scale.domain();
        if !start.is_finite() || !end.is_finite() {
            return Vec::new();
        }

        let descending = start > end;
        let (lo, hi) = if descending { (end, start) } else { (start, end) };
        let mut ticks = multiples_in(lo, hi, self.interval);
        if ticks.first().is_none_or(|first| !approx_equal(*first, lo)) {
            ticks.insert(0, lo);
        }
        if ticks.last().is_none_or(|last| !approx_equal(*last, hi)) {
            ticks.push(hi);
        }
        if descending {
            ticks.reverse();
        }
        ticks
    }
}

/// Default ticks filtered to whole numbers.
///
/// The first and last tick always survive the filter so fractional domain
/// edges stay labeled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegerTickGenerator;

impl TickGenerator for IntegerTickGenerator {
    fn ticks(&self, scale: &QuantitativeScale) -> Vec<f64> {
        let ticks = scale.default_ticks();
        let last_index = ticks.len().saturating_sub(1);
        ticks
            .into_iter()
            .enumerate()
            .filter(|(index, tick)| tick.fract() == 0.0 || *index == 0 || *index == last_index)
            .map(|(_, tick)| tick)
            .collect()
    }
}

/// 1/2/5 ladder per decade across a positive domain.
///
/// Falls back to linear ticks when the domain touches zero or below, since a
/// log ladder has no representation for those values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogTickGenerator {
    target_count: usize,
}

impl Default for LogTickGenerator {
    fn default() -> Self {
        Self {
            target_count: DEFAULT_NUM_TICKS,
        }
    }
}

impl LogTickGenerator {
    #[must_use]
    pub fn new(target_count: usize) -> Self {
        Self { target_count }
    }
}

impl TickGenerator for LogTickGenerator {
    fn ticks(&self, scale: &QuantitativeScale) -> Vec<f64> {
        let (start, end) = scale.domain();
        if !start.is_finite() || !end.is_finite() {
            return Vec::new();
        }

        let descending = start > end;
        let (lo, hi) = if descending { (end, start) } else { (start, end) };
        if lo <= 0.0 {
            warn!(
                domain_min = lo,
                "log ticks require a positive domain, falling back to linear ticks"
            );
            return linear_ticks(scale.domain(), self.target_count);
        }

        let min_exp = lo.log10().floor() as i32;
        let max_exp = hi.log10().ceil() as i32;
        let mut ticks = Vec::new();
        for exp in min_exp..=max_exp {
            let decade = 10_f64.powi(exp);
            for multiplier in [1.0, 2.0, 5.0] {
                let candidate = decade * multiplier;
                if candidate >= lo && candidate <= hi {
                    ticks.push(candidate);
                }
            }
        }

        if !ticks.iter().any(|tick| approx_equal(*tick, lo)) {
            ticks.push(lo);
        }
        if !ticks.iter().any(|tick| approx_equal(*tick, hi)) {
            ticks.push(hi);
        }
        ticks.sort_by(|lhs, rhs| lhs.total_cmp(rhs));
        ticks.dedup_by(|lhs, rhs| approx_equal(*lhs, *rhs));

        if ticks.len() > self.target_count {
            ticks = sample_down(ticks, self.target_count);
        }
        if descending {
            ticks.reverse();
        }
        ticks
    }
}

/// Round-cadence ticks over epoch-millisecond domains.
///
/// Picks the smallest cadence (millisecond through week multiples) that keeps
/// the tick count at or under the target, then emits multiples of it. Spans
/// beyond the ladder fall back to linear ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTickGenerator {
    target_count: usize,
}

const TIME_STEP_LADDER_MS: &[f64] = &[
    1.0,
    10.0,
    50.0,
    100.0,
    250.0,
    500.0,
    1_000.0,
    5_000.0,
    15_000.0,
    30_000.0,
    60_000.0,
    300_000.0,
    900_000.0,
    1_800_000.0,
    3_600_000.0,
    10_800_000.0,
    21_600_000.0,
    43_200_000.0,
    86_400_000.0,
    604_800_000.0,
];

impl Default for TimeTickGenerator {
    fn default() -> Self {
        Self {
            target_count: DEFAULT_NUM_TICKS,
        }
    }
}

impl TimeTickGenerator {
    #[must_use]
    pub fn new(target_count: usize) -> Self {
        Self { target_count }
    }
}

impl TickGenerator for TimeTickGenerator {
    fn ticks(&self, scale: &QuantitativeScale) -> Vec<f64> {
        let (start, end) = scale.domain();
        if !start.is_finite() || !end.is_finite() {
            return Vec::new();
        }

        let descending = start > end;
        let (lo, hi) = if descending { (end, start) } else { (start, end) };
        let span = hi - lo;
        let limit = self.target_count.max(1) as f64;

        let Some(step) = TIME_STEP_LADDER_MS
            .iter()
            .copied()
            .find(|step| span / step <= limit)
        else {
            return linear_ticks(scale.domain(), self.target_count);
        };

        let mut ticks = multiples_in(lo, hi, step);
        if descending {
            ticks.reverse();
        }
        ticks
    }
}

/// Ticks inside `[lo, hi]` snapped to a 1/2/5 step targeting `count`.
pub(crate) fn linear_ticks(domain: (f64, f64), count: usize) -> Vec<f64> {
    let (start, end) = domain;
    if !start.is_finite() || !end.is_finite() {
        return Vec::new();
    }
    if start == end {
        return vec![start];
    }

    let descending = start > end;
    let (lo, hi) = if descending { (end, start) } else { (start, end) };
    let step = tick_step(lo, hi, count);
    if !(step > 0.0) || !step.is_finite() {
        return Vec::new();
    }

    let mut ticks = multiples_in(lo, hi, step);
    if descending {
        ticks.reverse();
    }
    ticks
}

/// Expands `domain` outward to step multiples, preserving direction.
///
/// Runs two fitting passes so the step is recomputed against the widened
/// bounds before the final rounding.
pub(crate) fn nice_bounds(domain: (f64, f64), count: usize) -> (f64, f64) {
    let (start, end) = domain;
    if !start.is_finite() || !end.is_finite() || start == end {
        return domain;
    }

    let descending = start > end;
    let (mut lo, mut hi) = if descending { (end, start) } else { (start, end) };
    for _ in 0..2 {
        let step = tick_step(lo, hi, count);
        if !(step > 0.0) || !step.is_finite() {
            break;
        }
        lo = (lo / step).floor() * step;
        hi = (hi / step).ceil() * step;
    }

    if descending { (hi, lo) } else { (lo, hi) }
}

fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    nice_step((hi - lo) / count.max(1) as f64)
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let factor = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    factor * base
}

/// Ascending multiples of `step` inside `[lo, hi]`, computed from integer
/// indices so long runs accumulate no drift.
fn multiples_in(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|index| index as f64 * step).collect()
}

fn sample_down(ticks: Vec<f64>, target: usize) -> Vec<f64> {
    if target == 0 || ticks.len() <= target {
        return ticks;
    }
    if target == 1 {
        return vec![ticks[0]];
    }

    let last_index = ticks.len() - 1;
    let mut sampled = Vec::with_capacity(target);
    let mut previous = usize::MAX;
    for slot in 0..target {
        let ratio = slot as f64 / (target - 1) as f64;
        let index = (ratio * last_index as f64).round() as usize;
        if index != previous {
            sampled.push(ticks[index.min(last_index)]);
            previous = index;
        }
    }
    sampled
}

pub(crate) fn approx_equal(lhs: f64, rhs: f64) -> bool {
    let scale = lhs.abs().max(rhs.abs()).max(1.0);
    (lhs - rhs).abs() <= scale * 1e-12
}
