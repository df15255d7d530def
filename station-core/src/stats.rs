//! Sample-validation & statistics kernel (C3, spec.md §4.3).
//!
//! Pure functions over a slice of `f32`; no owned state, no timestamps, no
//! I/O. Grounded on `ParticulateDataAnalyzer.c`'s `calculateAverage` /
//! `findMinValue` / `findMaxValue` / `calculateStandardDeviation`, with the
//! sentinel scheme normalized per spec.md's table (the original's distinct
//! `-666`/`-777` branches for "array too short" vs. "too few valid entries"
//! collapse to the single `STDDEV_UNDEFINED` sentinel here; see DESIGN.md).

use crate::constants::{MAX_CONC, MIN_CONC, NO_DATA, SQRT_TOLERANCE, STDDEV_UNDEFINED};

/// True iff `value` is a validated channel reading: strictly greater than
/// `MIN_CONC` and less than or equal to `MAX_CONC` (spec.md §3).
pub fn is_valid(value: f32) -> bool {
    value > MIN_CONC && value <= MAX_CONC
}

fn valid_values(xs: &[f32]) -> impl Iterator<Item = f32> + '_ {
    xs.iter().copied().filter(|v| is_valid(*v))
}

/// Count of validated entries in `xs`.
pub fn count_valid(xs: &[f32]) -> usize {
    valid_values(xs).count()
}

/// Arithmetic mean of the validated entries, or [`NO_DATA`] if none are valid.
pub fn mean(xs: &[f32]) -> f32 {
    let mut sum = 0.0f32;
    let mut n = 0usize;
    for v in valid_values(xs) {
        sum += v;
        n += 1;
    }
    if n == 0 {
        NO_DATA
    } else {
        sum / n as f32
    }
}

/// Minimum of the validated entries, or [`NO_DATA`] if none are valid.
pub fn min(xs: &[f32]) -> f32 {
    valid_values(xs).fold(None, |acc: Option<f32>, v| match acc {
        Some(m) if m <= v => Some(m),
        _ => Some(v),
    }).unwrap_or(NO_DATA)
}

/// Maximum of the validated entries, or [`NO_DATA`] if none are valid.
pub fn max(xs: &[f32]) -> f32 {
    valid_values(xs).fold(None, |acc: Option<f32>, v| match acc {
        Some(m) if m >= v => Some(m),
        _ => Some(v),
    }).unwrap_or(NO_DATA)
}

/// Bessel-corrected sample standard deviation of the validated entries.
///
/// Returns [`NO_DATA`] if `xs` is empty or has no validated entries, and
/// [`STDDEV_UNDEFINED`] if exactly one entry is validated (the correction
/// divides by `n - 1`, which is undefined at `n = 1`).
///
/// The square root is computed by bisection to a tolerance of `1e-7`,
/// matching the original firmware's `sqrt_binary_search` (written to avoid
/// depending on a math library on the target MCU); kept here for parity of
/// the emitted values, not because `station-core` itself needs to avoid libm.
pub fn stddev(xs: &[f32]) -> f32 {
    if xs.is_empty() {
        return NO_DATA;
    }

    let mu = mean(xs);
    let mut sum_sq = 0.0f64;
    let mut n = 0usize;
    for v in valid_values(xs) {
        let diff = (v - mu) as f64;
        sum_sq += diff * diff;
        n += 1;
    }

    if n == 0 {
        NO_DATA
    } else if n <= 1 {
        STDDEV_UNDEFINED
    } else {
        sqrt_binary_search(sum_sq / (n - 1) as f64) as f32
    }
}

/// Square root by binary search, tolerance [`SQRT_TOLERANCE`]. Returns `0.0`
/// for non-positive input.
pub fn sqrt_binary_search(x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }

    let mut low = 0.0f64;
    let mut high = x;
    while high - low > SQRT_TOLERANCE {
        let mid = (low + high) / 2.0;
        if mid * mid > x {
            high = mid;
        } else {
            low = mid;
        }
    }
    (low + high) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_data() {
        assert_eq!(mean(&[]), NO_DATA);
        assert_eq!(min(&[]), NO_DATA);
        assert_eq!(max(&[]), NO_DATA);
        assert_eq!(stddev(&[]), NO_DATA);
    }

    #[test]
    fn all_invalid_yields_no_data() {
        let xs = [0.0, -1.0, 600.0];
        assert_eq!(mean(&xs), NO_DATA);
        assert_eq!(min(&xs), NO_DATA);
        assert_eq!(max(&xs), NO_DATA);
        assert_eq!(stddev(&xs), NO_DATA);
    }

    #[test]
    fn single_valid_stddev_is_undefined() {
        let xs = [12.0, -1.0, 600.0];
        assert_eq!(count_valid(&xs), 1);
        assert_eq!(mean(&xs), 12.0);
        assert_eq!(stddev(&xs), STDDEV_UNDEFINED);
    }

    #[test]
    fn boundary_scenario_1_ten_minute_closure() {
        let xs = [10.0f32; 60];
        assert_eq!(count_valid(&xs), 60);
        assert!((mean(&xs) - 10.0).abs() < 1e-6);
        assert_eq!(min(&xs), 10.0);
        assert_eq!(max(&xs), 10.0);
        assert!(stddev(&xs).abs() < 1e-6);
    }

    #[test]
    fn boundary_scenario_3_mixed_valid_invalid() {
        let xs = [5.0, -1.0, 250.0, 600.0, 12.0];
        assert_eq!(count_valid(&xs), 3);
        assert!((mean(&xs) - 89.0).abs() < 1e-3);
        assert_eq!(min(&xs), 5.0);
        assert_eq!(max(&xs), 250.0);
        assert!((stddev(&xs) - 140.3).abs() < 0.1);
    }

    #[test]
    fn boundary_scenario_2_hourly_rollup() {
        let means = [10.0, 12.0, 14.0, 16.0, 18.0, 20.0];
        assert!((mean(&means) - 15.0).abs() < 1e-6);
        assert_eq!(min(&means), 10.0);
        assert_eq!(max(&means), 20.0);
        assert!((stddev(&means) - 3.74).abs() < 0.01);
    }

    #[test]
    fn reordering_does_not_change_statistics() {
        let a = [5.0, 250.0, 12.0, -1.0, 600.0];
        let b = [600.0, 12.0, 5.0, 250.0, -1.0];
        assert_eq!(mean(&a), mean(&b));
        assert_eq!(min(&a), min(&b));
        assert_eq!(max(&a), max(&b));
        assert!((stddev(&a) - stddev(&b)).abs() < 1e-4);
    }

    #[test]
    fn min_le_mean_le_max_whenever_data_present() {
        let xs = [3.2, 500.0, 0.6, -5.0, 42.0, 501.0];
        if count_valid(&xs) >= 1 {
            assert!(min(&xs) <= mean(&xs));
            assert!(mean(&xs) <= max(&xs));
        }
    }

    #[test]
    fn sqrt_matches_floating_point_sqrt() {
        for x in [0.0, 1.0, 2.0, 9.0, 140.3, 99999.0] {
            let expected = (x as f64).sqrt();
            assert!((sqrt_binary_search(x) - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn sqrt_of_nonpositive_is_zero() {
        assert_eq!(sqrt_binary_search(0.0), 0.0);
        assert_eq!(sqrt_binary_search(-4.0), 0.0);
    }
}
