//! Bearing arithmetic in radians, where a full circle is 2π.
//!
//! Bearings are measured clockwise from geographic north and are not
//! bounded when stored. Anything that compares or classifies a bearing
//! normalizes it into `[0, 2π)` first.

use std::f64::consts::TAU;

use crate::stats;

/// Maps any angle into `[0, 2π)`. NaN stays NaN.
///
/// ```
/// use geotag_core::radian;
/// let r = radian::normalize(-0.1);
/// assert!((r - (std::f64::consts::TAU - 0.1)).abs() < 1e-12);
/// ```
pub fn normalize(radians: f64) -> f64 {
    let r = radians.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly 2π
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Equality after normalization; two missing bearings are equal.
pub fn equals(one: Option<f64>, two: Option<f64>) -> bool {
    match (one, two) {
        (Some(a), Some(b)) => normalize(a) == normalize(b),
        (None, None) => true,
        _ => false,
    }
}

/// Sum of two bearings, normalized.
pub fn add(one: f64, two: f64) -> f64 {
    normalize(one + two)
}

/// Median bearing of a set, or `None` if no bearing is usable.
///
/// This is a linear median over normalized values, not a circular one:
/// bearings of 0.1 and 6.2 have a median of 0.1 even though they straddle
/// north. On even counts the lower middle value is returned so the result is
/// always one of the inputs.
pub fn median(bearings: &[f64]) -> Option<f64> {
    let normalized: Vec<f64> = bearings.iter().map(|&b| normalize(b)).collect();
    stats::lower_median(&normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    #[test]
    fn test_normalize_negative() {
        assert_abs_diff_eq!(normalize(-0.1), TAU - 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize(-PI), PI, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_wraps_full_turns() {
        assert_abs_diff_eq!(normalize(TAU), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize(5.0 * PI), PI, epsilon = 1e-12);
        assert_eq!(normalize(-1e-300), 0.0);
    }

    #[test]
    fn test_equals() {
        assert!(equals(Some(0.5), Some(0.5 + TAU)));
        assert!(equals(None, None));
        assert!(!equals(Some(0.5), None));
        assert!(!equals(None, Some(0.5)));
        assert!(!equals(Some(0.5), Some(0.6)));
    }

    #[test]
    fn test_add() {
        assert_abs_diff_eq!(add(1.5 * PI, PI), 0.5 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_median_empty() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[f64::NAN]), None);
    }

    #[test]
    fn test_median_is_linear_not_circular() {
        // A circular median would land near north; the linear one picks the lower value.
        assert_abs_diff_eq!(median(&[0.1, 6.2]).unwrap(), 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(median(&[-0.1, 0.2, 0.3]).unwrap(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_median_even_count_takes_lower() {
        assert_abs_diff_eq!(median(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.0, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn prop_normalize_in_range(theta in -1.0e6f64..1.0e6) {
            let r = normalize(theta);
            prop_assert!((0.0..TAU).contains(&r));
        }

        #[test]
        fn prop_normalize_periodic(theta in -100.0f64..100.0, k in -50i32..50) {
            let a = normalize(theta);
            let b = normalize(theta + TAU * k as f64);
            let diff = (a - b).abs();
            // values on either side of north are also the same angle
            prop_assert!(diff.min(TAU - diff) < 1e-9);
        }
    }
}
