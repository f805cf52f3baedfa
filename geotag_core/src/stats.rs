//! Order statistics shared by the coordinate and bearing medians.

/// Median of the non-NaN values, averaging the two middle values on even counts.
///
/// Returns `None` when no valid value remains.
pub fn median(values: &[f64]) -> Option<f64> {
    let sorted = sorted_valid(values);
    if sorted.is_empty() {
        return None;
    }

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Median of the non-NaN values that is always a member of the input.
///
/// On even counts the lower of the two middle values is chosen.
pub fn lower_median(values: &[f64]) -> Option<f64> {
    let sorted = sorted_valid(values);
    if sorted.is_empty() {
        return None;
    }
    Some(sorted[(sorted.len() - 1) / 2])
}

fn sorted_valid(values: &[f64]) -> Vec<f64> {
    let mut valid: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    valid.sort_by(f64::total_cmp);
    valid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_median_skips_nan() {
        assert_eq!(median(&[f64::NAN, 5.0]), Some(5.0));
        assert_eq!(median(&[f64::NAN]), None);
    }

    #[test]
    fn test_lower_median_is_member() {
        assert_eq!(lower_median(&[4.0, 1.0, 3.0, 2.0]), Some(2.0));
        assert_eq!(lower_median(&[0.5, 0.1]), Some(0.1));
        assert_eq!(lower_median(&[7.0]), Some(7.0));
        assert_eq!(lower_median(&[]), None);
    }
}
