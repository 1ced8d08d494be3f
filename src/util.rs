/// Asserts that a numerical value is in the provided interval `[a,b]` and panics
/// with a helpful message if not
///
/// ### Example
/// ```should_panic
/// let value = 2.0;
/// robby::assert_interval!(value, 0.0, 1.0);
/// ```
/// This will panic with the message "Invalid value for \`value\`. Must be in the interval \[0.0, 1.0\]."
#[macro_export]
macro_rules! assert_interval {
    ($var:expr, $a:expr, $b:expr) => {
        assert!(
            $var >= $a && $var <= $b,
            "Invalid value for `{}`. Must be in the interval [{}, {}].",
            stringify!($var),
            $a,
            $b,
        );
    };
}

/// Mean and population standard deviation of a sample
///
/// **Returns** `(0.0, 0.0)` for an empty sample
pub fn mean_std(values: &[f32]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&x| x as f64).sum::<f64>() / n;
    let var = values
        .iter()
        .map(|&x| (x as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use statrs::statistics::Statistics;

    use super::*;

    #[test]
    fn mean_std_matches_population_statistics() {
        let values = [12.0, -3.0, 40.0, 7.0, 0.0];
        let (mean, std) = mean_std(&values);

        let as_f64 = values.iter().map(|&x| x as f64).collect::<Vec<_>>();
        assert!((mean - as_f64.iter().mean()).abs() < 1e-9, "Mean correct");
        assert!(
            (std - as_f64.iter().population_std_dev()).abs() < 1e-9,
            "Population std dev correct"
        );
    }

    #[test]
    fn mean_std_of_empty_sample() {
        assert_eq!(mean_std(&[]), (0.0, 0.0));
    }

    #[test]
    #[should_panic(expected = "Must be in the interval")]
    fn assert_interval_panics_outside() {
        let alpha = 1.5;
        assert_interval!(alpha, 0.0, 1.0);
    }
}
