/// Returns `true` when `value` lies strictly between 0 and 1.
///
/// NaN is never inside the interval.
#[must_use]
pub fn in_open_unit_interval(value: f64) -> bool {
    value > 0.0 && value < 1.0
}

/// Returns `true` for strictly positive values (NaN excluded).
#[must_use]
pub fn is_positive(value: f64) -> bool {
    value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_unit_interval_excludes_endpoints() {
        assert!(in_open_unit_interval(0.5));
        assert!(!in_open_unit_interval(0.0));
        assert!(!in_open_unit_interval(1.0));
        assert!(!in_open_unit_interval(f64::NAN));
    }

    #[test]
    fn test_is_positive() {
        assert!(is_positive(1e-12));
        assert!(!is_positive(0.0));
        assert!(!is_positive(-1.0));
        assert!(!is_positive(f64::NAN));
    }
}
