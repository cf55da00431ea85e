/// Smallest integer not below `value`, if it is finite, non-negative and fits a u64.
#[inline]
pub fn ceil_to_u64(value: f64) -> Option<u64> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let ceiled = value.ceil();
    // 2^64 is exactly representable; anything at or above it overflows.
    if ceiled >= 18_446_744_073_709_551_616.0 {
        return None;
    }
    Some(ceiled as u64)
}

/// Collapses NaN and infinities to zero.
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// True when every consecutive pair is non-decreasing.
pub fn is_non_decreasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_rounds_up_never_down() {
        assert_eq!(ceil_to_u64(56447.99999999996), Some(56448));
        assert_eq!(ceil_to_u64(225.792), Some(226));
        assert_eq!(ceil_to_u64(3.0), Some(3));
        assert_eq!(ceil_to_u64(0.0), Some(0));
    }

    #[test]
    fn ceil_rejects_unrepresentable_values() {
        assert_eq!(ceil_to_u64(f64::NAN), None);
        assert_eq!(ceil_to_u64(f64::INFINITY), None);
        assert_eq!(ceil_to_u64(-0.5), None);
        assert_eq!(ceil_to_u64(1e30), None);
    }

    #[test]
    fn finite_or_zero_strips_nan() {
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::NEG_INFINITY), 0.0);
        assert_eq!(finite_or_zero(-2.5), -2.5);
    }
}
