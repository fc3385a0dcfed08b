//! Small numeric helpers shared by the scorer and reward shaping.

/// Clamp to [0, 1]; NaN maps to 0.
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Three-valued sign: -1, 0 or +1 (`f64::signum` returns 1 for +0.0).
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// `tanh(x / scale)`, a saturating 0..1 transform for non-negative `x`.
pub fn tanh_scaled(x: f64, scale: f64) -> f64 {
    (x / scale).tanh()
}

/// Replace NaN/inf with 0.
pub fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(f64::NAN), 0.0);
        assert_eq!(sign(-3.0), -1.0);
    }

    #[test]
    fn clamp01_handles_nan() {
        assert_eq!(clamp01(f64::NAN), 0.0);
        assert_eq!(clamp01(1.7), 1.0);
        assert_eq!(clamp01(-0.2), 0.0);
    }

    #[test]
    fn tanh_saturates() {
        assert_eq!(tanh_scaled(0.0, 4.0), 0.0);
        assert!(tanh_scaled(100.0, 4.0) > 0.999);
    }
}
