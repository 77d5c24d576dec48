//! Polynomial approximation of the standard normal CDF used for PERT
//! completion probabilities.
//!
//! The form and constants are fixed so results match reference outputs exactly.
//! Note the tail term is divided by `2π` rather than scaled by the normal density,
//! so values differ from the textbook CDF away from the tails.

use std::f64::consts::PI;

const P: f64 = 0.2316419;

/// Coefficients from the constant term upward.
const COEFFICIENTS: [f64; 5] = [
    0.319381530,
    -0.356563782,
    1.781477937,
    -1.821255978,
    1.330274429,
];

/// Approximate `Φ(z)`.
pub fn standard_normal_cdf(z: f64) -> f64 {
    let t = 1.0 / (1.0 + P * z.abs());
    let [b1, b2, b3, b4, b5] = COEFFICIENTS;
    let y = ((((b5 * t + b4) * t + b3) * t + b2) * t + b1) * t / (2.0 * PI) + 0.5;

    if z > 0.0 { 1.0 - y } else { y }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_values() {
        assert!((standard_normal_cdf(1.0) - 0.395_645_356_035_612_6).abs() < 1e-12);
        assert!((standard_normal_cdf(-1.0) - 0.604_354_643_964_387_4).abs() < 1e-12);
        assert!((standard_normal_cdf(0.0) - 0.699_471_139_991_348).abs() < 1e-12);
    }

    #[test]
    fn mirrored_arguments_sum_to_one() {
        for z in [0.25, 0.5, 1.0, 1.96, 2.68, 5.37] {
            let sum = standard_normal_cdf(z) + standard_normal_cdf(-z);
            assert!((sum - 1.0).abs() < 1e-12, "z={z} sum={sum}");
        }
    }
}
