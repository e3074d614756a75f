//! Standard normal distribution functions.
//!
//! Provides `norm_cdf` and `norm_pdf`, generic over `T: Float`, using the
//! Abramowitz and Stegun erfc approximation (formula 7.1.26, maximum error
//! 1.5e-7).

use num_traits::Float;

/// Square root of 2.
const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Complementary error function approximation using Horner's method.
#[inline]
fn erfc_approx<T: Float>(x: T) -> T {
    let one = T::one();
    let zero = T::zero();

    let abs_x = x.abs();

    // Abramowitz and Stegun constants (7.1.26)
    let a1 = T::from(0.254829592).unwrap();
    let a2 = T::from(-0.284496736).unwrap();
    let a3 = T::from(1.421413741).unwrap();
    let a4 = T::from(-1.453152027).unwrap();
    let a5 = T::from(1.061405429).unwrap();
    let p = T::from(0.3275911).unwrap();

    let t = one / (one + p * abs_x);
    let poly = a1 + t * (a2 + t * (a3 + t * (a4 + t * a5)));
    let erfc_abs = t * poly * (-abs_x * abs_x).exp();

    // erfc(-x) = 2 - erfc(x)
    let two = T::from(2.0).unwrap();
    if x < zero {
        two - erfc_abs
    } else {
        erfc_abs
    }
}

/// Standard normal cumulative distribution function.
///
/// Computes P(X <= x) for X ~ N(0, 1) via Φ(x) = (1/2)·erfc(-x/√2).
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::norm_cdf;
///
/// let cdf_0 = norm_cdf(0.0_f64);
/// assert!((cdf_0 - 0.5).abs() < 1e-7);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    let sqrt_2 = T::from(SQRT_2).unwrap();
    let half = T::from(0.5).unwrap();
    half * erfc_approx(-x / sqrt_2)
}

/// Standard normal probability density function.
///
/// φ(x) = (1/√(2π))·exp(-x²/2)
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    let coef = T::from(FRAC_1_SQRT_2PI).unwrap();
    let half = T::from(0.5).unwrap();
    coef * (-half * x * x).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_norm_cdf_at_zero() {
        assert_relative_eq!(norm_cdf(0.0_f64), 0.5, epsilon = 1e-7);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for x in [0.5_f64, 1.0, 1.5, 2.0, 3.0] {
            let sum = norm_cdf(x) + norm_cdf(-x);
            assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_norm_cdf_known_values() {
        // Φ(1.96) ≈ 0.975 and Φ(-1.96) ≈ 0.025
        assert_relative_eq!(norm_cdf(1.96_f64), 0.975, epsilon = 1e-3);
        assert_relative_eq!(norm_cdf(-1.96_f64), 0.025, epsilon = 1e-3);
    }

    #[test]
    fn test_norm_cdf_tails() {
        assert!(norm_cdf(-6.0_f64) < 1e-8);
        assert!(norm_cdf(6.0_f64) > 1.0 - 1e-8);
    }

    #[test]
    fn test_norm_cdf_monotone() {
        let xs = [-3.0_f64, -1.0, 0.0, 1.0, 3.0];
        for pair in xs.windows(2) {
            assert!(norm_cdf(pair[0]) < norm_cdf(pair[1]));
        }
    }

    #[test]
    fn test_norm_pdf_at_zero() {
        assert_relative_eq!(norm_pdf(0.0_f64), 0.3989422804014327, epsilon = 1e-12);
    }

    #[test]
    fn test_norm_pdf_symmetry() {
        for x in [0.5_f64, 1.0, 2.0] {
            assert_relative_eq!(norm_pdf(x), norm_pdf(-x), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_f32_compatibility() {
        let cdf = norm_cdf(0.0_f32);
        assert!((cdf - 0.5).abs() < 1e-5);
    }
}
