//! Cox-Ross-Rubinstein binomial lattice pricing.
//!
//! The underlying is discretised into a recombining up/down tree with
//! `up = exp(σ√Δt)` and `down = 1/up`, so `up·down = 1` by construction.
//! Option values are rolled back from the terminal layer by risk-neutral
//! expectation; American contracts additionally compare against immediate
//! exercise at every node.
//!
//! The roll-back reuses a single fixed-size buffer across induction steps
//! (node `i` of step `n` is overwritten by node `i` of step `n-1`), so the
//! whole computation allocates exactly once.

use thiserror::Error;

use pricer_models::instruments::OptionSpec;

/// Maximum number of time steps allowed in the lattice.
pub const MAX_STEPS: usize = 10_000;

/// Errors from binomial lattice pricing.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LatticeError {
    /// Step count outside valid range [1, 10_000].
    #[error("Invalid step count {0}: must be in range [1, 10_000]")]
    InvalidStepCount(usize),

    /// Up and down factors coincide, so the risk-neutral probability is
    /// undefined (division by zero). Happens when σ√Δt underflows to zero.
    #[error("Degenerate lattice: up and down factors coincide (up = {up})")]
    DegenerateLattice {
        /// The common up/down factor
        up: f64,
    },

    /// Backward induction produced a non-finite root value.
    #[error("Backward induction produced a non-finite value: {value}")]
    NonFiniteResult {
        /// The non-finite root value
        value: f64,
    },
}

/// Per-step lattice parameters derived from the contract.
///
/// The risk-neutral probability is deliberately not clamped to [0, 1]:
/// an out-of-range value signals an arbitrageable parameter combination
/// and flows through the arithmetic unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeParams {
    /// Time increment per step (years).
    pub dt: f64,
    /// Up factor: exp(σ√Δt).
    pub up: f64,
    /// Down factor: 1/up.
    pub down: f64,
    /// Per-step discount factor: exp(-r·Δt).
    pub discount: f64,
    /// Risk-neutral up probability: (exp(r·Δt) - down) / (up - down).
    pub p_up: f64,
}

impl LatticeParams {
    /// Derives the lattice parameters for a contract and step count.
    ///
    /// # Errors
    ///
    /// Returns `LatticeError::DegenerateLattice` when `up - down` is
    /// exactly zero (e.g. zero volatility, or Δt so small that σ√Δt
    /// underflows); the division defining the risk-neutral probability
    /// would be meaningless in that case.
    pub fn derive(spec: &OptionSpec, step_count: usize) -> Result<Self, LatticeError> {
        let dt = spec.maturity() / step_count as f64;
        let up = (spec.volatility() * dt.sqrt()).exp();
        let down = 1.0 / up;
        let discount = (-spec.rate() * dt).exp();

        let spread = up - down;
        if spread == 0.0 {
            return Err(LatticeError::DegenerateLattice { up });
        }

        let p_up = ((spec.rate() * dt).exp() - down) / spread;

        Ok(Self {
            dt,
            up,
            down,
            discount,
            p_up,
        })
    }
}

/// Prices a vanilla option on a CRR binomial lattice.
///
/// Supports European and American exercise; the exercise comparison at
/// each node uses the contract's intrinsic value directly.
///
/// # Arguments
///
/// * `spec` - Validated option contract
/// * `step_count` - Number of time steps in the tree
///
/// # Errors
///
/// * `LatticeError::InvalidStepCount` for a step count outside [1, 10_000],
///   detected before any computation
/// * `LatticeError::DegenerateLattice` when the up/down factors coincide
/// * `LatticeError::NonFiniteResult` when roll-back yields NaN/Inf
///
/// # Examples
///
/// ```
/// use pricer_engines::lattice::binomial_price;
/// use pricer_models::instruments::{ExerciseStyle, OptionSpec, OptionType};
///
/// let spec = OptionSpec::new(
///     100.0, 100.0, 1.0, 0.0, 0.2,
///     OptionType::Call, ExerciseStyle::European,
/// ).unwrap();
///
/// let price = binomial_price(&spec, 2).unwrap();
/// assert!((price - 7.06).abs() < 0.01);
/// ```
pub fn binomial_price(spec: &OptionSpec, step_count: usize) -> Result<f64, LatticeError> {
    if step_count == 0 || step_count > MAX_STEPS {
        return Err(LatticeError::InvalidStepCount(step_count));
    }

    let params = LatticeParams::derive(spec, step_count)?;
    let spot = spec.spot();
    let early_exercise = spec.exercise_style().allows_early_exercise();

    // Terminal layer: intrinsic payoff at S·up^i·down^(N-i) for each node i.
    let mut values = vec![0.0_f64; step_count + 1];
    for (i, value) in values.iter_mut().enumerate() {
        let terminal_spot =
            spot * params.up.powi(i as i32) * params.down.powi((step_count - i) as i32);
        *value = spec.intrinsic(terminal_spot);
    }

    // Roll back through the tree, overwriting the buffer in place.
    let p = params.p_up;
    for step in (0..step_count).rev() {
        for i in 0..=step {
            let continuation = params.discount * (p * values[i + 1] + (1.0 - p) * values[i]);
            values[i] = if early_exercise {
                let node_spot =
                    spot * params.up.powi(i as i32) * params.down.powi((step - i) as i32);
                continuation.max(spec.intrinsic(node_spot))
            } else {
                continuation
            };
        }
    }

    let root = values[0];
    if !root.is_finite() {
        return Err(LatticeError::NonFiniteResult { value: root });
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_models::instruments::{ExerciseStyle, OptionType};

    fn spec(
        rate: f64,
        volatility: f64,
        option_type: OptionType,
        exercise_style: ExerciseStyle,
    ) -> OptionSpec {
        OptionSpec::new(100.0, 100.0, 1.0, rate, volatility, option_type, exercise_style).unwrap()
    }

    #[test]
    fn test_two_step_reference_value() {
        // Hand-verifiable: up = exp(0.2·√0.5) ≈ 1.1519, down ≈ 0.8682,
        // p ≈ 0.4646, terminal payoffs [0, 0, 32.69] → root ≈ 7.06.
        let spec = spec(0.0, 0.2, OptionType::Call, ExerciseStyle::European);
        let price = binomial_price(&spec, 2).unwrap();
        assert_relative_eq!(price, 7.0593, epsilon = 0.01);
    }

    #[test]
    fn test_zero_steps_rejected() {
        let spec = spec(0.05, 0.2, OptionType::Call, ExerciseStyle::European);
        assert_eq!(
            binomial_price(&spec, 0),
            Err(LatticeError::InvalidStepCount(0))
        );
    }

    #[test]
    fn test_excessive_steps_rejected() {
        let spec = spec(0.05, 0.2, OptionType::Call, ExerciseStyle::European);
        assert!(matches!(
            binomial_price(&spec, MAX_STEPS + 1),
            Err(LatticeError::InvalidStepCount(_))
        ));
    }

    #[test]
    fn test_zero_volatility_degenerates() {
        // σ = 0 makes up = down = 1, which leaves the risk-neutral
        // probability undefined.
        let spec = spec(0.05, 0.0, OptionType::Call, ExerciseStyle::European);
        assert!(matches!(
            binomial_price(&spec, 100),
            Err(LatticeError::DegenerateLattice { .. })
        ));
    }

    #[test]
    fn test_lattice_params_up_down_product() {
        let spec = spec(0.05, 0.2, OptionType::Call, ExerciseStyle::European);
        let params = LatticeParams::derive(&spec, 50).unwrap();
        assert_relative_eq!(params.up * params.down, 1.0, epsilon = 1e-15);
        assert!(params.p_up > 0.0 && params.p_up < 1.0);
    }

    #[test]
    fn test_price_non_negative() {
        for option_type in [OptionType::Call, OptionType::Put] {
            for style in [ExerciseStyle::European, ExerciseStyle::American] {
                let spec = spec(0.05, 0.2, option_type, style);
                let price = binomial_price(&spec, 100).unwrap();
                assert!(price >= 0.0, "{:?}/{:?}: {}", option_type, style, price);
            }
        }
    }

    #[test]
    fn test_american_at_least_european() {
        for option_type in [OptionType::Call, OptionType::Put] {
            let european = spec(0.05, 0.2, option_type, ExerciseStyle::European);
            let american = spec(0.05, 0.2, option_type, ExerciseStyle::American);
            let eu = binomial_price(&european, 200).unwrap();
            let am = binomial_price(&american, 200).unwrap();
            assert!(am >= eu - 1e-10, "{:?}: am {} < eu {}", option_type, am, eu);
        }
    }

    #[test]
    fn test_american_put_carries_premium() {
        // With a positive rate the American put is strictly more valuable.
        let european = spec(0.05, 0.2, OptionType::Put, ExerciseStyle::European);
        let american = spec(0.05, 0.2, OptionType::Put, ExerciseStyle::American);
        let eu = binomial_price(&european, 500).unwrap();
        let am = binomial_price(&american, 500).unwrap();
        assert!(am > eu + 1e-4, "am {} vs eu {}", am, eu);
    }

    #[test]
    fn test_american_call_no_dividends_equals_european() {
        // Without dividends early exercise of a call is never optimal.
        let european = spec(0.05, 0.2, OptionType::Call, ExerciseStyle::European);
        let american = spec(0.05, 0.2, OptionType::Call, ExerciseStyle::American);
        let eu = binomial_price(&european, 500).unwrap();
        let am = binomial_price(&american, 500).unwrap();
        assert_relative_eq!(am, eu, epsilon = 1e-8);
    }

    #[test]
    fn test_deep_itm_put_floor() {
        let spec = OptionSpec::new(
            50.0,
            100.0,
            1.0,
            0.05,
            0.2,
            OptionType::Put,
            ExerciseStyle::American,
        )
        .unwrap();
        let price = binomial_price(&spec, 200).unwrap();
        // American put can never be worth less than immediate exercise.
        assert!(price >= 50.0 - 1e-10);
    }

    #[test]
    fn test_step_count_refinement_stays_close() {
        let spec = spec(0.05, 0.2, OptionType::Call, ExerciseStyle::European);
        let coarse = binomial_price(&spec, 100).unwrap();
        let fine = binomial_price(&spec, 1000).unwrap();
        assert!((coarse - fine).abs() < 0.05, "{} vs {}", coarse, fine);
    }
}
