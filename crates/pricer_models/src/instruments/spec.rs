//! Vanilla option contract parameters.

use super::error::InstrumentError;
use super::exercise::ExerciseStyle;
use super::option_type::OptionType;

/// Complete parameter bundle for a vanilla option contract.
///
/// Immutable once constructed; the validating constructor rejects
/// non-positive spot/strike/maturity, negative volatility and non-finite
/// rates, so downstream engines can assume well-formed inputs.
///
/// # Examples
/// ```
/// use pricer_models::instruments::{ExerciseStyle, OptionSpec, OptionType};
///
/// let spec = OptionSpec::new(
///     100.0,
///     100.0,
///     1.0,
///     0.05,
///     0.2,
///     OptionType::Call,
///     ExerciseStyle::European,
/// )
/// .unwrap();
///
/// assert_eq!(spec.spot(), 100.0);
/// assert!(spec.exercise_style().is_european());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionSpec {
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    volatility: f64,
    option_type: OptionType,
    exercise_style: ExerciseStyle,
}

impl OptionSpec {
    /// Creates a validated option contract.
    ///
    /// # Arguments
    /// * `spot` - Current underlying price (must be positive)
    /// * `strike` - Strike price (must be positive)
    /// * `maturity` - Time to maturity in years (must be positive)
    /// * `rate` - Continuously compounded annual risk-free rate
    /// * `volatility` - Annualised volatility (must be non-negative)
    /// * `option_type` - Call or Put
    /// * `exercise_style` - European or American
    ///
    /// # Errors
    ///
    /// Returns `InstrumentError` describing the first violated constraint.
    pub fn new(
        spot: f64,
        strike: f64,
        maturity: f64,
        rate: f64,
        volatility: f64,
        option_type: OptionType,
        exercise_style: ExerciseStyle,
    ) -> Result<Self, InstrumentError> {
        if !(spot > 0.0) || !spot.is_finite() {
            return Err(InstrumentError::InvalidSpot { spot });
        }
        if !(strike > 0.0) || !strike.is_finite() {
            return Err(InstrumentError::InvalidStrike { strike });
        }
        if !(maturity > 0.0) || !maturity.is_finite() {
            return Err(InstrumentError::InvalidMaturity { maturity });
        }
        if !(volatility >= 0.0) || !volatility.is_finite() {
            return Err(InstrumentError::InvalidVolatility { volatility });
        }
        if !rate.is_finite() {
            return Err(InstrumentError::InvalidRate { rate });
        }

        Ok(Self {
            spot,
            strike,
            maturity,
            rate,
            volatility,
            option_type,
            exercise_style,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the strike price.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Returns the time to maturity in years.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Returns the continuously compounded annual risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the annualised volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the payoff direction.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Returns the exercise style.
    #[inline]
    pub fn exercise_style(&self) -> ExerciseStyle {
        self.exercise_style
    }

    /// Intrinsic value of this contract at a given underlying price.
    #[inline]
    pub fn intrinsic(&self, spot: f64) -> f64 {
        self.option_type.intrinsic(spot, self.strike)
    }
}
