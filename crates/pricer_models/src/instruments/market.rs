//! Market parameters for path simulation.

use super::error::InstrumentError;

/// Market environment for geometric Brownian motion simulation.
///
/// The strike and payoff direction are deliberately absent: for the Monte
/// Carlo engine they are carried by the payoff capability, so these
/// parameters describe the underlying alone.
///
/// # Examples
/// ```
/// use pricer_models::instruments::MarketParams;
///
/// let market = MarketParams::new(100.0, 1.0, 0.05, 0.2).unwrap();
/// assert_eq!(market.spot(), 100.0);
///
/// assert!(MarketParams::new(-1.0, 1.0, 0.05, 0.2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketParams {
    spot: f64,
    maturity: f64,
    rate: f64,
    volatility: f64,
}

impl MarketParams {
    /// Creates validated market parameters.
    ///
    /// # Errors
    ///
    /// Returns `InstrumentError` if spot or maturity is not positive, the
    /// volatility is negative, or any value is non-finite.
    pub fn new(spot: f64, maturity: f64, rate: f64, volatility: f64) -> Result<Self, InstrumentError> {
        if !(spot > 0.0) || !spot.is_finite() {
            return Err(InstrumentError::InvalidSpot { spot });
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
            maturity,
            rate,
            volatility,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let market = MarketParams::new(100.0, 1.0, 0.05, 0.2).unwrap();
        assert_eq!(market.spot(), 100.0);
        assert_eq!(market.maturity(), 1.0);
        assert_eq!(market.rate(), 0.05);
        assert_eq!(market.volatility(), 0.2);
    }

    #[test]
    fn test_new_invalid_spot() {
        assert!(matches!(
            MarketParams::new(0.0, 1.0, 0.05, 0.2),
            Err(InstrumentError::InvalidSpot { .. })
        ));
    }

    #[test]
    fn test_new_invalid_maturity() {
        assert!(matches!(
            MarketParams::new(100.0, 0.0, 0.05, 0.2),
            Err(InstrumentError::InvalidMaturity { .. })
        ));
    }

    #[test]
    fn test_new_invalid_volatility() {
        assert!(matches!(
            MarketParams::new(100.0, 1.0, 0.05, -0.1),
            Err(InstrumentError::InvalidVolatility { .. })
        ));
    }

    #[test]
    fn test_new_zero_volatility_allowed() {
        assert!(MarketParams::new(100.0, 1.0, 0.05, 0.0).is_ok());
    }

    #[test]
    fn test_new_negative_rate_allowed() {
        assert!(MarketParams::new(100.0, 1.0, -0.01, 0.2).is_ok());
    }

    #[test]
    fn test_new_non_finite_rejected() {
        assert!(MarketParams::new(f64::INFINITY, 1.0, 0.05, 0.2).is_err());
        assert!(MarketParams::new(100.0, f64::NAN, 0.05, 0.2).is_err());
    }
}
