//! Error types for instrument construction.

use thiserror::Error;

/// Instrument parameter validation errors.
///
/// Raised by the validating constructors of [`OptionSpec`](super::OptionSpec)
/// and [`MarketParams`](super::MarketParams) before any pricing takes place.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InstrumentError {
    /// Spot price must be strictly positive.
    #[error("Invalid spot price: S = {spot}")]
    InvalidSpot {
        /// The rejected spot value
        spot: f64,
    },

    /// Strike price must be strictly positive.
    #[error("Invalid strike price: K = {strike}")]
    InvalidStrike {
        /// The rejected strike value
        strike: f64,
    },

    /// Maturity must be strictly positive (in years).
    #[error("Invalid maturity: T = {maturity}")]
    InvalidMaturity {
        /// The rejected maturity value
        maturity: f64,
    },

    /// Volatility must be non-negative.
    #[error("Invalid volatility: σ = {volatility}")]
    InvalidVolatility {
        /// The rejected volatility value
        volatility: f64,
    },

    /// Rate must be a finite real number.
    #[error("Invalid rate: r = {rate}")]
    InvalidRate {
        /// The rejected rate value
        rate: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = InstrumentError::InvalidSpot { spot: -100.0 };
        assert_eq!(format!("{}", err), "Invalid spot price: S = -100");

        let err = InstrumentError::InvalidVolatility { volatility: -0.2 };
        assert!(format!("{}", err).contains("volatility"));

        let err = InstrumentError::InvalidMaturity { maturity: 0.0 };
        assert!(format!("{}", err).contains("T = 0"));
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = InstrumentError::InvalidStrike { strike: 0.0 };
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_clone_and_equality() {
        let err1 = InstrumentError::InvalidRate { rate: f64::NAN };
        let err2 = err1.clone();
        // NaN payloads compare unequal, structural variants still match.
        assert!(matches!(err2, InstrumentError::InvalidRate { .. }));
    }
}
