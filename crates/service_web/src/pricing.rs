//! Shared pricing orchestration for the form and API handlers.
//!
//! Both frontends collect the same inputs; this module maps them onto the
//! pricer-layer types, runs the Monte Carlo engine, and reports either the
//! estimate or a user-facing failure.

use serde::Deserialize;
use thiserror::Error;

use pricer_engines::expr::ExprError;
use pricer_engines::mc::{ConfigError, McError, MonteCarloConfig, MonteCarloEngine, MonteCarloResult};
use pricer_engines::payoff::{CustomFormula, Payoff, VanillaCall, VanillaPut};
use pricer_models::instruments::{InstrumentError, MarketParams};

/// Payoff selection shared by the form and the JSON API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoffMode {
    /// Vanilla call on the terminal price
    Call,
    /// Vanilla put on the terminal price
    Put,
    /// Custom formula over the whole path
    Custom,
}

/// Collected pricing inputs after field-level parsing.
#[derive(Debug, Clone)]
pub struct PricingInputs {
    pub spot: f64,
    pub strike: f64,
    pub maturity: f64,
    pub rate: f64,
    pub volatility: f64,
    pub steps: usize,
    pub paths: usize,
    pub seed: Option<u64>,
    pub payoff_mode: PayoffMode,
    pub custom_expr: Option<String>,
}

/// Pricing outcome: the estimate plus the seed that produced it, so a
/// result can always be replayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingOutcome {
    pub result: MonteCarloResult,
    pub seed: u64,
}

/// User-facing pricing failures.
///
/// Every variant renders as one readable sentence; the handlers never let
/// an engine failure bubble up as a 500.
#[derive(Debug, Error)]
pub enum PricingFailure {
    #[error("{0}")]
    Instrument(#[from] InstrumentError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Estimation(#[from] McError),

    #[error("Invalid payoff formula: {0}")]
    Formula(#[from] ExprError),

    #[error("The custom payoff requires a formula")]
    MissingFormula,
}

/// Maps the payoff selection onto a payoff capability.
fn build_payoff(inputs: &PricingInputs) -> Result<Box<dyn Payoff>, PricingFailure> {
    match inputs.payoff_mode {
        PayoffMode::Call => Ok(Box::new(VanillaCall::new(inputs.strike))),
        PayoffMode::Put => Ok(Box::new(VanillaPut::new(inputs.strike))),
        PayoffMode::Custom => {
            let source = inputs
                .custom_expr
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .ok_or(PricingFailure::MissingFormula)?;
            Ok(Box::new(CustomFormula::parse(source)?))
        }
    }
}

/// Runs one Monte Carlo estimation for the collected inputs.
pub fn estimate(inputs: &PricingInputs) -> Result<PricingOutcome, PricingFailure> {
    let market = MarketParams::new(inputs.spot, inputs.maturity, inputs.rate, inputs.volatility)?;
    let payoff = build_payoff(inputs)?;

    let mut builder = MonteCarloConfig::builder()
        .n_paths(inputs.paths)
        .n_steps(inputs.steps);
    if let Some(seed) = inputs.seed {
        builder = builder.seed(seed);
    }
    let config = builder.build()?;

    let mut engine = MonteCarloEngine::new(config)?;
    let result = engine.estimate(market, payoff.as_ref())?;

    Ok(PricingOutcome {
        result,
        seed: engine.seed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn inputs(payoff_mode: PayoffMode, custom_expr: Option<&str>) -> PricingInputs {
        PricingInputs {
            spot: 100.0,
            strike: 100.0,
            maturity: 1.0,
            rate: 0.05,
            volatility: 0.2,
            steps: 20,
            paths: 2_000,
            seed: Some(42),
            payoff_mode,
            custom_expr: custom_expr.map(str::to_string),
        }
    }

    #[test]
    fn test_call_estimate() {
        let outcome = estimate(&inputs(PayoffMode::Call, None)).unwrap();
        assert!(outcome.result.price > 0.0);
        assert!(outcome.result.std_error > 0.0);
        assert_eq!(outcome.seed, 42);
    }

    #[test]
    fn test_custom_estimate_matches_call() {
        let vanilla = estimate(&inputs(PayoffMode::Call, None)).unwrap();
        let formula = estimate(&inputs(PayoffMode::Custom, Some("max(path[-1] - 100, 0)"))).unwrap();
        assert_relative_eq!(vanilla.result.price, formula.result.price);
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let first = estimate(&inputs(PayoffMode::Put, None)).unwrap();
        let second = estimate(&inputs(PayoffMode::Put, None)).unwrap();
        assert_eq!(first.result, second.result);
    }

    #[test]
    fn test_missing_formula_rejected() {
        let err = estimate(&inputs(PayoffMode::Custom, None)).unwrap_err();
        assert!(matches!(err, PricingFailure::MissingFormula));

        let err = estimate(&inputs(PayoffMode::Custom, Some("   "))).unwrap_err();
        assert!(matches!(err, PricingFailure::MissingFormula));
    }

    #[test]
    fn test_bad_formula_rejected() {
        let err = estimate(&inputs(PayoffMode::Custom, Some("max(path[-1]"))).unwrap_err();
        assert!(matches!(err, PricingFailure::Formula(_)));
    }

    #[test]
    fn test_invalid_market_rejected() {
        let mut bad = inputs(PayoffMode::Call, None);
        bad.spot = -1.0;
        assert!(matches!(
            estimate(&bad),
            Err(PricingFailure::Instrument(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut bad = inputs(PayoffMode::Call, None);
        bad.paths = 0;
        assert!(matches!(estimate(&bad), Err(PricingFailure::Config(_))));
    }

    #[test]
    fn test_failure_messages_are_readable() {
        let err = estimate(&inputs(PayoffMode::Custom, None)).unwrap_err();
        assert_eq!(err.to_string(), "The custom payoff requires a formula");
    }
}
