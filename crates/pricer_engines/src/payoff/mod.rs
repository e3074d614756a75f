//! The payoff capability.
//!
//! A payoff maps a simulated price path to a settlement value. The Monte
//! Carlo engine is generic over this capability: the built-in vanilla
//! call/put evaluate the terminal price only, while [`CustomFormula`]
//! evaluates a user-supplied formula (see [`crate::expr`]) over the whole
//! path.
//!
//! All implementations are referentially transparent: evaluating the same
//! path twice yields the same value.

use thiserror::Error;

use crate::expr::{Expr, ExprError};

/// Errors from payoff evaluation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PayoffError {
    /// The price path contained no observations.
    #[error("Empty price path")]
    EmptyPath,

    /// A custom formula failed to evaluate.
    #[error("Formula evaluation failed: {0}")]
    Formula(#[from] ExprError),
}

/// A pure function from a simulated price path to a settlement value.
///
/// Implementations must be deterministic and side-effect free; the engine
/// may evaluate them from multiple worker threads.
pub trait Payoff: std::fmt::Debug + Send + Sync {
    /// Evaluates the payoff on a price path.
    ///
    /// The path always starts at the initial spot price and has one entry
    /// per time step plus the initial observation.
    fn evaluate(&self, path: &[f64]) -> Result<f64, PayoffError>;
}

/// Vanilla call payoff: max(terminal - strike, 0).
///
/// # Examples
/// ```
/// use pricer_engines::payoff::{Payoff, VanillaCall};
///
/// let call = VanillaCall::new(100.0);
/// assert_eq!(call.evaluate(&[100.0, 110.0]).unwrap(), 10.0);
/// assert_eq!(call.evaluate(&[100.0, 90.0]).unwrap(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VanillaCall {
    strike: f64,
}

impl VanillaCall {
    /// Creates a call payoff with the given strike.
    #[inline]
    pub fn new(strike: f64) -> Self {
        Self { strike }
    }

    /// Returns the strike.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }
}

impl Payoff for VanillaCall {
    #[inline]
    fn evaluate(&self, path: &[f64]) -> Result<f64, PayoffError> {
        let terminal = path.last().ok_or(PayoffError::EmptyPath)?;
        Ok((terminal - self.strike).max(0.0))
    }
}

/// Vanilla put payoff: max(strike - terminal, 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VanillaPut {
    strike: f64,
}

impl VanillaPut {
    /// Creates a put payoff with the given strike.
    #[inline]
    pub fn new(strike: f64) -> Self {
        Self { strike }
    }

    /// Returns the strike.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }
}

impl Payoff for VanillaPut {
    #[inline]
    fn evaluate(&self, path: &[f64]) -> Result<f64, PayoffError> {
        let terminal = path.last().ok_or(PayoffError::EmptyPath)?;
        Ok((self.strike - terminal).max(0.0))
    }
}

/// Formula-driven payoff evaluated over the full price path.
///
/// The formula is compiled once at construction; evaluation interprets the
/// AST against the borrowed path with no host code execution.
///
/// # Examples
/// ```
/// use pricer_engines::payoff::{CustomFormula, Payoff};
///
/// let asian = CustomFormula::parse("max(mean(path) - 100, 0)").unwrap();
/// let payoff = asian.evaluate(&[100.0, 105.0, 110.0]).unwrap();
/// assert_eq!(payoff, 5.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CustomFormula {
    source: String,
    expr: Expr,
}

impl CustomFormula {
    /// Compiles a payoff formula.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed formula; evaluation-time
    /// problems (type mismatches, bad indices) surface later from
    /// [`evaluate`](Payoff::evaluate).
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        let expr = Expr::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    /// Returns the original formula text.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Payoff for CustomFormula {
    #[inline]
    fn evaluate(&self, path: &[f64]) -> Result<f64, PayoffError> {
        if path.is_empty() {
            return Err(PayoffError::EmptyPath);
        }
        Ok(self.expr.evaluate(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprError;

    #[test]
    fn test_call_in_the_money() {
        let call = VanillaCall::new(100.0);
        assert_eq!(call.evaluate(&[100.0, 95.0, 110.0]).unwrap(), 10.0);
    }

    #[test]
    fn test_call_out_of_the_money() {
        let call = VanillaCall::new(100.0);
        assert_eq!(call.evaluate(&[100.0, 105.0, 90.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_put_in_the_money() {
        let put = VanillaPut::new(100.0);
        assert_eq!(put.evaluate(&[100.0, 105.0, 90.0]).unwrap(), 10.0);
    }

    #[test]
    fn test_put_out_of_the_money() {
        let put = VanillaPut::new(100.0);
        assert_eq!(put.evaluate(&[100.0, 95.0, 110.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_vanilla_uses_terminal_only() {
        // Intermediate prices must not matter for the vanilla variants.
        let call = VanillaCall::new(100.0);
        let quiet = call.evaluate(&[100.0, 101.0, 105.0]).unwrap();
        let wild = call.evaluate(&[100.0, 500.0, 105.0]).unwrap();
        assert_eq!(quiet, wild);
    }

    #[test]
    fn test_empty_path_rejected() {
        assert_eq!(
            VanillaCall::new(100.0).evaluate(&[]),
            Err(PayoffError::EmptyPath)
        );
        assert_eq!(
            VanillaPut::new(100.0).evaluate(&[]),
            Err(PayoffError::EmptyPath)
        );

        let formula = CustomFormula::parse("max(mean(path) - 100, 0)").unwrap();
        assert_eq!(formula.evaluate(&[]), Err(PayoffError::EmptyPath));
    }

    #[test]
    fn test_custom_formula_asian() {
        let asian = CustomFormula::parse("max(mean(path) - 100, 0)").unwrap();
        assert_eq!(asian.evaluate(&[98.0, 100.0, 108.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_custom_formula_matches_vanilla() {
        let formula = CustomFormula::parse("max(path[-1] - 100, 0)").unwrap();
        let call = VanillaCall::new(100.0);
        let path = [100.0, 97.0, 112.5];
        assert_eq!(
            formula.evaluate(&path).unwrap(),
            call.evaluate(&path).unwrap()
        );
    }

    #[test]
    fn test_custom_formula_parse_error() {
        assert!(CustomFormula::parse("max(path[-1] - ").is_err());
    }

    #[test]
    fn test_custom_formula_eval_error_propagates() {
        let formula = CustomFormula::parse("path[99]").unwrap();
        let err = formula.evaluate(&[100.0, 101.0]).unwrap_err();
        assert!(matches!(
            err,
            PayoffError::Formula(ExprError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_custom_formula_source_retained() {
        let formula = CustomFormula::parse("max(mean(path) - 100, 0)").unwrap();
        assert_eq!(formula.source(), "max(mean(path) - 100, 0)");
    }

    #[test]
    fn test_referential_transparency() {
        let path = [100.0, 104.0, 99.0, 103.0];
        let payoffs: [&dyn Payoff; 3] = [
            &VanillaCall::new(100.0),
            &VanillaPut::new(100.0),
            &CustomFormula::parse("max(mean(path) - 100, 0)").unwrap(),
        ];
        for payoff in payoffs {
            assert_eq!(
                payoff.evaluate(&path).unwrap(),
                payoff.evaluate(&path).unwrap()
            );
        }
    }
}
