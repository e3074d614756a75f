//! Monte Carlo pricing.
//!
//! [`MonteCarloEngine`] simulates geometric Brownian motion price paths,
//! evaluates an injected [`Payoff`](crate::payoff::Payoff) on each, and
//! returns the discounted mean together with its standard error.
//!
//! Configuration goes through [`MonteCarloConfig`]; results come back as
//! [`MonteCarloResult`], whose `confidence_95` helper carries the 1.96
//! normal-approximation multiplier both service frontends display.

mod config;
mod engine;

pub use config::{ConfigError, MonteCarloConfig, MonteCarloConfigBuilder, MAX_PATHS, MAX_STEPS};
pub use engine::{McError, MonteCarloEngine, MonteCarloResult};
