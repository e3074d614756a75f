//! Numerical pricing engines.
//!
//! Two independent, stateless engines price vanilla and path-dependent
//! option payoffs:
//!
//! - [`lattice`] — Cox-Ross-Rubinstein binomial tree with backward
//!   induction, supporting European and American exercise.
//! - [`mc`] — Monte Carlo estimation over geometric Brownian motion paths
//!   with a pluggable [`Payoff`] capability and standard-error reporting.
//!
//! Supporting modules:
//!
//! - [`payoff`] — the payoff capability: vanilla call/put plus
//!   formula-driven custom payoffs.
//! - [`expr`] — the small expression language behind custom payoff
//!   formulas (parsed to an AST, no host code execution).
//! - [`rng`] — seeded random number generation for reproducible
//!   simulations.
//!
//! # Example
//!
//! ```
//! use pricer_engines::lattice::binomial_price;
//! use pricer_engines::mc::{MonteCarloConfig, MonteCarloEngine};
//! use pricer_engines::payoff::VanillaCall;
//! use pricer_models::instruments::{ExerciseStyle, MarketParams, OptionSpec, OptionType};
//!
//! let spec = OptionSpec::new(
//!     100.0, 100.0, 1.0, 0.05, 0.2,
//!     OptionType::Call, ExerciseStyle::European,
//! ).unwrap();
//! let tree_price = binomial_price(&spec, 200).unwrap();
//!
//! let config = MonteCarloConfig::builder()
//!     .n_paths(10_000)
//!     .n_steps(50)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! let mut engine = MonteCarloEngine::new(config).unwrap();
//! let market = MarketParams::new(100.0, 1.0, 0.05, 0.2).unwrap();
//! let mc = engine.estimate(market, &VanillaCall::new(100.0)).unwrap();
//!
//! assert!((tree_price - mc.price).abs() < 1.0);
//! ```

pub mod expr;
pub mod lattice;
pub mod mc;
pub mod payoff;
pub mod rng;

pub use lattice::{binomial_price, LatticeError};
pub use mc::{MonteCarloConfig, MonteCarloEngine, MonteCarloResult};
pub use payoff::{CustomFormula, Payoff, PayoffError, VanillaCall, VanillaPut};
