//! Built-in pricing examples.

use pricer_engines::lattice::binomial_price;
use pricer_engines::mc::{MonteCarloConfig, MonteCarloEngine};
use pricer_engines::payoff::CustomFormula;
use pricer_models::instruments::{ExerciseStyle, MarketParams, OptionSpec, OptionType};

use crate::Result;

/// Run the demo command: a binomial European call and a seeded
/// Asian-style Monte Carlo estimate on the same market.
pub fn run() -> Result<()> {
    let spec = OptionSpec::new(
        100.0,
        100.0,
        1.0,
        0.05,
        0.2,
        OptionType::Call,
        ExerciseStyle::European,
    )?;
    let binomial = binomial_price(&spec, 200)?;
    println!("European call price (binomial): {:.4}", binomial);

    let market = MarketParams::new(100.0, 1.0, 0.05, 0.2)?;
    let asian = CustomFormula::parse("max(mean(path) - 100, 0)")?;
    let config = MonteCarloConfig::builder()
        .n_paths(20_000)
        .n_steps(252)
        .seed(7)
        .build()?;
    let mut engine = MonteCarloEngine::new(config)?;
    let result = engine.estimate(market, &asian)?;

    println!(
        "Asian call price (Monte Carlo): {:.4} ± {:.4} (95% CI)",
        result.price,
        result.confidence_95()
    );
    Ok(())
}
