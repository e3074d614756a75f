//! Binomial tree pricing command.

use tracing::info;

use pricer_engines::lattice::binomial_price;
use pricer_models::instruments::{ExerciseStyle, OptionSpec, OptionType};

use crate::Result;

/// Run the binomial command.
#[allow(clippy::too_many_arguments)]
pub fn run(
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    volatility: f64,
    steps: usize,
    option_type: OptionType,
    exercise: ExerciseStyle,
) -> Result<()> {
    info!(
        spot,
        strike, maturity, rate, volatility, steps, "pricing on a binomial lattice"
    );

    let spec = OptionSpec::new(
        spot,
        strike,
        maturity,
        rate,
        volatility,
        option_type,
        exercise,
    )?;
    let price = binomial_price(&spec, steps)?;

    println!(
        "{} {} price (binomial, {} steps): {:.4}",
        exercise, option_type, steps, price
    );
    Ok(())
}
