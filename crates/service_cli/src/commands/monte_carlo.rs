//! Monte Carlo pricing command.

use clap::ValueEnum;
use tracing::info;

use pricer_engines::mc::{MonteCarloConfig, MonteCarloEngine};
use pricer_engines::payoff::{CustomFormula, Payoff, VanillaCall, VanillaPut};
use pricer_models::instruments::MarketParams;

use crate::{CliError, Result};

/// Payoff selection for Monte Carlo pricing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PayoffMode {
    /// Vanilla call on the terminal price
    Call,
    /// Vanilla put on the terminal price
    Put,
    /// Custom formula over the whole path (requires --payoff-expr)
    Custom,
}

/// Parsed flags for the monte-carlo command.
pub struct Args {
    pub payoff: PayoffMode,
    pub payoff_expr: Option<String>,
    pub spot: f64,
    pub strike: f64,
    pub maturity: f64,
    pub rate: f64,
    pub volatility: f64,
    pub steps: usize,
    pub paths: usize,
    pub seed: Option<u64>,
    pub parallel: bool,
}

/// Maps the payoff mode (and optional formula) onto a payoff capability.
fn build_payoff(args: &Args) -> Result<Box<dyn Payoff>> {
    match args.payoff {
        PayoffMode::Call => Ok(Box::new(VanillaCall::new(args.strike))),
        PayoffMode::Put => Ok(Box::new(VanillaPut::new(args.strike))),
        PayoffMode::Custom => {
            let source = args.payoff_expr.as_deref().ok_or_else(|| {
                CliError::InvalidArgument(
                    "--payoff custom requires --payoff-expr".to_string(),
                )
            })?;
            Ok(Box::new(CustomFormula::parse(source)?))
        }
    }
}

/// Run the monte-carlo command.
pub fn run(args: Args) -> Result<()> {
    info!(
        paths = args.paths,
        steps = args.steps,
        parallel = args.parallel,
        "running Monte Carlo estimation"
    );

    let market = MarketParams::new(args.spot, args.maturity, args.rate, args.volatility)?;
    let payoff = build_payoff(&args)?;

    let mut builder = MonteCarloConfig::builder()
        .n_paths(args.paths)
        .n_steps(args.steps);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    let config = builder.build()?;

    let mut engine = MonteCarloEngine::new(config)?;
    let result = if args.parallel {
        engine.estimate_parallel(market, payoff.as_ref())?
    } else {
        engine.estimate(market, payoff.as_ref())?
    };

    println!(
        "Monte Carlo price: {:.4} ± {:.4} (95% CI, seed {})",
        result.price,
        result.confidence_95(),
        engine.seed()
    );
    Ok(())
}
