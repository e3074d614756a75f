//! optionlab CLI - command-line option pricing.
//!
//! # Commands
//!
//! - `optionlab binomial` - Price a vanilla option on a CRR binomial tree
//! - `optionlab monte-carlo` - Monte Carlo pricing with a selectable payoff
//! - `optionlab demo` - Run the built-in pricing examples
//!
//! As part of the **S**ervice layer, this crate only parses input, maps it
//! onto the pricer-layer types, and formats results; all numerical work
//! happens in `pricer_engines`.

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;

pub use error::{CliError, Result};

use commands::monte_carlo::PayoffMode;
use pricer_models::instruments::{ExerciseStyle, OptionType};

/// optionlab option pricing CLI
#[derive(Parser)]
#[command(name = "optionlab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a vanilla option on a Cox-Ross-Rubinstein binomial tree
    Binomial {
        /// Initial spot price
        #[arg(long, default_value = "100.0")]
        spot: f64,

        /// Strike price
        #[arg(long, default_value = "100.0")]
        strike: f64,

        /// Time to maturity (years)
        #[arg(long, default_value = "1.0")]
        maturity: f64,

        /// Continuously compounded annual risk-free rate
        #[arg(long, default_value = "0.05")]
        rate: f64,

        /// Annualised volatility
        #[arg(long, default_value = "0.2")]
        volatility: f64,

        /// Number of time steps in the tree
        #[arg(long, default_value = "200")]
        steps: usize,

        /// Option type (call or put)
        #[arg(short = 't', long, default_value = "call")]
        option_type: OptionType,

        /// Exercise style (european or american)
        #[arg(short, long, default_value = "european")]
        exercise: ExerciseStyle,
    },

    /// Monte Carlo pricing with a selectable payoff
    MonteCarlo {
        /// Payoff to evaluate on each simulated path
        #[arg(long, value_enum, default_value = "call")]
        payoff: PayoffMode,

        /// Formula for the custom payoff, e.g. "max(mean(path) - 100, 0)"
        #[arg(long)]
        payoff_expr: Option<String>,

        /// Initial spot price
        #[arg(long, default_value = "100.0")]
        spot: f64,

        /// Strike price (used by the call/put payoffs)
        #[arg(long, default_value = "100.0")]
        strike: f64,

        /// Time to maturity (years)
        #[arg(long, default_value = "1.0")]
        maturity: f64,

        /// Continuously compounded annual risk-free rate
        #[arg(long, default_value = "0.05")]
        rate: f64,

        /// Annualised volatility
        #[arg(long, default_value = "0.2")]
        volatility: f64,

        /// Time steps per path
        #[arg(long, default_value = "252")]
        steps: usize,

        /// Number of Monte Carlo paths
        #[arg(long, default_value = "20000")]
        paths: usize,

        /// Optional RNG seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Distribute trials across worker threads
        #[arg(long)]
        parallel: bool,
    },

    /// Run the built-in pricing examples
    Demo,
}

fn main() {
    // Initialise tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let outcome = match cli.command {
        Commands::Binomial {
            spot,
            strike,
            maturity,
            rate,
            volatility,
            steps,
            option_type,
            exercise,
        } => commands::binomial::run(
            spot,
            strike,
            maturity,
            rate,
            volatility,
            steps,
            option_type,
            exercise,
        ),
        Commands::MonteCarlo {
            payoff,
            payoff_expr,
            spot,
            strike,
            maturity,
            rate,
            volatility,
            steps,
            paths,
            seed,
            parallel,
        } => commands::monte_carlo::run(commands::monte_carlo::Args {
            payoff,
            payoff_expr,
            spot,
            strike,
            maturity,
            rate,
            volatility,
            steps,
            paths,
            seed,
            parallel,
        }),
        Commands::Demo => commands::demo::run(),
    };

    if let Err(err) = outcome {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
