//! CLI error type.

use thiserror::Error;

use pricer_engines::expr::ExprError;
use pricer_engines::lattice::LatticeError;
use pricer_engines::mc::{ConfigError, McError};
use pricer_models::instruments::InstrumentError;

/// Errors surfaced to the command-line user.
///
/// Every engine failure maps into this type so the binary can print one
/// readable message and exit non-zero instead of panicking.
#[derive(Debug, Error)]
pub enum CliError {
    /// A flag combination or value the commands reject themselves.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Contract or market parameter validation failed.
    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    /// Binomial lattice pricing failed.
    #[error(transparent)]
    Lattice(#[from] LatticeError),

    /// Monte Carlo configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Monte Carlo estimation failed.
    #[error(transparent)]
    Estimation(#[from] McError),

    /// A custom payoff formula failed to parse.
    #[error("Invalid payoff formula: {0}")]
    Formula(#[from] ExprError),
}

/// CLI result alias.
pub type Result<T> = std::result::Result<T, CliError>;
