//! Instrument definitions and analytical reference models.
//!
//! This crate is the model layer of the optionlab workspace:
//!
//! - [`instruments`] — option contract types ([`OptionSpec`],
//!   [`MarketParams`], [`OptionType`], [`ExerciseStyle`]) with validating
//!   constructors.
//! - [`analytical`] — closed-form Black-Scholes pricing used as the
//!   reference for the numerical engines, plus standard-normal
//!   distribution helpers.
//!
//! The numerical engines themselves live in `pricer_engines`.

pub mod analytical;
pub mod instruments;

pub use analytical::BlackScholes;
pub use instruments::{ExerciseStyle, InstrumentError, MarketParams, OptionSpec, OptionType};
