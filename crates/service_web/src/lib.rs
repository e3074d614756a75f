//! HTTP server for Monte Carlo option pricing.
//!
//! Serves three surfaces on top of `pricer_engines`:
//!
//! - an HTML form (`GET /`, `POST /`) that collects market parameters and
//!   a payoff selection, runs the Monte Carlo engine and renders
//!   `price ± 1.96·SE`;
//! - a JSON API (`POST /api/v1/price`) with the same inputs and outputs;
//! - health/readiness probes (`GET /health`, `GET /ready`).

pub mod config;
pub mod pricing;
pub mod routes;
pub mod server;

pub use config::ServerConfig;
pub use server::Server;
