//! Monte Carlo pricing engine.
//!
//! The engine simulates geometric Brownian motion in log space,
//! `S(t+dt) = S(t)·exp((r − σ²/2)dt + σ√dt·Z)`, evaluates the injected
//! payoff on each simulated path, and reports the discounted sample mean
//! with its standard error.
//!
//! # Reproducibility
//!
//! For a fixed seed and configuration, [`estimate`](MonteCarloEngine::estimate)
//! is bit-for-bit reproducible: trials run sequentially and accumulate in
//! order. [`estimate_parallel`](MonteCarloEngine::estimate_parallel) is also
//! reproducible for a fixed seed — the path-to-chunk layout depends only on
//! the configuration and partial sums are combined in chunk-index order —
//! but its random stream layout differs from the sequential method, so the
//! two methods do not produce identical numbers.

use rayon::prelude::*;
use thiserror::Error;

use pricer_models::instruments::MarketParams;

use super::config::{ConfigError, MonteCarloConfig};
use crate::payoff::{Payoff, PayoffError};
use crate::rng::SimRng;

/// Number of trials each parallel worker owns. The chunk layout is part of
/// the reproducibility contract: it depends only on the configuration,
/// never on the thread count.
const PARALLEL_CHUNK_SIZE: usize = 8_192;

/// Errors from a Monte Carlo estimation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum McError {
    /// Invalid simulation configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A payoff failed to evaluate; the whole estimation is abandoned
    /// rather than averaging over the surviving trials, which would bias
    /// the estimate.
    #[error("Payoff evaluation failed on path {path_index}: {source}")]
    PayoffEvaluation {
        /// Zero-based index of the failing trial
        path_index: usize,
        /// The underlying payoff error
        source: PayoffError,
    },

    /// The accumulated mean payoff is NaN or infinite.
    #[error("Estimate is not finite: mean payoff = {mean}")]
    NonFiniteEstimate {
        /// The non-finite mean
        mean: f64,
    },
}

/// Monte Carlo price estimate with its standard error.
///
/// # Examples
///
/// ```
/// use pricer_engines::mc::MonteCarloResult;
///
/// let result = MonteCarloResult {
///     price: 10.5,
///     std_error: 0.05,
/// };
/// println!("{:.4} +/- {:.4}", result.price, result.confidence_95());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MonteCarloResult {
    /// Discounted mean payoff.
    pub price: f64,
    /// Standard error of the price estimate (discounted).
    pub std_error: f64,
}

impl MonteCarloResult {
    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        1.96 * self.std_error
    }

    /// Returns the 99% confidence interval half-width.
    #[inline]
    pub fn confidence_99(&self) -> f64 {
        2.576 * self.std_error
    }
}

/// Per-estimation simulation coefficients.
#[derive(Clone, Copy)]
struct GbmStep {
    spot: f64,
    drift: f64,
    diffusion: f64,
    discount: f64,
}

impl GbmStep {
    fn derive(market: &MarketParams, n_steps: usize) -> Self {
        let dt = market.maturity() / n_steps as f64;
        let sigma = market.volatility();
        Self {
            spot: market.spot(),
            drift: (market.rate() - 0.5 * sigma * sigma) * dt,
            diffusion: sigma * dt.sqrt(),
            discount: (-market.rate() * market.maturity()).exp(),
        }
    }
}

/// Regenerates one GBM path in place; the buffer ends with `n_steps + 1`
/// prices starting at the spot.
fn fill_gbm_path(path: &mut Vec<f64>, rng: &mut SimRng, step: &GbmStep, n_steps: usize) {
    path.clear();
    path.push(step.spot);
    let mut current = step.spot;
    for _ in 0..n_steps {
        let z = rng.gen_normal();
        current *= (step.drift + step.diffusion * z).exp();
        path.push(current);
    }
}

/// Monte Carlo pricing engine.
///
/// Owns its random stream and a path buffer that is reused across trials,
/// so repeated estimations allocate nothing beyond the first call.
///
/// # Examples
///
/// ```
/// use pricer_engines::mc::{MonteCarloConfig, MonteCarloEngine};
/// use pricer_engines::payoff::VanillaCall;
/// use pricer_models::instruments::MarketParams;
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(10_000)
///     .n_steps(50)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let mut engine = MonteCarloEngine::new(config).unwrap();
/// let market = MarketParams::new(100.0, 1.0, 0.05, 0.2).unwrap();
///
/// let result = engine.estimate(market, &VanillaCall::new(100.0)).unwrap();
/// println!("{} +/- {}", result.price, result.confidence_95());
/// ```
pub struct MonteCarloEngine {
    config: MonteCarloConfig,
    rng: SimRng,
    /// Reusable path buffer for the sequential trial loop.
    path: Vec<f64>,
}

impl MonteCarloEngine {
    /// Creates a new engine with the given configuration.
    ///
    /// The random stream is seeded from the configuration, or from OS
    /// entropy when no seed is given (the effective seed remains readable
    /// through [`seed`](Self::seed) so any run can be replayed).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn new(config: MonteCarloConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed() {
            Some(seed) => SimRng::from_seed(seed),
            None => SimRng::from_entropy(),
        };
        let path = Vec::with_capacity(config.n_steps() + 1);

        Ok(Self { config, rng, path })
    }

    /// Creates a new engine with a specific seed, overriding the config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn with_seed(config: MonteCarloConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let path = Vec::with_capacity(config.n_steps() + 1);
        Ok(Self {
            config,
            rng: SimRng::from_seed(seed),
            path,
        })
    }

    /// Returns a reference to the configuration.
    #[inline]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Returns the effective seed of the engine's random stream.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Rewinds the random stream to its construction seed.
    pub fn reset(&mut self) {
        self.rng = SimRng::from_seed(self.rng.seed());
    }

    /// Rewinds the random stream with a new seed.
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.rng = SimRng::from_seed(seed);
    }

    /// Estimates the discounted expected payoff over simulated GBM paths.
    ///
    /// Trials run sequentially in stream order; the estimate is
    /// bit-for-bit reproducible for a fixed seed. Note that the random
    /// stream advances across calls — call [`reset`](Self::reset) to
    /// replay the same trials.
    ///
    /// # Errors
    ///
    /// * `McError::PayoffEvaluation` if any trial's payoff fails; the
    ///   estimation aborts with the failing trial index
    /// * `McError::NonFiniteEstimate` if the mean payoff is NaN/Inf
    pub fn estimate<P>(&mut self, market: MarketParams, payoff: &P) -> Result<MonteCarloResult, McError>
    where
        P: Payoff + ?Sized,
    {
        let n_paths = self.config.n_paths();
        let n_steps = self.config.n_steps();
        let step = GbmStep::derive(&market, n_steps);

        let mut sum = 0.0;
        let mut sum_sq = 0.0;

        for trial in 0..n_paths {
            fill_gbm_path(&mut self.path, &mut self.rng, &step, n_steps);
            let value = payoff
                .evaluate(&self.path)
                .map_err(|source| McError::PayoffEvaluation {
                    path_index: trial,
                    source,
                })?;
            sum += value;
            sum_sq += value * value;
        }

        finalize(sum, sum_sq, n_paths, step.discount)
    }

    /// Estimates the discounted expected payoff using parallel workers.
    ///
    /// The trial range is split into fixed-size chunks; each chunk owns an
    /// independent random stream derived from the base seed and the chunk
    /// index, and partial sums are combined in chunk-index order. For a
    /// fixed seed the result is identical regardless of how many worker
    /// threads run, though it differs from the sequential
    /// [`estimate`](Self::estimate) because the stream layout differs.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`estimate`](Self::estimate); when several
    /// chunks fail, the error of the earliest chunk is reported.
    pub fn estimate_parallel<P>(&self, market: MarketParams, payoff: &P) -> Result<MonteCarloResult, McError>
    where
        P: Payoff + Sync + ?Sized,
    {
        let n_paths = self.config.n_paths();
        let n_steps = self.config.n_steps();
        let step = GbmStep::derive(&market, n_steps);
        let base_seed = self.rng.seed();

        let n_chunks = n_paths.div_ceil(PARALLEL_CHUNK_SIZE);

        let partials: Vec<Result<(f64, f64), McError>> = (0..n_chunks)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * PARALLEL_CHUNK_SIZE;
                let count = PARALLEL_CHUNK_SIZE.min(n_paths - start);
                let mut rng = SimRng::from_seed(chunk_seed(base_seed, chunk as u64));
                let mut path = Vec::with_capacity(n_steps + 1);

                let mut sum = 0.0;
                let mut sum_sq = 0.0;
                for k in 0..count {
                    fill_gbm_path(&mut path, &mut rng, &step, n_steps);
                    let value =
                        payoff
                            .evaluate(&path)
                            .map_err(|source| McError::PayoffEvaluation {
                                path_index: start + k,
                                source,
                            })?;
                    sum += value;
                    sum_sq += value * value;
                }
                Ok((sum, sum_sq))
            })
            .collect();

        // Deterministic reduction: walk the partials in chunk order, so
        // both the accumulated sums and the reported error are stable.
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for partial in partials {
            let (s, sq) = partial?;
            sum += s;
            sum_sq += sq;
        }

        finalize(sum, sum_sq, n_paths, step.discount)
    }
}

/// Derives an independent sub-seed for a parallel chunk (SplitMix64 mix).
fn chunk_seed(base: u64, chunk: u64) -> u64 {
    let mut z = base ^ chunk.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Turns accumulated sums into a discounted estimate.
///
/// The variance is floored at zero to absorb floating-point round-off that
/// could otherwise produce a negative value for near-constant payoffs.
fn finalize(sum: f64, sum_sq: f64, n_paths: usize, discount: f64) -> Result<MonteCarloResult, McError> {
    let n = n_paths as f64;
    let mean = sum / n;
    if !mean.is_finite() {
        return Err(McError::NonFiniteEstimate { mean });
    }

    let variance = (sum_sq / n - mean * mean).max(0.0);
    let std_error = (variance / n).sqrt();

    Ok(MonteCarloResult {
        price: discount * mean,
        std_error: discount * std_error,
    })
}
