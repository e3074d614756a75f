//! Property-based tests for the pricing engines.

use proptest::prelude::*;

use pricer_engines::lattice::binomial_price;
use pricer_engines::mc::{MonteCarloConfig, MonteCarloEngine};
use pricer_engines::payoff::VanillaCall;
use pricer_models::instruments::{ExerciseStyle, MarketParams, OptionSpec, OptionType};

fn spec(
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    volatility: f64,
    option_type: OptionType,
    exercise_style: ExerciseStyle,
) -> OptionSpec {
    OptionSpec::new(
        spot,
        strike,
        maturity,
        rate,
        volatility,
        option_type,
        exercise_style,
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn binomial_price_is_non_negative(
        spot in 10.0_f64..500.0,
        strike in 10.0_f64..500.0,
        maturity in 0.1_f64..5.0,
        rate in -0.05_f64..0.15,
        volatility in 0.05_f64..0.8,
        steps in 1_usize..200,
        is_call in any::<bool>(),
        is_american in any::<bool>(),
    ) {
        let option_type = if is_call { OptionType::Call } else { OptionType::Put };
        let style = if is_american { ExerciseStyle::American } else { ExerciseStyle::European };
        let spec = spec(spot, strike, maturity, rate, volatility, option_type, style);

        let price = binomial_price(&spec, steps).unwrap();
        prop_assert!(price >= 0.0, "price = {}", price);
        prop_assert!(price.is_finite());
    }

    #[test]
    fn american_dominates_european(
        spot in 50.0_f64..200.0,
        strike in 50.0_f64..200.0,
        maturity in 0.1_f64..3.0,
        rate in 0.0_f64..0.1,
        volatility in 0.05_f64..0.6,
        steps in 10_usize..150,
        is_call in any::<bool>(),
    ) {
        let option_type = if is_call { OptionType::Call } else { OptionType::Put };
        let eu = binomial_price(
            &spec(spot, strike, maturity, rate, volatility, option_type, ExerciseStyle::European),
            steps,
        ).unwrap();
        let am = binomial_price(
            &spec(spot, strike, maturity, rate, volatility, option_type, ExerciseStyle::American),
            steps,
        ).unwrap();

        prop_assert!(am >= eu - 1e-9, "american {} < european {}", am, eu);
    }

    #[test]
    fn american_bounded_below_by_intrinsic(
        spot in 50.0_f64..200.0,
        strike in 50.0_f64..200.0,
        volatility in 0.05_f64..0.6,
        is_call in any::<bool>(),
    ) {
        let option_type = if is_call { OptionType::Call } else { OptionType::Put };
        let spec = spec(spot, strike, 1.0, 0.05, volatility, option_type, ExerciseStyle::American);

        let price = binomial_price(&spec, 100).unwrap();
        let intrinsic = option_type.intrinsic(spot, strike);
        prop_assert!(price >= intrinsic - 1e-9, "price {} < intrinsic {}", price, intrinsic);
    }

    #[test]
    fn monte_carlo_estimate_is_sane(
        strike in 50.0_f64..200.0,
        seed in any::<u64>(),
    ) {
        let config = MonteCarloConfig::builder()
            .n_paths(2_000)
            .n_steps(10)
            .seed(seed)
            .build()
            .unwrap();
        let mut engine = MonteCarloEngine::new(config).unwrap();
        let market = MarketParams::new(100.0, 1.0, 0.05, 0.2).unwrap();

        let result = engine.estimate(market, &VanillaCall::new(strike)).unwrap();
        prop_assert!(result.price >= 0.0);
        prop_assert!(result.std_error >= 0.0);
        prop_assert!(result.price.is_finite());
        // A call is never worth more than the underlying.
        prop_assert!(result.price <= 100.0 + 3.0 * result.std_error + 1.0);
    }
}
