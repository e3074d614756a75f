//! Payoff direction of a vanilla option.

use std::str::FromStr;

use num_traits::Float;

/// Direction of a vanilla option payoff.
///
/// # Examples
/// ```
/// use pricer_models::instruments::OptionType;
///
/// let call = OptionType::Call;
/// assert_eq!(call.intrinsic(110.0_f64, 100.0), 10.0);
///
/// let put = OptionType::Put;
/// assert_eq!(put.intrinsic(110.0_f64, 100.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    /// Call option: max(S - K, 0)
    Call,
    /// Put option: max(K - S, 0)
    Put,
}

impl OptionType {
    /// Intrinsic (exercise) value for a given spot and strike.
    #[inline]
    pub fn intrinsic<T: Float>(&self, spot: T, strike: T) -> T {
        let zero = T::zero();
        match self {
            OptionType::Call => (spot - strike).max(zero),
            OptionType::Put => (strike - spot).max(zero),
        }
    }

    /// Returns whether this is a call.
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, OptionType::Call)
    }

    /// Returns whether this is a put.
    #[inline]
    pub fn is_put(&self) -> bool {
        matches!(self, OptionType::Put)
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(format!("unknown option type '{}': expected call or put", other)),
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_call_intrinsic_in_the_money() {
        assert_relative_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
    }

    #[test]
    fn test_call_intrinsic_out_of_the_money() {
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
    }

    #[test]
    fn test_put_intrinsic_in_the_money() {
        assert_relative_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
    }

    #[test]
    fn test_put_intrinsic_out_of_the_money() {
        assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
    }

    #[test]
    fn test_intrinsic_at_the_money() {
        assert_eq!(OptionType::Call.intrinsic(100.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(100.0, 100.0), 0.0);
    }

    #[test]
    fn test_intrinsic_f32() {
        assert!((OptionType::Call.intrinsic(110.0_f32, 100.0) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_predicates() {
        assert!(OptionType::Call.is_call());
        assert!(!OptionType::Call.is_put());
        assert!(OptionType::Put.is_put());
        assert!(!OptionType::Put.is_call());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("call".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!("Put".parse::<OptionType>().unwrap(), OptionType::Put);
        assert_eq!("c".parse::<OptionType>().unwrap(), OptionType::Call);
        assert!("straddle".parse::<OptionType>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for ty in [OptionType::Call, OptionType::Put] {
            let parsed: OptionType = ty.to_string().parse().unwrap();
            assert_eq!(parsed, ty);
        }
    }
}
