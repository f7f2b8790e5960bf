use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

use crate::error::ForecastError;
use crate::stats::expectation;

/// Fractional digits kept when dividing move counts into probabilities.
pub const PROBABILITY_SCALE: u32 = 10;

/// Probabilities of a down move and an up move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbabilityPair {
    pub negative: Decimal,
    pub positive: Decimal,
}

impl ProbabilityPair {
    /// Move counts over `total`, rounded half-up to [`PROBABILITY_SCALE`] digits.
    pub fn from_counts(negative: usize, positive: usize, total: usize) -> Result<Self, ForecastError> {
        if total == 0 {
            return Err(ForecastError::NoMovement);
        }
        let total = Decimal::from(total);
        let ratio = |count: usize| {
            (Decimal::from(count) / total)
                .round_dp_with_strategy(PROBABILITY_SCALE, RoundingStrategy::MidpointAwayFromZero)
        };
        Ok(Self {
            negative: ratio(negative),
            positive: ratio(positive),
        })
    }

    pub fn swapped(self) -> Self {
        Self {
            negative: self.positive,
            positive: self.negative,
        }
    }

    /// The pair after forcing it toward the side `bias` names.
    pub fn biased(self, bias: ProbabilityBias) -> Self {
        let favors_down = self.negative > self.positive;
        match bias {
            ProbabilityBias::Down if !favors_down => self.swapped(),
            ProbabilityBias::Up if favors_down => self.swapped(),
            _ => self,
        }
    }

    pub fn expectation(&self, negative_outcome: Decimal, positive_outcome: Decimal) -> Decimal {
        expectation(negative_outcome, positive_outcome, self.negative, self.positive)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ProbabilityBias {
    Down,
    #[default]
    Neutral,
    Up,
}

impl ProbabilityBias {
    pub fn as_i64(&self) -> i64 {
        match self {
            ProbabilityBias::Down => -1,
            ProbabilityBias::Neutral => 0,
            ProbabilityBias::Up => 1,
        }
    }
}

impl TryFrom<i64> for ProbabilityBias {
    type Error = ForecastError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(ProbabilityBias::Down),
            0 => Ok(ProbabilityBias::Neutral),
            1 => Ok(ProbabilityBias::Up),
            other => Err(ForecastError::InvalidBias(other)),
        }
    }
}

/// Three-point forecast: anchor plus the weighted lower, central and upper delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForecastResult {
    pub lower: Decimal,
    pub central: Decimal,
    pub upper: Decimal,
}

impl ForecastResult {
    pub fn to_array(&self) -> [Decimal; 3] {
        [self.lower, self.central, self.upper]
    }
}

impl fmt::Display for ForecastResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.lower, self.central, self.upper)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastMethod {
    MagnitudeWeighted,
    AsymmetricTrend,
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastMethod::MagnitudeWeighted => f.write_str("magnitude_weighted"),
            ForecastMethod::AsymmetricTrend => f.write_str("asymmetric_trend"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_probabilities_round_half_up_to_ten_digits() {
        let pair = ProbabilityPair::from_counts(4, 7, 11).unwrap();
        assert_eq!(pair.negative, d("0.3636363636"));
        assert_eq!(pair.positive, d("0.6363636364"));
        assert_eq!(pair.negative.scale(), PROBABILITY_SCALE);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        for total in 1..40usize {
            for negative in 0..=total {
                let pair = ProbabilityPair::from_counts(negative, total - negative, total).unwrap();
                let gap = (pair.negative + pair.positive - Decimal::ONE).abs();
                assert!(gap <= d("0.0000000001"), "{negative}/{total} drifted by {gap}");
            }
        }
    }

    #[test]
    fn test_zero_total_is_no_movement() {
        assert_eq!(
            ProbabilityPair::from_counts(0, 0, 0),
            Err(ForecastError::NoMovement)
        );
    }

    #[test]
    fn test_bias_swaps_toward_requested_side() {
        let up_heavy = ProbabilityPair {
            negative: d("0.2"),
            positive: d("0.8"),
        };

        assert_eq!(up_heavy.biased(ProbabilityBias::Neutral), up_heavy);
        assert_eq!(up_heavy.biased(ProbabilityBias::Up), up_heavy);
        assert_eq!(up_heavy.biased(ProbabilityBias::Down), up_heavy.swapped());

        let down_heavy = up_heavy.swapped();
        assert_eq!(down_heavy.biased(ProbabilityBias::Down), down_heavy);
        assert_eq!(down_heavy.biased(ProbabilityBias::Up), up_heavy);
    }

    #[test]
    fn test_bias_from_integer() {
        assert_eq!(ProbabilityBias::try_from(-1).unwrap(), ProbabilityBias::Down);
        assert_eq!(ProbabilityBias::try_from(1).unwrap().as_i64(), 1);
        assert_eq!(
            ProbabilityBias::try_from(2),
            Err(ForecastError::InvalidBias(2))
        );
    }

    #[test]
    fn test_forecast_result_display() {
        let result = ForecastResult {
            lower: d("4.77"),
            central: d("4.8"),
            upper: d("4.83"),
        };
        assert_eq!(result.to_string(), "[4.77, 4.8, 4.83]");
    }
}
