use rust_decimal::Decimal;

use crate::error::ForecastError;
use crate::forecast::types::{ForecastResult, ProbabilityBias, ProbabilityPair};
use crate::stats::{BoundedDistribution, DifferenceSet, SequenceDifferencer, TendencyBounds, TendencyEstimator};

/// Forecasts the next value of a series from its decomposed consecutive moves.
///
/// The difference sets and the unbiased probability pair are derived once in
/// [`ForecastEngine::new`]. The effective pair is always recomputed from that
/// baseline, so a sequence of bias changes is equivalent to applying the last one.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    estimator: TendencyEstimator,
    anchor: Decimal,
    differences: DifferenceSet,
    baseline: ProbabilityPair,
    probabilities: ProbabilityPair,
    bias: ProbabilityBias,
}

impl ForecastEngine {
    pub fn new(estimator: TendencyEstimator, series: &[Decimal]) -> Result<Self, ForecastError> {
        let anchor = match series {
            [_, .., last] => *last,
            _ => return Err(ForecastError::EmptySeries { len: series.len() }),
        };

        let differences = SequenceDifferencer::new(series)
            .include_zero_differences(false)
            .decompose();
        if differences.is_empty() {
            return Err(ForecastError::NoMovement);
        }

        let baseline = ProbabilityPair::from_counts(
            differences.negative.len(),
            differences.positive.len(),
            differences.len(),
        )?;

        Ok(Self {
            estimator,
            anchor,
            differences,
            baseline,
            probabilities: baseline,
            bias: ProbabilityBias::Neutral,
        })
    }

    /// Accepts -1 (favor down moves), 0 (unbiased) or 1 (favor up moves).
    pub fn set_probability_bias(&mut self, bias: i64) -> Result<(), ForecastError> {
        let bias = ProbabilityBias::try_from(bias)?;
        self.apply_bias(bias);
        Ok(())
    }

    pub fn apply_bias(&mut self, bias: ProbabilityBias) {
        self.bias = bias;
        self.probabilities = self.baseline.biased(bias);
    }

    /// Weights one absolute-move distribution by the down/up probabilities.
    pub fn magnitude_weighted_forecast(&self) -> Result<ForecastResult, ForecastError> {
        let magnitude = BoundedDistribution::new(&self.estimator, &self.differences.absolute)?.bounds();
        let weighted = |m: Decimal| self.anchor + self.probabilities.expectation(-m, m);

        Ok(ForecastResult {
            lower: weighted(magnitude.lower),
            central: weighted(magnitude.central),
            upper: weighted(magnitude.upper),
        })
    }

    /// Weights separate up-move and down-move distributions, keeping any
    /// asymmetry between the size of rises and falls.
    pub fn asymmetric_trend_forecast(&self) -> Result<ForecastResult, ForecastError> {
        let positive = self.side_bounds(&self.differences.positive)?;
        let negative = self.side_bounds(&self.differences.negative)?;
        let weighted =
            |neg: Decimal, pos: Decimal| self.anchor + self.probabilities.expectation(neg, pos);

        Ok(ForecastResult {
            lower: weighted(negative.lower, positive.lower),
            central: weighted(negative.central, positive.central),
            upper: weighted(negative.upper, positive.upper),
        })
    }

    // A side with no moves contributes nothing.
    fn side_bounds(&self, data: &[Decimal]) -> Result<TendencyBounds, ForecastError> {
        if data.is_empty() {
            return Ok(TendencyBounds::default());
        }
        Ok(BoundedDistribution::new(&self.estimator, data)?.bounds())
    }

    pub fn anchor(&self) -> Decimal {
        self.anchor
    }

    /// Re-anchors later forecasts; differences and probabilities are untouched.
    pub fn set_anchor(&mut self, anchor: Decimal) {
        self.anchor = anchor;
    }

    pub fn probabilities(&self) -> ProbabilityPair {
        self.probabilities
    }

    pub fn baseline_probabilities(&self) -> ProbabilityPair {
        self.baseline
    }

    pub fn bias(&self) -> ProbabilityBias {
        self.bias
    }

    pub fn differences(&self) -> &DifferenceSet {
        &self.differences
    }

    pub fn estimator(&self) -> &TendencyEstimator {
        &self.estimator
    }
}
