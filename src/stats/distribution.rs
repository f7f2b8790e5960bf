use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::ForecastError;
use crate::stats::tendency::TendencyEstimator;

/// Lower, central and upper tendency of one dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TendencyBounds {
    pub lower: Decimal,
    pub central: Decimal,
    pub upper: Decimal,
}

/// A central value widened by the estimator's dispersion of the same data.
#[derive(Debug, Clone)]
pub struct BoundedDistribution {
    central: Decimal,
    dispersion: Decimal,
}

impl BoundedDistribution {
    /// Fails with [`ForecastError::UndefinedTendency`] on an empty dataset.
    pub fn new(estimator: &TendencyEstimator, data: &[Decimal]) -> Result<Self, ForecastError> {
        let central = estimator.central_tendency(data)?;
        let dispersion = estimator.dispersion(data, central)?;
        Ok(Self {
            central,
            dispersion,
        })
    }

    pub fn distribution_tendency(&self) -> Decimal {
        self.central
    }

    pub fn lower_bound_tendency(&self) -> Decimal {
        self.central - self.dispersion
    }

    pub fn upper_bound_tendency(&self) -> Decimal {
        self.central + self.dispersion
    }

    pub fn dispersion(&self) -> Decimal {
        self.dispersion
    }

    pub fn bounds(&self) -> TendencyBounds {
        TendencyBounds {
            lower: self.lower_bound_tendency(),
            central: self.distribution_tendency(),
            upper: self.upper_bound_tendency(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tendency::{Dispersion, Tendency};
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_bounds_around_mean() {
        let estimator = TendencyEstimator::new(Tendency::Mean, Dispersion::MeanAbsoluteDeviation);
        let data = [d("1"), d("3")];
        let distribution = BoundedDistribution::new(&estimator, &data).unwrap();

        assert_eq!(distribution.distribution_tendency(), d("2"));
        assert_eq!(distribution.lower_bound_tendency(), d("1"));
        assert_eq!(distribution.upper_bound_tendency(), d("3"));
    }

    #[test]
    fn test_bounds_are_ordered() {
        let data = [d("0.5"), d("1.25"), d("0.5"), d("4"), d("0.75")];
        for dispersion in [Dispersion::MeanAbsoluteDeviation, Dispersion::StandardDeviation] {
            let estimator = TendencyEstimator::new(Tendency::MeanLeastDifference, dispersion);
            let bounds = BoundedDistribution::new(&estimator, &data).unwrap().bounds();

            assert!(bounds.lower <= bounds.central);
            assert!(bounds.central <= bounds.upper);
        }
    }

    #[test]
    fn test_single_value_has_zero_width() {
        let estimator = TendencyEstimator::default();
        let bounds = BoundedDistribution::new(&estimator, &[d("0.5")]).unwrap().bounds();

        assert_eq!(bounds.lower, d("0.5"));
        assert_eq!(bounds.central, d("0.5"));
        assert_eq!(bounds.upper, d("0.5"));
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        let estimator = TendencyEstimator::default();
        assert_eq!(
            BoundedDistribution::new(&estimator, &[]).unwrap_err(),
            ForecastError::UndefinedTendency
        );
    }
}
