use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ForecastError;

/// Central tendency algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tendency {
    Mean,
    Median,
    /// The element closest to the arithmetic mean; ties go to the smaller element.
    #[default]
    MeanLeastDifference,
}

/// Spread measures used to widen a central value into bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dispersion {
    /// Mean of `|x - central|`.
    #[default]
    MeanAbsoluteDeviation,
    /// Population standard deviation around the arithmetic mean.
    StandardDeviation,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} '{value}'")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

/// Immutable estimator strategy. Every call takes the dataset explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TendencyEstimator {
    tendency: Tendency,
    dispersion: Dispersion,
}

impl TendencyEstimator {
    pub fn new(tendency: Tendency, dispersion: Dispersion) -> Self {
        Self {
            tendency,
            dispersion,
        }
    }

    pub fn tendency(&self) -> Tendency {
        self.tendency
    }

    pub fn dispersion_kind(&self) -> Dispersion {
        self.dispersion
    }

    pub fn central_tendency(&self, data: &[Decimal]) -> Result<Decimal, ForecastError> {
        match self.tendency {
            Tendency::Mean => mean(data),
            Tendency::Median => median(data),
            Tendency::MeanLeastDifference => mean_least_difference(data),
        }
    }

    /// Spread of `data`; `central` is the value the bounds are built around.
    pub fn dispersion(&self, data: &[Decimal], central: Decimal) -> Result<Decimal, ForecastError> {
        match self.dispersion {
            Dispersion::MeanAbsoluteDeviation => mean_absolute_deviation(data, central),
            Dispersion::StandardDeviation => standard_deviation(data),
        }
    }
}

pub fn mean(data: &[Decimal]) -> Result<Decimal, ForecastError> {
    if data.is_empty() {
        return Err(ForecastError::UndefinedTendency);
    }
    let sum: Decimal = data.iter().sum();
    Ok(sum / Decimal::from(data.len()))
}

pub fn median(data: &[Decimal]) -> Result<Decimal, ForecastError> {
    if data.is_empty() {
        return Err(ForecastError::UndefinedTendency);
    }
    let mut sorted = data.to_vec();
    sorted.sort();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / Decimal::TWO)
    } else {
        Ok(sorted[mid])
    }
}

pub fn mean_least_difference(data: &[Decimal]) -> Result<Decimal, ForecastError> {
    let mean = mean(data)?;
    data.iter()
        .copied()
        .min_by(|a, b| {
            (*a - mean)
                .abs()
                .cmp(&(*b - mean).abs())
                .then_with(|| a.cmp(b))
        })
        .ok_or(ForecastError::UndefinedTendency)
}

pub fn mean_absolute_deviation(data: &[Decimal], central: Decimal) -> Result<Decimal, ForecastError> {
    if data.is_empty() {
        return Err(ForecastError::UndefinedTendency);
    }
    let total: Decimal = data.iter().map(|x| (*x - central).abs()).sum();
    Ok(total / Decimal::from(data.len()))
}

pub fn standard_deviation(data: &[Decimal]) -> Result<Decimal, ForecastError> {
    let mean = mean(data)?;
    let squares: Decimal = data
        .iter()
        .map(|x| {
            let deviation = *x - mean;
            deviation * deviation
        })
        .sum();
    let variance = squares / Decimal::from(data.len());
    // sqrt only fails for negative input
    Ok(variance.sqrt().unwrap_or_default())
}

impl fmt::Display for Tendency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tendency::Mean => "mean",
            Tendency::Median => "median",
            Tendency::MeanLeastDifference => "mean_least_difference",
        };
        f.write_str(name)
    }
}

impl FromStr for Tendency {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "mean" => Ok(Tendency::Mean),
            "median" => Ok(Tendency::Median),
            "mean_least_difference" => Ok(Tendency::MeanLeastDifference),
            _ => Err(UnknownVariant {
                kind: "tendency",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Dispersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dispersion::MeanAbsoluteDeviation => "mean_absolute_deviation",
            Dispersion::StandardDeviation => "standard_deviation",
        };
        f.write_str(name)
    }
}

impl FromStr for Dispersion {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "mean_absolute_deviation" | "mad" => Ok(Dispersion::MeanAbsoluteDeviation),
            "standard_deviation" | "std_dev" => Ok(Dispersion::StandardDeviation),
            _ => Err(UnknownVariant {
                kind: "dispersion",
                value: s.to_string(),
            }),
        }
    }
}
