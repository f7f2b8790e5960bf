//! Short-horizon price forecasts from the consecutive moves of one series.
//!
//! The statistics core ([`stats`], [`forecast`]) is pure and synchronous. The
//! [`data`], [`store`] and [`monitoring`] modules supply it with series from a
//! SQLite observation store fed by Alpha Vantage style daily documents.

pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod monitoring;
pub mod stats;
pub mod store;

pub use error::ForecastError;
pub use forecast::{ForecastEngine, ForecastMethod, ForecastResult, ProbabilityBias, ProbabilityPair};
pub use stats::{
    expectation, BoundedDistribution, DifferenceSet, Dispersion, SequenceDifferencer, Tendency,
    TendencyBounds, TendencyEstimator,
};
pub use store::{SeriesDatabase, StoreError};
