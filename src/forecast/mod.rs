pub mod engine;
pub mod types;

pub use engine::ForecastEngine;
pub use types::{ForecastMethod, ForecastResult, ProbabilityBias, ProbabilityPair, PROBABILITY_SCALE};
