/// Errors raised by the statistics and forecasting core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForecastError {
    #[error("Series too short: need at least 2 observations, got {len}")]
    EmptySeries { len: usize },

    #[error("No movement: every consecutive difference in the series is zero")]
    NoMovement,

    #[error("Invalid probability bias {0}: expected -1, 0 or 1")]
    InvalidBias(i64),

    #[error("Undefined tendency: dataset is empty")]
    UndefinedTendency,
}
