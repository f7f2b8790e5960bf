pub mod export;
pub mod series_db;

pub use series_db::{SeriesDatabase, StoreStatus};

use chrono::NaiveDate;

use crate::data::Field;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Not enough {field} data for {instrument}: need at least 2 observations, found {found}")]
    NotFound {
        instrument: String,
        field: Field,
        found: usize,
    },

    #[error("Date {date} not found in database")]
    UnknownDate { date: NaiveDate },

    #[error("Stored value is not a decimal: '{value}'")]
    InvalidValue { value: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Export failed: {0}")]
    Io(#[from] std::io::Error),
}
