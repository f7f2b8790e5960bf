pub mod logger;

pub use logger::{CsvLogger, ForecastRecord};
