use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::data::Field;
use crate::forecast::{ForecastMethod, ForecastResult, ProbabilityPair};

const HEADER: &str = "timestamp,instrument,field,method,anchor,lower,central,upper,negative_probability,positive_probability";

/// One produced forecast, as written to the CSV log.
#[derive(Debug, Clone)]
pub struct ForecastRecord<'a> {
    pub instrument: &'a str,
    pub field: Field,
    pub method: ForecastMethod,
    pub anchor: Decimal,
    pub result: ForecastResult,
    pub probabilities: ProbabilityPair,
}

pub struct CsvLogger {
    log_path: String,
}

impl CsvLogger {
    pub fn new(log_path: String) -> Result<Self> {
        // Create CSV file with headers if it doesn't exist
        if !Path::new(&log_path).exists() {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .open(&log_path)?;

            writeln!(file, "{}", HEADER)?;
        }

        Ok(Self { log_path })
    }

    pub fn log_forecast(&self, record: &ForecastRecord<'_>) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.log_path)?;

        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{},{}",
            Utc::now().to_rfc3339(),
            record.instrument,
            record.field,
            record.method,
            record.anchor,
            record.result.lower,
            record.result.central,
            record.result.upper,
            record.probabilities.negative,
            record.probabilities.positive,
        )?;

        Ok(())
    }
}
