use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use tracing::{debug, info};

use crate::data::{DataPoint, DateRange, Field, Observation};
use crate::store::StoreError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Values are stored as TEXT so decimals come back exactly as imported.
const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS observations (
        instrument TEXT NOT NULL,
        date TEXT NOT NULL,
        open TEXT,
        high TEXT,
        low TEXT,
        close TEXT,
        volume TEXT,
        PRIMARY KEY (instrument, date)
    );

    CREATE INDEX IF NOT EXISTS idx_observations_date ON observations(date);
"#;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    pub table_exists: bool,
    pub row_count: usize,
    pub instrument_count: usize,
}

impl StoreStatus {
    pub fn is_healthy(&self) -> bool {
        self.table_exists && self.row_count > 0
    }
}

/// Daily observation store keyed by instrument and date.
pub struct SeriesDatabase {
    conn: Connection,
}

impl SeriesDatabase {
    pub fn new(db_path: &str) -> Result<Self, StoreError> {
        info!("Opening series database: {}", db_path);
        Self::with_connection(Connection::open(db_path)?)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert or replace observations in one transaction. Returns rows written.
    pub fn import(&mut self, instrument: &str, observations: &[Observation]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO observations (instrument, date, open, high, low, close, volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for obs in observations {
                let text = |field: Field| obs.value(field).map(|v| v.to_string());
                written += stmt.execute(params![
                    instrument,
                    obs.date.format(DATE_FORMAT).to_string(),
                    text(Field::Open),
                    text(Field::High),
                    text(Field::Low),
                    text(Field::Close),
                    text(Field::Volume),
                ])?;
            }
        }
        tx.commit()?;

        info!("Imported {} observations for {}", written, instrument);
        Ok(written)
    }

    /// `Ok(None)` when the date exists but the field is empty.
    pub fn value_for_date(
        &self,
        instrument: &str,
        field: Field,
        date: NaiveDate,
    ) -> Result<Option<Decimal>, StoreError> {
        let sql = format!(
            "SELECT {} FROM observations WHERE instrument = ?1 AND date = ?2",
            field.column()
        );
        let raw: Option<Option<String>> = self
            .conn
            .query_row(&sql, params![instrument, format_date(date)], |row| row.get(0))
            .optional()?;

        match raw {
            Some(value) => value.as_deref().map(parse_decimal).transpose(),
            None => Err(StoreError::UnknownDate { date }),
        }
    }

    pub fn day(&self, instrument: &str, date: NaiveDate) -> Result<Option<Observation>, StoreError> {
        let raw: Option<[Option<String>; 5]> = self
            .conn
            .query_row(
                "SELECT open, high, low, close, volume FROM observations
                 WHERE instrument = ?1 AND date = ?2",
                params![instrument, format_date(date)],
                |row| Ok([row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?]),
            )
            .optional()?;

        let Some(values) = raw else {
            return Ok(None);
        };

        let mut observation = Observation::empty(date);
        for (field, value) in Field::ALL.into_iter().zip(values) {
            observation.set(field, value.as_deref().map(parse_decimal).transpose()?);
        }
        Ok(Some(observation))
    }

    /// Non-empty values of `field` within `range`, ascending by date.
    pub fn points(
        &self,
        instrument: &str,
        field: Field,
        range: &DateRange,
    ) -> Result<Vec<DataPoint>, StoreError> {
        let sql = format!(
            "SELECT date, {col} FROM observations
             WHERE instrument = ?1
               AND {col} IS NOT NULL
               AND (?2 IS NULL OR date >= ?2)
               AND (?3 IS NULL OR date <= ?3)
             ORDER BY date ASC",
            col = field.column()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                instrument,
                range.from.map(format_date),
                range.to.map(format_date)
            ],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )?;

        let mut points = Vec::new();
        for row in rows {
            let (date, value) = row?;
            points.push(DataPoint {
                date: parse_date(&date)?,
                value: parse_decimal(&value)?,
            });
        }
        debug!("Loaded {} {} points for {}", points.len(), field, instrument);
        Ok(points)
    }

    /// Ordered values for the forecaster; fewer than 2 points is `NotFound`.
    pub fn get_series(
        &self,
        instrument: &str,
        field: Field,
        range: &DateRange,
    ) -> Result<Vec<Decimal>, StoreError> {
        let values: Vec<Decimal> = self
            .points(instrument, field, range)?
            .into_iter()
            .map(|point| point.value)
            .collect();

        if values.len() < 2 {
            return Err(StoreError::NotFound {
                instrument: instrument.to_string(),
                field,
                found: values.len(),
            });
        }
        Ok(values)
    }

    pub fn available_dates(&self, instrument: &str) -> Result<Vec<NaiveDate>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT date FROM observations WHERE instrument = ?1 ORDER BY date ASC")?;
        let rows = stmt.query_map(params![instrument], |row| row.get::<_, String>(0))?;

        let mut dates = Vec::new();
        for row in rows {
            dates.push(parse_date(&row?)?);
        }
        Ok(dates)
    }

    pub fn instruments(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT instrument FROM observations ORDER BY instrument")?;
        let instruments = stmt.query_map([], |row| row.get(0))?;
        instruments.collect::<Result<Vec<_>, _>>().map_err(|e| e.into())
    }

    pub fn status(&self) -> Result<StoreStatus, StoreError> {
        let tables: usize = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'observations'",
            [],
            |row| row.get(0),
        )?;
        if tables == 0 {
            return Ok(StoreStatus::default());
        }

        let (row_count, instrument_count): (usize, usize) = self.conn.query_row(
            "SELECT COUNT(*), COUNT(DISTINCT instrument) FROM observations",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(StoreStatus {
            table_exists: true,
            row_count,
            instrument_count,
        })
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| StoreError::InvalidValue {
        value: value.to_string(),
    })
}

fn parse_decimal(value: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(value).map_err(|_| StoreError::InvalidValue {
        value: value.to_string(),
    })
}
