use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::data::types::{Field, Observation};

/// Prefix shared by the daily series keys (`Time Series (Daily)`,
/// `Time Series (Digital Currency Daily)`, ...).
const TIME_SERIES_PREFIX: &str = "Time Series";

/// Keys the provider uses instead of a series when a request is refused.
const PROVIDER_MESSAGE_KEYS: [&str; 3] = ["Error Message", "Note", "Information"];

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Document has no 'Time Series' object")]
    MissingTimeSeries,

    #[error("Provider refused request: {0}")]
    Provider(String),

    #[error("Failed to parse feed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read feed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Parse a daily time-series document into ascending observations.
pub fn parse_daily(document: &str) -> Result<Vec<Observation>, FeedError> {
    let root: Value = serde_json::from_str(document)?;

    for key in PROVIDER_MESSAGE_KEYS {
        if let Some(message) = root.get(key).and_then(Value::as_str) {
            return Err(FeedError::Provider(message.to_string()));
        }
    }

    let series = root
        .as_object()
        .and_then(|object| {
            object
                .iter()
                .find(|(key, _)| key.starts_with(TIME_SERIES_PREFIX))
                .and_then(|(_, value)| value.as_object())
        })
        .ok_or(FeedError::MissingTimeSeries)?;

    let mut observations = Vec::with_capacity(series.len());
    for (date_key, entry) in series {
        let date = match NaiveDate::parse_from_str(date_key, "%Y-%m-%d") {
            Ok(date) => date,
            Err(e) => {
                warn!("Skipping record with malformed date '{}': {}", date_key, e);
                continue;
            }
        };

        let mut observation = Observation::empty(date);
        if let Some(entry) = entry.as_object() {
            for field in Field::ALL {
                observation.set(field, field_value(entry, field, date));
            }
        }
        observations.push(observation);
    }

    observations.sort_by_key(|observation| observation.date);
    Ok(observations)
}

pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<Observation>, FeedError> {
    let path = path.as_ref();
    info!("Reading feed file: {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    parse_daily(&contents)
}

/// Entry keys look like `"1. open"` or `"1a. open (USD)"`.
fn field_value(entry: &Map<String, Value>, field: Field, date: NaiveDate) -> Option<Decimal> {
    let raw = entry.iter().find_map(|(key, value)| {
        let name = key.split_once(". ").map_or(key.as_str(), |(_, name)| name);
        name.starts_with(field.column()).then_some(value)
    })?;

    let parsed = match raw {
        Value::String(text) => Decimal::from_str(text.trim()).ok(),
        Value::Number(number) => Decimal::from_str(&number.to_string()).ok(),
        _ => None,
    };
    if parsed.is_none() {
        debug!("Unparsable {} value on {}: {}", field, date, raw);
    }
    parsed
}

/// HTTP client for the daily series endpoint.
pub struct FeedClient {
    client: Client,
    base_url: String,
    function: String,
    api_key: Option<String>,
}

impl FeedClient {
    pub fn new(
        base_url: String,
        function: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            function,
            api_key,
        })
    }

    /// Fetch the full daily history of `symbol`.
    pub async fn fetch_daily(&self, symbol: &str) -> Result<Vec<Observation>, FeedError> {
        info!("Fetching {} for {} from {}", self.function, symbol, self.base_url);

        let api_key = self.api_key.as_deref().unwrap_or("demo");
        let body = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", self.function.as_str()),
                ("symbol", symbol),
                ("outputsize", "full"),
                ("apikey", api_key),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let observations = parse_daily(&body)?;
        info!("Fetched {} observations for {}", observations.len(), symbol);
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DAILY: &str = r#"{
        "Meta Data": {
            "1. Information": "Daily Prices (open, high, low, close) and Volumes",
            "2. Symbol": "BTC"
        },
        "Time Series (Daily)": {
            "2025-03-21": {
                "1. open": "84223.3900",
                "2. high": "84850.0000",
                "3. low": "83175.2500",
                "4. close": "84088.7900",
                "5. volume": "1393.5459"
            },
            "2025-03-19": {
                "1. open": "82718.2400",
                "2. high": "86851.4800",
                "3. low": "82467.6600",
                "4. close": "86854.2700",
                "5. volume": "not-a-number"
            },
            "2025-03-20": {
                "1. open": "86854.2700",
                "4. close": "84223.3900"
            },
            "yesterday": {
                "1. open": "1.0"
            }
        }
    }"#;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_daily_sorts_ascending() {
        let observations = parse_daily(DAILY).unwrap();
        let dates: Vec<_> = observations.iter().map(|o| o.date).collect();

        assert_eq!(
            dates,
            vec![date("2025-03-19"), date("2025-03-20"), date("2025-03-21")]
        );
        assert_eq!(
            observations[2].close,
            Some(Decimal::from_str("84088.79").unwrap())
        );
    }

    #[test]
    fn test_parse_daily_missing_and_bad_values_are_none() {
        let observations = parse_daily(DAILY).unwrap();

        assert_eq!(observations[0].volume, None);
        assert!(observations[0].open.is_some());
        assert_eq!(observations[1].high, None);
        assert_eq!(observations[1].low, None);
    }

    #[test]
    fn test_parse_digital_currency_keys() {
        let document = r#"{
            "Time Series (Digital Currency Daily)": {
                "2025-01-02": { "1a. open (USD)": "94000.5", "4a. close (USD)": "96000" }
            }
        }"#;
        let observations = parse_daily(document).unwrap();

        assert_eq!(observations[0].open, Some(Decimal::from_str("94000.5").unwrap()));
        assert_eq!(observations[0].close, Some(Decimal::from(96000)));
    }

    #[test]
    fn test_provider_message_is_an_error() {
        let document = r#"{ "Note": "API call frequency exceeded" }"#;
        match parse_daily(document) {
            Err(FeedError::Provider(message)) => assert!(message.contains("frequency")),
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_series_is_an_error() {
        assert!(matches!(
            parse_daily(r#"{ "Meta Data": {} }"#),
            Err(FeedError::MissingTimeSeries)
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DAILY.as_bytes()).unwrap();

        let observations = load_file(file.path()).unwrap();
        assert_eq!(observations.len(), 3);
    }
}
