use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use tradecast::config::{Config, EnvConfig};
use tradecast::data::{feed, DateRange, FeedClient};
use tradecast::forecast::{ForecastEngine, ForecastMethod, ForecastResult};
use tradecast::monitoring::{CsvLogger, ForecastRecord};
use tradecast::stats::TendencyEstimator;
use tradecast::store::export;
use tradecast::SeriesDatabase;

use crate::cli::{
    Command, DayArgs, ExportArgs, ForecastArgs, ImportArgs, InstrumentArgs, RangeArgs, SeriesArgs,
    ValueArgs,
};

pub async fn run(command: Command, config: &Config, env: &EnvConfig, db: &mut SeriesDatabase) -> Result<()> {
    match command {
        Command::Import(args) => import(args, config, env, db).await,
        Command::Value(args) => value(args, db),
        Command::Day(args) => day(args, db),
        Command::Series(args) => series(args, db),
        Command::Dates(args) => dates(args, db),
        Command::Status => status(db),
        Command::Export(args) => export_db(args, db),
        Command::Forecast(args) => forecast(args, config, db),
    }
}

async fn import(args: ImportArgs, config: &Config, env: &EnvConfig, db: &mut SeriesDatabase) -> Result<()> {
    let observations = match &args.file {
        Some(path) => feed::load_file(path)
            .with_context(|| format!("Failed to load feed file: {}", path.display()))?,
        None => {
            if env.alphavantage_api_key.is_none() {
                warn!("ALPHAVANTAGE_API_KEY not set, using the demo key");
            }
            let base_url = env
                .alphavantage_url
                .clone()
                .unwrap_or_else(|| config.feed.base_url.clone());
            let client = FeedClient::new(
                base_url,
                config.feed.function.clone(),
                env.alphavantage_api_key.clone(),
                Duration::from_secs(config.feed.timeout_secs),
            )?;
            client
                .fetch_daily(&args.instrument)
                .await
                .with_context(|| format!("Failed to fetch {}", args.instrument))?
        }
    };

    let written = db.import(&args.instrument, &observations)?;
    println!("Imported {} observations for {}", written, args.instrument);
    Ok(())
}

fn value(args: ValueArgs, db: &SeriesDatabase) -> Result<()> {
    match db.value_for_date(&args.instrument, args.field, args.date)? {
        Some(value) => println!("{} {} on {} = {}", args.instrument, args.field, args.date, value),
        None => println!("No {} data for {} on {}", args.field, args.instrument, args.date),
    }
    Ok(())
}

fn day(args: DayArgs, db: &SeriesDatabase) -> Result<()> {
    let observation = db.day(&args.instrument, args.date)?;
    match observation.filter(|obs| obs.has_data()) {
        Some(obs) => println!("{}", serde_json::to_string_pretty(&obs)?),
        None => println!("No data for {} on {}", args.instrument, args.date),
    }
    Ok(())
}

fn series(args: SeriesArgs, db: &SeriesDatabase) -> Result<()> {
    let points = db.points(&args.instrument, args.field, &to_range(&args.range))?;
    if points.is_empty() {
        println!("No {} data for {}", args.field, args.instrument);
        return Ok(());
    }

    println!("{:<12}{:>20}", "Date", args.field.column().to_uppercase());
    for point in &points {
        println!("{:<12}{:>20}", point.date, point.value);
    }
    println!("Total results: {}", points.len());
    Ok(())
}

fn dates(args: InstrumentArgs, db: &SeriesDatabase) -> Result<()> {
    let dates = db.available_dates(&args.instrument)?;
    for date in &dates {
        println!("{}", date);
    }
    info!("{} dates stored for {}", dates.len(), args.instrument);
    Ok(())
}

fn status(db: &SeriesDatabase) -> Result<()> {
    let status = db.status()?;
    if status.is_healthy() {
        println!("Database is healthy");
    } else {
        println!("Database has no observations");
    }
    println!("{}", serde_json::to_string_pretty(&status)?);
    println!("Instruments: {}", db.instruments()?.join(", "));
    Ok(())
}

fn export_db(args: ExportArgs, db: &SeriesDatabase) -> Result<()> {
    let rows = export::export_to_file(db, &args.output)?;
    println!("Exported {} rows to {}", rows, args.output.display());
    Ok(())
}

fn forecast(args: ForecastArgs, config: &Config, db: &SeriesDatabase) -> Result<()> {
    let field = args.field.unwrap_or(config.forecast.field);
    let estimator = TendencyEstimator::new(
        args.tendency.unwrap_or(config.forecast.tendency),
        args.dispersion.unwrap_or(config.forecast.dispersion),
    );

    let values = db.get_series(&args.instrument, field, &to_range(&args.range))?;
    info!(
        "Forecasting {} {} from {} observations ({}, {})",
        args.instrument,
        field,
        values.len(),
        estimator.tendency(),
        estimator.dispersion_kind()
    );

    let mut engine = ForecastEngine::new(estimator, &values)?;
    engine.set_probability_bias(args.bias.unwrap_or(config.forecast.bias))?;

    let logger = if config.monitoring.csv_logging {
        Some(CsvLogger::new(config.monitoring.csv_log_path.clone())?)
    } else {
        None
    };

    let probabilities = engine.probabilities();
    println!("Anchor: {}", engine.anchor());
    println!(
        "Probabilities: down={} up={}",
        probabilities.negative, probabilities.positive
    );

    let results: [(ForecastMethod, ForecastResult); 2] = [
        (ForecastMethod::MagnitudeWeighted, engine.magnitude_weighted_forecast()?),
        (ForecastMethod::AsymmetricTrend, engine.asymmetric_trend_forecast()?),
    ];
    for (method, result) in results {
        println!("{:<20} {}", method.to_string(), result);

        if let Some(logger) = &logger {
            logger.log_forecast(&ForecastRecord {
                instrument: &args.instrument,
                field,
                method,
                anchor: engine.anchor(),
                result,
                probabilities,
            })?;
        }
    }
    Ok(())
}

fn to_range(args: &RangeArgs) -> DateRange {
    DateRange::new(args.from, args.to)
}
