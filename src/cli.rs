use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use tradecast::data::Field;
use tradecast::stats::{Dispersion, Tendency};

#[derive(Debug, Parser)]
#[command(name = "tradecast", version, about = "Probabilistic short-horizon price forecasts")]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: String,

    /// Override the configured database path
    #[arg(long, global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import daily observations from a feed file or the HTTP feed
    Import(ImportArgs),
    /// Show one field for one date
    Value(ValueArgs),
    /// Show every field for one date
    Day(DayArgs),
    /// List the values of a field, optionally within a date range
    Series(SeriesArgs),
    /// List the stored dates of an instrument
    Dates(InstrumentArgs),
    /// Show database health
    Status,
    /// Dump the database as a SQL script
    Export(ExportArgs),
    /// Run both forecasts on a stored series
    Forecast(ForecastArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    pub instrument: String,

    /// Alpha Vantage style daily JSON document
    #[arg(long, conflicts_with = "fetch", required_unless_present = "fetch")]
    pub file: Option<PathBuf>,

    /// Download the document instead of reading a file
    #[arg(long)]
    pub fetch: bool,
}

#[derive(Debug, Args)]
pub struct InstrumentArgs {
    pub instrument: String,
}

#[derive(Debug, Args)]
pub struct ValueArgs {
    pub instrument: String,
    pub field: Field,
    /// Date as YYYY-MM-DD
    pub date: NaiveDate,
}

#[derive(Debug, Args)]
pub struct DayArgs {
    pub instrument: String,
    /// Date as YYYY-MM-DD
    pub date: NaiveDate,
}

#[derive(Debug, Args)]
pub struct RangeArgs {
    /// First date included (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last date included (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct SeriesArgs {
    pub instrument: String,
    pub field: Field,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct ForecastArgs {
    pub instrument: String,

    #[arg(long)]
    pub field: Option<Field>,

    #[command(flatten)]
    pub range: RangeArgs,

    /// -1 favors down moves, 0 leaves the probabilities alone, 1 favors up moves
    #[arg(long, allow_hyphen_values = true)]
    pub bias: Option<i64>,

    #[arg(long)]
    pub tendency: Option<Tendency>,

    #[arg(long)]
    pub dispersion: Option<Dispersion>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_forecast_args_accept_negative_bias() {
        let cli = Cli::try_parse_from([
            "tradecast", "forecast", "BTC", "--bias", "-1", "--tendency", "median", "--from", "2025-01-01",
        ])
        .unwrap();

        match cli.command {
            Command::Forecast(args) => {
                assert_eq!(args.bias, Some(-1));
                assert_eq!(args.tendency, Some(Tendency::Median));
                assert_eq!(args.range.from, NaiveDate::from_ymd_opt(2025, 1, 1));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_import_requires_a_source() {
        assert!(Cli::try_parse_from(["tradecast", "import", "BTC"]).is_err());
        assert!(Cli::try_parse_from(["tradecast", "import", "BTC", "--fetch"]).is_ok());
    }
}
