use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "almanac")]
#[command(about = "Expand, describe and validate recurring calendar events")]
pub struct Cli {
    /// Configuration file (defaults to ./almanac.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List events, optionally with their occurrences
    List {
        /// JSON file holding an array of event records
        #[arg(short, long)]
        events: PathBuf,

        /// First day of the window (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day of the window (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Attach each event's occurrences
        #[arg(long)]
        occurrences: bool,
    },
    /// Print every occurrence of the events in a date window
    Expand {
        #[arg(short, long)]
        events: PathBuf,

        /// Only expand the event with this id
        #[arg(long)]
        id: Option<i64>,

        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,
    },
    /// Describe a recurrence rule given as JSON
    Describe {
        /// Rule record, e.g. '{"frequency":"WEEKLY","weekdays":"0,2"}'
        rule: String,
    },
    /// Check event records and report every violation
    Validate {
        #[arg(short, long)]
        events: PathBuf,
    },
    /// List events in the coming days
    Upcoming {
        #[arg(short, long)]
        events: PathBuf,

        /// Day to count from (defaults to today in the calendar timezone)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_with_window() {
        let cli = Cli::try_parse_from([
            "almanac",
            "list",
            "--events",
            "events.json",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-31",
            "--occurrences",
        ])
        .expect("valid arguments");

        let Command::List {
            from,
            to,
            occurrences,
            ..
        } = cli.command
        else {
            panic!("expected list");
        };
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert!(occurrences);
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from([
            "almanac",
            "describe",
            r#"{"frequency":"DAILY"}"#,
            "--config",
            "custom.toml",
        ])
        .expect("valid arguments");
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn expand_requires_a_window() {
        assert!(Cli::try_parse_from(["almanac", "expand", "--events", "events.json"]).is_err());
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(
            Cli::try_parse_from([
                "almanac",
                "upcoming",
                "--events",
                "events.json",
                "--today",
                "01/02/2024",
            ])
            .is_err()
        );
    }
}
