mod cli;
mod commands;

use almanac_core::config::load_config;
use almanac_service::{Calendar, EventQuery};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping warn");
    }

    tracing::debug!(config = ?config, "Configuration loaded");

    let calendar = Calendar::from_settings(&config)?;

    match cli.command {
        Command::List {
            events,
            from,
            to,
            occurrences,
        } => {
            let query = EventQuery {
                start_date: from,
                end_date: to,
                show_occurrences: occurrences,
            };
            commands::list(&calendar, &events, &query)
        }
        Command::Expand {
            events,
            id,
            from,
            to,
        } => commands::expand(&calendar, &events, id, from, to),
        Command::Describe { rule } => commands::describe(&rule),
        Command::Validate { events } => commands::validate_events(&events),
        Command::Upcoming { events, today } => commands::upcoming(&calendar, &events, today),
    }
}
