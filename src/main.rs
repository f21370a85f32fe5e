//! `sddc-program-reader [URL]`
//!
//! Reads the conference program and prints the talks as JSON on stdout.
//! Settings come from the user's configuration file; the URL argument
//! overrides the configured program page.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::instrument::WithSubscriber;
use tracing::{error, info, warn};

use sddc_program_reader::application::program_reader::ProgramReader;
use sddc_program_reader::domain::conference_talk::ConferenceTalk;
use sddc_program_reader::infrastructure::config::ConfigManager;
use sddc_program_reader::infrastructure::logging::{
    bootstrap_subscriber, init_logging_with_config, log_system_info,
};
use sddc_program_reader::infrastructure::parsing::ExtractionSummary;

#[derive(Serialize)]
struct ProgramOutput<'a> {
    summary: ExtractionSummary,
    talks: &'a [ConferenceTalk],
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    match run().await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {e:#}");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config_manager = ConfigManager::new()?;
    // The configured logger needs the config, so loading reports to the console
    let mut config = config_manager
        .load_config()
        .with_subscriber(bootstrap_subscriber())
        .await?;

    if let Some(url) = std::env::args().nth(1) {
        config.reader.program_url = url;
    }

    init_logging_with_config(&config.logging)?;
    log_system_info();

    let mut reader = ProgramReader::from_config(&config)?;
    info!("Reading program from {}", reader.url());
    reader.parse().await?;

    for failure in reader.failures() {
        warn!("Talk block {} skipped: {}", failure.index, failure.error);
    }

    let output = ProgramOutput {
        summary: reader.summary(),
        talks: reader.conference_talks(),
    };
    let json = serde_json::to_string_pretty(&output).context("Failed to serialize talks")?;
    println!("{json}");

    Ok(())
}
