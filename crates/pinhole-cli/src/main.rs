mod cli;
mod commands;
mod telemetry;

use crate::cli::{Command, CLI};
use anyhow::Context;
use clap::Parser;
use pinhole_generator::ShortUrlGenerator;
use pinhole_snowflake::SnowflakeSettings;
use std::process::ExitCode;
use tracing::{error, info};

/// `EX_TEMPFAIL`: the command may succeed if run again later.
const EXIT_TEMPFAIL: u8 = 75;

fn main() -> ExitCode {
    let config = CLI::parse();
    telemetry::init(config.log_format);

    match run(config) {
        Ok(code) => code,
        Err(err) => {
            let retryable = commands::is_retryable(&err);
            error!(retryable, "{err:#}");
            if retryable {
                ExitCode::from(EXIT_TEMPFAIL)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(config: CLI) -> anyhow::Result<ExitCode> {
    info!(
        worker_id = config.worker_id,
        epoch = %config.epoch,
        log_format = %config.log_format,
        "starting pinhole"
    );

    // Refuse to do anything with a bad worker id or epoch.
    let settings = SnowflakeSettings::builder()
        .worker_id(config.worker_id)
        .start_epoch(config.epoch)
        .build();
    let generator =
        ShortUrlGenerator::with_settings(settings).context("invalid generator configuration")?;

    let mut stdout = std::io::stdout().lock();
    let succeeded = match config.command {
        Command::Generate { count } => {
            commands::generate(&generator, count, &mut stdout)?;
            true
        }
        Command::Validate { codes } => commands::validate(&generator, &codes, &mut stdout)?,
        Command::Decode { codes } => commands::decode(&codes, &mut stdout)?,
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
