use clap::{Parser, Subcommand, ValueEnum};
use jiff::Timestamp;
use std::fmt::{Display, Formatter};

pub const WORKER_ID_ENV: &str = "PINHOLE_WORKER_ID";
pub const EPOCH_ENV: &str = "PINHOLE_EPOCH";
pub const LOG_FORMAT_ENV: &str = "PINHOLE_LOG_FORMAT";

pub const DEFAULT_WORKER_ID: &str = "0";
pub const DEFAULT_EPOCH: &str = "2024-01-01T00:00:00Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Text => write!(f, "text"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pinhole", about = "Mint and check base58 short codes")]
pub struct CLI {
    /// Worker index of this process, 0..=255. Must be unique across the fleet.
    #[arg(
        long,
        env = WORKER_ID_ENV,
        default_value = DEFAULT_WORKER_ID,
        allow_negative_numbers = true
    )]
    pub worker_id: i64,

    /// Zero point of the ID timestamp field.
    #[arg(long, env = EPOCH_ENV, default_value = DEFAULT_EPOCH)]
    pub epoch: Timestamp,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Mint new short codes, one per line
    Generate {
        #[arg(long, short = 'n', default_value_t = 1)]
        count: usize,
    },
    /// Check that each code uses base58 digits only
    Validate {
        #[arg(required = true)]
        codes: Vec<String>,
    },
    /// Print the numeric value of each code
    Decode {
        #[arg(required = true)]
        codes: Vec<String>,
    },
}
