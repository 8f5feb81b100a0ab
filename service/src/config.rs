use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::time::Duration;

/// Delay before the first reconnection attempt, matching the browser EventSource default.
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 3000;

/// Upper bound for the reconnection delay once backoff has been applied.
pub const DEFAULT_RECONNECT_DELAY_MAX_MS: u64 = 60_000;

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Let the transport reconnect after the event stream drops or cannot be reached.
    /// When disabled, the process exits once the stream ends.
    #[arg(long, env, default_value_t = true, action = clap::ArgAction::Set)]
    pub reconnect: bool,

    /// Milliseconds to wait before the first reconnection attempt
    #[arg(long, env, default_value_t = DEFAULT_RECONNECT_DELAY_MS)]
    pub reconnect_delay_ms: u64,

    /// Maximum milliseconds to wait between reconnection attempts
    #[arg(long, env, default_value_t = DEFAULT_RECONNECT_DELAY_MAX_MS)]
    pub reconnect_delay_max_ms: u64,

    /// Multiplier applied to the reconnection delay after each failed attempt
    #[arg(long, env, default_value_t = 2)]
    pub reconnect_backoff_factor: u32,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn reconnect_delay_max(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_max_ms)
    }
}
