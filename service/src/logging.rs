use crate::config::Config;
use log::LevelFilter;
use simplelog::ConfigBuilder;

/// Crates underneath the event stream connection. Below TRACE their output is
/// dropped: every failure they hit already surfaces as an `EventSource failed:`
/// record from the subscriber, and their debug output is one line per poll.
const TRANSPORT_MODULES: &[&str] = &[
    "eventsource_client",
    "hyper",
    "hyper_rustls",
    "hyper_timeout",
    "rustls",
];

pub struct Logger {}

impl Logger {
    /// Installs a terminal logger at the configured level.
    pub fn init_logger(config: &Config) {
        simplelog::TermLogger::init(
            config.log_level_filter,
            Self::log_config(config.log_level_filter),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )
        .expect("Failed to start simplelog");
    }

    /// Transport modules silenced at `level`; none when tracing.
    fn ignored_modules(level: LevelFilter) -> &'static [&'static str] {
        if level == LevelFilter::Trace {
            &[]
        } else {
            TRANSPORT_MODULES
        }
    }

    fn log_config(level: LevelFilter) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();
        for module in Self::ignored_modules(level) {
            builder.add_filter_ignore_str(module);
        }
        builder.build()
    }
}
