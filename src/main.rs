use anyhow::Result;
use colored::*;
use log::*;
use service::{config::Config, logging::Logger};
use subscriber::{Endpoint, ReconnectPolicy, Renderer, Subscriber, TerminalDisplay};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new();
    Logger::init_logger(&config);

    let endpoint = Endpoint::default();
    let policy = reconnect_policy(&config);
    debug!("Reconnect policy: {policy:?}");

    eprintln!("{} Subscribing to {}", "→".blue(), endpoint);
    let renderer = Renderer::new(TerminalDisplay::stdout());
    let mut subscriber = Subscriber::start(endpoint, &policy, renderer).await?;

    tokio::select! {
        _ = subscriber.run() => {
            eprintln!("{} Event stream closed", "✗".red());
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    let renderer = subscriber.close();
    eprintln!(
        "{} {} messages received",
        "✓".green(),
        renderer.display().list().len()
    );

    Ok(())
}

fn reconnect_policy(config: &Config) -> ReconnectPolicy {
    if config.reconnect {
        ReconnectPolicy::Backoff {
            delay: config.reconnect_delay(),
            delay_max: config.reconnect_delay_max(),
            backoff_factor: config.reconnect_backoff_factor,
        }
    } else {
        ReconnectPolicy::Disabled
    }
}
