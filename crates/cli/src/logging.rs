use kibble_core::config::LogFormat;
use kibble_core::AppConfig;
use tracing::{debug, Level};

/// Installs the global subscriber on stderr; stdout carries the JSON envelope.
///
/// Returns false when a subscriber was already installed and has been kept.
pub fn init_logging(config: &AppConfig) -> bool {
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let installed = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    match installed {
        Ok(()) => true,
        Err(error) => {
            debug!(
                event_name = "cli.logging.subscriber_kept",
                error = %error,
                "tracing subscriber already installed"
            );
            false
        }
    }
}
