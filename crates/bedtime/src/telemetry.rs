//! Logging setup for the bedtime binary.

use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console logging.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects debug output for the
/// bedtime crates.
pub fn init_console_telemetry(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default_filter = if verbose {
        "info,bedtime=debug,bedtime_generation=debug,bedtime_narration=debug,bedtime_config=debug"
    } else {
        "warn,bedtime=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()?;

    debug!(verbose, "Telemetry initialized");
    Ok(())
}
