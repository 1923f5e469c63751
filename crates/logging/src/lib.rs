use std::io;

use time::macros::format_description;
use tracing_subscriber::{EnvFilter, fmt::time::LocalTime};

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `default_directive`. Logs go to stderr since the admin
/// commands print their results on stdout.
pub fn initialize_logging(default_directive: &str) {
    let local_timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]+[offset_hour]:[offset_minute]"
    ));
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(local_timer)
        .with_writer(io::stderr)
        .init();
}
