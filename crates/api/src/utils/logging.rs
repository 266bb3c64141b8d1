//! Tracing subscriber setup

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Output format switch: `FAMCAL_LOG_FORMAT=json` for one JSON object per line.
pub const LOG_FORMAT_ENV: &str = "FAMCAL_LOG_FORMAT";

/// Install the global subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();

    if wants_json(std::env::var(LOG_FORMAT_ENV).ok().as_deref()) {
        tracing_subscriber::fmt().with_env_filter(env_filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).compact().init();
    }
}

fn wants_json(format: Option<&str>) -> bool {
    format.is_some_and(|value| value.trim().eq_ignore_ascii_case("json"))
}
