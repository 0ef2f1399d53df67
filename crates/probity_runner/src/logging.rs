//! Logging initialization.
//!
//! The runner reports through `tracing`. Hosts that already install a
//! subscriber need not call anything here.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Output format for [`init_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

static INIT_ONCE: Once = Once::new();

/// Installs a human-readable subscriber.
///
/// `default_filter` applies when `RUST_LOG` is unset, e.g. `"probity=info"`.
/// Only the first call has any effect.
pub fn init(default_filter: &str) {
    init_with(default_filter, LogFormat::Pretty);
}

/// Installs a subscriber with the given format.
///
/// Only the first call has any effect. If another global subscriber is
/// already installed it is left in place.
pub fn init_with(default_filter: &str, format: LogFormat) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        let builder = tracing_subscriber::fmt().with_env_filter(filter);
        let installed = match format {
            LogFormat::Pretty => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
        if installed.is_err() {
            tracing::debug!("global subscriber already installed");
        }
    });
}
