//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config and environment
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level when set
//! - Logs go to stderr; stdout carries command output (`gossr routes`, `gossr css`)

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::ObservabilityConfig;

/// Build the filter: `RUST_LOG` if present, otherwise the configured level for
/// this crate and the HTTP layers.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "gossr={level},tower_http={level}",
            level = config.log_level
        )
        .into()
    })
}

/// Install the global subscriber. Call once, before the registries are built,
/// so startup validation messages are visible.
pub fn init_logging(config: &ObservabilityConfig) {
    subscriber(config, std::io::stderr).init();
}

/// The subscriber `init_logging` installs, writing formatted events to `writer`.
pub fn subscriber<W>(
    config: &ObservabilityConfig,
    writer: W,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
}

/// Collects formatted log output in memory for assertions.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl CapturedLogs {
    /// Run `f` with a subscriber writing into this buffer.
    pub(crate) fn during<R>(&self, f: impl FnOnce() -> R) -> R {
        let writer = self.clone();
        let subscriber = subscriber(&ObservabilityConfig::default(), move || writer.clone());
        tracing::subscriber::with_default(subscriber, f)
    }

    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[cfg(test)]
impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_go_to_given_writer() {
        let logs = CapturedLogs::default();
        logs.during(|| tracing::error!("route table failed"));

        assert!(logs.text().contains("route table failed"));
    }
}
