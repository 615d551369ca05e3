use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Keeps the Chrome trace writer alive.
///
/// The trace file is completed when this value is dropped, so hold it for as
/// long as events should be recorded and let it go before the process exits.
#[must_use = "dropping the guard finishes the Chrome trace immediately"]
#[derive(Default)]
pub struct TracingGuard {
    chrome: Option<tracing_chrome::FlushGuard>,
}

impl TracingGuard {
    /// Whether a Chrome trace is being recorded through this guard.
    pub fn records_chrome_trace(&self) -> bool {
        self.chrome.is_some()
    }
}

impl std::fmt::Debug for TracingGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracingGuard")
            .field("chrome", &self.chrome.is_some())
            .finish()
    }
}

/// Configures the global tracing subscriber.
///
/// Events are written to stderr so that stdout stays reserved for readouts.
/// `RUST_LOG` takes precedence over `default_directive`. When
/// `SPIRAL_TRACE_CHROME` names a file, a Chrome trace is recorded as well; it
/// is written out when the returned guard is dropped.
pub fn init_tracing(default_directive: &str) -> Result<TracingGuard, InitError> {
    INITIALISED
        .set(())
        .map_err(|_| InitError::AlreadyInitialised)?;

    let ansi = std::io::stderr().is_terminal();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(std::io::stderr);

    match chrome_trace_path()? {
        Some(path) => {
            let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(path)
                .include_args(true)
                .build();
            Registry::default()
                .with(filter)
                .with(fmt_layer)
                .with(chrome_layer)
                .try_init()
                .map_err(|err| InitError::Subscriber(err.to_string()))?;
            Ok(TracingGuard {
                chrome: Some(guard),
            })
        }
        None => {
            Registry::default()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .map_err(|err| InitError::Subscriber(err.to_string()))?;
            Ok(TracingGuard::default())
        }
    }
}

/// Installs the subscriber, treating a previous initialisation as success.
///
/// When the subscriber was already installed the returned guard is empty; the
/// first caller's guard still owns any Chrome trace.
pub fn ensure_tracing(default_directive: &str) -> Result<TracingGuard, InitError> {
    match init_tracing(default_directive) {
        Ok(guard) => Ok(guard),
        Err(InitError::AlreadyInitialised) => Ok(TracingGuard::default()),
        Err(err) => Err(err),
    }
}

fn chrome_trace_path() -> Result<Option<PathBuf>, InitError> {
    match std::env::var("SPIRAL_TRACE_CHROME") {
        Ok(raw) if !raw.trim().is_empty() => Ok(Some(PathBuf::from(raw))),
        Ok(_) => Ok(None),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(InitError::Env(err)),
    }
}

/// Errors emitted when configuring the tracing subscriber.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("tracing has already been initialised")]
    AlreadyInitialised,
    #[error("failed to read SPIRAL_TRACE_CHROME: {0}")]
    Env(std::env::VarError),
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}
