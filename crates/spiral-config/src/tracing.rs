use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable naming an optional Chrome trace output file.
pub const CHROME_TRACE_ENV: &str = "SPIRAL_TRACE_CHROME";

/// Directive used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "info";

static INITIALISED: OnceLock<()> = OnceLock::new();
static ENSURED: OnceLock<Result<(), InitError>> = OnceLock::new();
static CHROME_GUARD: OnceLock<Mutex<Option<tracing_chrome::FlushGuard>>> = OnceLock::new();

/// Resolved subscriber settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceSettings {
    pub default_directive: String,
    pub ansi: bool,
    pub chrome_path: Option<PathBuf>,
}

impl TraceSettings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, InitError> {
        Ok(Self {
            default_directive: DEFAULT_DIRECTIVE.to_string(),
            ansi: std::io::stderr().is_terminal(),
            chrome_path: chrome_trace_path()?,
        })
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_directive))
    }
}

/// Configures the global tracing subscriber from the environment.
///
/// Events are written to STDERR so command output on STDOUT stays parseable.
pub fn init_tracing() -> Result<(), InitError> {
    let settings = TraceSettings::from_env()?;
    init_tracing_with(&settings)
}

/// Installs the subscriber at most once per process and replays the first
/// outcome on later calls. A subscriber installed by someone else counts as
/// success.
pub fn ensure_tracing() -> Result<(), InitError> {
    ENSURED
        .get_or_init(|| match init_tracing() {
            Err(InitError::AlreadyInitialised) => Ok(()),
            other => other,
        })
        .clone()
}

/// Configures the global tracing subscriber from explicit settings.
pub fn init_tracing_with(settings: &TraceSettings) -> Result<(), InitError> {
    INITIALISED
        .set(())
        .map_err(|_| InitError::AlreadyInitialised)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(settings.ansi);

    match settings.chrome_path.as_ref() {
        Some(path) => {
            let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(path)
                .include_args(true)
                .build();
            Registry::default()
                .with(settings.filter())
                .with(fmt_layer)
                .with(chrome_layer)
                .try_init()
                .map_err(|err| InitError::Install(err.to_string()))?;
            // Dropping the guard flushes and closes the trace file.
            let cell = CHROME_GUARD.get_or_init(|| Mutex::new(None));
            if let Ok(mut slot) = cell.lock() {
                *slot = Some(guard);
            }
        }
        None => {
            Registry::default()
                .with(settings.filter())
                .with(fmt_layer)
                .try_init()
                .map_err(|err| InitError::Install(err.to_string()))?;
        }
    }

    Ok(())
}

/// Whether a Chrome trace file is currently being recorded.
pub fn chrome_trace_active() -> bool {
    CHROME_GUARD
        .get()
        .and_then(|cell| cell.lock().ok().map(|slot| slot.is_some()))
        .unwrap_or(false)
}

fn chrome_trace_path() -> Result<Option<PathBuf>, InitError> {
    match std::env::var(CHROME_TRACE_ENV) {
        Ok(raw) if !raw.trim().is_empty() => Ok(Some(PathBuf::from(raw.trim()))),
        Ok(_) => Ok(None),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(InitError::Env(err)),
    }
}

/// Errors emitted when configuring the tracing subscriber.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    #[error("tracing has already been initialised")]
    AlreadyInitialised,
    #[error("failed to read {CHROME_TRACE_ENV}: {0}")]
    Env(std::env::VarError),
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}
