use std::any::Any;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub const ENV_LOG_DIR: &str = "LX_LOG_DIR";
pub const ENV_LOG_FORMAT: &str = "LX_LOG_FORMAT";
pub const ENV_LOG_INCLUDE_BACKTRACE: &str = "LX_LOG_INCLUDE_BACKTRACE";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging knobs resolved from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    /// Daily-rotated files go here; stderr when unset.
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    /// Chain to the default panic hook after logging.
    pub include_backtrace: bool,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = match lookup(ENV_LOG_FORMAT) {
            Some(value) if value.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            dir: lookup(ENV_LOG_DIR)
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            format,
            include_backtrace: lookup(ENV_LOG_INCLUDE_BACKTRACE)
                .is_some_and(|value| flag_enabled(&value)),
        }
    }
}

fn flag_enabled(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    payload
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_else(|| "non-string panic payload".into())
}

/// Logs panics through `tracing` with thread and source location. Installed
/// once per process.
pub fn install_tracing_panic_hook(app_name: &'static str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let chain_default = LogSettings::from_env().include_backtrace;
        let default_hook = panic::take_hook();

        panic::set_hook(Box::new(move |info| {
            let thread = std::thread::current();
            let location = info
                .location()
                .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
                .unwrap_or_else(|| "unknown".into());

            tracing::error!(
                application = app_name,
                thread = thread.name().unwrap_or("unnamed"),
                %location,
                panic_message = %panic_message(info.payload()),
                "panic captured"
            );

            if chain_default {
                default_hook(info);
            }
        }));
    });
}

fn file_writer(app_name: &str, dir: &Path) -> Option<BoxMakeWriter> {
    if let Err(err) = std::fs::create_dir_all(dir) {
        eprintln!("{app_name}: cannot create {}: {err}; logging to stderr", dir.display());
        return None;
    }

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, format!("{app_name}.log")));
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(writer))
}

/// Installs the global subscriber from [`LogSettings::from_env`]. Filtering
/// follows `RUST_LOG` (default `info`). Output never goes to stdout, which is
/// reserved for JSON results.
pub fn init_tracing_subscriber(app_name: &'static str) {
    init_with_settings(app_name, &LogSettings::from_env());
}

pub fn init_with_settings(app_name: &'static str, settings: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file = settings
        .dir
        .as_deref()
        .and_then(|dir| file_writer(app_name, dir));
    let ansi = file.is_none() && settings.format == LogFormat::Text;
    let writer = file.unwrap_or_else(|| BoxMakeWriter::new(std::io::stderr));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_writer(writer);

    let _ = match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
}
