//! Logging system configuration and initialization
//!
//! This module provides the logging setup with:
//! - Console output on stderr (stdout carries the extracted program)
//! - Optional file logging through a non-blocking writer
//! - Configuration based log level control, overridable with `RUST_LOG`
//! - Structured JSON logging (optional)

#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{info, Subscriber};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt::{self, time::ChronoLocal, MakeWriter},
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

pub use crate::infrastructure::config::LoggingConfig;
use crate::infrastructure::config::defaults;

type FilteredRegistry = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

// Keeps the log file writer alive for the lifetime of the process
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<WorkerGuard>> = Mutex::new(Vec::new());
}

/// Get the log directory relative to the executable location
pub fn get_log_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    exe_dir.join("logs")
}

/// Console subscriber used before the configuration is loaded.
///
/// Meant to be scoped with `WithSubscriber::with_subscriber` so it does not
/// take the global slot that [`init_logging_with_config`] installs into.
pub fn bootstrap_subscriber() -> impl Subscriber + Send + Sync + 'static {
    bootstrap_subscriber_with_writer(std::io::stderr)
}

/// [`bootstrap_subscriber`] writing to `writer` instead of stderr
pub fn bootstrap_subscriber_with_writer<W>(writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(defaults::LOG_LEVEL));

    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_timer(ChronoLocal::rfc_3339())
        .with_target(false)
        .finish()
}

/// Build the level filter.
///
/// `RUST_LOG` wins when set. Otherwise the configured level applies to the
/// crate and the per-module filters quiet down dependencies, unless the level
/// is "trace".
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| anyhow!("Invalid log level '{}': {}", config.level, e))?;

    if !config.level.to_lowercase().contains("trace") {
        for (module, level) in &config.module_filters {
            let directive = format!("{}={}", module, level)
                .parse()
                .map_err(|e| anyhow!("Invalid log filter '{}={}': {}", module, level, e))?;
            filter = filter.add_directive(directive);
        }
    }

    Ok(filter)
}

/// Initialize logging with custom configuration
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(config)?;
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.file_output {
        let log_dir = get_log_directory();
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;

        let file_appender = rolling::never(&log_dir, &config.file_name);
        let (file_writer, file_guard) = non_blocking(file_appender);
        keep_guard(&LOG_GUARDS, file_guard);

        let file_layer = fmt::Layer::new()
            .with_writer(file_writer)
            .with_timer(ChronoLocal::rfc_3339())
            .with_ansi(false);
        if config.json_format {
            layers.push(
                file_layer
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .boxed(),
            );
        } else {
            layers.push(file_layer.with_target(false).boxed());
        }
    }

    if config.console_output {
        let console_layer = fmt::Layer::new()
            .with_writer(std::io::stderr)
            .with_timer(ChronoLocal::rfc_3339());
        if config.json_format {
            layers.push(console_layer.json().boxed());
        } else {
            layers.push(console_layer.with_target(false).boxed());
        }
    }

    if layers.is_empty() {
        return Err(anyhow!("No logging output configured"));
    }

    Registry::default()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    if config.file_output {
        info!("Log file: {:?}", get_log_directory().join(&config.file_name));
    }

    Ok(())
}

// A poisoned holder still takes the guard; dropping it would stop the writer
fn keep_guard(holder: &Mutex<Vec<WorkerGuard>>, guard: WorkerGuard) {
    holder
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(guard);
}

/// Log system information for diagnostics
pub fn log_system_info() {
    info!("=== SDDC Program Reader ===");
    info!("Application version: {}", env!("CARGO_PKG_VERSION"));
    info!("Operating system: {}", std::env::consts::OS);
    info!("Architecture: {}", std::env::consts::ARCH);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::ConfigManager;
    use std::io;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tracing::instrument::WithSubscriber;

    /// In-memory log sink shared between the subscriber and the test
    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl CapturedLog {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLog {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_config_reset_is_logged_before_logging_init() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, "{ not json").unwrap();

        let log = CapturedLog::default();
        let manager = ConfigManager::from_path(&config_path);
        manager
            .load_config()
            .with_subscriber(bootstrap_subscriber_with_writer(log.clone()))
            .await
            .unwrap();

        let output = log.contents();
        assert!(output.contains("Configuration file is invalid"), "{output}");
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console_output);
        assert!(!config.file_output);
    }

    #[test]
    fn test_log_directory_is_named_logs() {
        assert!(get_log_directory().to_string_lossy().ends_with("logs"));
    }

    #[test]
    fn test_no_output_is_rejected() {
        let config = LoggingConfig {
            console_output: false,
            file_output: false,
            ..LoggingConfig::default()
        };
        assert!(init_logging_with_config(&config).is_err());
    }

    #[test]
    fn test_guard_is_kept_by_poisoned_holder() {
        let holder = Arc::new(Mutex::new(Vec::new()));
        let poisoner = Arc::clone(&holder);
        let _ = std::thread::spawn(move || {
            let _lock = poisoner.lock().unwrap();
            panic!("poison the guard holder");
        })
        .join();
        assert!(holder.is_poisoned());

        let (_, guard) = non_blocking(io::sink());
        keep_guard(&holder, guard);

        assert_eq!(holder.lock().unwrap_or_else(PoisonError::into_inner).len(), 1);
    }

    #[test]
    fn test_module_filters_build() {
        let mut config = LoggingConfig::default();
        config.level = "debug".to_string();
        assert!(build_env_filter(&config).is_ok());
    }
}
