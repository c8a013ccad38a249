//! Logging system initialization
//!
//! Sets up tracing from the `[logging]` section of the settings file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::LoggingConfig;
use crate::errors::{PrintlinkerError, Result};

const DEFAULT_LOG_FILE_NAME: &str = "printlinker.log";

fn open_writer(config: &LoggingConfig) -> Result<Box<dyn std::io::Write + Send + Sync>> {
    let Some(log_file) = config.file.as_deref().filter(|f| !f.is_empty()) else {
        // 未配置日志文件时输出到 stderr，stdout 留给命令输出
        return Ok(Box::new(std::io::stderr()));
    };

    let path = Path::new(log_file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| {
        PrintlinkerError::file_operation(format!(
            "Failed to create log directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    if config.enable_rotation {
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(DEFAULT_LOG_FILE_NAME);
        let appender = rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(file_name.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups.max(1) as usize)
            .build(dir)
            .map_err(|e| {
                PrintlinkerError::file_operation(format!(
                    "Failed to create rolling log appender: {}",
                    e
                ))
            })?;
        Ok(Box::new(appender))
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                PrintlinkerError::file_operation(format!(
                    "Failed to open log file {}: {}",
                    log_file, e
                ))
            })?;
        Ok(Box::new(file))
    }
}

/// Initialize the global tracing subscriber.
///
/// Call once at startup. The returned guard must be kept alive for the
/// duration of the program so buffered log lines are flushed.
/// `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let writer = open_writer(config)?;
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    let to_console = config.file.as_ref().is_none_or(|f| f.is_empty());
    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_target(false)
        .with_ansi(to_console);

    let result = if config.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };
    result.map_err(|e| {
        PrintlinkerError::config_file(format!("Failed to initialize logging: {}", e))
    })?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn logging(file: Option<String>, rotation: bool) -> LoggingConfig {
        LoggingConfig {
            level: "info".to_string(),
            format: "text".to_string(),
            file,
            max_backups: 3,
            enable_rotation: rotation,
        }
    }

    #[test]
    fn test_plain_log_file_is_created() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs").join("app.log");
        let config = logging(Some(path.to_str().unwrap().to_string()), false);

        let mut writer = open_writer(&config).unwrap();
        writer.write_all(b"hello\n").unwrap();
        drop(writer);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_rotating_writer_creates_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rotated").join("app.log");
        let config = logging(Some(path.to_str().unwrap().to_string()), true);

        assert!(open_writer(&config).is_ok());
        assert!(dir.path().join("rotated").is_dir());
    }

    #[test]
    fn test_empty_file_means_console() {
        assert!(open_writer(&logging(Some(String::new()), true)).is_ok());
        assert!(open_writer(&logging(None, true)).is_ok());
    }
}
