//! Logging config and utilities
//!
//! This module is only used by the main binary and provides logging config structures and setup
//! helper functions

mod defaults;
mod log_rotation_kind;
mod parsers;

use log_rotation_kind::LogRotationKind;
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Logging related options
#[derive(Debug, Deserialize, JsonSchema)]
pub struct Logging {
    /// The log level to use for tracing
    #[serde(
        default = "defaults::log_level",
        deserialize_with = "parsers::from_str"
    )]
    #[schemars(schema_with = "super::schemas::level")]
    pub level: Level,

    /// A directory to write log files to. Logs go to stderr when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Log file rotation period to use when log file path provided
    /// [default: Hourly]
    #[serde(default = "defaults::rotation")]
    pub rotation: LogRotationKind,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            path: None,
            rotation: defaults::rotation(),
        }
    }
}

impl Logging {
    pub fn env_filter(&self) -> Result<EnvFilter, anyhow::Error> {
        let mut env_filter = EnvFilter::from_default_env().add_directive(self.level.into());

        if self.level == Level::INFO {
            env_filter = env_filter.add_directive("rmcp=warn".parse()?);
        }
        Ok(env_filter)
    }

    /// Install the global subscriber. The returned guard must be held until exit so that
    /// buffered file output is flushed.
    pub fn init(&self) -> Result<Option<WorkerGuard>, anyhow::Error> {
        let (writer, guard, with_ansi) = self
            .path
            .as_ref()
            .and_then(|path| self.file_writer(path))
            .map(|(writer, guard)| (writer, Some(guard), false))
            // stdout carries MCP messages in stdio mode
            .unwrap_or_else(|| (BoxMakeWriter::new(std::io::stderr), None, true));

        tracing_subscriber::registry()
            .with(self.env_filter()?)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(with_ansi)
                    .with_target(false),
            )
            .init();

        Ok(guard)
    }

    fn file_writer(&self, path: &Path) -> Option<(BoxMakeWriter, WorkerGuard)> {
        macro_rules! log_error {
            () => {
                |e| eprintln!("Failed to setup logging: {e:?}")
            };
        }

        let writer = std::fs::create_dir_all(path)
            .inspect_err(log_error!())
            .ok()
            .and_then(|_| {
                RollingFileAppender::builder()
                    .rotation(self.rotation.into())
                    .filename_prefix("subgraph_inspector")
                    .filename_suffix("log")
                    .build(path)
                    .inspect_err(log_error!())
                    .ok()
            })
            .map(|appender| {
                let (non_blocking_appender, guard) = tracing_appender::non_blocking(appender);
                (BoxMakeWriter::new(non_blocking_appender), guard)
            });

        if writer.is_none() {
            eprintln!("Log file setup failed - falling back to stderr");
        }
        writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_defaults_to_hourly_info_logs_on_stderr() {
        let logging: Logging = serde_json::from_str("{}").unwrap();

        assert_eq!(logging.level, Level::INFO);
        assert_eq!(logging.path, None);
        assert_eq!(logging.rotation, LogRotationKind::Hourly);
    }

    #[test]
    fn info_level_quiets_the_mcp_library() {
        let filter = Logging::default().env_filter().unwrap().to_string();

        assert!(filter.contains("rmcp=warn"));
    }

    #[test]
    fn other_levels_leave_the_mcp_library_alone() {
        let logging = Logging {
            level: Level::DEBUG,
            ..Default::default()
        };

        assert!(!logging.env_filter().unwrap().to_string().contains("rmcp"));
    }

    #[test]
    fn unwritable_paths_fall_back_to_stderr() {
        let file = std::env::temp_dir().join("subgraph_inspector_not_a_directory");
        std::fs::write(&file, "").unwrap();

        assert!(Logging::default().file_writer(&file).is_none());
        std::fs::remove_file(file).unwrap();
    }
}
