//! Integration tests for logging system

use async_trait::async_trait;
use bridge_traits::error::Result as SinkResult;
use bridge_traits::time::{LogEntry, LogLevel, LoggerSink};
use core_runtime::logging::{
    init_logging, redact_if_sensitive, redact_url_query, LogFormat, LoggingConfig,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CollectingSink {
    entries: Mutex<Vec<LogEntry>>,
}

#[async_trait]
impl LoggerSink for CollectingSink {
    async fn log(&self, entry: LogEntry) -> SinkResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

#[test]
fn test_logging_initialization_once() {
    // Only one global subscriber per process; the second call must fail
    // instead of panicking.
    let sink = Arc::new(CollectingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Info)
        .with_logger_sink(sink.clone());

    assert!(init_logging(config).is_ok());

    tracing::info!(target: "core_playback::resolver", track_id = 7u64, "Track resolved");
    tracing::debug!(target: "core_playback::resolver", "Below configured level");

    let entries = sink.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "Track resolved");
    assert_eq!(entries[0].fields.get("track_id"), Some(&"7".to_string()));
    drop(entries);

    assert!(init_logging(LoggingConfig::default()).is_err());
}

#[test]
fn test_redaction_of_signed_urls() {
    let resolved = "https://m801.music.example/2026/a.mp3?vuutv=ZmFrZQ&authSecret=1";
    assert_eq!(
        redact_url_query(resolved),
        "https://m801.music.example/2026/a.mp3"
    );
    assert_eq!(redact_if_sensitive("authSecret", resolved), "[REDACTED]");
    assert_eq!(redact_if_sensitive("track_id", "42"), "42");
}

#[test]
fn test_format_selection() {
    #[cfg(debug_assertions)]
    {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[cfg(not(debug_assertions))]
    {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Json);
    }
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_filter("core_playback=debug,core_metadata=trace")
        .with_spans(false)
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert_eq!(
        config.filter,
        Some("core_playback=debug,core_metadata=trace".to_string())
    );
    assert!(!config.enable_spans);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
}
