use std::path::PathBuf;
use std::time::Duration;
use tailorbook_core::config::DEFAULT_BUSY_TIMEOUT_MS;
use tailorbook_core::{LogConfig, StoreConfig, StoreLocation};

#[test]
fn store_config_parses_file_location_with_default_timeout() {
    let config: StoreConfig =
        serde_json::from_str(r#"{"location":{"mode":"file","path":"/data/tailorbook.db"}}"#)
            .unwrap();

    assert_eq!(
        config.location,
        StoreLocation::File {
            path: PathBuf::from("/data/tailorbook.db")
        }
    );
    assert_eq!(config.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
}

#[test]
fn store_config_parses_memory_location_and_custom_timeout() {
    let config: StoreConfig =
        serde_json::from_str(r#"{"location":{"mode":"memory"},"busy_timeout_ms":250}"#).unwrap();

    assert_eq!(config, StoreConfig {
        location: StoreLocation::Memory,
        busy_timeout_ms: 250,
    });
    assert_eq!(config.busy_timeout(), Duration::from_millis(250));
}

#[test]
fn store_config_rejects_unknown_mode() {
    let result = serde_json::from_str::<StoreConfig>(r#"{"location":{"mode":"cloud"}}"#);
    assert!(result.is_err());
}

#[test]
fn log_config_fills_rotation_defaults() {
    let parsed: LogConfig =
        serde_json::from_str(r#"{"level":"debug","log_dir":"/tmp/tailorbook-logs"}"#).unwrap();

    assert_eq!(parsed, LogConfig::new("debug", "/tmp/tailorbook-logs"));
    assert!(parsed.max_file_size_bytes > 0);
    assert!(parsed.max_files > 0);
}
