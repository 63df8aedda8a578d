//! Logging Tests

use tracing::Level;
use weft_domain::error::Error;
use weft_infrastructure::constants::DEFAULT_LOG_LEVEL;
use weft_infrastructure::logging::{LoggingConfig, init_logging, parse_log_level};

#[test]
fn test_parse_log_level() {
    assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
    assert_eq!(parse_log_level("INFO").unwrap(), Level::INFO);
    assert_eq!(parse_log_level("warn").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("error").unwrap(), Level::ERROR);

    assert!(parse_log_level("invalid").is_err());
}

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, DEFAULT_LOG_LEVEL);
    assert!(!config.json_format);
}

#[test]
fn test_init_logging_rejects_invalid_level() {
    let config = LoggingConfig {
        level: "loud".to_string(),
        json_format: false,
    };

    match init_logging(&config) {
        Err(Error::Configuration { message, .. }) => assert!(message.contains("loud")),
        _ => panic!("Expected Configuration error"),
    }
}

#[test]
fn test_init_logging_twice_reports_error() {
    let config = LoggingConfig::default();

    // whichever call loses the race for the global subscriber fails
    let first = init_logging(&config);
    let second = init_logging(&config);

    assert!(first.is_err() || second.is_err());
}
