use factq::config::{Config, DEFAULT_OUTPUT, parse_worker_count};
use std::path::PathBuf;

#[test]
fn config_from_env_defaults_and_overrides() {
    unsafe {
        std::env::remove_var("FACTQ_OUTPUT");
    }
    let config = Config::from_env().unwrap();
    assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT));
    assert!(!config.log_level.is_empty());

    unsafe {
        std::env::set_var("FACTQ_OUTPUT", "/tmp/factq-results.txt");
    }
    let config = Config::from_env().unwrap();
    assert_eq!(config.output_path, PathBuf::from("/tmp/factq-results.txt"));

    unsafe {
        std::env::set_var("FACTQ_OUTPUT", "  ");
    }
    assert!(Config::from_env().is_err());

    // Clean up
    unsafe {
        std::env::remove_var("FACTQ_OUTPUT");
    }
}

#[test]
fn cli_output_overrides_config() {
    let config = Config {
        output_path: PathBuf::from(DEFAULT_OUTPUT),
        otel_endpoint: None,
        log_level: "info".to_string(),
    };
    let config = config.with_output(Some(PathBuf::from("elsewhere.txt")));
    assert_eq!(config.output_path, PathBuf::from("elsewhere.txt"));
    let config = config.with_output(None);
    assert_eq!(config.output_path, PathBuf::from("elsewhere.txt"));
}

#[test]
fn worker_count_must_be_positive() {
    assert_eq!(parse_worker_count(4).unwrap().get(), 4);
    assert!(parse_worker_count(0).is_err());
    assert!(parse_worker_count(-2).is_err());
}
