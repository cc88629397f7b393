//! Config loading, TOML parsing, and env var override tests.
//!
//! Env var tests are `#[ignore]` (they mutate process state and conflict in
//! parallel). Run them with:
//! `cargo test --test config_tests -- --ignored --test-threads=1`

use std::env;
use std::fs;
use std::time::Duration;

use corpus_gateway::Config;
use tempfile::TempDir;

// Default Configuration Tests
#[test]
fn test_config_default_timeout() {
    let config = Config::default();
    assert_eq!(config.gateway.query_timeout(), Duration::from_secs(180));
}

#[test]
fn test_config_default_batch_and_window() {
    let config = Config::default();
    assert_eq!(config.gateway.default_batch, 20);
    assert_eq!(config.gateway.page_window, 5);
}

#[test]
fn test_config_default_kernel() {
    let config = Config::default();
    assert!(config.kernel.url.starts_with("http://"));
    assert_eq!(config.kernel.request_timeout(), None);
}

// File Loading Tests
#[test]
fn test_config_from_toml_file() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("gateway.toml");
    fs::write(
        &config_path,
        r#"
[gateway]
query_timeout_secs = 30
default_batch = 50
app_name = "bhsa"

[kernel]
url = "http://kernel:18981"
request_timeout_secs = 600

[interface]
showGraphics = true
fmt = "text-orig-full"

[logging]
level = "debug"
format = "json"

[http]
host = "0.0.0.0"
port = 9000
cors_allow_all = true
"#,
    )
    .unwrap();

    let config = Config::from_file(config_path.to_str().unwrap()).unwrap();
    assert_eq!(config.gateway.query_timeout(), Duration::from_secs(30));
    assert_eq!(config.gateway.default_batch, 50);
    assert_eq!(config.gateway.page_window, 5);
    assert_eq!(config.gateway.app_name, "bhsa");
    assert_eq!(config.kernel.url, "http://kernel:18981");
    assert_eq!(config.kernel.request_timeout(), Some(Duration::from_secs(600)));
    assert_eq!(config.interface.defaults.len(), 2);
    assert_eq!(
        config.interface.defaults["fmt"],
        serde_json::json!("text-orig-full")
    );
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.http.host, "0.0.0.0");
    assert_eq!(config.http.port, 9000);
    assert!(config.http.cors_allow_all);
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("absent.toml");

    let config = Config::from_file(config_path.to_str().unwrap()).unwrap();
    assert_eq!(config.gateway.query_timeout_secs, 180);
    assert_eq!(config.http.port, 8080);
}

#[test]
fn test_config_invalid_value_is_an_error() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("bad.toml");
    fs::write(&config_path, "[gateway]\nquery_timeout_secs = \"soon\"\n").unwrap();

    assert!(Config::from_file(config_path.to_str().unwrap()).is_err());
}

#[test]
fn test_config_zero_timeout_is_an_error() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("zero.toml");
    fs::write(&config_path, "[gateway]\nquery_timeout_secs = 0\n").unwrap();

    let err = Config::from_file(config_path.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("query_timeout_secs"));
}

// Environment Override Tests
#[test]
#[ignore = "Requires --test-threads=1 due to env mutation"]
fn test_config_env_override() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("gateway.toml");
    fs::write(&config_path, "[gateway]\nquery_timeout_secs = 30\n").unwrap();

    env::set_var("CORPUS_GATEWAY_GATEWAY__QUERY_TIMEOUT_SECS", "60");
    env::set_var("CORPUS_GATEWAY_KERNEL__URL", "http://other:1");
    let config = Config::from_file(config_path.to_str().unwrap());
    env::remove_var("CORPUS_GATEWAY_GATEWAY__QUERY_TIMEOUT_SECS");
    env::remove_var("CORPUS_GATEWAY_KERNEL__URL");

    let config = config.unwrap();
    assert_eq!(config.gateway.query_timeout_secs, 60);
    assert_eq!(config.kernel.url, "http://other:1");
}
