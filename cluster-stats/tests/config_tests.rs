use cluster_stats::{
    AppConfig, DEFAULT_CLUSTER_NAME, FallbackPolicy, Utilization,
    bootstrap::fallback_policy, build_api_server_from_env,
};
use serial_test::serial;
use std::env;

const VARS: &[&str] = &[
    "SERVER_HOST",
    "PORT",
    "CLUSTER_NAME",
    "DEMO_FALLBACK",
    "LOG_LEVEL",
    "LOG_FORMAT",
];

fn clear_env() {
    for var in VARS {
        unsafe {
            env::remove_var(var);
        }
    }
}

#[test]
#[serial]
fn test_default_config_values() {
    clear_env();

    let config = AppConfig::load_from_env()
        .expect("Failed to load config with defaults");

    assert_eq!(config.server_host, "0.0.0.0");
    assert_eq!(config.server_port, 3000);
    assert_eq!(config.cluster_name(), DEFAULT_CLUSTER_NAME);
    assert_eq!(config.log_level, "info");
    assert!(config.demo_fallback);
}

#[test]
#[serial]
fn test_config_loading_from_env() {
    clear_env();
    unsafe {
        env::set_var("SERVER_HOST", "127.0.0.1");
        env::set_var("PORT", "8081");
        env::set_var("CLUSTER_NAME", "edge-lab");
        env::set_var("DEMO_FALLBACK", "false");
        env::set_var("LOG_FORMAT", "json");
    }

    let config =
        AppConfig::load_from_env().expect("Failed to load config from env");

    assert_eq!(config.server().host, "127.0.0.1");
    assert_eq!(config.server().port, 8081);
    assert_eq!(config.cluster_name(), "edge-lab");
    assert!(!config.demo_fallback);
    assert!(config.logging().json_format);

    let policy = fallback_policy(&config);
    assert_eq!(policy.cpu_usage(), Utilization::Unavailable);
    assert!(policy.snapshot().is_none());

    clear_env();
}

#[test]
#[serial]
fn test_invalid_port_is_rejected() {
    clear_env();
    unsafe {
        env::set_var("PORT", "not-a-port");
    }

    assert!(AppConfig::load_from_env().is_err());
    assert!(build_api_server_from_env().is_err());

    clear_env();
}
