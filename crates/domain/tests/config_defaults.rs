use rv_domain::config::{Config, ConfigSeverity, MappingBackend};

#[test]
fn default_host_is_localhost() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3400);
}

#[test]
fn default_mapping_backend_is_redis() {
    let config = Config::default();
    assert_eq!(config.mapping_store.backend, MappingBackend::Redis);
    assert_eq!(config.mapping_store.mapping_ttl_days, 30);
    assert_eq!(config.mapping_store.reregistration_ttl_days, 7);
}

#[test]
fn default_datastore_timeout_is_thirty_seconds() {
    let config = Config::default();
    assert_eq!(config.datastore.timeout_ms, 30_000);
    assert_eq!(config.datastore.owner_column, "user_id");
}

#[test]
fn default_config_validates_cleanly() {
    let config = Config::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "default config should have no issues: {errors:?}"
    );
}

#[test]
fn memory_backend_parses() {
    let toml_str = r#"
[mapping_store]
backend = "memory"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.mapping_store.backend, MappingBackend::Memory);
}

#[test]
fn zero_port_is_an_error() {
    let toml_str = r#"
[server]
port = 0
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.severity == ConfigSeverity::Error && e.field == "server.port"));
}

#[test]
fn zero_mapping_ttl_is_an_error() {
    let toml_str = r#"
[mapping_store]
mapping_ttl_days = 0
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.field == "mapping_store.mapping_ttl_days"));
}

#[test]
fn cors_wildcard_is_a_warning() {
    let toml_str = r#"
[server.cors]
allowed_origins = ["*"]
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.severity == ConfigSeverity::Warning
            && e.field == "server.cors.allowed_origins"));
}

#[test]
fn token_env_defaults() {
    let config = Config::default();
    assert_eq!(config.server.api_token_env, "RV_API_TOKEN");
    assert_eq!(config.server.admin_token_env, "RV_ADMIN_TOKEN");
    assert_eq!(config.directory.secret_key_env, "RV_DIRECTORY_SECRET_KEY");
    assert_eq!(config.datastore.service_key_env, "RV_DATASTORE_SERVICE_KEY");
}
