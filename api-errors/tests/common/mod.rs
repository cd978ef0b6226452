use api_errors::config::{get_configuration, Config};
use secrecy::Secret;

pub const AUTH_TOKEN: &str = "integration-test-token";

pub fn test_config() -> anyhow::Result<Config> {
    let mut config = get_configuration()?;
    config.application.host = "127.0.0.1".to_string();
    config.application.port = 0;
    config.application.auth_token = Some(Secret::new(AUTH_TOKEN.to_string()));
    Ok(config)
}

pub fn bearer() -> String {
    format!("Bearer {AUTH_TOKEN}")
}
