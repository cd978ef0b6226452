use std::path::PathBuf;

use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Config {
    pub application: ApplicationConfig,
    pub projects: ProjectsConfig,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationConfig {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub auth_token: Option<Secret<String>>,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ProjectsConfig {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_projects: usize,
}

pub fn get_configuration() -> Result<Config, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("current directory: {e}")))?;
    get_configuration_with(base_path.join("config"))
}

pub fn get_configuration_with(
    configuration_directory: impl Into<PathBuf>,
) -> Result<Config, config::ConfigError> {
    let configuration_directory = configuration_directory.into();

    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_APPLICATION__PORT=5001 would set `Settings.application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Config>()
}

/// The possible runtime environment for our application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!(
            Environment::try_from("Production".to_string()),
            Ok(Environment::Production)
        );
        assert!(Environment::try_from("staging".to_string()).is_err());
    }

    #[test]
    fn loads_local_configuration() {
        let config = get_configuration_with(
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config"),
        )
        .unwrap();
        assert_eq!(config.application.host, "127.0.0.1");
        assert_eq!(config.projects.max_projects, 100);
        assert_eq!(
            config
                .application
                .auth_token
                .as_ref()
                .map(|t| t.expose_secret().as_str()),
            Some("local-dev-token")
        );
    }
}
