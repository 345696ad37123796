use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::domain::DomainError;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub maxkb: MaxKbConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream MaxKB deployment, resolved once when the client is built
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MaxKbConfig {
    pub base_url: String,
    pub api_key: String,
    pub workspace_id: String,
    pub api_version: ApiVersion,
    /// Overrides the `{base_url}/admin/api` root
    pub api_root: Option<String>,
}

/// Upstream API generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum ApiVersion {
    /// Dataset-centric API
    #[default]
    V1,
    /// Workspace-scoped API
    V2,
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
        }
    }
}

impl TryFrom<String> for ApiVersion {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for ApiVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            _ => Err(DomainError::configuration(format!(
                "Unknown MaxKB API version '{}': expected 'v1' or 'v2'",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for MaxKbConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_key: String::new(),
            workspace_id: "default".to_string(),
            api_version: ApiVersion::default(),
            api_root: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl MaxKbConfig {
    /// Root every upstream path is appended to
    pub fn api_root(&self) -> String {
        match self.api_root.as_deref().map(str::trim) {
            Some(root) if !root.is_empty() => root.trim_end_matches('/').to_string(),
            _ => format!("{}/admin/api", self.base_url.trim().trim_end_matches('/')),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.base_url.trim().is_empty() && self.api_root.is_none() {
            return Err(DomainError::configuration("MaxKB base URL is not set"));
        }

        if self.api_key.trim().is_empty() {
            return Err(DomainError::configuration(
                "MaxKB API key is not set (MAXKB_API_KEY)",
            ));
        }

        Ok(())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("maxkb.base_url", env_var("MAXKB_BASE_URL"))?
            .set_override_option("maxkb.api_key", env_var("MAXKB_API_KEY"))?
            .set_override_option("maxkb.workspace_id", env_var("MAXKB_WORKSPACE_ID"))?
            .set_override_option("maxkb.api_version", env_var("MAXKB_API_VERSION"))?
            .build()?;

        config.try_deserialize()
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
