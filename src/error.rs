use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Config file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} must contain a JSON object", path.display())]
    SettingsNotObject { path: PathBuf },

    #[error("Invalid config format: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("No valid API key found")]
    NoValidKey,

    #[error("No backups found for {}", path.display())]
    NoBackups { path: PathBuf },

    #[error("Invalid selection '{input}': expected a number from 1 to {max}")]
    InvalidChoice { input: String, max: usize },

    #[error("Failed to read selection: {0}")]
    Prompt(#[source] std::io::Error),
}

impl AppError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

/// First offending field found while validating the credential file.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ConfigError {
    #[error("missing 'provider' root key")]
    MissingProviderRoot,

    #[error("'provider' must be a mapping")]
    ProviderNotMapping,

    #[error("provider names must be strings")]
    ProviderNameNotString,

    #[error("'{provider}' must be a list of keys or a mapping")]
    ProviderShape { provider: String },

    #[error("'{provider}' is missing required field '{field}'")]
    MissingField { provider: String, field: &'static str },

    #[error("'{provider}.{field}' must be a string")]
    FieldNotString { provider: String, field: String },

    #[error("'{provider}.api_keys' must be a list")]
    KeysNotList { provider: String },

    #[error("API keys of '{provider}' must all be strings")]
    KeyNotString { provider: String },
}
