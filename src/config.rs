use serde::Deserialize;
use std::fs;
use std::num::NonZeroU64;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigMode {
    Order,
    Reverse,
    Random,
    Best,
    Pick,
}

/// Tool defaults, overridden by explicit CLI flags
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) config: Option<PathBuf>,
    #[serde(default)]
    pub(crate) settings: Option<PathBuf>,
    #[serde(default)]
    pub(crate) mode: Option<ConfigMode>,
    #[serde(default)]
    pub(crate) timeout_secs: Option<NonZeroU64>,
}

impl Config {
    pub(crate) fn load() -> Self {
        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match Self::parse(&content) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "loaded tool config");
                        return config;
                    }
                    Err(e) => {
                        eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                    }
                }
            }
        }

        Self::default()
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/keyswitch/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("keyswitch").join("config.toml"));
        }

        // 2. Platform config dir (macOS Application Support, Windows AppData)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("keyswitch").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.keyswitch.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".keyswitch.toml"));
        }

        paths
    }
}

/// Credential file used when neither CLI nor tool config names one
pub(crate) fn default_credential_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".keyswitch")
        .join("provider.yml")
}

/// Consumer settings file used when neither CLI nor tool config names one
pub(crate) fn default_settings_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".qwen")
        .join("settings.json")
}
