//! Loading and saving the credential file

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::backup::backup_file;
use crate::error::{AppError, ConfigError};

use super::types::{Candidate, Provider, ProviderEntry, ProviderSettings};
use super::validate::validate;

const PLACEHOLDER_KEY: &str = "sk-your-api-key-here";

/// The credential file held in memory for one run
#[derive(Debug)]
pub(crate) struct CredentialFile {
    path: PathBuf,
    /// Root mapping as read, so unrelated top-level keys survive a save
    root: Mapping,
    providers: Vec<Provider>,
}

impl CredentialFile {
    pub(crate) fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, AppError> {
        let yaml_err = |source: serde_yaml::Error| AppError::Yaml {
            path: path.to_path_buf(),
            source,
        };

        let doc: Value = serde_yaml::from_str(content).map_err(yaml_err)?;
        validate(&doc)?;

        let Value::Mapping(root) = doc else {
            return Err(ConfigError::MissingProviderRoot.into());
        };

        let mut providers = Vec::new();
        if let Some(Value::Mapping(entries)) = root.get("provider") {
            for (name, entry) in entries {
                let name = name.as_str().unwrap_or_default().to_string();
                let entry: ProviderEntry =
                    serde_yaml::from_value(entry.clone()).map_err(yaml_err)?;
                providers.push(Provider { name, entry });
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            root,
            providers,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub(crate) fn key_count(&self) -> usize {
        self.providers.iter().map(|p| p.keys().len()).sum()
    }

    /// Every key in file order, paired with its provider's endpoint
    pub(crate) fn candidates(&self) -> Vec<Candidate> {
        self.providers
            .iter()
            .flat_map(|provider| {
                let endpoint = provider.endpoint();
                provider.keys().iter().map(move |key| Candidate {
                    provider: provider.name.clone(),
                    key: key.clone(),
                    endpoint: endpoint.clone(),
                })
            })
            .collect()
    }

    /// Remove one copy of `key` from `provider`. Returns whether anything changed.
    pub(crate) fn remove_key(&mut self, provider: &str, key: &str) -> bool {
        self.providers
            .iter_mut()
            .find(|p| p.name == provider)
            .is_some_and(|p| p.remove_key(key))
    }

    fn to_yaml(&self) -> Result<String, AppError> {
        let yaml_err = |source: serde_yaml::Error| AppError::Yaml {
            path: self.path.clone(),
            source,
        };

        let mut providers = Mapping::new();
        for provider in &self.providers {
            let entry = serde_yaml::to_value(&provider.entry).map_err(yaml_err)?;
            providers.insert(Value::String(provider.name.clone()), entry);
        }

        let mut root = self.root.clone();
        root.insert(Value::String("provider".to_string()), Value::Mapping(providers));
        serde_yaml::to_string(&root).map_err(yaml_err)
    }

    /// Back up the file on disk, then overwrite it with the in-memory state.
    pub(crate) fn save(&self) -> Result<Option<PathBuf>, AppError> {
        let yaml = self.to_yaml()?;
        let backup = backup_file(&self.path)?;
        fs::write(&self.path, yaml).map_err(|e| AppError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), "credential file written");
        Ok(backup)
    }
}

/// Write a starter credential file with a placeholder key.
pub(crate) fn write_default(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
    }

    let mut providers = Mapping::new();
    let siliconflow = ProviderEntry::Nested(ProviderSettings {
        base_url: "https://api.siliconflow.cn/v1".to_string(),
        balance_url: Some("https://api.siliconflow.cn/v1/user/info".to_string()),
        balance_field: Some("data.balance".to_string()),
        model_name: Some("zai-org/GLM-4.6".to_string()),
        api_keys: vec![PLACEHOLDER_KEY.to_string()],
        extra: Mapping::new(),
    });
    let yaml_err = |source: serde_yaml::Error| AppError::Yaml {
        path: path.to_path_buf(),
        source,
    };
    providers.insert(
        Value::String("siliconflow".to_string()),
        serde_yaml::to_value(&siliconflow).map_err(yaml_err)?,
    );
    let mut root = Mapping::new();
    root.insert(Value::String("provider".to_string()), Value::Mapping(providers));

    let yaml = serde_yaml::to_string(&root).map_err(yaml_err)?;
    fs::write(path, yaml).map_err(|e| AppError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MIXED: &str = r#"
owner: me
provider:
  mirror:
  - sk-flat-1
  - sk-flat-2
  custom:
    base_url: https://llm.example.com/v1
    model_name: qwen3-coder
    note: keep me
    api_keys:
    - sk-nested-1
    - sk-nested-2
    - sk-nested-3
"#;

    fn write_pool(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("provider.yml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_keeps_provider_order_and_shapes() {
        let dir = TempDir::new().unwrap();
        let file = CredentialFile::load(&write_pool(&dir, MIXED)).unwrap();

        let names: Vec<_> = file.providers().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["mirror", "custom"]);
        assert!(matches!(file.providers()[0].entry, ProviderEntry::Flat(_)));
        assert!(matches!(file.providers()[1].entry, ProviderEntry::Nested(_)));
        assert_eq!(file.key_count(), 5);
    }

    #[test]
    fn candidates_follow_file_order() {
        let dir = TempDir::new().unwrap();
        let file = CredentialFile::load(&write_pool(&dir, MIXED)).unwrap();
        let keys: Vec<_> = file.candidates().into_iter().map(|c| c.key).collect();
        assert_eq!(
            keys,
            ["sk-flat-1", "sk-flat-2", "sk-nested-1", "sk-nested-2", "sk-nested-3"]
        );
        assert_eq!(file.candidates()[2].endpoint.model_name, "qwen3-coder");
    }

    #[test]
    fn load_rejects_invalid_shape() {
        let dir = TempDir::new().unwrap();
        let path = write_pool(&dir, "provider:\n  custom:\n    api_keys: [a]\n");
        let err = CredentialFile::load(&path).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn load_rejects_malformed_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write_pool(&dir, "provider: [unclosed\n");
        assert!(matches!(
            CredentialFile::load(&path).unwrap_err(),
            AppError::Yaml { .. }
        ));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = CredentialFile::load(&dir.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }

    #[test]
    fn save_removes_keys_and_preserves_everything_else() {
        let dir = TempDir::new().unwrap();
        let path = write_pool(&dir, MIXED);
        let mut file = CredentialFile::load(&path).unwrap();

        assert!(file.remove_key("mirror", "sk-flat-1"));
        assert!(file.remove_key("custom", "sk-nested-2"));
        assert!(!file.remove_key("custom", "sk-unknown"));
        assert!(!file.remove_key("missing", "sk-flat-2"));

        let backup = file.save().unwrap().expect("backup created");
        assert_eq!(fs::read_to_string(&backup).unwrap(), MIXED);

        let reloaded = CredentialFile::load(&path).unwrap();
        assert_eq!(reloaded.key_count(), 3);
        let keys: Vec<_> = reloaded.candidates().into_iter().map(|c| c.key).collect();
        assert_eq!(keys, ["sk-flat-2", "sk-nested-1", "sk-nested-3"]);

        let raw: Value = serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["owner"].as_str(), Some("me"));
        assert_eq!(raw["provider"]["custom"]["note"].as_str(), Some("keep me"));
        assert!(raw["provider"]["mirror"].is_sequence());
    }

    #[test]
    fn emptied_provider_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = write_pool(&dir, "provider:\n  mirror:\n  - only\n");
        let mut file = CredentialFile::load(&path).unwrap();
        file.remove_key("mirror", "only");
        file.save().unwrap();

        let reloaded = CredentialFile::load(&path).unwrap();
        assert_eq!(reloaded.providers().len(), 1);
        assert_eq!(reloaded.key_count(), 0);
    }

    #[test]
    fn write_default_creates_loadable_template() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("provider.yml");
        write_default(&path).unwrap();

        let file = CredentialFile::load(&path).unwrap();
        assert_eq!(file.providers().len(), 1);
        assert_eq!(file.providers()[0].keys(), [PLACEHOLDER_KEY.to_string()]);
    }
}
