use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BALANCE_FIELD, DEFAULT_MODEL_NAME};

use super::presets::find_preset;

/// Nested provider entry: endpoint settings plus its keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ProviderSettings {
    pub(crate) base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) balance_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) balance_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) model_name: Option<String>,
    #[serde(default)]
    pub(crate) api_keys: Vec<String>,
    /// Fields we do not interpret, written back untouched
    #[serde(flatten)]
    pub(crate) extra: serde_yaml::Mapping,
}

/// One provider as it appears in the credential file.
///
/// Both shapes may coexist in one file; each is written back in the shape it
/// was read in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProviderEntry {
    /// `name: [key, ...]`
    Flat(Vec<String>),
    /// `name: { base_url, api_keys, ... }`
    Nested(ProviderSettings),
}

/// Where and how to check a provider's keys
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Endpoint {
    pub(crate) base_url: Option<String>,
    pub(crate) balance_url: Option<String>,
    pub(crate) balance_field: String,
    pub(crate) model_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Provider {
    pub(crate) name: String,
    pub(crate) entry: ProviderEntry,
}

impl Provider {
    pub(crate) fn keys(&self) -> &[String] {
        match &self.entry {
            ProviderEntry::Flat(keys) => keys,
            ProviderEntry::Nested(settings) => &settings.api_keys,
        }
    }

    fn keys_mut(&mut self) -> &mut Vec<String> {
        match &mut self.entry {
            ProviderEntry::Flat(keys) => keys,
            ProviderEntry::Nested(settings) => &mut settings.api_keys,
        }
    }

    /// Remove the first occurrence of `key`. Returns whether one was found.
    ///
    /// Duplicates are separate candidates, so each invalid check removes
    /// exactly one copy.
    pub(crate) fn remove_key(&mut self, key: &str) -> bool {
        let keys = self.keys_mut();
        match keys.iter().position(|k| k == key) {
            Some(index) => {
                keys.remove(index);
                true
            }
            None => false,
        }
    }

    /// Resolve the endpoint, falling back to a built-in preset for flat entries.
    pub(crate) fn endpoint(&self) -> Endpoint {
        match &self.entry {
            ProviderEntry::Nested(s) => Endpoint {
                base_url: Some(s.base_url.clone()),
                balance_url: s.balance_url.clone(),
                balance_field: s
                    .balance_field
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BALANCE_FIELD.to_string()),
                model_name: s
                    .model_name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            },
            ProviderEntry::Flat(_) => match find_preset(&self.name) {
                Some(preset) => Endpoint {
                    base_url: Some(preset.base_url.to_string()),
                    balance_url: preset.balance_url.map(str::to_string),
                    balance_field: preset.balance_field.to_string(),
                    model_name: preset.model_name.to_string(),
                },
                None => Endpoint {
                    base_url: None,
                    balance_url: None,
                    balance_field: DEFAULT_BALANCE_FIELD.to_string(),
                    model_name: DEFAULT_MODEL_NAME.to_string(),
                },
            },
        }
    }
}

/// A single key ready to be checked
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Candidate {
    pub(crate) provider: String,
    pub(crate) key: String,
    pub(crate) endpoint: Endpoint,
}
