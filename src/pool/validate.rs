//! Shape checks for the credential file
//!
//! Runs on the raw YAML value before typed decoding so the user gets the
//! name of the first offending field instead of a serde message.

use serde_yaml::Value;

use crate::error::ConfigError;

const REQUIRED_STRING_FIELDS: &[&str] = &["base_url"];
const OPTIONAL_STRING_FIELDS: &[&str] = &["balance_url", "balance_field", "model_name"];

/// Validate the whole document. Stops at the first problem.
pub(crate) fn validate(doc: &Value) -> Result<(), ConfigError> {
    let provider = doc
        .as_mapping()
        .and_then(|root| root.get("provider"))
        .ok_or(ConfigError::MissingProviderRoot)?;

    let providers = provider
        .as_mapping()
        .ok_or(ConfigError::ProviderNotMapping)?;

    for (name, entry) in providers {
        let name = name.as_str().ok_or(ConfigError::ProviderNameNotString)?;
        validate_provider(name, entry)?;
    }

    Ok(())
}

fn validate_provider(name: &str, entry: &Value) -> Result<(), ConfigError> {
    match entry {
        Value::Sequence(keys) => validate_keys(name, keys),
        Value::Mapping(map) => {
            for &field in REQUIRED_STRING_FIELDS {
                match map.get(field) {
                    None => {
                        return Err(ConfigError::MissingField {
                            provider: name.to_string(),
                            field,
                        });
                    }
                    Some(v) if !v.is_string() => {
                        return Err(ConfigError::FieldNotString {
                            provider: name.to_string(),
                            field: field.to_string(),
                        });
                    }
                    Some(_) => {}
                }
            }

            for &field in OPTIONAL_STRING_FIELDS {
                if let Some(v) = map.get(field)
                    && !v.is_string()
                {
                    return Err(ConfigError::FieldNotString {
                        provider: name.to_string(),
                        field: field.to_string(),
                    });
                }
            }

            match map.get("api_keys") {
                None => Err(ConfigError::MissingField {
                    provider: name.to_string(),
                    field: "api_keys",
                }),
                Some(Value::Sequence(keys)) => validate_keys(name, keys),
                Some(_) => Err(ConfigError::KeysNotList {
                    provider: name.to_string(),
                }),
            }
        }
        _ => Err(ConfigError::ProviderShape {
            provider: name.to_string(),
        }),
    }
}

fn validate_keys(name: &str, keys: &[Value]) -> Result<(), ConfigError> {
    if keys.iter().all(Value::is_string) {
        Ok(())
    } else {
        Err(ConfigError::KeyNotString {
            provider: name.to_string(),
        })
    }
}
