use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

/// `<config dir>/jobtrack/config.json`, e.g. `~/.config/jobtrack/config.json`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("jobtrack").join("config.json"))
        .ok_or(ConfigError::NoConfigDirectory)
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

/// Parses JSON, or YAML when the document does not start with `{`.
pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = if content.trim_start().starts_with('{') {
        serde_json::from_str(content)?
    } else {
        serde_yaml::from_str(content)?
    };

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.output.path.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "output.path must not be empty".to_string(),
        });
    }

    for rule in &config.extraction.position_rules {
        if rule.title.trim().is_empty() {
            return Err(ConfigError::InvalidPositionRule {
                title: rule.title.clone(),
                reason: "Title must not be empty".to_string(),
            });
        }
        if rule.all_of.iter().any(|phrase| phrase.trim().is_empty()) {
            return Err(ConfigError::InvalidPositionRule {
                title: rule.title.clone(),
                reason: "Phrases must not be empty".to_string(),
            });
        }
    }

    if let Some(imap) = &config.mail.imap {
        if imap.port == 0 {
            return Err(ConfigError::Validation {
                message: "mail.imap.port must be between 1 and 65535".to_string(),
            });
        }
        if config.mail.eml_dir.is_some() {
            return Err(ConfigError::Validation {
                message: "mail.imap and mail.eml_dir are mutually exclusive".to_string(),
            });
        }
    }

    Ok(())
}
