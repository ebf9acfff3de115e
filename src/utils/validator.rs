use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::models::preferences::JobPreferences;

pub const EXPERIENCE_LEVELS: [&str; 6] = [
    "internship",
    "entry",
    "associate",
    "mid_senior_level",
    "director",
    "executive",
];

pub const JOB_TYPES: [&str; 7] = [
    "full_time",
    "contract",
    "part_time",
    "temporary",
    "internship",
    "other",
    "volunteer",
];

pub const DATE_FILTERS: [&str; 4] = ["all_time", "month", "week", "hours_24"];

pub const APPROVED_DISTANCES: [i64; 6] = [0, 5, 10, 25, 50, 100];

const BLACKLISTS: [&str; 3] = ["company_blacklist", "title_blacklist", "location_blacklist"];

const MANDATORY_SECRETS: [&str; 1] = ["llm_api_key"];

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading YAML file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading YAML file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("YAML file {} must contain a mapping at the top level", .path.display())]
    NotAMapping { path: PathBuf },

    #[error("Missing required key '{key}' in {}", .path.display())]
    MissingKey { key: String, path: PathBuf },

    #[error("Invalid type for key '{key}' in {}. Expected {expected}.", .path.display())]
    InvalidType {
        key: String,
        expected: &'static str,
        path: PathBuf,
    },

    #[error("{group} '{key}' must be a boolean in {}", .path.display())]
    InvalidFlag {
        group: &'static str,
        key: &'static str,
        path: PathBuf,
    },

    #[error("'{key}' must be a list of strings in {}", .path.display())]
    NotStringList { key: String, path: PathBuf },

    #[error(
        "Invalid distance value '{value}' in {}. Must be one of: {:?}",
        .path.display(),
        APPROVED_DISTANCES
    )]
    InvalidDistance { value: i64, path: PathBuf },

    #[error("Missing secret '{key}' in {}", .path.display())]
    MissingSecret { key: String, path: PathBuf },

    #[error("Secret '{key}' cannot be empty in {}", .path.display())]
    EmptySecret { key: String, path: PathBuf },

    #[error("Secret '{key}' must be a string, number or boolean in {}", .path.display())]
    InvalidSecret { key: String, path: PathBuf },

    #[error("Invalid job preferences in {}: {source}", .path.display())]
    Preferences {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Copy)]
enum Expected {
    Boolean,
    Mapping,
    List,
    Integer,
}

impl Expected {
    fn matches(self, value: &Value) -> bool {
        match self {
            Expected::Boolean => value.is_bool(),
            Expected::Mapping => value.is_mapping(),
            Expected::List => value.is_sequence(),
            Expected::Integer => value.is_i64(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Expected::Boolean => "boolean",
            Expected::Mapping => "mapping",
            Expected::List => "list",
            Expected::Integer => "integer",
        }
    }
}

const REQUIRED_CONFIG_KEYS: [(&str, Expected); 13] = [
    ("remote", Expected::Boolean),
    ("hybrid", Expected::Boolean),
    ("onsite", Expected::Boolean),
    ("experience_level", Expected::Mapping),
    ("job_types", Expected::Mapping),
    ("date", Expected::Mapping),
    ("positions", Expected::List),
    ("locations", Expected::List),
    ("apply_once_at_company", Expected::Boolean),
    ("distance", Expected::Integer),
    ("company_blacklist", Expected::List),
    ("title_blacklist", Expected::List),
    ("location_blacklist", Expected::List),
];

/// A job preferences document that passed [`ConfigValidator::validate_config`],
/// with blacklists normalized to lists.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    path: PathBuf,
    parameters: Mapping,
}

impl ValidatedConfig {
    pub fn parameters(&self) -> &Mapping {
        &self.parameters
    }

    pub fn into_preferences(self) -> Result<JobPreferences, ConfigError> {
        serde_yaml::from_value(Value::Mapping(self.parameters)).map_err(|source| {
            ConfigError::Preferences {
                path: self.path,
                source,
            }
        })
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate_email(email: &str) -> bool {
        EMAIL_REGEX.is_match(email)
    }

    fn load_yaml(path: &Path) -> Result<Mapping, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ConfigError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;

        if raw.trim().is_empty() {
            return Err(ConfigError::NotAMapping {
                path: path.to_path_buf(),
            });
        }

        match serde_yaml::from_str(&raw) {
            Ok(Value::Mapping(mapping)) => Ok(mapping),
            Ok(_) => Err(ConfigError::NotAMapping {
                path: path.to_path_buf(),
            }),
            Err(source) => Err(ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Validates the job preferences document at `path`.
    pub fn validate_config(path: &Path) -> Result<ValidatedConfig, ConfigError> {
        let mut parameters = Self::load_yaml(path)?;

        for (key, expected) in REQUIRED_CONFIG_KEYS {
            let is_blacklist = BLACKLISTS.contains(&key);

            let needs_default = match parameters.get(key) {
                None | Some(Value::Null) if is_blacklist => true,
                None => {
                    return Err(ConfigError::MissingKey {
                        key: key.to_string(),
                        path: path.to_path_buf(),
                    });
                }
                Some(value) if expected.matches(value) => false,
                Some(_) => {
                    return Err(ConfigError::InvalidType {
                        key: key.to_string(),
                        expected: expected.name(),
                        path: path.to_path_buf(),
                    });
                }
            };

            if needs_default {
                debug!("'{}' not set in {}, using an empty list", key, path.display());
                parameters.insert(Value::String(key.to_string()), Value::Sequence(Vec::new()));
            }
        }

        Self::validate_flags(&parameters, "experience_level", "Experience level", &EXPERIENCE_LEVELS, path)?;
        Self::validate_flags(&parameters, "job_types", "Job type", &JOB_TYPES, path)?;
        Self::validate_flags(&parameters, "date", "Date filter", &DATE_FILTERS, path)?;
        Self::validate_list_of_strings(&parameters, &["positions", "locations"], path)?;
        Self::validate_list_of_strings(&parameters, &BLACKLISTS, path)?;
        Self::validate_distance(&parameters, path)?;

        Ok(ValidatedConfig {
            path: path.to_path_buf(),
            parameters,
        })
    }

    fn validate_flags(
        parameters: &Mapping,
        key: &str,
        group: &'static str,
        members: &[&'static str],
        path: &Path,
    ) -> Result<(), ConfigError> {
        let flags = parameters.get(key).and_then(Value::as_mapping);

        for &member in members {
            let is_bool = flags
                .and_then(|flags| flags.get(member))
                .is_some_and(Value::is_bool);

            if !is_bool {
                return Err(ConfigError::InvalidFlag {
                    group,
                    key: member,
                    path: path.to_path_buf(),
                });
            }
        }

        Ok(())
    }

    fn validate_list_of_strings(
        parameters: &Mapping,
        keys: &[&str],
        path: &Path,
    ) -> Result<(), ConfigError> {
        for key in keys {
            let all_strings = parameters
                .get(*key)
                .and_then(Value::as_sequence)
                .is_some_and(|items| items.iter().all(Value::is_string));

            if !all_strings {
                return Err(ConfigError::NotStringList {
                    key: key.to_string(),
                    path: path.to_path_buf(),
                });
            }
        }

        Ok(())
    }

    fn validate_distance(parameters: &Mapping, path: &Path) -> Result<(), ConfigError> {
        let distance = parameters
            .get("distance")
            .and_then(Value::as_i64)
            .ok_or_else(|| ConfigError::InvalidType {
                key: "distance".to_string(),
                expected: Expected::Integer.name(),
                path: path.to_path_buf(),
            })?;

        if !APPROVED_DISTANCES.contains(&distance) {
            return Err(ConfigError::InvalidDistance {
                value: distance,
                path: path.to_path_buf(),
            });
        }

        Ok(())
    }

    /// Validates the secrets document and returns the LLM API key. Scalar
    /// values are accepted and read as text.
    pub fn validate_secrets(path: &Path) -> Result<String, ConfigError> {
        let secrets = Self::load_yaml(path)?;
        let mut api_key = String::new();

        for secret in MANDATORY_SECRETS {
            let Some(value) = secrets.get(secret) else {
                return Err(ConfigError::MissingSecret {
                    key: secret.to_string(),
                    path: path.to_path_buf(),
                });
            };

            let text = match value {
                Value::String(text) => text.clone(),
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                Value::Null => String::new(),
                _ => {
                    return Err(ConfigError::InvalidSecret {
                        key: secret.to_string(),
                        path: path.to_path_buf(),
                    });
                }
            };

            if text.trim().is_empty() {
                return Err(ConfigError::EmptySecret {
                    key: secret.to_string(),
                    path: path.to_path_buf(),
                });
            }

            if secret == "llm_api_key" {
                api_key = text;
            }
        }

        Ok(api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VALID_CONFIG: &str = r#"
remote: true
hybrid: false
onsite: true
experience_level:
  internship: false
  entry: true
  associate: true
  mid_senior_level: true
  director: false
  executive: false
job_types:
  full_time: true
  contract: false
  part_time: false
  temporary: true
  internship: false
  other: false
  volunteer: true
date:
  all_time: false
  month: false
  week: true
  hours_24: false
positions:
  - Software Engineer
  - Backend Developer
locations:
  - Germany
apply_once_at_company: true
distance: 100
company_blacklist:
  - Acme
title_blacklist: []
location_blacklist:
  - Remote-only
"#;

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).expect("write fixture");
        path
    }

    fn config_with(edit: impl FnOnce(&mut Mapping)) -> String {
        let mut mapping: Mapping = serde_yaml::from_str(VALID_CONFIG).expect("fixture parses");
        edit(&mut mapping);
        serde_yaml::to_string(&mapping).expect("fixture serializes")
    }

    fn validate(body: &str) -> Result<ValidatedConfig, ConfigError> {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "work_preferences.yaml", body);
        ConfigValidator::validate_config(&path)
    }

    #[test]
    fn accepts_complete_document() {
        let validated = validate(VALID_CONFIG).expect("valid config");
        let preferences = validated.into_preferences().expect("typed preferences");
        assert!(preferences.remote);
        assert_eq!(preferences.distance, 100);
        assert_eq!(preferences.company_blacklist, vec!["Acme".to_string()]);
    }

    #[test]
    fn every_required_key_is_reported_when_missing() {
        for (key, _) in REQUIRED_CONFIG_KEYS {
            if BLACKLISTS.contains(&key) {
                continue;
            }

            let body = config_with(|m| {
                m.remove(key);
            });
            match validate(&body) {
                Err(ConfigError::MissingKey { key: missing, .. }) => assert_eq!(missing, key),
                other => panic!("expected missing key '{key}', got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_or_null_blacklists_become_empty_lists() {
        let body = config_with(|m| {
            m.remove("company_blacklist");
            m.insert(Value::from("title_blacklist"), Value::Null);
        });
        let validated = validate(&body).expect("blacklists default");

        for key in BLACKLISTS {
            let value = validated.parameters().get(key).expect("key inserted");
            let expected = if key == "location_blacklist" { 1 } else { 0 };
            assert_eq!(value.as_sequence().map(Vec::len), Some(expected), "{key}");
        }
    }

    #[test]
    fn rejects_non_list_blacklist() {
        let body = config_with(|m| {
            m.insert(Value::from("title_blacklist"), Value::from("Manager"));
        });
        let err = validate(&body).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidType { ref key, .. } if key == "title_blacklist"));
    }

    #[test]
    fn rejects_wrong_container_type() {
        let body = config_with(|m| {
            m.insert(Value::from("positions"), Value::from("Software Engineer"));
        });
        let err = validate(&body).unwrap_err();
        assert!(err.to_string().contains("Invalid type for key 'positions'"));
        assert!(err.to_string().contains("Expected list"));
    }

    #[test]
    fn rejects_distances_outside_the_approved_set() {
        for distance in [1, 15, 99, 101, -5] {
            let body = config_with(|m| {
                m.insert(Value::from("distance"), Value::from(distance));
            });
            match validate(&body) {
                Err(ConfigError::InvalidDistance { value, .. }) => assert_eq!(value, distance),
                other => panic!("distance {distance} accepted: {other:?}"),
            }
        }

        for distance in APPROVED_DISTANCES {
            let body = config_with(|m| {
                m.insert(Value::from("distance"), Value::from(distance));
            });
            assert!(validate(&body).is_ok(), "distance {distance} rejected");
        }
    }

    #[test]
    fn experience_level_flags_must_be_booleans() {
        let body = config_with(|m| {
            let levels = m.get_mut("experience_level").and_then(Value::as_mapping_mut).unwrap();
            levels.insert(Value::from("director"), Value::from("yes"));
        });
        let err = validate(&body).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlag { key: "director", .. }));
        assert!(err.to_string().starts_with("Experience level 'director' must be a boolean"));
    }

    #[test]
    fn missing_job_type_flag_fails() {
        let body = config_with(|m| {
            let types = m.get_mut("job_types").and_then(Value::as_mapping_mut).unwrap();
            types.remove("volunteer");
        });
        let err = validate(&body).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlag { group: "Job type", key: "volunteer", .. }));
    }

    #[test]
    fn missing_date_filter_fails() {
        let body = config_with(|m| {
            let date = m.get_mut("date").and_then(Value::as_mapping_mut).unwrap();
            date.remove("hours_24");
        });
        assert!(matches!(
            validate(&body).unwrap_err(),
            ConfigError::InvalidFlag { group: "Date filter", key: "hours_24", .. }
        ));
    }

    #[test]
    fn locations_must_be_strings() {
        let body = config_with(|m| {
            m.insert(
                Value::from("locations"),
                Value::Sequence(vec![Value::from("Berlin"), Value::from(42)]),
            );
        });
        assert!(matches!(
            validate(&body).unwrap_err(),
            ConfigError::NotStringList { ref key, .. } if key == "locations"
        ));
    }

    #[test]
    fn error_names_the_file() {
        let dir = TempDir::new().unwrap();
        let body = config_with(|m| {
            m.remove("remote");
        });
        let path = write(&dir, "prefs.yaml", &body);
        let err = ConfigValidator::validate_config(&path).unwrap_err();
        assert!(err.to_string().contains("'remote'"));
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn non_mapping_and_missing_documents_fail() {
        assert!(matches!(validate("- a\n- b\n").unwrap_err(), ConfigError::NotAMapping { .. }));
        assert!(matches!(validate("").unwrap_err(), ConfigError::NotAMapping { .. }));
        assert!(matches!(validate("remote: [").unwrap_err(), ConfigError::Parse { .. }));

        let dir = TempDir::new().unwrap();
        let err = ConfigValidator::validate_config(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn secrets_require_a_non_empty_api_key() {
        let dir = TempDir::new().unwrap();

        let ok = write(&dir, "ok.yaml", "llm_api_key: sk-test\n");
        assert_eq!(ConfigValidator::validate_secrets(&ok).unwrap(), "sk-test");

        let missing = write(&dir, "missing.yaml", "other: value\n");
        assert!(matches!(
            ConfigValidator::validate_secrets(&missing).unwrap_err(),
            ConfigError::MissingSecret { .. }
        ));

        let empty = write(&dir, "empty.yaml", "llm_api_key: \"\"\n");
        assert!(matches!(
            ConfigValidator::validate_secrets(&empty).unwrap_err(),
            ConfigError::EmptySecret { .. }
        ));

        let null = write(&dir, "null.yaml", "llm_api_key:\n");
        assert!(matches!(
            ConfigValidator::validate_secrets(&null).unwrap_err(),
            ConfigError::EmptySecret { .. }
        ));
    }

    #[test]
    fn numeric_secrets_are_read_as_text() {
        let dir = TempDir::new().unwrap();

        let numeric = write(&dir, "numeric.yaml", "llm_api_key: 123456789\n");
        assert_eq!(ConfigValidator::validate_secrets(&numeric).unwrap(), "123456789");

        let listed = write(&dir, "listed.yaml", "llm_api_key: [a, b]\n");
        assert!(matches!(
            ConfigValidator::validate_secrets(&listed).unwrap_err(),
            ConfigError::InvalidSecret { .. }
        ));
    }

    #[test]
    fn email_validation() {
        assert!(ConfigValidator::validate_email("jane.doe+jobs@example.co.uk"));
        assert!(!ConfigValidator::validate_email("jane.doe@example"));
        assert!(!ConfigValidator::validate_email("not an email"));
    }
}
