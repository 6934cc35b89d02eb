use super::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys every up-to-date configuration file carries, with their defaults.
fn default_mapping() -> AppResult<Mapping> {
    let value = serde_yaml::to_value(Config::default())?;
    match value {
        Value::Mapping(map) => Ok(map),
        _ => Err(AppError::Config("default configuration is not a mapping".into())),
    }
}

fn read_mapping(conf_file: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(conf_file).map_err(|_| AppError::ConfigLoad)?;
    match serde_yaml::from_str::<Value>(&content)? {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(format!(
            "{} does not contain a YAML mapping",
            conf_file.display()
        ))),
    }
}

/// Return the configuration keys missing from `conf_file`, in declaration order.
pub fn missing_keys(conf_file: &Path) -> AppResult<Vec<String>> {
    let current = read_mapping(conf_file)?;

    Ok(default_mapping()?
        .keys()
        .filter(|k| !current.contains_key(*k))
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect())
}

/// Add every missing key with its default value, leaving existing values
/// untouched. Returns the keys that were added.
pub fn migrate_config_file(conf_file: &Path) -> AppResult<Vec<String>> {
    let mut current = read_mapping(conf_file)?;
    let mut added = Vec::new();

    for (key, value) in default_mapping()? {
        if !current.contains_key(&key) {
            if let Some(name) = key.as_str() {
                added.push(name.to_string());
            }
            current.insert(key, value);
        }
    }

    if added.is_empty() {
        return Ok(added);
    }

    let serialized = serde_yaml::to_string(&Value::Mapping(current))?;

    // Document the attendance cutoffs right where they are declared
    let mut new_content = String::new();
    for line in serialized.lines() {
        new_content.push_str(line);
        new_content.push('\n');

        if line.starts_with("on_time_until:") {
            new_content.push_str("# taps up to this time are 'present', later ones 'late'\n");
        } else if line.starts_with("checkout_from:") {
            new_content.push_str("# a second tap from this time on records the check-out\n");
        }
    }

    fs::write(conf_file, new_content)?;
    Ok(added)
}
