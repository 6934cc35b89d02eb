use crate::config::Config;
use crate::config::migrate::{migrate_config_file, missing_keys};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(path: &Path) -> AppResult<()> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        println!("{}", content);
        Ok(())
    }

    /// Report keys the file lacks. Returns true when it is up to date.
    pub fn check(path: &Path) -> AppResult<bool> {
        let missing = missing_keys(path)?;
        if missing.is_empty() {
            success(format!("{} is up to date.", path.display()));
            return Ok(true);
        }

        warning(format!(
            "{} is missing: {}",
            path.display(),
            missing.join(", ")
        ));
        info("Run `rollcall config --migrate` to add them with default values.");
        Ok(false)
    }

    pub fn migrate(path: &Path) -> AppResult<Vec<String>> {
        let added = migrate_config_file(path)?;
        if added.is_empty() {
            info("Nothing to migrate.");
        } else {
            success(format!("Added keys: {}", added.join(", ")));
        }
        Ok(added)
    }

    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        let ed = editor
            .map(str::to_string)
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| {
                if cfg!(target_os = "windows") {
                    "notepad".into()
                } else {
                    "nano".into()
                }
            });

        let status = Command::new(&ed)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(format!("cannot start {ed}: {e}")))?;

        if !status.success() {
            return Err(AppError::Config(format!("{ed} exited with {status}")));
        }

        // Reject edits that leave the file unreadable
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str::<Config>(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }
}
