//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::defaults::MAX_WORKERS_LIMIT;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.output.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("combined_file") {
            let v = v.trim();
            if !v.is_empty() {
                config.output.combined_file = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("naming") {
            config.output.naming = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "output".to_string(),
                key: "naming".to_string(),
                value: v.to_string(),
                reason: "must be one of: element, index".to_string(),
            })?;
        }
    }

    // [workers] section
    if let Some(section) = ini.section(Some("workers")) {
        if let Some(v) = section.get("max_workers") {
            let v = v.trim();
            let parsed = if v.eq_ignore_ascii_case("auto") || v.is_empty() {
                Some(0)
            } else {
                v.parse::<usize>().ok().filter(|n| *n <= MAX_WORKERS_LIMIT)
            };
            config.workers.max_workers = parsed.ok_or_else(|| ConfigFileError::InvalidValue {
                section: "workers".to_string(),
                key: "max_workers".to_string(),
                value: v.to_string(),
                reason: format!(
                    "expected 'auto', 0, or a whole number up to {}",
                    MAX_WORKERS_LIMIT
                ),
            })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Expand a leading `~/` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
