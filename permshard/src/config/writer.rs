//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let max_workers = if config.workers.max_workers == 0 {
        "auto".to_string()
    } else {
        config.workers.max_workers.to_string()
    };

    format!(
        r#"[output]
; Directory that receives one file per leading element
directory = {}
; File that receives every permutation, in input order
combined_file = {}
; Per-task file naming:
;   element - perm_<element>.txt (element text must be a valid file name)
;   index   - perm_<position>.txt (zero-based input position)
naming = {}

[workers]
; Maximum worker threads, or 'auto' for one per CPU core
max_workers = {}

[logging]
; Log file path (default: ~/.permshard/permshard.log)
file = {}
"#,
        path_to_string(&config.output.directory),
        path_to_string(&config.output.combined_file),
        config.output.naming,
        max_workers,
        path_to_string(&config.logging.file),
    )
}

fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::super::settings::ConfigFile;
    use super::*;
    use crate::partition::NamingScheme;
    use std::path::PathBuf;

    #[test]
    fn test_written_config_contains_sections() {
        let text = to_config_string(&ConfigFile::default());
        assert!(text.contains("[output]"));
        assert!(text.contains("[workers]"));
        assert!(text.contains("[logging]"));
        assert!(text.contains("directory = perm_output"));
        assert!(text.contains("max_workers = auto"));
        assert!(text.contains("naming = element"));
    }

    #[test]
    fn test_written_config_round_trips() {
        let mut config = ConfigFile::default();
        config.output.directory = PathBuf::from("/data/perms");
        config.output.naming = NamingScheme::Index;
        config.workers.max_workers = 3;

        let text = to_config_string(&config);
        let ini = ini::Ini::load_from_str(&text).unwrap();
        let parsed = super::super::parser::parse_ini(&ini).unwrap();

        assert_eq!(parsed, config);
    }
}
