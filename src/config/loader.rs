use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::EngineConfig;
use super::validation::{sanitize_config, validate_config};
use crate::errors::CalcError;

/// File name searched for in the working directory and its ancestors
pub const CONFIG_FILE_NAME: &str = ".rbi.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Read a config file into a string
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse config from a TOML string, replacing invalid sections with defaults
pub fn parse_and_validate_config(contents: &str) -> Result<EngineConfig, String> {
    let config = toml::from_str::<EngineConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;
    Ok(sanitize_config(config))
}

/// Try loading config from a specific path
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<EngineConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            eprintln!("Warning: {}. Using defaults.", e);
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // "not found" is the normal case while walking ancestors
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Directory ancestors up to a depth limit, starting with `start` itself
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `.rbi.toml` from the current directory upwards; defaults when absent.
pub fn load_config() -> EngineConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return EngineConfig::default();
        }
    };
    load_config_from_dir(current)
}

/// Search `.rbi.toml` from `start` upwards; defaults when absent.
pub fn load_config_from_dir(start: PathBuf) -> EngineConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            EngineConfig::default()
        })
}

/// Load an explicitly named config file. Unlike the search, a missing,
/// unreadable or invalid file is a configuration error.
pub fn load_config_validated(path: &Path) -> Result<EngineConfig, CalcError> {
    let contents = read_config_file(path).map_err(|e| {
        CalcError::config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let config = toml::from_str::<EngineConfig>(&contents).map_err(|e| {
        CalcError::config(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    validate_config(&config)?;
    log::debug!("Loaded validated config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::RecalculationTrigger;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
[risk_matrix]
pof_thresholds = [2.0, 20.0, 200.0, 2000.0]

[consequence]
policy = "area_only"

[probability]
management_systems_factor = 0.5

[recalculation]
trigger = { on_field_change = { debounce_ms = 250 } }
"#;
        let config = parse_and_validate_config(contents).unwrap();
        assert_eq!(config.risk_matrix.pof_thresholds[0], 2.0);
        assert_eq!(config.probability.management_systems_factor, 0.5);
        assert_eq!(
            config.recalculation.trigger,
            RecalculationTrigger::OnFieldChange { debounce_ms: 250 }
        );
    }

    #[test]
    fn test_invalid_section_falls_back_to_default() {
        let contents = "[risk_matrix]\npof_thresholds = [10.0, 1.0, 100.0, 1000.0]\n";
        let config = parse_and_validate_config(contents).unwrap();
        assert_eq!(config.risk_matrix, Default::default());
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(parse_and_validate_config("[risk_matrix").is_err());
    }

    #[test]
    fn test_directory_ancestors_respects_depth() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c/d"), PathBuf::from("/a/b/c")]);
    }

    #[test]
    fn test_load_from_parent_directory() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("unit").join("area");
        fs::create_dir_all(&nested).unwrap();
        let mut file = fs::File::create(root.path().join(CONFIG_FILE_NAME)).unwrap();
        writeln!(file, "[probability]\nmanagement_systems_factor = 2.0").unwrap();

        let config = load_config_from_dir(nested);
        assert_eq!(config.probability.management_systems_factor, 2.0);
    }

    #[test]
    fn test_validated_load_rejects_bad_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[probability]\nmanagement_systems_factor = 0.0\n").unwrap();
        let err = load_config_validated(&path).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_validated_load_missing_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config_validated(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CalcError::Config { .. }));
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("absent.toml"));
    }
}
