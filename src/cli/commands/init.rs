use super::CommandStatus;
use crate::config::{EngineConfig, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const HEADER: &str = "# RBI engine configuration\n\
# trigger may also be { on_field_change = { debounce_ms = 500 } }\n\n";

pub fn handle_init_command(force: bool) -> Result<CommandStatus> {
    write_default_config(&PathBuf::from(CONFIG_FILE_NAME), force)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);
    Ok(CommandStatus::Success)
}

pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }
    let body = EngineConfig::default_toml().context("rendering default configuration")?;
    std::fs::write(path, format!("{}{}", HEADER, body))
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_and_validate_config;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        write_default_config(&path, false).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            parse_and_validate_config(&contents).unwrap(),
            EngineConfig::default()
        );
    }

    #[test]
    fn test_existing_file_needs_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "").unwrap();
        assert!(write_default_config(&path, false).is_err());
        assert!(write_default_config(&path, true).is_ok());
    }
}
