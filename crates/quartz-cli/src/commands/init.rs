use std::path::PathBuf;

use quartz_utils::Target;

use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::{convert_io_error, CliError};
use crate::io::write_file;

/// Writes a `quartz.toml` pinning `target` (the host by default) into `dir`.
pub fn handle_init(dir: PathBuf, target: Option<Target>, force: bool) -> Result<(), CliError> {
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| convert_io_error(e, dir.clone(), "creating directory"))?;
    }

    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        return Err(CliError::ConfigExists { path });
    }

    let config = Config {
        target: Some(target.unwrap_or_else(Target::host)),
        ..Config::default()
    };
    let toml_content = toml::to_string_pretty(&config)
        .map_err(|e| CliError::InternalError(format!("Failed to serialize {}: {}", CONFIG_FILE_NAME, e)))?;
    write_file(&path, &toml_content)?;

    println!("Created {}", path.display());
    Ok(())
}
