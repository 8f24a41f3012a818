use std::path::{Path, PathBuf};

use crate::config::CONFIG_FILE_NAME;

/// Searches `start_path` and its ancestors for `quartz.toml`.
pub fn find_config(start_path: &Path) -> Option<PathBuf> {
    let mut current = if start_path.is_dir() {
        start_path.to_path_buf()
    } else {
        start_path.parent().map_or_else(
            || start_path.to_path_buf(),
            |p| p.to_path_buf()
        )
    };

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}
