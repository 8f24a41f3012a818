use std::io::IsTerminal;
use std::path::Path;

use quartz_utils::{RenderOptions, Target};
use serde::{Deserialize, Serialize};

use crate::error::CliError;
use crate::io::{current_dir, read_file};
use crate::utils::find_config;

pub const CONFIG_FILE_NAME: &str = "quartz.toml";

/// Contents of `quartz.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// Target used when `--target` is not given. Defaults to the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,

    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct DiagnosticsConfig {
    /// Colored snippets. Unset means "if stderr is a terminal".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    /// Print the toolchain call site that raised a fatal diagnostic.
    pub show_origin: bool,
}

impl Config {
    /// Loads `explicit`, or the nearest `quartz.toml` above the working
    /// directory. No file at all means the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match find_config(&current_dir()?) {
                Some(path) => path,
                None => {
                    log::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                    return Ok(Self::default());
                }
            },
        };

        log::debug!("loading configuration from {}", path.display());
        let text = read_file(&path)?;
        Self::parse(&text).map_err(|source| CliError::ConfigError { path, source })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// `--target` wins over the file, the file over the host.
    pub fn target(&self, flag: Option<Target>) -> Target {
        flag.or(self.target).unwrap_or_else(Target::host)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            color: self
                .diagnostics
                .color
                .unwrap_or_else(|| std::io::stderr().is_terminal()),
            show_origin: self.diagnostics.show_origin,
        }
    }
}
