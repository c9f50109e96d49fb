//! Configuration provider using Figment

use crate::discovery::{ConfigFile, ConfigFormat, FileDiscovery};
use crate::error::{ConfigError, ConfigResult};
use crate::settings::PromptSettings;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use knobs_common::constants::ENV_PREFIX;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Loads [`PromptSettings`] from every configuration source
///
/// Sources are merged in precedence order, later ones overriding earlier
/// ones:
/// 1. built-in defaults
/// 2. discovered files, global then project
/// 3. an explicit file, if one was given
/// 4. `KNOBS_` environment variables (`KNOBS_RETRIES`, `KNOBS_VALUES__REGION`)
///
/// Nothing is cached; every load reads the sources again.
#[derive(Debug, Clone, Default)]
pub struct ConfigProvider {
    discovery: FileDiscovery,
    explicit_file: Option<PathBuf>,
}

impl ConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific discovery, typically one with fixed directories
    pub fn with_discovery(mut self, discovery: FileDiscovery) -> Self {
        self.discovery = discovery;
        self
    }

    /// Merge this file after the discovered ones
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    pub fn load_settings(&self) -> ConfigResult<PromptSettings> {
        debug!("Loading prompt settings from configuration sources");

        let settings: PromptSettings = self.build_figment()?.extract()?;

        debug!(
            retries = settings.retries,
            values = settings.values.len(),
            "Loaded prompt settings"
        );
        Ok(settings)
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(PromptSettings::default()));

        for config_file in self.discovery.discover_all() {
            figment = figment.merge(self.load_config_file(&config_file));
        }

        if let Some(path) = &self.explicit_file {
            figment = figment.merge(self.load_explicit_file(path)?);
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn load_config_file(&self, config_file: &ConfigFile) -> Figment {
        trace!(
            "Loading config file: {} ({:?})",
            config_file.path.display(),
            config_file.format
        );
        Self::figment_for(&config_file.path, config_file.format)
    }

    fn load_explicit_file(&self, path: &Path) -> ConfigResult<Figment> {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        debug!("Loading explicit config file: {}", path.display());
        Ok(Self::figment_for(path, format))
    }

    fn figment_for(path: &Path, format: ConfigFormat) -> Figment {
        match format {
            ConfigFormat::Toml => Figment::from(Toml::file(path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(path)),
            ConfigFormat::Json => Figment::from(Json::file(path)),
        }
    }
}
