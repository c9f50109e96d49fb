//! Knobs configuration management using Figment
//!
//! Loads [`PromptSettings`]: the default retry bound for prompts and any
//! parameter values supplied up front.
//!
//! # Configuration Files
//!
//! Files are discovered in these locations, later ones overriding earlier:
//!
//! - Global: `~/.knobs/knobs.{toml,yaml,yml,json}`
//! - Project: `./.knobs/knobs.{toml,yaml,yml,json}`
//!
//! ```toml
//! retries = 3
//!
//! [values]
//! region = "eu-west"
//! replicas = 2
//! ```
//!
//! # Environment Variables
//!
//! ```bash
//! export KNOBS_RETRIES=-1              # → retries (unlimited)
//! export KNOBS_VALUES__REGION=us-east  # → values.region
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! let settings = knobs_config::load_settings()?;
//! println!("retry bound: {}", settings.retry_bound());
//! # Ok::<(), knobs_config::ConfigError>(())
//! ```

pub mod discovery;
pub mod error;
pub mod provider;
pub mod settings;

#[cfg(test)]
mod tests;

pub use discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery};
pub use error::{ConfigError, ConfigResult};
pub use provider::ConfigProvider;
pub use settings::PromptSettings;

/// Load settings from the standard sources
pub fn load_settings() -> ConfigResult<PromptSettings> {
    ConfigProvider::new().load_settings()
}
