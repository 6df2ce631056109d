//! # Configuration Loading
//!
//! Layers an optional TOML file under `PRODUCTION__`-prefixed
//! environment variables, then validates. Environment always wins over
//! the file; defaults fill whatever neither provides.
//!
//! Examples: `PRODUCTION__QUEUES__INBOUND_QUEUE=orders` overrides
//! `[queues] inbound_queue`, `PRODUCTION__CONSUMER__BATCH_SIZE=25`
//! overrides `[consumer] batch_size`.

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use tracing::info;

use super::ProductionConfig;
use crate::error::ConfigurationError;

/// Environment variable naming the config file, checked when no path is
/// passed explicitly
pub const CONFIG_PATH_ENV: &str = "PRODUCTION_CONFIG_PATH";

/// Load configuration from the default location.
///
/// Uses the file named by `PRODUCTION_CONFIG_PATH` if set; otherwise
/// only environment variables and defaults apply.
pub fn load() -> Result<ProductionConfig, ConfigurationError> {
    let path = std::env::var(CONFIG_PATH_ENV).ok();
    load_from(path.as_deref().map(Path::new))
}

/// Load configuration, layering `path` (if given) under environment
/// variables.
pub fn load_from(path: Option<&Path>) -> Result<ProductionConfig, ConfigurationError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        info!(path = %path.display(), "Loading configuration file");
        builder = builder.add_source(
            File::from(path).format(FileFormat::Toml).required(true),
        );
    }

    let config: ProductionConfig = builder
        .add_source(
            Environment::with_prefix("PRODUCTION")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    config.validate()?;
    Ok(config)
}
