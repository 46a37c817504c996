use anyhow::Context;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Loads `configuration/base.yaml` (or `test.yaml` under test) from the working directory,
/// overlaid by `APP_`-prefixed environment variables, e.g. `APP_SCHEDULE__FEED_URL`.
pub fn config<Settings: DeserializeOwned>() -> anyhow::Result<Settings> {
    let base_path = std::env::current_dir().context("Failed to determine the current directory")?;
    let configuration_directory = base_path.join("configuration");
    let file = if cfg!(test) { "test.yaml" } else { "base.yaml" };
    config_file(&configuration_directory.join(file))
}

pub fn config_file<Settings: DeserializeOwned>(path: &Path) -> anyhow::Result<Settings> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("Failed to build configuration from {}", path.display()))?;

    settings
        .try_deserialize::<Settings>()
        .context("Failed to deserialize settings")
}
