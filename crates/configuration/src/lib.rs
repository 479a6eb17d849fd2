use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{LoggingSettings, ServerSettings, Settings, SettingsOverrides, WindowSettings};

/// The file looked up in the working directory when no path is given (any extension
/// the `config` crate understands, e.g. `config.toml`).
pub const DEFAULT_CONFIG_FILE: &str = "config";

/// Prefix for environment overrides, e.g. `ROLLING_STATS__WINDOW__DURATION_MILLIS=30000`.
pub const ENV_PREFIX: &str = "ROLLING_STATS";

/// Loads the application settings.
///
/// Sources are layered, later ones winning: built-in defaults, the configuration
/// file, then `ROLLING_STATS__*` environment variables. An explicit `path` must
/// exist; the default `config.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    load_settings_with_env(path, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn load_settings_with_env(
    path: Option<&Path>,
    env: config::Environment,
) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(env)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    tracing::debug!(?settings, "Loaded configuration.");
    Ok(settings)
}
