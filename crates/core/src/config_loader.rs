use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Default location of the TOML config file.
pub const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from [`DEFAULT_CONFIG_PATH`] plus the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment values cannot be parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads configuration by layering defaults, a TOML file, `RELAY_` prefixed
    /// variables, and the broker's raw credential variables, in that order.
    ///
    /// A missing file is not an error; the remaining layers still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment values cannot be parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let config: AppConfig = Self::figment(path.as_ref()).extract()?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("RELAY_").split("__"))
            .merge(
                Env::raw()
                    .only(&["DHAN_CLIENT_ID", "DHAN_ACCESS_TOKEN", "PORT"])
                    .map(|key| {
                        if key.as_str().eq_ignore_ascii_case("DHAN_CLIENT_ID") {
                            "broker.client_id".into()
                        } else if key.as_str().eq_ignore_ascii_case("DHAN_ACCESS_TOKEN") {
                            "broker.access_token".into()
                        } else {
                            "server.port".into()
                        }
                    }),
            )
    }
}
