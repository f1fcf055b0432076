use std::path::Path;

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Configuration read from `APP_`-prefixed environment variables.
///
/// Sections nest with `__`: `APP_DATABASE__URL` sets `database.url`. A `.env` file is
/// loaded first when present.
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        load_dotenv();

        let source = config_rs::Environment::with_prefix(Self::PREFIX)
            .prefix_separator("_")
            .separator(Self::SEPARATOR)
            .try_parsing(true);
        let cfg: Self = config_rs::Config::builder()
            .add_source(source)
            .build()
            .context("reading APP_* environment variables")?
            .try_deserialize()
            .context("APP_* environment variables do not match the config layout")?;

        cfg.validate()?;
        Ok(cfg)
    }
}

fn load_dotenv() {
    let beside_manifest = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if dotenvy::from_filename(beside_manifest).is_err() {
        // Missing .env is normal outside development.
        dotenvy::dotenv().ok();
    }
}
