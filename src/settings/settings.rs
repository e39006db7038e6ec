use anyhow::{Result, anyhow};
use config::{Config, Environment, File, Map};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub credentials: Credentials,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Api {
    pub base_url: String,
    pub timeout_ms: u64,
    pub refresh_path: String,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub backend: String, // "memory" or "file"
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

const ENV_PREFIX: &str = "LECTERN";

/// Loads settings from defaults, then the TOML file, then `LECTERN__*`
/// environment variables. An explicit `path` must exist; the default one may
/// be missing.
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    load(path, None)
}

fn load(path: Option<&str>, env: Option<Map<String, String>>) -> Result<Settings> {
    let file = match path {
        Some(path) => File::with_name(path),
        None => File::with_name(SETTINGS_PATH).required(false),
    };

    let settings: Settings = Config::builder()
        .set_default("api.base_url", "http://localhost:4000")?
        .set_default("api.timeout_ms", 10_000)?
        .set_default("api.refresh_path", "/api/auth/refresh")?
        .set_default("credentials.backend", "file")?
        .set_default("credentials.path", ".lectern/credentials.json")?
        .set_default("log.filter", "info")?
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
