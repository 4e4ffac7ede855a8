//! Startup configuration: defaults, then `nebula_calc.toml`, then environment, then CLI flags.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

pub const SETTINGS_FILE_NAME: &str = "nebula_calc.toml";
pub const ENV_DATABASE_URL: &str = "NEBULA_CALC__DATABASE_URL";
pub const ENV_DATA_DIR: &str = "NEBULA_CALC__DATA_DIR";
pub const ENV_MUTED: &str = "NEBULA_CALC__MUTED";
pub const DEFAULT_LOG_FILTER: &str = "info";

const APP_DIR_NAME: &str = "nebula_calc";
const DATABASE_FILE_NAME: &str = "nebula_calc.sqlite3";

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "nebula_calc", about = "Nebula Calc desktop calculator")]
pub struct CliArgs {
    /// Settings file; defaults to ./nebula_calc.toml when present.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Directory for the preference database.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// SQLite URL or file path; wins over --data-dir.
    #[arg(long)]
    pub database_url: Option<String>,
    /// Start with sound muted regardless of the stored preference.
    #[arg(long)]
    pub muted: bool,
    /// tracing filter directive, e.g. `desktop_gui=debug`.
    #[arg(long)]
    pub log_filter: Option<String>,
}

/// Keys accepted in `nebula_calc.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub database_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub muted: Option<bool>,
    pub log_filter: Option<String>,
}

impl FileSettings {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        toml::from_str(raw).context("invalid settings file")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    pub data_dir: Option<PathBuf>,
    pub database_url: Option<String>,
    /// `None` defers to the persisted preference.
    pub muted: Option<bool>,
    pub log_filter: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            database_url: None,
            muted: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl StartupConfig {
    /// Resolve against the real process environment and working directory.
    pub fn load(cli: &CliArgs) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => Some(read_settings_file(path)?),
            None => {
                let default_path = Path::new(SETTINGS_FILE_NAME);
                if default_path.exists() {
                    Some(read_settings_file(default_path)?)
                } else {
                    None
                }
            }
        };
        Ok(Self::resolve(file, |name| std::env::var(name).ok(), cli))
    }

    pub fn resolve(
        file: Option<FileSettings>,
        env: impl Fn(&str) -> Option<String>,
        cli: &CliArgs,
    ) -> Self {
        let mut config = Self::default();

        if let Some(file) = file {
            if file.database_url.is_some() {
                config.database_url = file.database_url;
            }
            if file.data_dir.is_some() {
                config.data_dir = file.data_dir;
            }
            if file.muted.is_some() {
                config.muted = file.muted;
            }
            if let Some(filter) = file.log_filter {
                config.log_filter = filter;
            }
        }

        if let Some(v) = non_empty(env(ENV_DATABASE_URL)) {
            config.database_url = Some(v);
        }
        if let Some(v) = non_empty(env(ENV_DATA_DIR)) {
            config.data_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = non_empty(env(ENV_MUTED)) {
            match parse_flag(&v) {
                Some(muted) => config.muted = Some(muted),
                None => {
                    tracing::warn!(var = ENV_MUTED, value = %v, "ignoring unrecognised flag value")
                }
            }
        }

        if let Some(v) = &cli.database_url {
            config.database_url = Some(v.clone());
        }
        if let Some(v) = &cli.data_dir {
            config.data_dir = Some(v.clone());
        }
        if cli.muted {
            config.muted = Some(true);
        }
        if let Some(v) = &cli.log_filter {
            config.log_filter = v.clone();
        }

        config
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_root: PathBuf,
    pub db_path: PathBuf,
    pub database_url: String,
}

impl AppPaths {
    pub fn from_startup(startup: &StartupConfig) -> anyhow::Result<Self> {
        let root = if let Some(dir) = &startup.data_dir {
            dir.clone()
        } else {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("unable to resolve local app data dir"))?
                .join(APP_DIR_NAME)
        };
        let db_path = root.join(DATABASE_FILE_NAME);
        let database_url = match &startup.database_url {
            Some(raw) => normalize_database_url(raw, &db_path),
            None => file_database_url(&db_path),
        };

        Ok(Self {
            data_root: root,
            db_path,
            database_url,
        })
    }
}

fn read_settings_file(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    FileSettings::parse(&raw).with_context(|| format!("in '{}'", path.display()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn file_database_url(path: &Path) -> String {
    format!("sqlite://{}", path.display().to_string().replace('\\', "/"))
}

/// Accept bare file paths and `sqlite:` shorthand alongside full URLs.
pub fn normalize_database_url(raw_database_url: &str, fallback: &Path) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return file_database_url(fallback);
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        return format!("sqlite://{}", path.replace('\\', "/"));
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
