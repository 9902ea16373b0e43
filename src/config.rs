use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::cli::{Cli, MatchMode};

const DEFAULT_API_URL: &str = "https://api.subsource.net/api/";
const DEFAULT_LANGUAGE: &str = "English";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    language: Option<String>,
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
    max_attempts: Option<u32>,
}

/// Settings from the environment and the optional config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub language: String,
    pub api_url: String,
    pub request_timeout: Duration,
    pub max_attempts: u32,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path();
        let file = read_config_file(&config_path)?;
        Ok(Self::from_sources(file, |key| env::var(key).ok()))
    }

    /// Environment variables win over the config file.
    fn from_sources(file: ConfigFile, env_var: impl Fn(&str) -> Option<String>) -> Self {
        let mut api_url = env_var("SUBSOURCE_API_URL")
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !api_url.ends_with('/') {
            api_url.push('/');
        }

        Self {
            language: env_var("SUBSOURCE_LANGUAGE")
                .or(file.language)
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            api_url,
            request_timeout: Duration::from_secs(
                file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            max_attempts: file.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

fn read_config_file(config_path: &Path) -> Result<ConfigFile> {
    if !config_path.exists() {
        return Ok(ConfigFile::default());
    }
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
    toml::from_str(&config_content)
        .with_context(|| format!("Invalid config file {}", config_path.display()))
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("subsource-dl"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}

/// Immutable per-run options handed to every stage.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub savepath: Option<PathBuf>,
    pub match_mode: MatchMode,
    pub language: String,
    pub deadline: Option<Instant>,
}

impl RunConfig {
    pub fn new(cli: &Cli, settings: &Settings) -> Self {
        Self {
            savepath: cli.savepath.clone(),
            match_mode: cli.matchtype.clone(),
            language: cli
                .language
                .clone()
                .unwrap_or_else(|| settings.language.clone()),
            deadline: cli
                .deadline
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
        }
    }

    pub fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
