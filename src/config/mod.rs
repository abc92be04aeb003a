//! Configuration management.
//!
//! Everything lives under `~/.fin-dashboard/`:
//! - **Database**: `~/.fin-dashboard/data/dashboard.db`
//! - **Settings**: `~/.fin-dashboard/config.json`
//!
//! Values resolve as explicit flag > environment > config file > default.
//! The flag and environment layers for `--db` and `--user` are handled by
//! clap (`env = ...`); the AI settings read the environment here.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Directory name under the home directory.
const APP_DIR: &str = ".fin-dashboard";

/// Get the global dashboard directory (`~/.fin-dashboard/`).
#[must_use]
pub fn global_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(APP_DIR))
}

/// Check if test mode is enabled.
///
/// Test mode is enabled by setting `FIN_TEST_DB=1` (or any value other than
/// empty, `0` or `false`). It redirects the database to an isolated file.
#[must_use]
pub fn is_test_mode() -> bool {
    std::env::var("FIN_TEST_DB")
        .map(|v| is_truthy(&v))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
}

/// Get the test database path (`~/.fin-dashboard/test/dashboard.db`).
#[must_use]
pub fn test_db_path() -> Option<PathBuf> {
    global_dir().map(|dir| dir.join("test").join("dashboard.db"))
}

/// Resolve the database path.
///
/// Priority:
/// 1. `explicit_path` (`--db` or `FIN_DB`)
/// 2. `FIN_TEST_DB` → the test database
/// 3. `~/.fin-dashboard/data/dashboard.db`
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if is_test_mode() {
        return test_db_path();
    }

    global_dir().map(|dir| dir.join("data").join("dashboard.db"))
}

/// Get the config file path.
///
/// # Errors
///
/// Returns `Error::Config` when the home directory cannot be determined.
pub fn config_path() -> Result<PathBuf> {
    global_dir()
        .map(|dir| dir.join("config.json"))
        .ok_or_else(|| Error::Config("Could not determine home directory".into()))
}

// ── Config file ───────────────────────────────────────────────

/// Which completion backend to call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Ollama,
}

impl ProviderKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            other => Err(Error::Config(format!(
                "Unknown AI provider '{other}' (expected openai or ollama)"
            ))),
        }
    }
}

/// AI settings as stored in `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Default user when neither `--user` nor `FIN_USER` is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiSettings>,
}

/// Keys accepted by [`DashboardConfig::set`].
pub const CONFIG_KEYS: &[&str] = &["user_id", "ai.provider", "ai.model", "ai.endpoint", "ai.api_key"];

impl DashboardConfig {
    /// Set one dotted key; an empty value clears it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an unknown key or an invalid provider.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());

        if key == "user_id" {
            self.user_id = value;
            return Ok(());
        }

        let ai = self.ai.get_or_insert_with(AiSettings::default);
        match key {
            "ai.provider" => ai.provider = value.as_deref().map(str::parse::<ProviderKind>).transpose()?,
            "ai.model" => ai.model = value,
            "ai.endpoint" => ai.endpoint = value,
            "ai.api_key" => ai.api_key = value,
            other => {
                return Err(Error::Config(format!(
                    "Unknown config key '{other}' (expected one of: {})",
                    CONFIG_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Copy with the API key masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(key) = copy.ai.as_mut().and_then(|ai| ai.api_key.as_mut()) {
            *key = mask_secret(key);
        }
        copy
    }
}

/// Mask all but the last four characters of a secret.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

/// Load the config from its default location.
///
/// # Errors
///
/// Returns `Error::Config` if the file exists but cannot be read or parsed.
pub fn load_config() -> Result<DashboardConfig> {
    load_config_from(&config_path()?)
}

/// Load the config from `path`; a missing file yields the defaults.
///
/// # Errors
///
/// Returns `Error::Config` if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<DashboardConfig> {
    if !path.exists() {
        return Ok(DashboardConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))
}

/// Save the config to its default location.
///
/// # Errors
///
/// Returns `Error::Config` if the file cannot be written.
pub fn save_config(config: &DashboardConfig) -> Result<PathBuf> {
    let path = config_path()?;
    save_config_to(&path, config)?;
    Ok(path)
}

/// Save the config to `path`, creating parent directories.
///
/// # Errors
///
/// Returns `Error::Config` if the file cannot be written.
pub fn save_config_to(path: &Path, config: &DashboardConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

    fs::write(path, content).map_err(|e| Error::Config(format!("Failed to write config file: {e}")))
}

// ── Resolution ────────────────────────────────────────────────

/// Resolve the acting user: explicit (`--user` / `FIN_USER`) > config file.
#[must_use]
pub fn resolve_user(explicit: Option<&str>, config: &DashboardConfig) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| config.user_id.clone())
        .filter(|u| !u.trim().is_empty())
}

/// Fully resolved AI settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiConfig {
    pub provider: ProviderKind,
    /// `None` means the provider's default model
    pub model: Option<String>,
    /// `None` means the provider's default endpoint
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

/// Resolve AI settings from the environment and the config file.
///
/// Priority: `FIN_AI_PROVIDER` / `FIN_AI_MODEL` / `FIN_AI_ENDPOINT` /
/// `OPENAI_API_KEY` > `ai.*` in the config file > defaults. When
/// `FIN_AI_PROVIDER` names a different provider than the file, the file's
/// `ai.model` and `ai.endpoint` are ignored.
///
/// # Errors
///
/// Returns `Error::Config` if the provider name is unknown.
pub fn resolve_ai_config(config: &DashboardConfig) -> Result<AiConfig> {
    resolve_ai_with(|name| std::env::var(name).ok(), config)
}

fn resolve_ai_with(
    env: impl Fn(&str) -> Option<String>,
    config: &DashboardConfig,
) -> Result<AiConfig> {
    let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());
    let mut file = config.ai.clone().unwrap_or_default();
    let file_provider = file.provider.unwrap_or_default();

    let provider = match env("FIN_AI_PROVIDER") {
        Some(name) => name.parse()?,
        None => file_provider,
    };

    // The file's model and endpoint belong to the file's provider.
    if provider != file_provider {
        file.model = None;
        file.endpoint = None;
    }

    Ok(AiConfig {
        provider,
        model: env("FIN_AI_MODEL").or(file.model),
        endpoint: env("FIN_AI_ENDPOINT").or(file.endpoint),
        api_key: env("OPENAI_API_KEY").or(file.api_key),
    })
}
