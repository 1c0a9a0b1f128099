//! Store configuration and factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gudangsoal_core::traits::{ContentStore, DEFAULT_LIST_LIMIT};

use crate::bank::BankStore;
use crate::postgrest::PostgrestStore;

/// Which content store to read questions from.
///
/// Note: Custom Debug impl masks the API key to prevent accidental exposure in logs.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// TOML question bank file or directory.
    Bank {
        #[serde(default = "default_bank_path")]
        path: PathBuf,
    },
    /// Remote PostgREST endpoint (e.g. a Supabase project).
    Postgrest {
        url: String,
        api_key: String,
        #[serde(default = "default_table")]
        table: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreConfig::Bank { path } => f.debug_struct("Bank").field("path", path).finish(),
            StoreConfig::Postgrest {
                url,
                api_key: _,
                table,
                timeout_secs,
            } => f
                .debug_struct("Postgrest")
                .field("url", url)
                .field("api_key", &"***")
                .field("table", table)
                .field("timeout_secs", timeout_secs)
                .finish(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Bank {
            path: default_bank_path(),
        }
    }
}

fn default_bank_path() -> PathBuf {
    PathBuf::from("questions")
}
fn default_table() -> String {
    "questions".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_list_limit() -> usize {
    DEFAULT_LIST_LIMIT
}

/// Top-level gudangsoal configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GudangsoalConfig {
    /// Where questions come from.
    #[serde(default)]
    pub store: StoreConfig,
    /// Maximum questions per listing.
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

impl Default for GudangsoalConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            list_limit: default_list_limit(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_store_config(config: &StoreConfig) -> StoreConfig {
    match config {
        StoreConfig::Bank { path } => StoreConfig::Bank {
            path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
        },
        StoreConfig::Postgrest {
            url,
            api_key,
            table,
            timeout_secs,
        } => StoreConfig::Postgrest {
            url: resolve_env_vars(url),
            api_key: resolve_env_vars(api_key),
            table: table.clone(),
            timeout_secs: *timeout_secs,
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `gudangsoal.toml` in the current directory
/// 2. `~/.config/gudangsoal/config.toml`
///
/// Environment variable overrides: `GUDANGSOAL_BANK`, `GUDANGSOAL_API_KEY`.
pub fn load_config() -> Result<GudangsoalConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GudangsoalConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gudangsoal.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<GudangsoalConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GudangsoalConfig::default(),
    };

    apply_env_overrides(&mut config);
    config.store = resolve_store_config(&config.store);
    anyhow::ensure!(config.list_limit >= 1, "list_limit must be at least 1");

    Ok(config)
}

fn apply_env_overrides(config: &mut GudangsoalConfig) {
    if let Ok(bank) = std::env::var("GUDANGSOAL_BANK") {
        config.store = StoreConfig::Bank {
            path: PathBuf::from(bank),
        };
    }

    if let Ok(key) = std::env::var("GUDANGSOAL_API_KEY") {
        if let StoreConfig::Postgrest { api_key, .. } = &mut config.store {
            *api_key = key;
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gudangsoal"))
}

/// Create a content store from its configuration.
pub fn create_store(config: &StoreConfig) -> Result<Box<dyn ContentStore>> {
    match config {
        StoreConfig::Bank { path } => Ok(Box::new(BankStore::from_path(path)?)),
        StoreConfig::Postgrest {
            url,
            api_key,
            table,
            timeout_secs,
        } => Ok(Box::new(PostgrestStore::new(
            url,
            api_key,
            table,
            *timeout_secs,
        )?)),
    }
}
