//! Configuration, settings and option storage

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::TokenStore;

const DEFAULT_BASE_URL: &str = "https://catture.partnersolution.it";
const DEFAULT_FACILEWS_LOGIN_URL: &str = "http://facilews.partnersolution.it/public/login.php";
const DEFAULT_FACILEWS_ACCOUNT_URL: &str = "https://facilews3.partnersolution.it/Api/Rest/Account";

/// Tag identifying this integration channel to SferaNet (`tipocattura`)
pub const DEFAULT_CAPTURE_TYPE: &str = "WORDPRESS";

/// Agency settings consumed by every payload builder
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub agency_code: String,
    pub agency_id: String,
    pub attachment_type_id: String,
    pub capture_type: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            agency_code: String::new(),
            agency_id: String::new(),
            attachment_type_id: String::new(),
            capture_type: DEFAULT_CAPTURE_TYPE.to_string(),
        }
    }
}

/// Backend endpoints. Production hosts unless overridden in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// SferaNet REST base URL
    pub base_url: String,
    /// FacileWS login form
    pub facilews_login_url: String,
    /// FacileWS per-agency account lookup
    pub facilews_account_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            facilews_login_url: DEFAULT_FACILEWS_LOGIN_URL.to_string(),
            facilews_account_url: DEFAULT_FACILEWS_ACCOUNT_URL.to_string(),
        }
    }
}

/// Username/password pair for one of the two logins
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Read credentials from the environment. Missing variables become empty
    /// strings; the backend rejects them at login time.
    pub fn from_env(user_var: &str, pass_var: &str) -> Self {
        let read = |var: &str| {
            std::env::var(var).unwrap_or_else(|_| {
                tracing::warn!("{} is not set", var);
                String::new()
            })
        };
        Self {
            username: read(user_var),
            password: read(pass_var),
        }
    }

    pub fn sferanet() -> Self {
        Self::from_env("SFERANET_USERNAME", "SFERANET_PASSWORD")
    }

    pub fn facilews() -> Self {
        Self::from_env("FACILEWS_USERNAME", "FACILEWS_PASSWORD")
    }
}

/// Application configuration
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub endpoints: Endpoints,
    /// Persisted key-value options (bearer tokens)
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    /// File this config was loaded from; `None` means the default location
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("it", "sferanet", "sferanet-cli")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load configuration from `path`. A missing file yields defaults bound to `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str::<Config>(&content).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = match &self.path {
            Some(p) => p.clone(),
            None => Self::default_path()?,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content).context("Failed to write config file")?;

        // Tokens live in this file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&path, perms).context("Failed to set config permissions")?;
        }

        Ok(())
    }
}

impl TokenStore for Config {
    fn get_option(&self, key: &str) -> Option<String> {
        self.options.get(key).cloned()
    }

    fn set_option(&mut self, key: &str, value: &str) -> Result<()> {
        self.options.insert(key.to_string(), value.to_string());
        self.save()
    }
}
