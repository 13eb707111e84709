use anyhow::{bail, Context as _, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "LANDINGKIT_CONFIG";
pub const LOG_FILTER_ENV: &str = "LANDINGKIT_LOG_FILTER";
pub const LOG_JSON_ENV: &str = "LANDINGKIT_LOG_JSON";

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return PathBuf::from(xdg).join("landingkit").join("config.toml");
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("landingkit").join("config.toml");
    }
    PathBuf::from("landingkit/config.toml")
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub applier: ApplierSettings,

    #[serde(default)]
    pub selector: SelectorSettings,

    #[serde(default)]
    pub fetch: FetchSettings,

    #[serde(default)]
    pub log: LogSettings,
}

impl Settings {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings: {}", path.display()))?;
        let settings: Self = toml::from_str(&text)
            .with_context(|| format!("failed to parse TOML: {}", path.display()))?;
        Ok(settings)
    }

    /// Settings path precedence:
    /// 1) CLI --config (must exist)
    /// 2) LANDINGKIT_CONFIG (must exist)
    /// 3) default XDG_CONFIG_HOME/landingkit/config.toml (defaults if missing)
    pub fn locate(cli_config: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(p) = cli_config {
            if !p.exists() {
                bail!("--config was provided but file does not exist: {}", p.display());
            }
            return Ok(Some(p.to_path_buf()));
        }

        if let Some(p) = env_path(CONFIG_ENV) {
            if !p.exists() {
                bail!("{CONFIG_ENV} is set but file does not exist: {}", p.display());
            }
            return Ok(Some(p));
        }

        let p = default_config_path();
        Ok(p.exists().then_some(p))
    }

    pub fn load(cli_config: Option<&Path>) -> Result<Self> {
        let mut settings = match Self::locate(cli_config)? {
            Some(path) => Self::load_from_path(&path)?,
            None => Self::default(),
        };
        settings.log.apply_env();
        Ok(settings)
    }
}

/// Query parameter names and element ids the Config Applier works with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplierSettings {
    #[serde(default = "default_conf_param")]
    pub conf_param: String,

    #[serde(default = "default_style_param")]
    pub style_param: String,

    #[serde(default = "default_style_element_id")]
    pub style_element_id: String,

    /// Top-level document key holding the redirect directive.
    #[serde(default = "default_auto_key")]
    pub auto_key: String,
}

impl Default for ApplierSettings {
    fn default() -> Self {
        Self {
            conf_param: default_conf_param(),
            style_param: default_style_param(),
            style_element_id: default_style_element_id(),
            auto_key: default_auto_key(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectorSettings {
    #[serde(default = "default_selector_element_id")]
    pub element_id: String,

    /// Resolved against the page URL.
    #[serde(default = "default_env_config_path")]
    pub env_config_path: String,

    #[serde(default = "default_local_label")]
    pub local_label: String,

    #[serde(default = "default_local_url")]
    pub local_url: String,

    /// MiniJinja source; sees `name`, `api_id` and `region`.
    #[serde(default = "default_endpoint_template")]
    pub endpoint_template: String,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            element_id: default_selector_element_id(),
            env_config_path: default_env_config_path(),
            local_label: default_local_label(),
            local_url: default_local_url(),
            endpoint_template: default_endpoint_template(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchSettings {
    /// Serve documents from this directory instead of over HTTP.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_log_filter")]
    pub filter: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl LogSettings {
    fn apply_env(&mut self) {
        if let Some(filter) = env_string(LOG_FILTER_ENV) {
            self.filter = filter;
        }
        if let Some(raw) = env_string(LOG_JSON_ENV) {
            if let Some(json) = parse_bool(&raw) {
                self.json = json;
            }
        }
    }
}

fn default_conf_param() -> String {
    "conf".to_string()
}

fn default_style_param() -> String {
    "style".to_string()
}

fn default_style_element_id() -> String {
    "page-style".to_string()
}

fn default_auto_key() -> String {
    "auto".to_string()
}

fn default_selector_element_id() -> String {
    "apiSelector".to_string()
}

fn default_env_config_path() -> String {
    "env-config.json".to_string()
}

fn default_local_label() -> String {
    "localhost".to_string()
}

fn default_local_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_endpoint_template() -> String {
    "https://{{ api_id }}.execute-api.{{ region }}.amazonaws.com".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env_string(key).map(PathBuf::from)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
