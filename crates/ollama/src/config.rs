use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "ASK_OLLAMA_CONFIG";
/// Environment variable overriding `ollama.host`
pub const HOST_ENV: &str = "OLLAMA_HOST";
/// Config file picked up from the working directory when nothing else is given
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

const DEFAULT_HOST: &str = "http://localhost:11434";

/// Top-level server configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ollama: OllamaSettings,
    pub api: ApiSettings,
    pub api_doc: ApiDocSettings,
    pub images: ImageSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    /// Base URL of the Ollama server
    pub host: String,
    /// Request timeout in seconds
    pub timeout: f64,
    pub user_agent: String,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            timeout: 30.0,
            user_agent: concat!("ask-ollama/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl OllamaSettings {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub endpoints: Endpoints,
}

/// Endpoint name to URL path, grouped by HTTP method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub get: BTreeMap<String, String>,
    pub post: BTreeMap<String, String>,
    pub delete: BTreeMap<String, String>,
}

impl Default for Endpoints {
    fn default() -> Self {
        fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
            entries
                .iter()
                .map(|(name, path)| (name.to_string(), path.to_string()))
                .collect()
        }

        Self {
            get: table(&[
                ("tags", "/api/tags"),
                ("version", "/api/version"),
                ("ps", "/api/ps"),
            ]),
            post: table(&[
                ("chat", "/api/chat"),
                ("generate", "/api/generate"),
                ("embed", "/api/embed"),
                ("show", "/api/show"),
            ]),
            delete: table(&[("delete", "/api/delete")]),
        }
    }
}

impl Endpoints {
    fn all(&self) -> impl Iterator<Item = (&String, &String)> {
        self.get.iter().chain(&self.post).chain(&self.delete)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiDocSettings {
    /// Markdown document served by `get_api_doc_section` and the resource
    pub file_path: PathBuf,
    /// Content budget in characters
    pub max_length: usize,
}

impl Default for ApiDocSettings {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from("ollama-api.md"),
            max_length: 8000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub max_size_mb: f64,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self { max_size_mb: 10.0 }
    }
}

impl Config {
    /// Resolve and load configuration.
    ///
    /// Lookup order: `explicit`, then `$ASK_OLLAMA_CONFIG`, then
    /// `./config.json`, then built-in defaults. `$OLLAMA_HOST` is applied on
    /// top of whatever was loaded.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| {
                env::var_os(CONFIG_ENV)
                    .filter(|value| !value.is_empty())
                    .map(PathBuf::from)
            })
            .or_else(|| {
                let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
                candidate.is_file().then_some(candidate)
            });

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                log::info!("No config file found, using built-in defaults");
                Self::default()
            }
        };
        config.apply_host_override(env::var(HOST_ENV).ok());
        config
            .validate()
            .map_err(|err| anyhow!("Invalid configuration: {err}"))?;
        Ok(config)
    }

    /// Load a JSON or TOML file. A relative `api_doc.file_path` is resolved
    /// against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config =
            Self::parse(&raw).with_context(|| format!("Failed to parse config {}", path.display()))?;
        if config.api_doc.file_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.api_doc.file_path = dir.join(&config.api_doc.file_path);
            }
        }
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse config text, trying JSON first and TOML second.
    pub fn parse(raw: &str) -> Result<Self> {
        match serde_json::from_str(raw) {
            Ok(config) => Ok(config),
            Err(json_err) => toml::from_str(raw).map_err(|toml_err| {
                anyhow!("not valid JSON ({json_err}) or TOML ({toml_err})")
            }),
        }
    }

    /// Replace the host with a non-empty override. Bare `host:port` values
    /// get an `http://` scheme.
    pub fn apply_host_override(&mut self, host: Option<String>) {
        let Some(host) = host.map(|h| h.trim().to_string()).filter(|h| !h.is_empty()) else {
            return;
        };
        let host = if host.contains("://") {
            host
        } else {
            format!("http://{host}")
        };
        log::debug!("Ollama host overridden by ${HOST_ENV}: {host}");
        self.ollama.host = host;
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        let host = &self.ollama.host;
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(format!("ollama.host must start with http:// or https://, got '{host}'"));
        }
        if !(self.ollama.timeout.is_finite() && self.ollama.timeout > 0.0) {
            return Err("ollama.timeout must be a positive number of seconds".to_string());
        }
        if self.api_doc.max_length == 0 {
            return Err("api_doc.max_length must be > 0".to_string());
        }
        if !(self.images.max_size_mb.is_finite() && self.images.max_size_mb > 0.0) {
            return Err("images.max_size_mb must be > 0".to_string());
        }
        if let Some((name, path)) = self.api.endpoints.all().find(|(_, p)| !p.starts_with('/')) {
            return Err(format!("endpoint '{name}' path must start with '/', got '{path}'"));
        }
        Ok(())
    }
}
