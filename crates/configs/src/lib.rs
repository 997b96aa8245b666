use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub hashid: HashIdConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 3000, service_name: default_service_name() }
    }
}

/// Salt and padding for the identifier codec. Both are required; there is
/// no usable default for the salt.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct HashIdConfig {
    #[serde(default)]
    pub salt: String,
    #[serde(default)]
    pub min_length: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub encoding: LogEncoding,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: default_log_level(), encoding: LogEncoding::default() }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogEncoding {
    #[default]
    Json,
    Console,
}

impl std::str::FromStr for LogEncoding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "console" | "text" => Ok(Self::Console),
            other => Err(anyhow!("unknown log encoding `{other}` (expected json or console)")),
        }
    }
}

fn default_service_name() -> String { "service".to_string() }
fn default_log_level() -> String { "info".to_string() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

/// Reads a TOML file; a missing file yields the defaults so that a pure
/// environment-driven deployment needs no file at all.
pub fn load_from_file(path: &str) -> Result<AppConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => load_from_str(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(anyhow!("cannot read {path}: {e}")),
    }
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay values from an environment-like lookup. Keys follow the
    /// deployment conventions: `HASHID_SALT`, `HASHID_MIN_LENGTH`,
    /// `HTTP_HOST`, `HTTP_PORT`, `SERVICE_NAME`, `LOG_LEVEL`, `LOG_ENCODING`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(salt) = lookup("HASHID_SALT") {
            self.hashid.salt = salt;
        }
        if let Some(raw) = lookup("HASHID_MIN_LENGTH") {
            let n = raw
                .trim()
                .parse::<usize>()
                .map_err(|e| anyhow!("HASHID_MIN_LENGTH must be a non-negative integer: {e}"))?;
            self.hashid.min_length = Some(n);
        }
        if let Some(host) = lookup("HTTP_HOST") {
            self.server.host = host;
        }
        if let Some(raw) = lookup("HTTP_PORT") {
            self.server.port = raw
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow!("HTTP_PORT is not a valid port: {e}"))?;
        }
        if let Some(name) = lookup("SERVICE_NAME") {
            self.server.service_name = name;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(raw) = lookup("LOG_ENCODING") {
            self.log.encoding = raw.parse()?;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.hashid.validate()?;
        self.log.normalize();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if self.service_name.trim().is_empty() {
            self.service_name = default_service_name();
        }
        Ok(())
    }
}

impl HashIdConfig {
    pub fn new(salt: impl Into<String>, min_length: usize) -> Self {
        Self { salt: salt.into(), min_length: Some(min_length) }
    }

    pub fn validate(&self) -> Result<()> {
        if self.salt.is_empty() {
            return Err(anyhow!("hashid.salt is empty; set it in config.toml or HASHID_SALT"));
        }
        if self.min_length.is_none() {
            return Err(anyhow!(
                "hashid.min_length is missing; set it in config.toml or HASHID_MIN_LENGTH"
            ));
        }
        Ok(())
    }

    pub fn min_length(&self) -> usize {
        self.min_length.unwrap_or_default()
    }
}

impl LogConfig {
    fn normalize(&mut self) {
        if self.level.trim().is_empty() {
            self.level = default_log_level();
        }
    }
}
