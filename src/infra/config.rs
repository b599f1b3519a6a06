//! Layered configuration: defaults, optional TOML file, then environment.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// MCP over stdin/stdout.
    Stdio,
    /// Streamable HTTP at `/mcp` plus `/healthz`.
    Http,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Mode::Stdio),
            "http" | "server" => Ok(Mode::Http),
            other => bail!("Invalid MODE: {other}. Must be 'stdio' or 'http'"),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Stdio => "stdio",
            Mode::Http => "http",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub connect_timeout_ms: u64,
    /// Whole-request timeout; unset means the transport waits indefinitely.
    pub timeout_ms: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub port: u16,
    pub upstream: UpstreamConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Stdio,
            port: DEFAULT_PORT,
            upstream: UpstreamConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    mode: Option<String>,
    port: Option<u16>,
    #[serde(default)]
    upstream: FileUpstream,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileUpstream {
    base_url: Option<String>,
    connect_timeout_ms: Option<u64>,
    timeout_ms: Option<u64>,
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env_nonempty(key).and_then(|v| v.trim().parse::<T>().ok())
}

impl Config {
    /// Load config: `PRODUCTS_MCP_CONFIG` TOML file (if set), then env overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match env_nonempty("PRODUCTS_MCP_CONFIG") {
            Some(path) => Self::from_toml_file(Path::new(&path))?,
            None => Self::default(),
        };
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let file: FileConfig = toml::from_str(raw)?;
        let defaults = Self::default();
        Ok(Self {
            mode: match file.mode {
                Some(m) => m.parse()?,
                None => defaults.mode,
            },
            port: file.port.unwrap_or(defaults.port),
            upstream: UpstreamConfig {
                base_url: file.upstream.base_url.unwrap_or(defaults.upstream.base_url),
                connect_timeout_ms: file
                    .upstream
                    .connect_timeout_ms
                    .unwrap_or(defaults.upstream.connect_timeout_ms),
                timeout_ms: file.upstream.timeout_ms,
            },
        })
    }

    fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Some(mode) = env_nonempty("MODE") {
            self.mode = mode.parse()?;
        }
        if let Some(port) = env_parse::<u16>("PORT") {
            self.port = port;
        }
        if let Some(base) = env_nonempty("PRODUCTS_BASE_URL") {
            self.upstream.base_url = base;
        }
        if let Some(ms) = env_parse::<u64>("PRODUCTS_CONNECT_TIMEOUT_MS") {
            self.upstream.connect_timeout_ms = ms;
        }
        if let Some(ms) = env_parse::<u64>("PRODUCTS_TIMEOUT_MS") {
            self.upstream.timeout_ms = Some(ms);
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.mode == Mode::Http && self.port == 0 {
            bail!("PORT cannot be 0");
        }
        url::Url::parse(&self.upstream.base_url)
            .with_context(|| format!("invalid upstream base URL {:?}", self.upstream.base_url))?;
        Ok(())
    }
}
