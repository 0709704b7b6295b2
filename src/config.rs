use anyhow::{Context, Result};
use globset::Glob;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub content: ContentConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub delegate: Option<DelegateConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    pub root: PathBuf,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

fn default_max_results() -> usize {
    5
}

/// External search process, consulted before the local keyword search.
#[derive(Debug, Deserialize, Clone)]
pub struct DelegateConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// The delegate only runs while this variable is set and non-empty.
    #[serde(default = "default_enable_env")]
    pub enable_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Stdout beyond this many bytes fails the search.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

fn default_enable_env() -> String {
    "GOOGLE_API_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_output_bytes() -> usize {
    4 * 1024 * 1024
}

impl DelegateConfig {
    pub fn is_enabled(&self) -> bool {
        std::env::var(&self.enable_env)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }
}

impl Config {
    /// Config rooted at `content_root` with every optional section at its default.
    pub fn minimal(content_root: impl Into<PathBuf>) -> Self {
        Self {
            content: ContentConfig {
                root: content_root.into(),
                exclude_globs: Vec::new(),
                follow_symlinks: false,
            },
            server: ServerConfig {
                bind: "127.0.0.1:3000".to_string(),
            },
            search: SearchConfig::default(),
            delegate: None,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;

    Ok(config)
}

pub fn validate(config: &Config) -> Result<()> {
    if config.search.max_results < 1 {
        anyhow::bail!("search.max_results must be >= 1");
    }

    for pattern in &config.content.exclude_globs {
        Glob::new(pattern)
            .with_context(|| format!("content.exclude_globs: invalid pattern '{}'", pattern))?;
    }

    if let Some(delegate) = &config.delegate {
        if delegate.command.trim().is_empty() {
            anyhow::bail!("delegate.command must not be empty");
        }
        if delegate.timeout_secs == 0 {
            anyhow::bail!("delegate.timeout_secs must be > 0");
        }
        if delegate.max_output_bytes == 0 {
            anyhow::bail!("delegate.max_output_bytes must be > 0");
        }
        if delegate.enable_env.trim().is_empty() {
            anyhow::bail!("delegate.enable_env must name an environment variable");
        }
    }

    Ok(())
}
