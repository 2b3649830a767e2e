use anyhow::{ensure, Context, Result};
use clap::Parser;
use serde::Deserialize;
use spark_guidance::FrameContext;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;

/// Command line flags. Every flag can also come from the environment and
/// overrides the matching value of the config file.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "spark-starlight")]
#[command(about = "Spatial guidance service for visually impaired navigation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, short, env = "STARLIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long = "log-level", env = "RUST_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
        }
    }
}

/// Per-session streaming policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Minimum time between two processed frames of one session.
    pub throttle_ms: u64,
    /// An unchanged instruction is spoken again only after this long.
    pub repeat_ms: u64,
    /// Sessions without a frame for this long are dropped.
    pub idle_secs: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            throttle_ms: 300,
            repeat_ms: 2000,
            idle_secs: 60,
        }
    }
}

/// Frame size assumed when a request does not carry one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub stream: StreamConfig,
    pub frame: FrameConfig,
    pub vocabulary: VocabularyConfig,
}

impl Config {
    /// Defaults, then the config file, then flags and environment.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        if let Some(host) = &cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if let Some(level) = &cli.log_level {
            config.server.log_level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&source)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.server.port != 0, "server.port must not be 0");
        ensure!(!self.server.host.trim().is_empty(), "server.host must not be empty");
        self.level_filter()?;
        self.default_frame()?;
        ensure!(
            self.stream.repeat_ms >= self.stream.throttle_ms,
            "stream.repeat_ms ({}) must not be shorter than stream.throttle_ms ({})",
            self.stream.repeat_ms,
            self.stream.throttle_ms
        );
        ensure!(self.stream.idle_secs > 0, "stream.idle_secs must be positive");
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.server
            .log_level
            .parse::<LevelFilter>()
            .with_context(|| format!("Unknown log level '{}'", self.server.log_level))
    }

    pub fn default_frame(&self) -> Result<FrameContext> {
        Ok(FrameContext::new(self.frame.width, self.frame.height)?)
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.stream.throttle_ms)
    }

    pub fn repeat(&self) -> Duration {
        Duration::from_millis(self.stream.repeat_ms)
    }

    pub fn idle(&self) -> Duration {
        Duration::from_secs(self.stream.idle_secs)
    }
}
