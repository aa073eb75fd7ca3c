//! Configuration system for the `MockChat` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/mockchat/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use mockchat_proto::Identity;
use mockchat_relay::config::SimulationConfig;
use mockchat_relay::responder::ReplyPolicy;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    simulation: SimulationFileConfig,
    ui: UiFileConfig,
}

/// `[simulation]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SimulationFileConfig {
    network_latency_ms: Option<u64>,
    broadcast_reply_probability: Option<f64>,
    broadcast_reply_delay_ms: Option<u64>,
    direct_reply_delay_ms: Option<u64>,
    acknowledgement: Option<String>,
    phrases: Option<Vec<String>>,
    peers: Option<Vec<Identity>>,
    seed: Option<u64>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    identity: Option<String>,
    poll_timeout_ms: Option<u64>,
    timestamp_format: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Identity to join with at startup, skipping the login prompt.
    pub identity: Option<String>,
    /// Longest wait for terminal input before the event loop redraws.
    pub poll_timeout: Duration,
    /// Settings of the simulated relay.
    pub simulation: SimulationConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            identity: None,
            poll_timeout: Duration::from_millis(50),
            simulation: SimulationConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// CLI args and env vars are parsed via `clap`. If `--config` is given
    /// and the file does not exist, returns an error. If no `--config` is
    /// given, the default path (`~/.config/mockchat/config.toml`) is tried
    /// and silently ignored if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let client_defaults = Self::default();
        let defaults = client_defaults.simulation;
        let sim = &file.simulation;

        let replies = ReplyPolicy {
            broadcast_probability: sim
                .broadcast_reply_probability
                .map_or(defaults.replies.broadcast_probability, |p| p.clamp(0.0, 1.0)),
            broadcast_delay: sim
                .broadcast_reply_delay_ms
                .map_or(defaults.replies.broadcast_delay, Duration::from_millis),
            direct_delay: sim
                .direct_reply_delay_ms
                .map_or(defaults.replies.direct_delay, Duration::from_millis),
            acknowledgement: sim
                .acknowledgement
                .clone()
                .unwrap_or(defaults.replies.acknowledgement),
            phrases: sim.phrases.clone().unwrap_or(defaults.replies.phrases),
        };

        let peers = if cli.peers.is_empty() {
            sim.peers.clone().unwrap_or(defaults.peers)
        } else {
            cli.peers.clone()
        };

        Self {
            identity: cli.identity.clone().or_else(|| file.ui.identity.clone()),
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(client_defaults.poll_timeout, Duration::from_millis),
            simulation: SimulationConfig {
                network_latency: sim
                    .network_latency_ms
                    .map_or(defaults.network_latency, Duration::from_millis),
                replies,
                peers,
                seed: cli.seed.or(sim.seed),
                timestamp_format: cli
                    .timestamp_format
                    .clone()
                    .or_else(|| file.ui.timestamp_format.clone())
                    .unwrap_or(defaults.timestamp_format),
            },
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Chat client backed by a simulated relay")]
pub struct CliArgs {
    /// Join immediately under this identity.
    #[arg(long, env = "MOCKCHAT_IDENTITY")]
    pub identity: Option<String>,

    /// Path to config file (default: `~/.config/mockchat/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Synthetic peer to list in the roster (repeatable).
    #[arg(long = "peer", value_parser = parse_peer)]
    pub peers: Vec<Identity>,

    /// Seed for reproducible synthetic replies.
    #[arg(long, env = "MOCKCHAT_SEED")]
    pub seed: Option<u64>,

    /// Timestamp display format (chrono format string).
    #[arg(long)]
    pub timestamp_format: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "MOCKCHAT_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/mockchat.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn parse_peer(raw: &str) -> Result<Identity, mockchat_proto::ValidationError> {
    Identity::parse(raw)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("mockchat").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
