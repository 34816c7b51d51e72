// Numan Thabit 2025
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use tracing::info;

const DEFAULT_LISTEN: &str = "0.0.0.0:7878";
const DEFAULT_CONNECT: &str = "127.0.0.1:7878";
const DEFAULT_ROSTER_SIZE: usize = 8;
const DEFAULT_TICK_MS: u64 = 50;
const DEFAULT_CONFIG_PATH: &str = "ops/netsync-demo.toml";

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Server,
    Client,
}

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Synchronizes a fixed roster of player states over TCP using netsync-core",
    rename_all = "kebab-case"
)]
pub struct CliArgs {
    /// Whether this process drives the roster (server) or mirrors it (client).
    #[arg(long, value_enum)]
    pub role: Role,

    /// Path to a TOML configuration file.
    #[arg(long, value_name = "PATH", env = "NETSYNC_DEMO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Socket address the server binds, or the client connects to.
    #[arg(long)]
    pub addr: Option<SocketAddr>,

    /// Number of player slots in the synchronized roster.
    #[arg(long)]
    pub roster_size: Option<usize>,

    /// Interval between server ticks in milliseconds.
    #[arg(long)]
    pub tick_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub role: Role,
    pub addr: SocketAddr,
    pub roster_size: usize,
    pub tick_interval: Duration,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    addr: Option<SocketAddr>,
    roster_size: Option<usize>,
    tick_ms: Option<u64>,
}

impl Config {
    pub fn from_cli(cli: &CliArgs) -> Result<Self> {
        let file_cfg =
            load_file_config(cli.config.as_deref()).context("failed to load config file")?;
        let config = merge(cli, file_cfg)?;
        config.validate()?;
        config.log_summary();
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.roster_size == 0 {
            bail!("roster_size must be greater than 0");
        }
        if self.tick_interval.is_zero() {
            bail!("tick_ms must be greater than 0");
        }
        Ok(())
    }

    fn log_summary(&self) {
        info!(
            role = ?self.role,
            addr = %self.addr,
            roster_size = self.roster_size,
            tick_ms = self.tick_interval.as_millis(),
            "netsync-demo configuration"
        );
    }
}

fn merge(cli: &CliArgs, file_cfg: Option<(PathBuf, FileConfig)>) -> Result<Config> {
    let (cfg_path, file_cfg) = file_cfg.unzip();
    let file_cfg = file_cfg.unwrap_or_default();

    let default_addr = match cli.role {
        Role::Server => DEFAULT_LISTEN,
        Role::Client => DEFAULT_CONNECT,
    };
    let addr = pick(cli.addr, file_cfg.addr, default_addr.parse().unwrap());
    let roster_size = pick(cli.roster_size, file_cfg.roster_size, DEFAULT_ROSTER_SIZE);
    let tick_ms = pick(cli.tick_ms, file_cfg.tick_ms, DEFAULT_TICK_MS);

    Ok(Config {
        role: cli.role,
        addr,
        roster_size,
        tick_interval: Duration::from_millis(tick_ms),
        config_path: cfg_path,
    })
}

fn pick<T: Clone>(cli: Option<T>, file: Option<T>, default: T) -> T {
    cli.or(file).unwrap_or(default)
}

fn load_file_config(path: Option<&Path>) -> Result<Option<(PathBuf, FileConfig)>> {
    if let Some(path) = path {
        return read_config(path).map(|cfg| Some((path.to_path_buf(), cfg)));
    }

    let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        return read_config(&default_path).map(|cfg| Some((default_path, cfg)));
    }

    Ok(None)
}

fn read_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        bail!("config file {} does not exist", path.display());
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let cfg: FileConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(cfg)
}
