//! Configuration layer: typed settings with layered precedence
//! (defaults → file → environment → CLI).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use config::{Config, Environment, File};
use hugo_reader_site::SiteClientConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
const ENV_PREFIX: &str = "HUGO_READER";

/// Command-line arguments for the Hugo Reader binary.
#[derive(Debug, Parser)]
#[command(name = "hugo-reader", version, about = "Read-only query server for Hugo sites")]
pub struct CliArgs {
    /// Optional path to a configuration file (YAML or TOML).
    #[arg(long = "config", env = "HUGO_READER_CONFIG", value_name = "PATH", global = true)]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve(ServeArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "host", value_name = "HOST")]
    pub host: Option<String>,

    /// Override the listener port.
    #[arg(long = "port", value_name = "PORT")]
    pub port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Override the log format (text|json).
    #[arg(long = "log-format", value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Override the per-request HTTP timeout (e.g. `10s`).
    #[arg(long = "http-timeout", value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub http_timeout: Option<Duration>,

    /// Override the `User-Agent` sent to sites.
    #[arg(long = "user-agent", value_name = "AGENT")]
    pub user_agent: Option<String>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub client: SiteClientConfig,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub default_ttl: Duration,
    pub sweep_interval: Duration,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Loads settings: optional file, then `HUGO_READER__*` variables, then CLI flags.
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder();

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    if let Some(Command::Serve(args)) = cli.command.as_ref() {
        raw.apply_serve_overrides(&args.overrides);
    }

    Settings::from_raw(raw)
}

/// Parses the process arguments and resolves settings from them.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    client: RawClientSettings,
    cache: RawCacheSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    format: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawClientSettings {
    #[serde(with = "humantime_serde::option")]
    http_timeout: Option<Duration>,
    user_agent: Option<String>,
    #[serde(with = "humantime_serde::option")]
    search_ttl: Option<Duration>,
    #[serde(with = "humantime_serde::option")]
    discovery_ttl: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    #[serde(with = "humantime_serde::option")]
    default_ttl: Option<Duration>,
    #[serde(with = "humantime_serde::option")]
    sweep_interval: Option<Duration>,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.port {
            self.server.port = Some(port);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(format) = overrides.log_format.as_ref() {
            self.logging.format = Some(format.clone());
        }
        if let Some(timeout) = overrides.http_timeout {
            self.client.http_timeout = Some(timeout);
        }
        if let Some(agent) = overrides.user_agent.as_ref() {
            self.client.user_agent = Some(agent.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            client,
            cache,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            client: build_client_settings(client)?,
            cache: build_cache_settings(cache)?,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            },
            logging: LoggingSettings {
                level: LevelFilter::INFO,
                format: LogFormat::Text,
            },
            client: SiteClientConfig::default(),
            cache: CacheSettings {
                default_ttl: DEFAULT_CACHE_TTL,
                sweep_interval: DEFAULT_SWEEP_INTERVAL,
            },
        }
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = server.port.unwrap_or(DEFAULT_PORT);

    let candidate = format!("{host}:{port}");
    let addr = candidate.parse().map_err(|err| {
        LoadError::invalid("server.host", format!("invalid address `{candidate}`: {err}"))
    })?;

    Ok(ServerSettings { addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = match logging.format.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("text") | Some("compact") => LogFormat::Text,
        Some("json") => LogFormat::Json,
        Some(other) => {
            return Err(LoadError::invalid(
                "logging.format",
                format!("expected `text` or `json`, got `{other}`"),
            ));
        },
    };

    Ok(LoggingSettings { level, format })
}

fn build_client_settings(client: RawClientSettings) -> Result<SiteClientConfig, LoadError> {
    let mut builder = SiteClientConfig::builder();
    if let Some(timeout) = client.http_timeout {
        builder = builder.http_timeout(timeout);
    }
    if let Some(agent) = client.user_agent {
        builder = builder.user_agent(agent);
    }
    if let Some(ttl) = client.search_ttl {
        builder = builder.search_ttl(ttl);
    }
    if let Some(ttl) = client.discovery_ttl {
        builder = builder.discovery_ttl(ttl);
    }

    builder
        .build()
        .map_err(|reason| LoadError::invalid("client", reason))
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let default_ttl = cache.default_ttl.unwrap_or(DEFAULT_CACHE_TTL);
    if default_ttl.is_zero() {
        return Err(LoadError::invalid("cache.default_ttl", "must be greater than zero"));
    }

    let sweep_interval = cache.sweep_interval.unwrap_or(DEFAULT_SWEEP_INTERVAL);
    if sweep_interval.is_zero() {
        return Err(LoadError::invalid(
            "cache.sweep_interval",
            "must be greater than zero",
        ));
    }

    Ok(CacheSettings {
        default_ttl,
        sweep_interval,
    })
}
