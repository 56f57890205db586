use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub simulation: SimulationConfig,
    pub live_feed: LiveFeedConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = SimulationConfig::default();
        let simulation = SimulationConfig {
            step_interval: millis_var("SIM_STEP_INTERVAL_MS", defaults.step_interval)?,
            step_typing_delay: millis_var("SIM_STEP_TYPING_MS", defaults.step_typing_delay)?,
            summary_typing_delay: millis_var(
                "SIM_SUMMARY_TYPING_MS",
                defaults.summary_typing_delay,
            )?,
            reply_typing_delay: millis_var("SIM_REPLY_TYPING_MS", defaults.reply_typing_delay)?,
            upload_ocr_delay: millis_var("SIM_UPLOAD_OCR_MS", defaults.upload_ocr_delay)?,
            recalculate_delay: millis_var("SIM_RECALCULATE_MS", defaults.recalculate_delay)?,
        };

        let live_feed = LiveFeedConfig {
            interval: seconds_var("LIVE_FEED_INTERVAL_SECS", LiveFeedConfig::default().interval)?,
        };

        let chat_store_path = env::var("CHAT_STORE_PATH")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            simulation,
            live_feed,
            storage: StorageConfig { chat_store_path },
        })
    }
}

fn millis_var(key: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(ConfigError::InvalidDuration { key }),
            Ok(millis) => Ok(Duration::from_millis(millis)),
        },
        Err(_) => Ok(default),
    }
}

fn seconds_var(key: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(ConfigError::InvalidDuration { key }),
            Ok(secs) => Ok(Duration::from_secs(secs)),
        },
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Delays driving the assistant and document simulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Spacing between automation steps.
    pub step_interval: Duration,
    pub step_typing_delay: Duration,
    pub summary_typing_delay: Duration,
    /// Simulated typing before a chat reply lands in the transcript.
    pub reply_typing_delay: Duration,
    /// Delay before an uploaded document auto-completes OCR.
    pub upload_ocr_delay: Duration,
    pub recalculate_delay: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_interval: Duration::from_millis(900),
            step_typing_delay: Duration::from_millis(400),
            summary_typing_delay: Duration::from_millis(600),
            reply_typing_delay: Duration::from_millis(800),
            upload_ocr_delay: Duration::from_millis(2000),
            recalculate_delay: Duration::from_millis(1500),
        }
    }
}

/// Cadence of the live dashboard feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveFeedConfig {
    pub interval: Duration,
}

impl Default for LiveFeedConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
        }
    }
}

/// Where assistant chats are kept. `None` keeps them in memory for the process lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    pub chat_store_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDuration { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDuration { key } => {
                write!(f, "{key} must be a positive whole number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidDuration { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
