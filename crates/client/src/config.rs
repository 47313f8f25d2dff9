use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ClientError, ClientResult};

/// Target platform; picks the default API base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    Ios,
    Android,
    #[default]
    Web,
}

impl Platform {
    /// API base URL reachable from this platform during development.
    pub fn default_api_url(self) -> &'static str {
        match self {
            Platform::Ios => "http://192.168.1.179:8000",
            Platform::Android => "http://10.0.2.2:8000",
            Platform::Web => "http://127.0.0.1:8000",
        }
    }
}

impl FromStr for Platform {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            "web" | "default" => Ok(Platform::Web),
            other => Err(ClientError::Config(format!(
                "unknown platform '{other}', expected ios, android or web"
            ))),
        }
    }
}

/// How listed lots are joined with their catalog records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LotEnrichment {
    /// One `GET /microgreens/{id}` per lot, issued concurrently.
    #[default]
    PerLot,
    /// One `GET /microgreens` for the whole list.
    Catalog,
}

impl FromStr for LotEnrichment {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-lot" | "per_lot" => Ok(LotEnrichment::PerLot),
            "catalog" => Ok(LotEnrichment::Catalog),
            other => Err(ClientError::Config(format!(
                "unknown lot enrichment '{other}', expected per-lot or catalog"
            ))),
        }
    }
}

/// Where phenological journal entries live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JournalMode {
    #[default]
    Local,
    Remote,
}

impl FromStr for JournalMode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(JournalMode::Local),
            "remote" | "server" => Ok(JournalMode::Remote),
            other => Err(ClientError::Config(format!(
                "unknown journal mode '{other}', expected local or remote"
            ))),
        }
    }
}

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL without trailing slash.
    pub api_url: String,
    /// Client-wide request timeout in seconds (default: `10`).
    pub request_timeout_secs: u64,
    /// Directory backing [`FileStorage`](crate::storage::FileStorage).
    pub data_dir: PathBuf,
    /// Optional lifetime of a stored token, in hours.
    pub session_ttl_hours: Option<i64>,
    pub lot_enrichment: LotEnrichment,
    pub journal_mode: JournalMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Platform::default().default_api_url().to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            session_ttl_hours: None,
            lot_enrichment: LotEnrichment::default(),
            journal_mode: JournalMode::default(),
        }
    }
}

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DATA_DIR: &str = ".sprout";

impl ClientConfig {
    /// Defaults pointed at an explicit base URL.
    pub fn for_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_base_url(api_url.into()),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                  |
    /// |-------------------------------|--------------------------|
    /// | `SPROUT_API_URL`              | platform default         |
    /// | `SPROUT_PLATFORM`             | `web`                    |
    /// | `SPROUT_REQUEST_TIMEOUT_SECS` | `10`                     |
    /// | `SPROUT_DATA_DIR`             | `.sprout`                |
    /// | `SPROUT_SESSION_TTL_HOURS`    | unset (no expiry)        |
    /// | `SPROUT_LOT_ENRICHMENT`       | `per-lot`                |
    /// | `SPROUT_JOURNAL_MODE`         | `local`                  |
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let platform: Platform = match var("SPROUT_PLATFORM") {
            Some(v) => v.parse()?,
            None => Platform::default(),
        };
        let api_url = var("SPROUT_API_URL")
            .map(normalize_base_url)
            .unwrap_or_else(|| platform.default_api_url().to_string());

        let request_timeout_secs = match var("SPROUT_REQUEST_TIMEOUT_SECS") {
            Some(v) => parse_number(&v, "SPROUT_REQUEST_TIMEOUT_SECS")?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let data_dir = var("SPROUT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let session_ttl_hours = var("SPROUT_SESSION_TTL_HOURS")
            .map(|v| parse_number::<i64>(&v, "SPROUT_SESSION_TTL_HOURS"))
            .transpose()?;

        let lot_enrichment = match var("SPROUT_LOT_ENRICHMENT") {
            Some(v) => v.parse()?,
            None => LotEnrichment::default(),
        };

        let journal_mode = match var("SPROUT_JOURNAL_MODE") {
            Some(v) => v.parse()?,
            None => JournalMode::default(),
        };

        Ok(Self {
            api_url,
            request_timeout_secs,
            data_dir,
            session_ttl_hours,
            lot_enrichment,
            journal_mode,
        })
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_number<T: FromStr>(raw: &str, key: &str) -> ClientResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| ClientError::Config(format!("{key} must be a valid number, got '{raw}'")))
}
