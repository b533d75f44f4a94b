use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub breakdown: BreakdownConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub manifest: ManifestConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    #[serde(default = "default_web_address")]
    pub address: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// Public HTTPS origin the Mini App host loads us from
    #[serde(default = "default_public_url")]
    pub public_url: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Bearer token; `ETHOS_API_KEY` takes precedence
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BreakdownConfig {
    /// Jitter width around the primary score (offset in [-variance/2, variance/2])
    #[serde(default = "default_variance")]
    pub variance: u32,
    /// Fixed seed for reproducible breakdowns
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

/// Farcaster account association (signed domain proof)
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ManifestConfig {
    pub header: Option<String>,
    pub payload: Option<String>,
    pub signature: Option<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            address: default_web_address(),
            port: default_web_port(),
            public_url: default_public_url(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            api_key: None,
        }
    }
}

impl Default for BreakdownConfig {
    fn default() -> Self {
        Self {
            variance: default_variance(),
            seed: None,
        }
    }
}

// Default value functions
fn default_web_address() -> String { "0.0.0.0".to_string() }
fn default_web_port() -> u16 { 8000 }
fn default_public_url() -> String { "https://ethos-farcaster.deno.dev".to_string() }
fn default_static_dir() -> String { "static".to_string() }
fn default_base_url() -> String { "https://api.ethos.network".to_string() }
fn default_user_agent() -> String { "Ethos-Farcaster-MiniApp/1.0".to_string() }
fn default_timeout_ms() -> u64 { 5000 }
fn default_variance() -> u32 { 200 }

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path, e))?;
        let config = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config '{}': {}", path, e))?;
        Ok(config.with_env_overrides())
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply `ETHOS_API_KEY` from the environment
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = std::env::var("ETHOS_API_KEY").ok().filter(|k| !k.is_empty()) {
            self.upstream.api_key = Some(key);
        }
        self
    }
}
