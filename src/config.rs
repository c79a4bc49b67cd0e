use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::llm::{LLMConfig, LLMProvider};
use crate::metadata::BeatMetadata;

/// Configuration for the beat title service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Marketplace scraping settings
    pub scraper: ScraperConfig,

    /// Title cache settings
    pub cache: CacheConfig,

    /// Language model used for rephrasing
    pub llm: LLMConfig,

    /// Default beat metadata for formatting and exports
    pub metadata: BeatMetadata,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allow cross-origin browser access
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Marketplace base URL
    pub base_url: String,

    /// Path of the explore page, appended to `base_url`
    pub explore_path: String,

    /// HTTP request timeout in seconds
    pub request_timeout_seconds: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Maximum number of titles kept per scrape
    pub title_limit: usize,

    /// Scrapes yielding fewer titles than this are discarded
    pub min_viable_yield: usize,

    /// Probability of serving curated titles without a live fetch
    pub skip_live_probability: f64,
}

impl ScraperConfig {
    /// Full explore page URL
    pub fn explore_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.explore_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache TTL in seconds
    pub ttl_seconds: u64,

    /// Fetch every genre's titles at startup
    pub warm_on_startup: bool,
}

impl CacheConfig {
    pub fn ttl_millis(&self) -> u64 {
        self.ttl_seconds.saturating_mul(1000)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level for this crate
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.beatstars.com".to_string(),
            explore_path: "/explore/beats".to_string(),
            request_timeout_seconds: 8,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            title_limit: 20,
            min_viable_yield: 5,
            skip_live_probability: 0.3,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 3600, // 1 hour
            warm_on_startup: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config_paths = [
            "beat-titles.toml",
            "config/beat-titles.toml",
            "/etc/beat-titles/config.toml",
        ];

        let mut config = config_paths
            .iter()
            .map(Path::new)
            .filter(|path| path.exists())
            .find_map(|path| match Self::load_from_path(path) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!("Failed to load config file {}: {}", path.display(), e);
                    None
                }
            })
            .unwrap_or_default();

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from one TOML file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)?;
        let config = toml::from_str(&config_str)?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Override settings from environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("BEAT_TITLES_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("BEAT_TITLES_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| anyhow!("Invalid BEAT_TITLES_PORT '{}': {}", port, e))?;
        }

        if let Ok(base_url) = std::env::var("BEAT_TITLES_BASE_URL") {
            self.scraper.base_url = base_url;
        }

        if let Ok(ttl) = std::env::var("BEAT_TITLES_CACHE_TTL") {
            self.cache.ttl_seconds = ttl
                .parse()
                .map_err(|e| anyhow!("Invalid BEAT_TITLES_CACHE_TTL '{}': {}", ttl, e))?;
        }

        if let Ok(log_level) = std::env::var("BEAT_TITLES_LOG_LEVEL") {
            self.logging.level = log_level;
        }

        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            if !api_key.trim().is_empty() {
                self.llm.api_key = Some(api_key);
            }
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.cache.ttl_seconds == 0 {
            return Err(anyhow!("cache.ttl_seconds must be greater than 0"));
        }

        if self.scraper.request_timeout_seconds == 0 {
            return Err(anyhow!("scraper.request_timeout_seconds must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&self.scraper.skip_live_probability) {
            return Err(anyhow!("scraper.skip_live_probability must be between 0 and 1"));
        }

        if self.scraper.min_viable_yield > self.scraper.title_limit {
            return Err(anyhow!(
                "scraper.min_viable_yield ({}) cannot exceed scraper.title_limit ({})",
                self.scraper.min_viable_yield,
                self.scraper.title_limit
            ));
        }

        url::Url::parse(&self.scraper.explore_url())
            .map_err(|e| anyhow!("Invalid scraper URL {}: {}", self.scraper.explore_url(), e))?;

        self.metadata
            .validate()
            .map_err(|e| anyhow!("Invalid default metadata: {}", e))?;

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Beat Title Generator Configuration:\n\
            - Listen: {}:{}\n\
            - Source: {}\n\
            - Request Timeout: {}s\n\
            - Cache TTL: {}s\n\
            - Minimum Viable Yield: {}\n\
            - LLM Provider: {:?} ({})",
            self.server.host,
            self.server.port,
            self.scraper.explore_url(),
            self.scraper.request_timeout_seconds,
            self.cache.ttl_seconds,
            self.scraper.min_viable_yield,
            self.llm.provider,
            self.llm.model
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.scraper.base_url = base_url;
        self
    }

    pub fn with_cache_ttl(mut self, ttl_seconds: u64) -> Self {
        self.config.cache.ttl_seconds = ttl_seconds;
        self
    }

    pub fn with_min_viable_yield(mut self, min_viable_yield: usize) -> Self {
        self.config.scraper.min_viable_yield = min_viable_yield;
        self
    }

    pub fn with_skip_live_probability(mut self, probability: f64) -> Self {
        self.config.scraper.skip_live_probability = probability;
        self
    }

    pub fn with_llm_provider(mut self, provider: LLMProvider) -> Self {
        self.config.llm.provider = provider;
        self
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.config.llm.api_key = Some(api_key);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
