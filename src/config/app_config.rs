use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cache: CacheConfig,
    pub retrieval: RetrievalConfig,
    pub generation: GenerationConfig,
    pub translation: TranslationConfig,
    pub almanac: AlmanacConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// `redis` or `memory`
    pub backend: String,
    pub redis_url: String,
    pub ttl_minutes: u64,
    /// Max entries for the in-memory backend
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub base_url: String,
    pub collection: String,
    pub per_topic_limit: u32,
    pub filter_by_topic: bool,
    pub timeout_secs: u64,
    /// `chroma` or `memory`
    pub backend: String,
    /// JSON corpus file loaded at startup when the collection is empty;
    /// empty means the built-in seed set is used instead
    pub corpus_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Empty means translation is not configured
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlmanacConfig {
    pub api_url: String,
    /// Empty means the almanac is not configured
    pub api_key: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            ttl_minutes: 30,
            max_capacity: 10_000,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            collection: "horoscopes".to_string(),
            per_topic_limit: 2,
            filter_by_topic: false,
            timeout_secs: 10,
            backend: "memory".to_string(),
            corpus_path: String::new(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 20,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 10,
        }
    }
}

impl Default for AlmanacConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
