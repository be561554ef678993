use crate::extraction::DEFAULT_MAX_PART_BYTES;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_SERVER_PORT: u16 = 5001;
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_INPUT_TOKENS: usize = 1024;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the docsum server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port bound on all interfaces.
    pub server_port: u16,
    /// Backend used to turn extracted text into a summary.
    pub summarization_provider: SummarizationProvider,
    /// Optional override for the backend base URL.
    pub summarization_url: Option<String>,
    /// Optional override for the backend model identifier.
    pub summarization_model: Option<String>,
    /// Bearer token sent to hosted inference endpoints.
    pub summarization_api_key: Option<String>,
    /// HTTP timeout applied to remote backends.
    pub summarization_timeout_secs: u64,
    /// Largest input, in tokens, forwarded to the backend.
    pub summarization_max_input_tokens: usize,
    /// Directory holding per-request scratch files.
    pub scratch_dir: PathBuf,
    /// Upper bound on the request body size.
    pub max_upload_bytes: usize,
    /// Upper bound on the decompressed size of an uploaded document body.
    pub max_document_bytes: u64,
}

/// Supported summarization backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummarizationProvider {
    /// Hugging Face inference endpoint serving a summarization pipeline.
    HuggingFace,
    /// Local Ollama runtime.
    Ollama,
    /// In-process deterministic sentence selection.
    Extractive,
}

impl SummarizationProvider {
    /// Stable lowercase name used in logs and health output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HuggingFace => "huggingface",
            Self::Ollama => "ollama",
            Self::Extractive => "extractive",
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server_port: parse_optional("SERVER_PORT")?.unwrap_or(DEFAULT_SERVER_PORT),
            summarization_provider: load_env_optional("SUMMARIZATION_PROVIDER")
                .map(|value| {
                    value.parse().map_err(|()| {
                        ConfigError::InvalidValue("SUMMARIZATION_PROVIDER".to_string())
                    })
                })
                .transpose()?
                .unwrap_or(SummarizationProvider::HuggingFace),
            summarization_url: load_env_optional("SUMMARIZATION_URL"),
            summarization_model: load_env_optional("SUMMARIZATION_MODEL"),
            summarization_api_key: load_env_optional("SUMMARIZATION_API_KEY"),
            summarization_timeout_secs: parse_optional("SUMMARIZATION_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            summarization_max_input_tokens: parse_optional("SUMMARIZATION_MAX_INPUT_TOKENS")?
                .unwrap_or(DEFAULT_MAX_INPUT_TOKENS),
            scratch_dir: load_env_optional("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            max_upload_bytes: parse_optional("MAX_UPLOAD_BYTES")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            max_document_bytes: parse_optional("MAX_DOCUMENT_BYTES")?
                .unwrap_or(DEFAULT_MAX_PART_BYTES),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            summarization_provider: SummarizationProvider::HuggingFace,
            summarization_url: None,
            summarization_model: None,
            summarization_api_key: None,
            summarization_timeout_secs: DEFAULT_TIMEOUT_SECS,
            summarization_max_input_tokens: DEFAULT_MAX_INPUT_TOKENS,
            scratch_dir: env::temp_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_document_bytes: DEFAULT_MAX_PART_BYTES,
        }
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

impl std::str::FromStr for SummarizationProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "ollama" => Ok(Self::Ollama),
            "extractive" | "none" => Ok(Self::Extractive),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
///
/// Install the tracing subscriber first so the loaded values are recorded.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    log_loaded(&config);
    CONFIG.set(config).expect("Failed to set config");
}

fn log_loaded(config: &Config) {
    tracing::debug!(
        server_port = config.server_port,
        provider = config.summarization_provider.as_str(),
        url = ?config.summarization_url,
        model = ?config.summarization_model,
        scratch_dir = %config.scratch_dir.display(),
        max_upload_bytes = config.max_upload_bytes,
        max_document_bytes = config.max_document_bytes,
        "Loaded configuration"
    );
}
