//! Application configuration
//!
//! Central location for configuration constants, resource limits and
//! validation boundaries, plus the runtime [`ServerConfig`] read from the
//! environment at startup.

use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

// ===== Upload Allow-Lists =====

/// Extensions accepted by the document upload endpoint
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "txt"];

/// Extensions accepted by the game upload endpoint
pub const GAME_EXTENSIONS: &[&str] = &["html", "htm", "js", "css", "zip"];

/// Extensions accepted by the image upload endpoint
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

// ===== Placeholders =====

/// Title given to a conversation created without one
pub const DEFAULT_CONVERSATION_TITLE: &str = "新对话";

/// Title given to a document uploaded without one
pub const DEFAULT_DOCUMENT_TITLE: &str = "未命名文档";

/// Stem used for stored file names when the sanitized title is empty
pub const FALLBACK_FILE_STEM: &str = "untitled";

/// Number of characters of the first message copied into the conversation title
pub const CONVERSATION_TITLE_CHARS: usize = 30;

// ===== Upload Storage =====

/// Upload sub-directory for documents (pdf/txt)
pub const DOCUMENTS_DIR: &str = "pdfs";

/// Upload sub-directory for images
pub const IMAGES_DIR: &str = "images";

/// Upload sub-directory for game bundles
pub const GAMES_DIR: &str = "games";

/// Longest sanitized title kept in a stored file name, in characters
pub const MAX_FILE_STEM_CHARS: usize = 60;

/// How many times a colliding stored file name is retried with a bumped timestamp
pub const MAX_FILE_NAME_ATTEMPTS: u32 = 16;

/// Fallback sequence tried when decoding uploaded text files, after the
/// encoding declared by the client. UTF-8 with replacement is the last resort.
pub const TEXT_FALLBACK_ENCODINGS: &[&str] = &["utf-8", "gbk", "gb18030", "big5"];

// ===== AI Provider =====

/// OpenAI-compatible chat completion endpoint of the Qwen provider
pub const DEFAULT_QWEN_API_URL: &str =
    "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions";

/// Model identifier sent with every proxied request
pub const DEFAULT_QWEN_MODEL: &str = "qwen-plus";

/// Upper bound for one proxied chat completion call
pub const DEFAULT_QWEN_TIMEOUT_SECS: u64 = 30;

// ===== Server Defaults =====

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Maximum request body size in MiB (uploads included)
pub const DEFAULT_MAX_UPLOAD_MB: usize = 100;

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "freework.db";

/// Upload root directory name inside the data directory
pub const UPLOADS_DIR: &str = "uploads";

/// Runtime configuration of the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Require a bearer token on `/api` routes
    pub require_auth: bool,
    pub ai: AiProviderConfig,
}

/// Where and how the chat proxy talks to the AI provider
#[derive(Debug, Clone)]
pub struct AiProviderConfig {
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for AiProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_QWEN_API_URL.to_string(),
            model: DEFAULT_QWEN_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_QWEN_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    /// Configuration rooted at `data_dir` with every other value defaulted
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            require_auth: false,
            ai: AiProviderConfig::default(),
        }
    }

    /// Read configuration from `FREEWORK_*` and `QWEN_*` environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = env_or("FREEWORK_DATA_DIR", DEFAULT_DATA_DIR);
        let mut config = Self::with_data_dir(PathBuf::from(data_dir));

        config.host = env_or("FREEWORK_HOST", DEFAULT_HOST);
        config.port = env_or("FREEWORK_PORT", &DEFAULT_PORT.to_string())
            .parse()
            .context("FREEWORK_PORT must be a port number")?;

        let max_upload_mb: usize = env_or("FREEWORK_MAX_UPLOAD_MB", &DEFAULT_MAX_UPLOAD_MB.to_string())
            .parse()
            .context("FREEWORK_MAX_UPLOAD_MB must be a whole number of MiB")?;
        config.max_upload_bytes = max_upload_mb * 1024 * 1024;

        config.require_auth = parse_bool(&env_or("FREEWORK_REQUIRE_AUTH", "false"))
            .context("FREEWORK_REQUIRE_AUTH must be true or false")?;

        config.ai.api_url = env_or("QWEN_API_URL", DEFAULT_QWEN_API_URL);
        config.ai.model = env_or("QWEN_MODEL", DEFAULT_QWEN_MODEL);
        let timeout_secs: u64 = env_or("QWEN_TIMEOUT_SECS", &DEFAULT_QWEN_TIMEOUT_SECS.to_string())
            .parse()
            .context("QWEN_TIMEOUT_SECS must be a whole number of seconds")?;
        config.ai.timeout = Duration::from_secs(timeout_secs);

        Ok(config)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn upload_root(&self) -> PathBuf {
        self.data_dir.join(UPLOADS_DIR)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognised boolean '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool(" YES ").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(!parse_bool("").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_derived_paths() {
        let config = ServerConfig::with_data_dir(PathBuf::from("/srv/freework"));
        assert_eq!(config.database_path(), PathBuf::from("/srv/freework/freework.db"));
        assert_eq!(config.upload_root(), PathBuf::from("/srv/freework/uploads"));
        assert_eq!(config.socket_addr().unwrap().port(), DEFAULT_PORT);
    }
}
