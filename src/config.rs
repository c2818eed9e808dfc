//! Configuration management for the PDF coordinate server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Upload size limit used when `MAX_CONTENT_LENGTH` is not set (50MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// File extensions accepted by the upload form
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf"];

const DEV_SESSION_SECRET: &str = "dev-secret-key-for-pdf-coordinates";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub render_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Uploaded PDFs
    pub upload_dir: PathBuf,
    /// Rendered page images
    pub temp_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Key for the flash cookie signature
    pub secret: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
                render_timeout_secs: 30,
            },
            database: DatabaseConfig {
                url: "sqlite:./pdf_coords.db".to_string(),
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from("./uploads"),
                temp_dir: PathBuf::from("./temp"),
            },
            session: SessionConfig {
                secret: DEV_SESSION_SECRET.to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let defaults = Config::default();

        let secret = match env::var("SESSION_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            Ok(_) | Err(env::VarError::NotPresent) => {
                tracing::warn!("SESSION_SECRET not set, using development secret");
                defaults.session.secret
            }
            Err(e) => return Err(e),
        };

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port),
                max_upload_bytes: parse_var("MAX_CONTENT_LENGTH", defaults.server.max_upload_bytes),
                render_timeout_secs: parse_var(
                    "RENDER_TIMEOUT_SECS",
                    defaults.server.render_timeout_secs,
                ),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
            },
            storage: StorageConfig {
                upload_dir: env::var("UPLOAD_FOLDER")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.upload_dir),
                temp_dir: env::var("TEMP_FOLDER")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.temp_dir),
            },
            session: SessionConfig { secret },
        })
    }
}

/// Read and parse an env var, keeping the default when absent or malformed
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value for {}: {:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}

/// Check a client-supplied filename against [`ALLOWED_EXTENSIONS`]
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
