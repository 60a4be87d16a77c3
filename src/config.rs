use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Top-level application configuration loaded from file + environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageSection,
    pub s3: S3Section,
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load configuration from disk and environment.
    pub fn load() -> Result<Self> {
        let config_path = env::var("FILEGATE_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut builder = config::Config::builder();

        if Path::new(&config_path).exists() {
            builder = builder.add_source(config::File::from(PathBuf::from(&config_path)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("FILEGATE")
                .separator("_")
                .try_parsing(true),
        );

        let settings = builder.build()?;
        let mut config: Self = settings.try_deserialize()?;

        // Flat override switches; nested keys with underscores cannot be
        // addressed through the prefixed environment source above.
        if let Ok(flag) = env::var("FILEGATE_USE_S3") {
            config.storage.use_s3 = flag.parse().context("invalid FILEGATE_USE_S3")?;
        }
        if let Ok(root) = env::var("FILEGATE_LOCAL_ROOT") {
            config.storage.local_root = root;
        }

        if config.logging.level.trim().is_empty() {
            config.logging.level = "info".to_string();
        }

        config.s3.validate()?;

        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Which backend serves S3-provider requests, and where the local
/// emulation root lives when the real backend is disabled.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub use_s3: bool,
    pub local_root: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            use_s3: false,
            local_root: "media".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct S3Section {
    pub region: String,
    pub endpoint: Option<String>,
    pub profile: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl S3Section {
    /// Static credentials only make sense as a complete pair.
    pub fn validate(&self) -> Result<()> {
        let has_key = self
            .access_key_id
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        let has_secret = self
            .secret_access_key
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());

        if has_key != has_secret {
            bail!("s3.access_key_id and s3.secret_access_key must be provided together");
        }

        Ok(())
    }
}

impl Default for S3Section {
    fn default() -> Self {
        Self {
            region: "us-east-2".to_string(),
            endpoint: None,
            profile: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}
