use std::env;

/// Which transformation processor the operation worker runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorKind {
    /// No worker is started; operations stay `pending`.
    None,
    /// Copies the source image as the result. Development only.
    Passthrough,
}

impl ProcessorKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "none" | "" => Some(ProcessorKind::None),
            "passthrough" => Some(ProcessorKind::Passthrough),
            _ => None,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection string (default: local SQLite file)
    pub database_url: String,

    /// Directory holding uploaded images and results (default: "./storage")
    pub storage_root: String,

    /// Maximum upload size in bytes (default: 50 MB)
    pub max_upload_size: usize,

    /// Allowed CORS Origins (comma separated)
    pub allowed_origins: Vec<String>,

    /// Operation processor (default: none)
    pub operation_processor: ProcessorKind,

    /// Seconds between worker polls for pending operations (default: 5)
    pub worker_poll_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://photo_editor.db?mode=rwc".to_string(),
            storage_root: "./storage".to_string(),
            max_upload_size: 50 * 1024 * 1024, // 50 MB
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(), // Vite default
                "http://127.0.0.1:3000".to_string(),
            ],
            operation_processor: ProcessorKind::None,
            worker_poll_interval_secs: 5,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            storage_root: env::var("STORAGE_ROOT").unwrap_or(default.storage_root),

            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(default.allowed_origins),

            operation_processor: env::var("OPERATION_PROCESSOR")
                .ok()
                .map(|v| {
                    ProcessorKind::parse(&v).unwrap_or_else(|| {
                        tracing::warn!("Unknown OPERATION_PROCESSOR '{}', using none", v);
                        ProcessorKind::None
                    })
                })
                .unwrap_or(default.operation_processor),

            worker_poll_interval_secs: env::var("WORKER_POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(default.worker_poll_interval_secs),
        }
    }

    /// Create config for development (in-memory friendly, passthrough processor)
    pub fn development() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            operation_processor: ProcessorKind::Passthrough,
            worker_poll_interval_secs: 1,
            ..Self::default()
        }
    }

    /// Create config for production (no stub processor, explicit origins)
    pub fn production() -> Self {
        let from_env = Self::from_env();
        Self {
            operation_processor: ProcessorKind::None,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
            ..from_env
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.max_upload_size, 50 * 1024 * 1024);
        assert_eq!(config.operation_processor, ProcessorKind::None);
        assert_eq!(config.worker_poll_interval_secs, 5);
        assert!(!config.allowed_origins.contains(&"*".to_string()));
    }

    #[test]
    fn test_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.operation_processor, ProcessorKind::Passthrough);
    }

    #[test]
    fn test_production_never_uses_stub_processor() {
        let config = AppConfig::production();
        assert_eq!(config.operation_processor, ProcessorKind::None);
    }

    #[test]
    fn test_processor_kind_parse() {
        assert_eq!(ProcessorKind::parse("none"), Some(ProcessorKind::None));
        assert_eq!(
            ProcessorKind::parse(" Passthrough "),
            Some(ProcessorKind::Passthrough)
        );
        assert_eq!(ProcessorKind::parse("stable-diffusion"), None);
    }
}
