use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_DSN: &str = "sqlite://ehs.db";
pub const DEFAULT_MEDIA_DIR: &str = "./uploads";

/// Save configuration information related to the ehs console
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub db_dsn: String,
    pub media_dir: PathBuf,
    /// Artificial wait before a work report is processed
    pub report_delay: Duration,
    pub log_level: String,
    pub debug_sql: bool,
}

impl ServiceConfig {
    pub fn new(
        db_dsn: String,
        media_dir: String,
        report_delay: Duration,
        log_level: String,
        debug_sql: bool,
    ) -> Self {
        Self {
            db_dsn,
            media_dir: PathBuf::from(media_dir),
            report_delay,
            log_level,
            debug_sql,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig::new(
            DEFAULT_DB_DSN.to_string(),
            DEFAULT_MEDIA_DIR.to_string(),
            Duration::ZERO,
            "warn".to_string(),
            false,
        )
    }
}
