use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Load the demonstration patents, ledgers and grants at startup
    pub load_seed_data: bool,
    /// Idle time after which an open funding edit session is discarded
    pub session_ttl_secs: u64,
    /// Year used for the "filed this year" statistic; current year if unset
    pub reporting_year: Option<i32>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            load_seed_data: true,
            session_ttl_secs: 1800,
            reporting_year: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Add default configuration
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // Add config file if it exists
        config = config.add_source(config::File::with_name("config").required(false));

        // Environment variables, e.g. RDC_SERVER__PORT or RDC_CATALOG__LOAD_SEED_DATA
        config = config.add_source(
            config::Environment::with_prefix("RDC")
                .separator("__")
                .prefix_separator("_")
                .try_parsing(true),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn reporting_year(&self) -> i32 {
        self.catalog
            .reporting_year
            .unwrap_or_else(|| Utc::now().year())
    }

    pub fn session_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.catalog.session_ttl_secs)
    }
}
