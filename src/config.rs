//! Storefront configuration

use std::path::PathBuf;

use clap::Parser;

/// Storefront configuration
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Interactive storefront simulator", long_about = None)]
pub struct StoreConfig {
    /// Order log file
    #[arg(long, env = "STOREFRONT_ORDER_LOG", default_value = "orders.log")]
    pub order_log: PathBuf,

    /// YAML catalog file; the built-in catalog is used when omitted
    #[arg(long, env = "STOREFRONT_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Keep orders in memory instead of the order log
    #[arg(long, env = "STOREFRONT_EPHEMERAL")]
    pub ephemeral: bool,

    /// Maximum number of orders kept in memory with `--ephemeral`
    #[arg(long, env = "STOREFRONT_MAX_ORDERS", default_value = "100")]
    pub max_orders: usize,

    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[arg(short, long, env = "STOREFRONT_LOG", default_value = "warn")]
    pub log_level: String,
}

impl StoreConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
