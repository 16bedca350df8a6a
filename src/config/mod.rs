//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ExactCacheConfig, LogFormat, LoggingConfig, MetricsConfig, ServerConfig,
    StoreSettings,
};
