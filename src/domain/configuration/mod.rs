pub mod loader;
pub mod site_config;

pub use loader::{
    API_URL_ENV, CONFIG_FILE, CONFIG_PATH_ENV, STREAM_URL_ENV, apply_env_overrides, load_config,
    parse_config_content,
};
pub use site_config::{BackendConfig, DashboardConfig, FormsConfig, SiteConfig, StreamConfig};
