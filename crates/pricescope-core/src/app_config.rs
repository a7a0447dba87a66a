use std::net::SocketAddr;
use std::path::PathBuf;

/// Process-wide configuration, resolved once at startup from environment
/// variables (see [`crate::config::load_app_config`]).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Path to the YAML site registry loaded into a
    /// [`crate::ProfileRegistry`].
    pub sites_path: PathBuf,
    /// The single origin allowed by the CORS layer.
    pub cors_origin: String,
    pub fetch_timeout_secs: u64,
    /// Upper bound on simultaneously open rendering contexts.
    pub max_concurrent_scrapes: usize,
    pub user_agent: String,
    pub block_fonts: bool,
    pub block_images: bool,
    pub block_stylesheets: bool,
}
