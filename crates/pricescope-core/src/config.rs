use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(default),
            Ok(raw) => match raw.as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                other => Err(ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: format!("expected true/false/1/0, got \"{other}\""),
                }),
            },
        }
    };

    let bind_addr = parse_addr("PRICESCOPE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("PRICESCOPE_LOG_LEVEL", "info");
    let sites_path = PathBuf::from(or_default("PRICESCOPE_SITES_PATH", "./config/sites.yaml"));
    let cors_origin = or_default("PRICESCOPE_CORS_ORIGIN", "http://localhost:5173");

    let fetch_timeout_secs = parse_u64("PRICESCOPE_FETCH_TIMEOUT_SECS", "30")?;
    let max_concurrent_scrapes = parse_usize("PRICESCOPE_MAX_CONCURRENT_SCRAPES", "3")?;
    let user_agent = or_default(
        "PRICESCOPE_USER_AGENT",
        "pricescope/0.1 (price-aggregation)",
    );

    let block_fonts = parse_bool("PRICESCOPE_BLOCK_FONTS", true)?;
    let block_images = parse_bool("PRICESCOPE_BLOCK_IMAGES", false)?;
    let block_stylesheets = parse_bool("PRICESCOPE_BLOCK_STYLESHEETS", false)?;

    Ok(AppConfig {
        bind_addr,
        log_level,
        sites_path,
        cors_origin,
        fetch_timeout_secs,
        max_concurrent_scrapes,
        user_agent,
        block_fonts,
        block_images,
        block_stylesheets,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn build_app_config_all_defaults() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.sites_path.to_string_lossy(), "./config/sites.yaml");
        assert_eq!(cfg.cors_origin, "http://localhost:5173");
        assert_eq!(cfg.fetch_timeout_secs, 30);
        assert_eq!(cfg.max_concurrent_scrapes, 3);
        assert!(cfg.block_fonts);
        assert!(!cfg.block_images);
        assert!(!cfg.block_stylesheets);
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("PRICESCOPE_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICESCOPE_BIND_ADDR"),
            "expected InvalidEnvVar(PRICESCOPE_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_with_invalid_bool() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("PRICESCOPE_BLOCK_FONTS", "maybe");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICESCOPE_BLOCK_FONTS"),
            "expected InvalidEnvVar(PRICESCOPE_BLOCK_FONTS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_honors_overrides() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("PRICESCOPE_BIND_ADDR", "127.0.0.1:8080");
        map.insert("PRICESCOPE_MAX_CONCURRENT_SCRAPES", "8");
        map.insert("PRICESCOPE_BLOCK_IMAGES", "1");
        map.insert("PRICESCOPE_CORS_ORIGIN", "https://shop.example.com");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.max_concurrent_scrapes, 8);
        assert!(cfg.block_images);
        assert_eq!(cfg.cors_origin, "https://shop.example.com");
    }
}
