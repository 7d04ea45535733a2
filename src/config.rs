//! Configuration loader — merges env vars, .env file, and config.toml.

use std::path::Path;

use common::config::AppConfig;
use common::Error;

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn validate_config(config: &AppConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    for (label, provider) in [
        ("cinema_world", &config.cinema_world),
        ("film_world", &config.film_world),
    ] {
        if provider.base_url.trim().is_empty() {
            issues.push(format!("{label}.base_url must be set"));
        } else if !provider.base_url.starts_with("http://")
            && !provider.base_url.starts_with("https://")
        {
            issues.push(format!("{label}.base_url must be an http(s) URL"));
        }
        if provider.access_token.trim().is_empty() {
            issues.push(format!("{label}.access_token must be set"));
        }
        if provider.timeout_ms == 0 {
            issues.push(format!("{label}.timeout_ms must be > 0"));
        }
        if provider.retry.backoff_base_ms == 0 {
            issues.push(format!("{label}.retry.backoff_base_ms must be > 0"));
        }
    }

    if config.cache.ttl_secs == 0 {
        issues.push("cache.ttl_secs must be > 0".into());
    }
    if config.server.bind_addr.trim().is_empty() {
        issues.push("server.bind_addr must be set".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load service configuration from environment and optional config file.
pub fn load_config() -> Result<AppConfig, Error> {
    // 1. Load .env file if present.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = AppConfig::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {e}")))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {e}")))?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(addr) = std::env::var("BIND_ADDR") {
        config.server.bind_addr = addr;
    }
    if let Ok(ttl) = std::env::var("CACHE_TTL_SECS") {
        config.cache.ttl_secs = parse_positive_u64(&ttl, "CACHE_TTL_SECS")?;
    }

    if let Ok(url) = std::env::var("CINEMAWORLD_BASE_URL") {
        config.cinema_world.base_url = url;
    }
    if let Ok(token) = std::env::var("CINEMAWORLD_ACCESS_TOKEN") {
        config.cinema_world.access_token = token;
    }
    if let Ok(timeout) = std::env::var("CINEMAWORLD_TIMEOUT_MS") {
        config.cinema_world.timeout_ms = parse_positive_u64(&timeout, "CINEMAWORLD_TIMEOUT_MS")?;
    }

    if let Ok(url) = std::env::var("FILMWORLD_BASE_URL") {
        config.film_world.base_url = url;
    }
    if let Ok(token) = std::env::var("FILMWORLD_ACCESS_TOKEN") {
        config.film_world.access_token = token;
    }
    if let Ok(timeout) = std::env::var("FILMWORLD_TIMEOUT_MS") {
        config.film_world.timeout_ms = parse_positive_u64(&timeout, "FILMWORLD_TIMEOUT_MS")?;
    }

    // 5. Validate before handing the config out.
    validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
            [cinema_world]
            base_url = "https://upstream.example.com"
            access_token = "token-a"

            [film_world]
            base_url = "https://upstream.example.com"
            access_token = "token-b"
            timeout_ms = 2500
        "#
    }

    #[test]
    fn test_toml_fills_defaults_for_omitted_fields() {
        let config: AppConfig = toml::from_str(minimal_toml()).unwrap();

        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.cache.ttl_secs, 30);
        assert_eq!(config.cinema_world.timeout_ms, 10_000);
        assert_eq!(config.film_world.timeout_ms, 2500);
        assert_eq!(config.film_world.retry.max_retries, 3);
        assert_eq!(config.film_world.retry.backoff_base_ms, 80);

        validate_config(&config).unwrap();
    }

    #[test]
    fn test_validation_collects_every_issue() {
        let config = AppConfig::default();

        let err = validate_config(&config).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("cinema_world.base_url"));
        assert!(message.contains("cinema_world.access_token"));
        assert!(message.contains("film_world.base_url"));
        assert!(message.contains("film_world.access_token"));
    }

    #[test]
    fn test_non_http_base_url_is_rejected() {
        let mut config: AppConfig = toml::from_str(minimal_toml()).unwrap();
        config.cinema_world.base_url = "ftp://upstream.example.com".into();

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("http(s)"));
    }

    #[test]
    fn test_positive_int_parsing() {
        assert_eq!(parse_positive_u64(" 42 ", "X").unwrap(), 42);
        assert!(parse_positive_u64("0", "X").is_err());
        assert!(parse_positive_u64("abc", "X").is_err());
    }
}
