mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Environment variable overriding `server.port`.
pub const PORT_ENV: &str = "PORT";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./imagepost.toml",
        "./config.toml",
        "~/.config/imagepost/config.toml",
        "/etc/imagepost/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Apply environment overrides (currently only `PORT`).
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    let port = std::env::var(PORT_ENV).ok();
    apply_port_override(config, port.as_deref())
}

/// Override the server port from a raw `PORT` value. Empty values are ignored.
pub fn apply_port_override(config: &mut Config, port: Option<&str>) -> Result<()> {
    let Some(raw) = port.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(());
    };

    config.server.port = raw
        .parse()
        .with_context(|| format!("Invalid {} value: {:?}", PORT_ENV, raw))?;

    validate_config(config)
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.server.max_upload_bytes == 0 {
        anyhow::bail!("server.max_upload_bytes cannot be 0");
    }

    if let Some(ref url) = config.server.public_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("server.public_url must start with http:// or https://, got {:?}", url);
        }
    }

    if config.database.path.as_os_str().is_empty() {
        anyhow::bail!("database.path cannot be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.public_url, None);
        assert_eq!(config.server.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.database.path, std::path::PathBuf::from("image-api.db"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_port_override() {
        let mut config = Config::default();
        apply_port_override(&mut config, Some("8081")).unwrap();
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_port_override_absent_or_empty() {
        let mut config = Config::default();
        apply_port_override(&mut config, None).unwrap();
        apply_port_override(&mut config, Some("  ")).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_port_override_invalid() {
        let mut config = Config::default();
        assert!(apply_port_override(&mut config, Some("http")).is_err());
        assert!(apply_port_override(&mut config, Some("70000")).is_err());
        assert!(apply_port_override(&mut config, Some("0")).is_err());
    }

    #[test]
    fn test_validate_public_url() {
        let mut config = Config::default();
        config.server.public_url = Some("img.example.com".into());
        assert!(validate_config(&config).is_err());

        config.server.public_url = Some("https://img.example.com".into());
        assert!(validate_config(&config).is_ok());
    }
}
