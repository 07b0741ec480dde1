use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

fn default_user_agent() -> String {
    "placefinder/0.1.0 (OpenStreetMap nearby search)".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_limit() -> u32 {
    10
}

fn default_overpass_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_radius() -> u32 {
    1000
}

/// Settings read from `placefinder.toml`. Every field has a default, so an
/// empty or missing file yields a working configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct FileConfig {
    /// Identifying User-Agent sent to both upstream services
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub nominatim: NominatimConfig,
    #[serde(default)]
    pub overpass: OverpassConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            server: ServerConfig::default(),
            nominatim: NominatimConfig::default(),
            overpass: OverpassConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NominatimConfig {
    #[serde(default = "default_nominatim_url")]
    pub url: String,
    /// Candidates requested per search
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            url: default_nominatim_url(),
            limit: default_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OverpassConfig {
    #[serde(default = "default_overpass_url")]
    pub url: String,
    /// Server-side query timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Search radius around the origin, in meters
    #[serde(default = "default_radius")]
    pub radius_m: u32,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            url: default_overpass_url(),
            timeout_secs: default_timeout_secs(),
            radius_m: default_radius(),
        }
    }
}

impl FileConfig {
    /// Search the default locations and return the first config that parses
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file; unlike [`FileConfig::load`]
    /// a missing or invalid file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Apply the `HOST` and `PORT` environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(std::env::var("HOST").ok(), std::env::var("PORT").ok())
    }

    fn apply_overrides(&mut self, host: Option<String>, port: Option<String>) -> Result<()> {
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = port.filter(|p| !p.trim().is_empty()) {
            self.server.port = port
                .trim()
                .parse()
                .context(format!("Invalid PORT value: {:?}", port))?;
        }
        Ok(())
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("placefinder.toml"));
    paths.push(PathBuf::from(".placefinder.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("placefinder").join("config.toml"));
        paths.push(config_dir.join("placefinder.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".placefinder.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.nominatim.limit, 10);
        assert_eq!(config.overpass.radius_m, 1000);
        assert!(config.nominatim.url.starts_with("https://nominatim"));
    }

    #[test]
    fn test_partial_sections() {
        let config: FileConfig = toml::from_str(
            r#"
            user_agent = "my-app/2.0"

            [server]
            port = 8080

            [overpass]
            radius_m = 2500
            "#,
        )
        .unwrap();

        assert_eq!(config.user_agent, "my-app/2.0");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.overpass.radius_m, 2500);
        assert_eq!(config.overpass.timeout_secs, 30);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[nominatim]\nlimit = 3").unwrap();

        let config = FileConfig::load_from(file.path()).unwrap();
        assert_eq!(config.nominatim.limit, 3);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileConfig::load_from(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = FileConfig::default();
        config
            .apply_overrides(Some("127.0.0.1".to_string()), Some("9000".to_string()))
            .unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);

        config.apply_overrides(None, Some(String::new())).unwrap();
        assert_eq!(config.server.port, 9000);

        assert!(config.apply_overrides(None, Some("http".to_string())).is_err());
    }
}
