use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::lens::lookup::{DEFAULT_API_HOST, DEFAULT_CLIENT_TIMEOUT};

#[derive(Debug, Clone, Serialize)]
pub struct IpstackConfig {
    /// Access key for the ipstack API
    #[serde(skip_serializing)]
    pub access_key: Option<String>,

    /// Use https instead of http (not available on the free plan)
    pub https: bool,

    /// Connect and request timeout in seconds, 0 disables it (default: 5)
    pub timeout_secs: u64,

    /// Host serving the API (default: api.ipstack.com)
    pub host: String,
}

const EMPTY_CONFIG: &str = r#"### ipstack configuration file

### access key from https://ipstack.com/dashboard
# access_key = ""

### use https for API calls (requires a paid plan)
# https = false

### connect and request timeout in seconds, 0 disables the timeout
# timeout_secs = 5

### API host
# host = "api.ipstack.com"
"#;

impl Default for IpstackConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            https: false,
            timeout_secs: DEFAULT_CLIENT_TIMEOUT,
            host: DEFAULT_API_HOST.to_string(),
        }
    }
}

impl IpstackConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<IpstackConfig> {
        let mut builder = Config::builder();

        // Add in toml configuration file
        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                // By default use $HOME/.ipstack/ipstack.toml as the configuration file path
                let p = Self::config_file_path()?;
                let dir = Path::new(p.as_str())
                    .parent()
                    .ok_or_else(|| anyhow!("Could not determine config directory"))?;
                std::fs::create_dir_all(dir)
                    .map_err(|e| anyhow!("Unable to create ipstack directory: {}", e))?;
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // Add in settings from the environment (with a prefix of IPSTACK)
        // E.g., `IPSTACK_ACCESS_KEY=abc ./ipstack check 1.1.1.1` would set the access key
        builder = builder.add_source(config::Environment::with_prefix("IPSTACK"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config)
    }

    fn from_map(config: &HashMap<String, String>) -> Result<IpstackConfig> {
        let defaults = IpstackConfig::default();

        let access_key = config
            .get("access_key")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let https = match config.get("https") {
            Some(v) => v
                .parse::<bool>()
                .map_err(|_| anyhow!("Invalid value for https: {}", v))?,
            None => defaults.https,
        };

        let timeout_secs = match config.get("timeout_secs") {
            Some(v) => v
                .parse::<u64>()
                .map_err(|_| anyhow!("Invalid value for timeout_secs: {}", v))?,
            None => defaults.timeout_secs,
        };

        let host = config
            .get("host")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);

        Ok(IpstackConfig {
            access_key,
            https,
            timeout_secs,
            host,
        })
    }

    /// Access key with everything but the first four characters masked
    pub fn masked_access_key(&self) -> String {
        match &self.access_key {
            Some(key) => {
                let visible: String = key.chars().take(4).collect();
                format!("{}{}", visible, "*".repeat(key.chars().count().saturating_sub(4)))
            }
            None => "(not set)".to_string(),
        }
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let lines = [
            format!("Access Key:         {}", self.masked_access_key()),
            format!("Protocol:           {}", if self.https { "https" } else { "http" }),
            format!("Host:               {}", self.host),
            format!("Timeout:            {} seconds", self.timeout_secs),
        ];
        lines.join("\n")
    }

    /// Get the config file path
    pub fn config_file_path() -> Result<String> {
        let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        let home_str = home_dir
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?;
        Ok(format!("{}/.ipstack/ipstack.toml", home_str))
    }
}
