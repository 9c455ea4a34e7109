//! Configuration file support for intfcfg
//!
//! Loads and validates intfcfg configuration from TOML files.
//! Default location: /etc/sonic/intfcfg.toml
//!
//! Interface lists (desired or observed state) are read from YAML or JSON
//! files holding a list of interface records.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sonic_restcfg_common::http::TransportConfig;

use crate::error::{IntfCfgError, IntfCfgResult};
use crate::types::InterfaceList;

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sonic/intfcfg.toml";

/// Device connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device host name or address
    #[serde(default = "default_host")]
    pub host: String,

    /// RESTCONF HTTPS port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Basic-auth user
    #[serde(default = "default_username")]
    pub username: String,

    /// Basic-auth password
    #[serde(default)]
    pub password: String,

    /// Verify the device TLS certificate
    #[serde(default)]
    pub tls_verify: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub json: bool,
}

/// Complete intfcfg configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntfCfgConfig {
    /// Device connection configuration
    #[serde(default)]
    pub device: DeviceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Default functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    443
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: default_username(),
            password: String::new(),
            tls_verify: false,
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl IntfCfgConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> IntfCfgResult<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| IntfCfgError::parse(path, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                eprintln!(
                    "intfcfg: Config file {} not found, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(source) => Err(IntfCfgError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load from default location or defaults
    pub fn load() -> IntfCfgResult<Self> {
        Self::load_or_default(DEFAULT_CONFIG_PATH)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.device.timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> IntfCfgResult<()> {
        if self.device.host.trim().is_empty() {
            return Err(IntfCfgError::invalid_config("device.host", "must not be empty"));
        }

        if self.device.port == 0 {
            return Err(IntfCfgError::invalid_config("device.port", "must be > 0"));
        }

        if self.device.timeout_secs == 0 {
            return Err(IntfCfgError::invalid_config(
                "device.timeout_secs",
                "must be > 0",
            ));
        }

        Ok(())
    }

    /// Transport settings for the device client
    pub fn to_transport(&self) -> TransportConfig {
        TransportConfig {
            host: self.device.host.clone(),
            port: self.device.port,
            username: self.device.username.clone(),
            password: self.device.password.clone(),
            tls_verify: self.device.tls_verify,
            timeout: self.timeout(),
        }
    }
}

/// Reads an interface list from a `.json`, `.yaml` or `.yml` file.
///
/// Invalid records, unknown enum values and duplicate names are rejected.
pub fn load_interfaces(path: impl AsRef<Path>) -> IntfCfgResult<InterfaceList> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| IntfCfgError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content).map_err(|e| IntfCfgError::parse(path, e))
    } else if content.trim().is_empty() {
        Ok(InterfaceList::default())
    } else {
        serde_yaml::from_str(&content).map_err(|e| IntfCfgError::parse(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ethernet::Speed;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = IntfCfgConfig::default();
        assert_eq!(config.device.host, "127.0.0.1");
        assert_eq!(config.device.port, 443);
        assert_eq!(config.device.username, "admin");
        assert!(!config.device.tls_verify);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
[device]
host = "10.0.0.5"
password = "secret"

[logging]
json = true
"#;
        let config: IntfCfgConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.device.host, "10.0.0.5");
        assert_eq!(config.device.password, "secret");
        assert!(config.logging.json);
        // Unspecified values should use defaults
        assert_eq!(config.device.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let mut config = IntfCfgConfig::default();
        config.device.host = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = IntfCfgConfig::default();
        config.device.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_transport() {
        let mut config = IntfCfgConfig::default();
        config.device.timeout_secs = 5;
        let transport = config.to_transport();
        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert_eq!(transport.base_url(), "https://127.0.0.1:443/restconf/");
    }

    #[test]
    fn test_load_config_file() {
        let file = temp_file(".toml", "[device]\nhost = \"switch1\"\nport = 8443\n");
        let config = IntfCfgConfig::load_or_default(file.path()).unwrap();
        assert_eq!(config.device.host, "switch1");
        assert_eq!(config.device.port, 8443);
    }

    #[test]
    fn test_load_nonexistent_file_defaults() {
        let config = IntfCfgConfig::load_or_default("/nonexistent/intfcfg.toml").unwrap();
        assert_eq!(config.device.host, "127.0.0.1");
    }

    #[test]
    fn test_load_malformed_config() {
        let file = temp_file(".toml", "[device\nhost=");
        let err = IntfCfgConfig::load_or_default(file.path()).unwrap_err();
        assert!(matches!(err, IntfCfgError::Parse { .. }));
    }

    #[test]
    fn test_load_interfaces_yaml() {
        let file = temp_file(
            ".yaml",
            "- name: Ethernet0\n  speed: SPEED_40GB\n  advertised_speed: [10000, 40000]\n- name: Loopback0\n",
        );
        let list = load_interfaces(file.path()).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(
            list.get(&"Ethernet0".into()).unwrap().speed,
            Some(Speed::Speed40Gb)
        );
    }

    #[test]
    fn test_load_interfaces_json() {
        let file = temp_file(".json", r#"[{"name": "Ethernet4", "mtu": 9000}]"#);
        let list = load_interfaces(file.path()).unwrap();
        assert_eq!(list.get(&"Ethernet4".into()).unwrap().mtu, Some(9000));
    }

    #[test]
    fn test_load_interfaces_rejects_invalid() {
        let dup = temp_file(".yaml", "- name: Ethernet0\n- name: Ethernet0\n");
        assert!(matches!(
            load_interfaces(dup.path()),
            Err(IntfCfgError::Parse { .. })
        ));

        let bad_fec = temp_file(".json", r#"[{"name": "Ethernet0", "fec": "FEC_X"}]"#);
        assert!(load_interfaces(bad_fec.path()).is_err());

        assert!(matches!(
            load_interfaces("/nonexistent/desired.yaml"),
            Err(IntfCfgError::Io { .. })
        ));
    }

    #[test]
    fn test_load_empty_yaml() {
        let file = temp_file(".yaml", "");
        assert!(load_interfaces(file.path()).unwrap().is_empty());
    }
}
