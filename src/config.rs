//! Service configuration.
//!
//! Defaults, then an optional TOML file, then `RINGMASTER_*` environment
//! variables, each layer overriding the previous one.
//!
//! ```toml
//! port = 5001
//! host = "127.0.0.1"
//! data_dir = "/var/lib/ringmaster"
//! log = "ringmaster=debug"
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub port: u16,
    pub host: IpAddr,
    /// Directory holding the collection files.
    pub data_dir: PathBuf,
    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    pub log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5001,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            data_dir: PathBuf::from("data"),
            log: "info".to_owned(),
        }
    }
}

impl Config {
    /// Loads the file at `path` (if any) and applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Applies `RINGMASTER_PORT`, `RINGMASTER_HOST`, `RINGMASTER_DATA_DIR`
    /// and `RINGMASTER_LOG`, looked up through `var`.
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        if let Some(port) = var("RINGMASTER_PORT") {
            self.port = port.parse()
                .map_err(|_| Error::Config(format!("RINGMASTER_PORT: invalid port `{port}`")))?;
        }
        if let Some(host) = var("RINGMASTER_HOST") {
            self.host = host.parse()
                .map_err(|_| Error::Config(format!("RINGMASTER_HOST: invalid address `{host}`")))?;
        }
        if let Some(dir) = var("RINGMASTER_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(log) = var("RINGMASTER_LOG") {
            self.log = log;
        }
        Ok(self)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.addr(), "0.0.0.0:5001".parse().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_toml("port = 8080\ndata_dir = \"/srv/data\"").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(config.log, "info");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(Config::from_toml("prot = 1"), Err(Error::Config(_))));
    }

    #[test]
    fn environment_overrides_file() {
        let config = Config::from_toml("port = 8080")
            .unwrap()
            .with_env(env(&[("RINGMASTER_PORT", "9090"), ("RINGMASTER_HOST", "127.0.0.1")]))
            .unwrap();
        assert_eq!(config.addr(), "127.0.0.1:9090".parse().unwrap());
    }

    #[test]
    fn invalid_environment_values_fail() {
        let err = Config::default().with_env(env(&[("RINGMASTER_PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("RINGMASTER_PORT"));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        assert!(matches!(Config::from_file(Path::new("/definitely/not/here.toml")), Err(Error::Config(_))));
    }
}
