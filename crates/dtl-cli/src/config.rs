use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use dtl_server::ServerConfig;
use serde::{Deserialize, Serialize};

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "dtl.toml";

/// CLI configuration, loaded from TOML. Every field has a default.
///
/// ```toml
/// state_path = "dtl-state.json"
/// bind_addr = "127.0.0.1:7051"
/// log_level = "info"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DtlConfig {
    pub state_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub log_level: String,
}

impl Default for DtlConfig {
    fn default() -> Self {
        let server = ServerConfig::default();
        Self {
            state_path: server.state_path,
            bind_addr: server.bind_addr,
            log_level: "info".into(),
        }
    }
}

impl DtlConfig {
    /// Load from `path`, or from `dtl.toml` if present, or fall back to
    /// defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn log_level(&self) -> anyhow::Result<tracing::Level> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| anyhow::anyhow!("invalid log_level {:?}", self.log_level))
    }

    /// Server settings, with an optional bind override from the command line.
    pub fn server_config(&self, bind: Option<SocketAddr>) -> ServerConfig {
        ServerConfig {
            bind_addr: bind.unwrap_or(self.bind_addr),
            state_path: self.state_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = DtlConfig::default();
        assert_eq!(c.state_path, PathBuf::from("dtl-state.json"));
        assert_eq!(c.bind_addr.port(), dtl_server::config::DEFAULT_PORT);
        assert_eq!(c.log_level().unwrap(), tracing::Level::INFO);
    }

    #[test]
    fn parse_partial_toml() {
        let c = DtlConfig::parse("state_path = \"/var/lib/dtl/state.json\"\n").unwrap();
        assert_eq!(c.state_path, PathBuf::from("/var/lib/dtl/state.json"));
        assert_eq!(c.log_level, "info");
    }

    #[test]
    fn parse_full_toml() {
        let c = DtlConfig::parse(
            "state_path = \"s.json\"\nbind_addr = \"0.0.0.0:9000\"\nlog_level = \"debug\"\n",
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
        assert_eq!(c.log_level().unwrap(), tracing::Level::DEBUG);
    }

    #[test]
    fn invalid_log_level() {
        let c = DtlConfig::parse("log_level = \"chatty\"\n").unwrap();
        assert!(c.log_level().is_err());
    }

    #[test]
    fn from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dtl.toml");
        std::fs::write(&path, "bind_addr = 12").unwrap();
        let err = DtlConfig::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("dtl.toml"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DtlConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn server_config_override() {
        let c = DtlConfig::default();
        let bind: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        let s = c.server_config(Some(bind));
        assert_eq!(s.bind_addr, bind);
        assert_eq!(s.state_path, c.state_path);
    }
}
