//! Server configuration from the environment.
//!
//! `.env` is loaded by the CLI before this is read.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const HOST_VAR: &str = "FMSPARSE_HOST";
pub const PORT_VAR: &str = "FMSPARSE_PORT";

pub const DEFAULT_PORT: u16 = 3000;

/// Where the HTTP server listens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Read `FMSPARSE_HOST` / `FMSPARSE_PORT`; unset or unparsable values
    /// keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup(HOST_VAR)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.host),
            port: lookup(PORT_VAR)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.port),
        }
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.addr(), "0.0.0.0:3000".parse().unwrap());
    }

    #[test]
    fn test_env_values() {
        let cfg = config(&[(HOST_VAR, "127.0.0.1"), (PORT_VAR, " 8080 ")]);
        assert_eq!(cfg.addr(), "127.0.0.1:8080".parse().unwrap());
    }

    #[test]
    fn test_bad_port_keeps_default() {
        assert_eq!(config(&[(PORT_VAR, "http")]).port, DEFAULT_PORT);
    }

    #[test]
    fn test_cli_port_overrides() {
        let cfg = config(&[(PORT_VAR, "8080")]).with_port(Some(9000));
        assert_eq!(cfg.port, 9000);
        assert_eq!(config(&[]).with_port(None).port, DEFAULT_PORT);
    }
}
