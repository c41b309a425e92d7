use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server configuration.
///
/// Loaded from TOML (every key optional), then overridden by the `PORT`,
/// `STORAGE_ROOT` and `BODY_LIMIT` environment variables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding one sub-directory per collection.
    pub storage_root: PathBuf,
    /// Maximum accepted request body, in bytes.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            storage_root: PathBuf::from("collections"),
            max_body_size: 5 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Apply overrides from the process environment.
    pub fn with_env(self) -> ServerResult<Self> {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> ServerResult<Self> {
        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|_| ServerError::Config(format!("PORT must be a port number, got {port:?}")))?;
            self.bind_addr.set_port(port);
        }
        if let Some(root) = lookup("STORAGE_ROOT") {
            self.storage_root = PathBuf::from(root);
        }
        if let Some(limit) = lookup("BODY_LIMIT") {
            self.max_body_size = parse_size(&limit)
                .ok_or_else(|| ServerError::Config(format!("BODY_LIMIT must be a size like 5M, got {limit:?}")))?;
        }
        Ok(self)
    }
}

/// Parse a byte size such as `512`, `64K`, `5M` or `1G`.
pub fn parse_size(s: &str) -> Option<usize> {
    let s = s.trim();
    let (digits, multiplier) = match s.char_indices().last()? {
        (i, 'K' | 'k') => (&s[..i], 1024),
        (i, 'M' | 'm') => (&s[..i], 1024 * 1024),
        (i, 'G' | 'g') => (&s[..i], 1024 * 1024 * 1024),
        _ => (s, 1),
    };
    digits.trim().parse::<usize>().ok()?.checked_mul(multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(c.storage_root, PathBuf::from("collections"));
        assert_eq!(c.max_body_size, 5 * 1024 * 1024);
    }

    #[test]
    fn toml_keys_are_optional() {
        let c = ServerConfig::from_toml_str("storage_root = \"/var/lib/docstore\"").unwrap();
        assert_eq!(c.storage_root, PathBuf::from("/var/lib/docstore"));
        assert_eq!(c.max_body_size, ServerConfig::default().max_body_size);
    }

    #[test]
    fn toml_errors_are_config_errors() {
        let err = ServerConfig::from_toml_str("max_body_size = \"lots\"").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("docstore.toml");
        std::fs::write(&path, "bind_addr = \"0.0.0.0:3526\"\n").unwrap();
        let c = ServerConfig::load(&path).unwrap();
        assert_eq!(c.bind_addr.port(), 3526);
        assert!(ServerConfig::load(&tmp.path().join("missing.toml")).is_err());
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> =
            HashMap::from([("PORT", "3527"), ("STORAGE_ROOT", "/tmp/c"), ("BODY_LIMIT", "512K")]);
        let c = ServerConfig::default()
            .with_env_from(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(c.bind_addr.port(), 3527);
        assert_eq!(c.storage_root, PathBuf::from("/tmp/c"));
        assert_eq!(c.max_body_size, 512 * 1024);
    }

    #[test]
    fn bad_env_values_are_rejected() {
        let err = ServerConfig::default()
            .with_env_from(|k| (k == "PORT").then(|| "https".to_string()))
            .unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));

        let err = ServerConfig::default()
            .with_env_from(|k| (k == "BODY_LIMIT").then(|| "5X".to_string()))
            .unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("100"), Some(100));
        assert_eq!(parse_size("64K"), Some(64 * 1024));
        assert_eq!(parse_size("5M"), Some(5 * 1024 * 1024));
        assert_eq!(parse_size("1g"), Some(1024 * 1024 * 1024));
        assert_eq!(parse_size(""), None);
        assert_eq!(parse_size("M"), None);
        assert_eq!(parse_size("-1"), None);
    }
}
