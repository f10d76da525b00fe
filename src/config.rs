use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

use crate::cache::DEFAULT_SNAPSHOT_TTL;

pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub database_max_connections: u32,
    pub season_cache_ttl: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse().context("DATABASE_MAX_CONNECTIONS must be a number")?,
            None => 5,
        };

        let season_cache_ttl = match lookup("SEASON_CACHE_TTL_SECS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .context("SEASON_CACHE_TTL_SECS must be a number of seconds")?,
            ),
            None => DEFAULT_SNAPSHOT_TTL,
        };

        Ok(Self {
            database_url,
            bind_addr,
            database_max_connections,
            season_cache_ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config_from(&[("DATABASE_URL", "postgres://localhost/villa")]).unwrap();
        assert_eq!(cfg.database_url, "postgres://localhost/villa");
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.database_max_connections, 5);
        assert_eq!(cfg.season_cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_overrides() {
        let cfg = config_from(&[
            ("DATABASE_URL", "postgres://db/villa"),
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("SEASON_CACHE_TTL_SECS", "60"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(cfg.database_max_connections, 12);
        assert_eq!(cfg.season_cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_missing_database_url() {
        assert!(config_from(&[]).is_err());
    }

    #[test]
    fn test_bad_ttl() {
        let result = config_from(&[
            ("DATABASE_URL", "postgres://db/villa"),
            ("SEASON_CACHE_TTL_SECS", "five minutes"),
        ]);
        assert!(result.is_err());
    }
}
