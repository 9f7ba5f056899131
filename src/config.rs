use std::env;

use thiserror::Error;

use crate::schemas::House;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// No house configured means every dashboard asks to create or join one.
    pub house: Option<House>,
    /// Allowed CORS origin; any origin when unset.
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("HOUSEMATE_PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidVar {
                    name: "HOUSEMATE_PORT",
                    value,
                })?,
            None => 8080,
        };
        let house = lookup("HOUSEMATE_HOUSE_NAME")
            .filter(|name| !name.trim().is_empty())
            .map(|name| House {
                id: lookup("HOUSEMATE_HOUSE_ID").unwrap_or_else(|| "house".to_string()),
                name,
            });
        Ok(Config {
            host: lookup("HOUSEMATE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            house,
            cors_origin: lookup("HOUSEMATE_CORS_ORIGIN"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.house, None);
        assert_eq!(config.cors_origin, None);
    }

    #[test]
    fn reads_house_and_port() {
        let config = config_from(&[
            ("HOUSEMATE_PORT", "9000"),
            ("HOUSEMATE_HOUSE_NAME", "Maple Street"),
            ("HOUSEMATE_HOUSE_ID", "maple"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(
            config.house,
            Some(House {
                id: "maple".to_string(),
                name: "Maple Street".to_string(),
            })
        );
    }

    #[test]
    fn rejects_bad_port() {
        assert_eq!(
            config_from(&[("HOUSEMATE_PORT", "eighty")]),
            Err(ConfigError::InvalidVar {
                name: "HOUSEMATE_PORT",
                value: "eighty".to_string(),
            })
        );
    }
}
