use std::{collections::HashSet, env, net::SocketAddr};

use thiserror::Error;
use url::Url;

const DEFAULT_DATABASE_PATH: &str = "db.db";
const DEFAULT_WEBHOOK_ADDR: &str = "0.0.0.0:8443";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} is not valid: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Webhook {
    pub url: Url,
    pub addr: SocketAddr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: String,
    /// Users who see their partner's Telegram id after a match.
    pub owner_ids: HashSet<i64>,
    /// Long polling is used when this is `None`.
    pub webhook: Option<Webhook>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_path =
            lookup("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_owned());

        let owner_ids = match lookup("OWNER_IDS") {
            Some(raw) => parse_owner_ids(&raw)?,
            None => HashSet::new(),
        };

        let webhook = match lookup("WEBHOOK_URL").filter(|url| !url.is_empty()) {
            Some(raw_url) => {
                let url = Url::parse(&raw_url).map_err(|_| ConfigError::Invalid {
                    name: "WEBHOOK_URL",
                    value: raw_url.clone(),
                })?;
                let raw = lookup("WEBHOOK_ADDR").unwrap_or_else(|| DEFAULT_WEBHOOK_ADDR.to_owned());
                let addr = raw.parse().map_err(|_| ConfigError::Invalid {
                    name: "WEBHOOK_ADDR",
                    value: raw.clone(),
                })?;
                Some(Webhook { url, addr })
            }
            None => None,
        };

        Ok(Config {
            database_path,
            owner_ids,
            webhook,
        })
    }

    pub fn is_owner(&self, external_id: i64) -> bool {
        self.owner_ids.contains(&external_id)
    }
}

fn parse_owner_ids(raw: &str) -> Result<HashSet<i64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<i64>().map_err(|_| ConfigError::Invalid {
                name: "OWNER_IDS",
                value: raw.to_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.database_path, "db.db");
        assert!(config.owner_ids.is_empty());
        assert_eq!(config.webhook, None);
    }

    #[test]
    fn owner_ids_are_comma_separated() {
        let config = config(&[("OWNER_IDS", "5518634633, 108099033,")]).unwrap();
        assert!(config.is_owner(5518634633));
        assert!(config.is_owner(108099033));
        assert!(!config.is_owner(1));
    }

    #[test]
    fn bad_owner_id_is_rejected() {
        let err = config(&[("OWNER_IDS", "12,abc")]).unwrap_err();
        assert!(err.to_string().starts_with("OWNER_IDS"));
    }

    #[test]
    fn webhook_needs_a_url() {
        let polling = config(&[("WEBHOOK_ADDR", "127.0.0.1:9000")]).unwrap();
        assert_eq!(polling.webhook, None);

        let webhook = config(&[("WEBHOOK_URL", "https://bot.example.com/webhook")])
            .unwrap()
            .webhook
            .unwrap();
        assert_eq!(webhook.url.as_str(), "https://bot.example.com/webhook");
        assert_eq!(webhook.addr.port(), 8443);
    }

    #[test]
    fn bad_webhook_url_is_rejected() {
        let err = config(&[("WEBHOOK_URL", "not a url")]).unwrap_err();
        assert!(err.to_string().starts_with("WEBHOOK_URL"));
    }

    #[test]
    fn bad_webhook_addr_is_rejected() {
        let result = config(&[
            ("WEBHOOK_URL", "https://bot.example.com/webhook"),
            ("WEBHOOK_ADDR", "not an address"),
        ]);
        assert!(result.is_err());
    }
}
