use std::env;

use tracing::warn;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub token_ttl_days: i64,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("PORT is not a valid port number; falling back to {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        let token_ttl_days = match env::var("TOKEN_TTL_DAYS") {
            Ok(raw) => match raw.parse::<i64>() {
                Ok(days) if days > 0 => days,
                _ => {
                    warn!(
                        "TOKEN_TTL_DAYS must be a positive integer; falling back to {DEFAULT_TOKEN_TTL_DAYS}"
                    );
                    DEFAULT_TOKEN_TTL_DAYS
                }
            },
            Err(_) => DEFAULT_TOKEN_TTL_DAYS,
        };

        ServerConfig {
            host,
            port,
            token_ttl_days,
        }
    }
}
