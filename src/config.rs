use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: IpAddr,
    pub server_port: u16,
    pub deployment: Deployment,
    pub log_level: String,
    pub jwt_secret: String,
    pub jwt_access_expiration_secs: u64,
}

/// Deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    Development,
    Staging,
    Production,
}

impl Deployment {
    fn parse(value: &str) -> Self {
        match value {
            "production" => Self::Production,
            "staging" => Self::Staging,
            _ => Self::Development,
        }
    }
}

/// Non-empty value of `name`, if set.
fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn required(name: &str) -> anyhow::Result<String> {
    optional(name).ok_or_else(|| anyhow::anyhow!("{name} must be set"))
}

/// Parse `name` when set, otherwise fall back to `default`.
fn parsed<T: FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    optional(name).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{name} has an invalid value: {raw:?}"))
    })
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required: `DATABASE_URL`, `JWT_SECRET`
    /// Optional with defaults: `SERVER_HOST`, `SERVER_PORT`, `ENVIRONMENT`, `LOG_LEVEL`,
    /// `JWT_ACCESS_EXPIRATION_SECS`
    ///
    /// `PORT` overrides `SERVER_PORT` and the host defaults to `0.0.0.0` in production.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is not set, or if a numeric or address
    /// variable cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let deployment = Deployment::parse(&optional("ENVIRONMENT").unwrap_or_default());
        let default_host = match deployment {
            Deployment::Production => IpAddr::from([0, 0, 0, 0]),
            Deployment::Development | Deployment::Staging => IpAddr::from([127, 0, 0, 1]),
        };
        let port_var = if optional("PORT").is_some() { "PORT" } else { "SERVER_PORT" };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            server_host: parsed("SERVER_HOST", default_host)?,
            server_port: parsed(port_var, 3000)?,
            deployment,
            log_level: optional("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            jwt_secret: required("JWT_SECRET")?,
            jwt_access_expiration_secs: parsed("JWT_ACCESS_EXPIRATION_SECS", 3600)?,
        })
    }

    /// Build the socket address for the server to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_addr_joins_host_and_port() {
        let config = Config {
            database_url: String::new(),
            server_host: IpAddr::from([127, 0, 0, 1]),
            server_port: 3000,
            deployment: Deployment::Development,
            log_level: "info".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_access_expiration_secs: 3600,
        };
        assert_eq!(config.socket_addr(), SocketAddr::from(([127, 0, 0, 1], 3000)));
    }

    #[test]
    fn unknown_environment_falls_back_to_development() {
        assert_eq!(Deployment::parse("production"), Deployment::Production);
        assert_eq!(Deployment::parse("staging"), Deployment::Staging);
        assert_eq!(Deployment::parse("qa"), Deployment::Development);
    }
}
