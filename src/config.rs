// Application configuration, loaded from CLI flags and environment variables.

use std::ffi::OsString;

use clap::Parser;

/// Default connection string: `game_data.db` in the working directory, created on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:game_data.db?mode=rwc";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// Server command-line flags. Anything left out falls back to the environment.
#[derive(Debug, Parser)]
#[command(name = "blipp-backend", about = "Blipp game database server")]
struct ServerArgs {
    /// SQLite connection string (env: DATABASE_URL).
    #[arg(long)]
    database_url: Option<String>,
    /// Interface to bind (env: HOST).
    #[arg(long)]
    host: Option<String>,
    /// Port to bind (env: PORT).
    #[arg(long)]
    port: Option<u16>,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database URL (SQLite connection string).
    pub database_url: String,
    /// Interface to bind the HTTP server to.
    pub host: String,
    /// Port to bind the HTTP server to.
    pub port: u16,
}

impl Config {
    /// Load configuration from CLI arguments and environment variables.
    ///
    /// Environment variables:
    /// - `DATABASE_URL` - SQLite connection string (default: `sqlite:game_data.db?mode=rwc`)
    /// - `HOST` - bind address (default: `127.0.0.1`)
    /// - `PORT` - HTTP server port (default: 5000)
    ///
    /// Unknown or malformed flags print usage and exit.
    pub fn load() -> Self {
        Self::resolve(ServerArgs::parse(), |key| std::env::var(key).ok())
    }

    /// CLI flags take precedence, then the environment, then defaults.
    pub fn try_from_args<I, T>(
        args: I,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::resolve(ServerArgs::try_parse_from(args)?, env))
    }

    fn resolve(args: ServerArgs, env: impl Fn(&str) -> Option<String>) -> Self {
        let database_url = args
            .database_url
            .or_else(|| env("DATABASE_URL"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let host = args
            .host
            .or_else(|| env("HOST"))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        // An unparseable PORT in the environment is ignored.
        let port = args
            .port
            .or_else(|| env("PORT").and_then(|v| v.parse().ok()))
            .unwrap_or(DEFAULT_PORT);

        Config {
            database_url,
            host,
            port,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_from_args(["blipp-backend"], |_| None).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = Config::try_from_args(["blipp-backend"], |key| match key {
            "PORT" => Some("8080".into()),
            "DATABASE_URL" => Some("sqlite::memory:".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "sqlite::memory:");
    }

    #[test]
    fn test_cli_flag_overrides_env() {
        let config = Config::try_from_args(
            ["blipp-backend", "--port", "9000", "--host=0.0.0.0"],
            |key| (key == "PORT").then(|| "8080".to_string()),
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");

        let config = Config::try_from_args(["blipp-backend", "--port=8081"], |_| None).unwrap();
        assert_eq!(config.port, 8081);
    }

    #[test]
    fn test_bad_flags_are_errors() {
        assert!(Config::try_from_args(["blipp-backend", "--port", "abc"], |_| None).is_err());
        assert!(Config::try_from_args(["blipp-backend", "--verbose"], |_| None).is_err());
    }

    #[test]
    fn test_unparseable_env_port_falls_back() {
        let config = Config::try_from_args(["blipp-backend"], |key| {
            (key == "PORT").then(|| "abc".to_string())
        })
        .unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
