//! Server configuration.
//!
//! Two knobs, both optional. Defaults are `localhost:8080`; command-line
//! flags win over the environment, which wins over the defaults:
//!
//! | Flag         | Variable      | Field      |
//! |--------------|---------------|------------|
//! | `--hostname` | `STRAND_HOST` | `hostname` |
//! | `--port`     | `STRAND_PORT` | `port`     |

use std::ffi::OsString;

use clap::Parser;

use crate::error::Error;

pub const HOST_VAR: &str = "STRAND_HOST";
pub const PORT_VAR: &str = "STRAND_PORT";

/// Where the bundled [`Server`](crate::Server) listens.
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
#[command(name = "strand", about = "strand HTTP server", long_about = None)]
pub struct ServerConfig {
    /// Interface to bind
    #[arg(long, env = "STRAND_HOST", default_value = "localhost")]
    pub hostname: String,

    /// Port to listen on
    #[arg(long, env = "STRAND_PORT", default_value_t = 8080)]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { hostname: "localhost".to_owned(), port: 8080 }
    }
}

impl ServerConfig {
    /// Reads the process's command line, falling back to `STRAND_HOST` /
    /// `STRAND_PORT` and then to the defaults.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_args(std::env::args_os())
    }

    /// Like [`from_env`](Self::from_env) but with an explicit argument list.
    /// The first item is the program name.
    pub fn from_args<I, T>(args: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::try_parse_from(args)?)
    }

    /// `hostname:port`, ready for [`Server::bind`](crate::Server::bind).
    pub fn addr(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_localhost_8080() {
        // Only meaningful when the variables are unset in the test environment.
        if std::env::var_os(HOST_VAR).is_some() || std::env::var_os(PORT_VAR).is_some() {
            return;
        }
        let config = ServerConfig::from_args(["strand"]).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr(), "localhost:8080");
    }

    #[test]
    fn flags_override_defaults() {
        let config =
            ServerConfig::from_args(["strand", "--hostname", "0.0.0.0", "--port", "3000"]).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:3000");
    }

    #[test]
    fn rejects_bad_port() {
        let err = ServerConfig::from_args(["strand", "--port", "http"]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        ServerConfig::command().debug_assert();
    }
}
