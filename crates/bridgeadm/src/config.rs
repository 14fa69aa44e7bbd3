//! Connection settings shared by every command that talks to a homeserver.

use crate::error::{Error, Result};
use crate::registration::appservice_token;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Base homeserver URL, e.g. 'https://matrix.org'
    #[arg(short = 'H', long, env = "BRIDGEADM_HOMESERVER")]
    pub homeserver: String,

    /// Path to the application-service registration file to take the token from
    #[arg(short, long, required_unless_present = "token", conflicts_with = "token")]
    pub registration: Option<PathBuf>,

    /// Access token to use instead of a registration file
    #[arg(short, long, env = "BRIDGEADM_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl ConnectionArgs {
    /// Resolve the token from whichever single source was given.
    pub fn resolve(&self) -> Result<Connection> {
        let token = match (&self.registration, &self.token) {
            (Some(path), None) => appservice_token(path)?,
            (None, Some(token)) => token.clone(),
            (Some(_), Some(_)) => return Err(Error::ConflictingCredentials),
            (None, None) => return Err(Error::MissingCredentials),
        };
        Ok(Connection::new(&self.homeserver, token))
    }
}

/// Homeserver URL and access token, built once per invocation.
#[derive(Debug, Clone)]
pub struct Connection {
    pub homeserver: String,
    pub token: String,
}

impl Connection {
    pub fn new(homeserver: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            homeserver: homeserver.into(),
            token: token.into(),
        }
    }
}
