//! Application-service registration files.
//!
//! The bridge registers with its homeserver through a YAML file. The admin
//! commands only need `as_token` from it, to act as the bridge.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub as_token: Option<String>,
    #[serde(default)]
    pub hs_token: Option<String>,
    #[serde(default)]
    pub sender_localpart: Option<String>,
}

impl Registration {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ReadRegistration {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|source| Error::ParseRegistration {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The application-service token, rejecting a missing or blank value.
    pub fn as_token(&self, path: &Path) -> Result<&str> {
        match self.as_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(Error::MissingToken {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Read the `as_token` out of the registration file at `path`.
pub fn appservice_token(path: &Path) -> Result<String> {
    let registration = Registration::load(path)?;
    registration.as_token(path).map(str::to_string)
}
