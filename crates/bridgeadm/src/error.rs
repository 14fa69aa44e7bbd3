use bridgeadm_match::TemplateError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read registration file '{path}'")]
    ReadRegistration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse registration file '{path}': {source}")]
    ParseRegistration {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Cannot read as_token from registration file '{path}'")]
    MissingToken { path: PathBuf },

    #[error("Either a registration file or an access token is required")]
    MissingCredentials,

    #[error("Give either a registration file or an access token, not both")]
    ConflictingCredentials,

    #[error("Invalid homeserver URL '{url}': {message}")]
    InvalidHomeserver { url: String, message: String },

    #[error("Access token contains characters not allowed in a header")]
    InvalidToken,

    #[error("Either --prefix or --template is required to recognise bridged users")]
    MissingBridgedUsers,

    #[error("Either a room id or a room alias is required")]
    MissingRoom,

    #[error("Cannot resolve room alias '{0}' to a room id")]
    UnresolvedAlias(String),

    #[error("Homeserver returned {status}: {errcode}: {message}")]
    Api {
        status: u16,
        errcode: String,
        message: String,
    },

    #[error("Unexpected response from homeserver: {0}")]
    UnexpectedResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl Error {
    /// The Matrix `errcode` of an API error, if this is one.
    pub fn errcode(&self) -> Option<&str> {
        match self {
            Error::Api { errcode, .. } => Some(errcode),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
