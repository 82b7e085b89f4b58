//! Error types for profile resolution and texture download.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The profile lookup answered with no content for this name.
    PlayerNotFound { username: String },
    /// The session profile carries no usable `SKIN` texture.
    TextureNotFound { uuid: String },
    /// The request never produced a response (DNS, TLS, timeout, reset...).
    Fetch { url: String, message: String },
    /// A response arrived with a non-success status.
    HttpStatus { url: String, status: u16 },
    /// A payload (base64, JSON or image bytes) could not be decoded.
    Decode {
        context: &'static str,
        detail: String,
    },
    /// The HTTP client itself could not be constructed.
    Client { message: String },
}

impl Error {
    pub(crate) fn decode(context: &'static str, detail: impl fmt::Display) -> Self {
        Error::Decode {
            context,
            detail: detail.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::PlayerNotFound { .. } | Error::TextureNotFound { .. }
        )
    }

    /// Network-level failure of a GET, whether or not a response came back.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Error::Fetch { .. } | Error::HttpStatus { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PlayerNotFound { username } => {
                write!(f, "no player found for username {username}")
            }
            Error::TextureNotFound { uuid } => {
                write!(f, "no skin texture found for uuid {uuid}")
            }
            Error::Fetch { url, message } => {
                write!(f, "http request to {url} failed: {message}")
            }
            Error::HttpStatus { url, status } => {
                write!(f, "http request to {url} returned status {status}")
            }
            Error::Decode { context, detail } => {
                write!(f, "failed to decode {context}: {detail}")
            }
            Error::Client { message } => write!(f, "failed to build http client: {message}"),
        }
    }
}

impl std::error::Error for Error {}
