pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by token producers, the line driver and the claims
/// generator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Key material is empty, malformed, or of the wrong type for the algorithm.
    #[error("key error: {0}")]
    Key(String),

    /// A token or record could not be serialized.
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("count must be > 0")]
    InvalidCount,

    #[error("random length must be > 0")]
    InvalidLength,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn key(msg: impl Into<String>) -> Self {
        Self::Key(msg.into())
    }

    pub(crate) fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidKeyFormat
            | ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidEcdsaKey
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::MissingAlgorithm => Self::Key(err.to_string()),
            _ => Self::Encoding(err.to_string()),
        }
    }
}
