//! Error types for LintLens core.

use std::{error::Error, fmt, io};

/// Error type for LintLens core operations.
#[derive(Debug)]
pub enum LintLensError {
    /// An underlying I/O error.
    Io(io::Error),
    /// A request to the analysis backend failed or returned an error status.
    Http(reqwest::Error),
    /// A payload could not be decoded.
    Decode(serde_json::Error),
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for LintLensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Http(err) => write!(f, "backend request failed: {err}"),
            Self::Decode(err) => write!(f, "decode error: {err}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for LintLensError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Http(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Other(_) => None,
        }
    }
}

impl From<io::Error> for LintLensError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<reqwest::Error> for LintLensError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<serde_json::Error> for LintLensError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

/// Convenience result type for LintLens core.
pub type Result<T> = std::result::Result<T, LintLensError>;

#[cfg(test)]
mod tests {
    use super::LintLensError;
    use std::error::Error;
    use std::io;

    #[test]
    fn io_error_formats_message() {
        let error = LintLensError::Io(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(format!("{error}"), "io error: boom");
    }

    #[test]
    fn other_error_formats_message() {
        let error = LintLensError::Other("lintlens failed".to_string());
        assert_eq!(format!("{error}"), "lintlens failed");
        assert!(error.source().is_none());
    }

    #[test]
    fn decode_error_keeps_source() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: LintLensError = inner.into();
        assert!(format!("{error}").starts_with("decode error:"));
        assert!(error.source().is_some());
    }

    #[test]
    fn from_io_error_maps_variant() {
        let error: LintLensError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        match error {
            LintLensError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("expected Io variant"),
        }
    }
}
