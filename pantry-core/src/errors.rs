//! # Errors
//!
//! Structured failures for the document store seam. A [`PantryError`]
//! travels inside `anyhow::Error` so backends can mix it with their own
//! driver errors; [`PantryError::normalize`] recovers it on the way out.

use std::fmt;

use anyhow::Error as AnyError;

/// Result type of every [`crate::DocumentStore`] call.
pub type PantryResult<T> = std::result::Result<T, AnyError>;

/// What went wrong at the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed collection name, id or payload
    Invalid,
    NotFound,
    /// The backend refused the write (precondition, contention)
    Conflict,
    /// The backend could not be reached
    Unavailable,
    /// The backend does not support the operation
    NotImplemented,
    /// Anything else a backend reported
    Backend,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Invalid => "invalid",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::NotImplemented => "not-implemented",
            ErrorKind::Backend => "backend",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document store failure that can live inside `anyhow::Error`.
#[derive(Debug)]
pub struct PantryError {
    pub kind: ErrorKind,
    pub message: String,
    pub source: Option<AnyError>,
}

impl PantryError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    pub fn from_anyhow(err: &AnyError) -> Option<&PantryError> {
        err.downcast_ref::<PantryError>()
    }

    /// Recover the structured error, wrapping foreign ones as `Backend`.
    pub fn normalize(err: AnyError) -> PantryError {
        match err.downcast::<PantryError>() {
            Ok(pantry) => pantry,
            Err(other) => PantryError::new(ErrorKind::Backend, other.to_string()).with_source(other),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invalid, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, msg)
    }
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, msg)
    }
    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotImplemented, msg)
    }
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Backend, msg)
    }
}

impl fmt::Display for PantryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for PantryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Return early from a `PantryResult` function with a [`PantryError`].
#[macro_export]
macro_rules! bail_pantry {
    ($ctor:ident, $msg:expr) => {
        return Err($crate::errors::PantryError::$ctor($msg).into_anyhow())
    };
    ($ctor:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::errors::PantryError::$ctor(format!($fmt, $($arg)*)).into_anyhow())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails_with_not_found(id: &str) -> PantryResult<()> {
        bail_pantry!(not_found, "document {} missing", id);
    }

    #[test]
    fn normalize_keeps_structured_errors() {
        let err = fails_with_not_found("Carrot").unwrap_err();
        let normalized = PantryError::normalize(err);
        assert_eq!(normalized.kind, ErrorKind::NotFound);
        assert_eq!(normalized.message, "document Carrot missing");
        assert_eq!(normalized.to_string(), "not-found: document Carrot missing");
    }

    #[test]
    fn normalize_wraps_foreign_errors() {
        let normalized = PantryError::normalize(anyhow::anyhow!("socket closed"));
        assert_eq!(normalized.kind, ErrorKind::Backend);
        assert!(normalized.source.is_some());
        assert!(std::error::Error::source(&normalized).is_some());
    }
}
