use std::error::Error as StdError;
use std::fmt::{self, Debug, Display};

/// An alias for [`Result<T>`](std::result::Result) with [`Error`] as the error
/// type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A list of various error categories.
///
/// Glyph run preparation itself never fails: empty text, empty typefaces
/// and out-of-range glyph ids all produce "nothing to draw". Errors only
/// come from loading typefaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A generic error that doesn't fall under any other category.
    Other,

    /// A cached failure, which means an error has already been reported in a
    /// previous operation.
    CachedFailure,
    /// Failed to parse a font.
    InvalidFont,
    /// A typeface id which doesn't belong to the source it was passed to.
    InvalidId,
    /// A generic IO error.
    Io,
}

/// A general purpose error type.
pub struct Error {
    repr: Box<Repr>,
}

struct Repr {
    kind: ErrorKind,
    message: String,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    /// Creates an [`Error`] with the provided [`ErrorKind`] and a text message.
    pub fn new<T: Display>(kind: ErrorKind, message: T) -> Error {
        Error {
            repr: Box::new(Repr {
                kind,
                message: message.to_string(),
                source: None,
            }),
        }
    }

    /// Wraps a foreign error into this type, additionally providing an
    /// [`ErrorKind`] for it.
    pub fn wrap<E: StdError + Send + Sync + 'static>(kind: ErrorKind, source: E) -> Error {
        Error::new(kind, source.to_string()).with_source(source)
    }

    /// Specifies a source error for this one.
    pub fn with_source<E: StdError + Send + Sync + 'static>(mut self, source: E) -> Error {
        self.repr.source = Some(Box::new(source));
        self
    }

    /// Creates a new error, which has the same [`ErrorKind`] as `self`, `self`
    /// as source, but a different message.
    ///
    /// Used to attach the typeface that failed to load, for example.
    pub fn with_context<T: Display>(self, context: T) -> Error {
        Error {
            repr: Box::new(Repr {
                kind: self.repr.kind,
                message: context.to_string(),
                source: Some(Box::new(self)),
            }),
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> ErrorKind {
        self.repr.kind
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repr.message)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr.source {
            Some(source) => {
                write!(f, "{}, caused by: {:?}", self.repr.message, source)
            }
            None => {
                write!(f, "{}", self.repr.message)
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.repr.source.as_ref().map(|v| (&**v) as &dyn StdError)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Error {
        Error::wrap(ErrorKind::Io, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_keeps_kind_and_chains_source() {
        let err = Error::new(ErrorKind::InvalidFont, "bad cmap").with_context("DejaVu Sans");

        assert_eq!(err.kind(), ErrorKind::InvalidFont);
        assert_eq!(err.to_string(), "DejaVu Sans");
        assert_eq!(err.source().unwrap().to_string(), "bad cmap");
        assert_eq!(format!("{err:?}"), "DejaVu Sans, caused by: bad cmap");
    }

    #[test]
    fn io_errors_are_wrapped() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.source().is_some());
    }
}
