//! Error types for the `subscriber` crate.
use std::error::Error as StdError;
use std::fmt;

/// Errors raised while setting up or feeding a subscription. Transport failures
/// that occur once the stream is running are not errors of this kind; they are
/// delivered as [`crate::event::StreamEvent::Error`] and recorded as diagnostics.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: SubscriberErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum SubscriberErrorKind {
    /// The endpoint URL was rejected by the event stream client.
    InvalidEndpoint,
    /// A display sink could not append an entry.
    Display,
}

impl Error {
    pub fn with_source<E>(error_kind: SubscriberErrorKind, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Error {
            source: Some(source.into()),
            error_kind,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.error_kind {
            SubscriberErrorKind::InvalidEndpoint => write!(f, "invalid event stream endpoint")?,
            SubscriberErrorKind::Display => write!(f, "failed to append display entry")?,
        }
        match &self.source {
            Some(source) => write!(f, ": {source}"),
            None => Ok(()),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(SubscriberErrorKind::Display, err)
    }
}
