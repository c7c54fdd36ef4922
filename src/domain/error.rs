use std::error::Error;
use std::fmt::{self, Display};

type SourceError = Box<dyn Error + Send + Sync>;

/// Failures surfaced by a process grep run.
///
/// The first error aborts the whole multi-target run; nothing is caught or
/// retried per target, since a kill that reached some servers but not others
/// is worse than an early stop.
#[derive(Debug)]
pub enum ProcessGrepError {
    /// A server specifier that does not parse. Raised before any
    /// connection is opened.
    InvalidConnectionSpecifier(String),
    /// The driver could not connect to a target.
    ConnectionFailed {
        target: String,
        source: SourceError,
    },
    /// A statement failed on an open connection.
    QueryFailed {
        target: String,
        source: SourceError,
    },
    /// Listing was requested but no process matched on any target.
    EmptyResult,
}

impl Display for ProcessGrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessGrepError::InvalidConnectionSpecifier(specifier) => {
                write!(f, "'{specifier}' is not a valid connection specifier")
            }
            ProcessGrepError::ConnectionFailed { target, .. } => {
                write!(f, "Unable to connect to {target}")
            }
            ProcessGrepError::QueryFailed { target, .. } => {
                write!(f, "Statement failed on {target}")
            }
            ProcessGrepError::EmptyResult => f.write_str("No matches found"),
        }
    }
}

impl Error for ProcessGrepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProcessGrepError::ConnectionFailed { source, .. }
            | ProcessGrepError::QueryFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
