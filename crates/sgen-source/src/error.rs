//! Source resolution error type.

use std::time::Duration;

use thiserror::Error;

/// Failure turning a source request into schema documents.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The registry has no schema with this id in this namespace.
    #[error("schema {id:?} not found in namespace {namespace:?}")]
    NotFound {
        /// Namespace searched.
        namespace: String,
        /// Requested schema id.
        id: String,
    },

    /// The registry has no such namespace.
    #[error("unknown registry namespace {0:?}")]
    UnknownNamespace(String),

    /// An id, namespace or URL is malformed or not allowed.
    #[error("invalid locator: {0}")]
    InvalidLocator(String),

    /// The URL could not be fetched, answered non-2xx, or did not return JSON.
    #[error("fetching {url} failed: {reason}")]
    FetchFailed {
        /// Requested URL.
        url: String,
        /// What went wrong.
        reason: String,
    },

    /// The URL did not answer within the fetch timeout.
    #[error("fetching {url} timed out after {after:?}")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured bound.
        after: Duration,
    },

    /// Content could not be parsed as a schema document.
    #[error("cannot parse {id:?}: {reason}")]
    Parse {
        /// Document id.
        id: String,
        /// Parser message.
        reason: String,
    },

    /// A file upload request carried no files.
    #[error("no files provided")]
    Empty,

    /// Reading the registry failed.
    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_subject() {
        let e = SourceError::NotFound {
            namespace: "dif".into(),
            id: "person".into(),
        };
        assert_eq!(e.to_string(), "schema \"person\" not found in namespace \"dif\"");

        let e = SourceError::Timeout {
            url: "https://example.com/a.json".into(),
            after: Duration::from_secs(10),
        };
        assert!(e.to_string().contains("timed out after 10s"));
    }
}
