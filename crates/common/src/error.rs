//! Unified error type for the movie aggregation service.
//!
//! The enum is `Clone` because the result cache fans a single failed
//! computation out to every waiter of that key.

use thiserror::Error;

use crate::types::Vendor;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("{vendor} responded with status {status}: {message}")]
    UpstreamStatus {
        vendor: Vendor,
        status: u16,
        message: String,
    },

    #[error("Failed to decode {vendor} payload: {message}")]
    Decode { vendor: Vendor, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown vendor: {0}")]
    UnknownVendor(String),
}

impl Error {
    /// Whether a retry can plausibly succeed: transport-level failures and
    /// the transient status family (408, 429, 5xx). Decode failures and
    /// client errors are permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Http(_) => true,
            Error::UpstreamStatus { status, .. } => {
                matches!(status, 408 | 429) || (500..=599).contains(status)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(Error::Http("connection refused".into()).is_transient());

        for status in [408, 429, 500, 502, 503, 504] {
            let err = Error::UpstreamStatus {
                vendor: Vendor::CinemaWorld,
                status,
                message: String::new(),
            };
            assert!(err.is_transient(), "status {status} should be transient");
        }

        for status in [400, 401, 403, 404] {
            let err = Error::UpstreamStatus {
                vendor: Vendor::FilmWorld,
                status,
                message: String::new(),
            };
            assert!(!err.is_transient(), "status {status} should be permanent");
        }

        assert!(!Error::Decode {
            vendor: Vendor::CinemaWorld,
            message: "missing field".into()
        }
        .is_transient());
    }
}
