//! Error types for the licensing server client.

use thiserror::Error;

/// Errors from licensing server calls.
#[derive(Error, Debug)]
pub enum LicenseClientError {
    /// Request never produced an HTTP response (connect failure, timeout).
    #[error("HTTP request failed for {endpoint}: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("licensing server returned {status} for {endpoint}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP 409 from the activate endpoint — every installation slot for
    /// the serial is consumed. Authoritative refusal, never retried
    /// offline.
    #[error("no activation slots remain for this serial")]
    SlotExhausted { body: String },
}

impl LicenseClientError {
    /// Whether this error is in the transport category — the ones the
    /// activation engine recovers from by falling back to offline
    /// validation.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::SlotExhausted { .. })
    }
}
