use thiserror::Error;

/// Errors raised while talking to the BGG XML API.
#[derive(Error, Debug)]
pub enum BggError {
    /// BGG kept answering with its "request accepted, still processing"
    /// status until the retry budget ran out.
    #[error("BGG still reported processing for {endpoint} after {attempts} attempt(s)")]
    UpstreamUnavailable { endpoint: String, attempts: u32 },
    /// The response body did not match the expected XML shape. Retrying
    /// will not fix a shape mismatch, so this is never retried.
    #[error("Failed to parse BGG response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },
    /// Transport-level failure (connection refused, TLS, etc).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}
