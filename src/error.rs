// Errors raised while talking to the biometric backend. The controller
// only needs to tell "the backend answered" apart from "the call itself
// failed", so every variant here counts as a transport-level failure.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid backend URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to {endpoint} failed")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("response from {endpoint} is not valid JSON")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}
