use thiserror::Error;

/// Failures talking to an upstream HTTP service
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to create HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("failed to send request to {service}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned error status: {status}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("failed to parse {service} response")]
    Decode {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;
