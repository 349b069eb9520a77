use thiserror::Error;

/// Errors returned by the facility search client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ClientError {
    /// Whether a manual retry of the same search could succeed.
    ///
    /// Network failures and 5xx/429 responses are transient; malformed
    /// responses and 4xx rejections are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.status().is_some_and(|s| s.is_server_error())
            }
            ClientError::UnexpectedStatus { status, .. } => *status >= 500 || *status == 429,
            ClientError::Deserialize { .. } | ClientError::InvalidBaseUrl { .. } => false,
        }
    }
}
