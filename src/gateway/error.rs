use thiserror::Error;

/// Failures talking to the prediction service.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{endpoint}: request failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint}: HTTP {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("{endpoint}: malformed response: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },

    #[error("{endpoint}: service reported: {message}")]
    Service {
        endpoint: &'static str,
        message: String,
    },
}

impl GatewayError {
    pub fn endpoint(&self) -> &'static str {
        match self {
            GatewayError::Transport { endpoint, .. }
            | GatewayError::Status { endpoint, .. }
            | GatewayError::Decode { endpoint, .. }
            | GatewayError::Service { endpoint, .. } => endpoint,
        }
    }

    pub(crate) fn decode(endpoint: &'static str, message: impl Into<String>) -> Self {
        GatewayError::Decode {
            endpoint,
            message: message.into(),
        }
    }
}
