//! Error types for the gateway client.

/// A gateway frame that could not be decoded.
///
/// Decode failures are per-frame: the receive loop logs them and keeps
/// reading.
#[derive(Debug, thiserror::Error)]
#[error("Malformed gateway frame: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Errors produced by the gateway client.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// `WebSocket` transport error.
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    /// JSON serialization error on an outbound payload.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The socket failed or closed abnormally.
    #[error("Connection error: {0}")]
    Connection(String),

    /// An inbound frame could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The gateway rejected the session (`op=9`).
    #[error("Invalid session: the gateway rejected authentication")]
    InvalidSession,

    /// `connect` was called without a token.
    #[error("A token is required to connect")]
    MissingToken,

    /// An activity command carried unusable input.
    #[error("Invalid activity: {0}")]
    InvalidActivity(String),

    /// An activity command was issued while not connected.
    #[error("Not connected to the gateway")]
    NotConnected,

    /// The client task has stopped.
    #[error("Gateway client has shut down")]
    Shutdown,
}

impl From<tokio_tungstenite::tungstenite::Error> for GatewayError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = GatewayError::MissingToken;
        assert!(err.to_string().contains("token"));

        let err = GatewayError::InvalidActivity("name is empty".into());
        assert!(err.to_string().contains("name is empty"));

        let err = GatewayError::NotConnected;
        assert!(err.to_string().contains("Not connected"));

        let err = GatewayError::InvalidSession;
        assert!(err.to_string().contains("Invalid session"));

        let err = GatewayError::Connection("refused".into());
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn decode_error_wraps_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = GatewayError::from(DecodeError::from(json_err));
        assert!(matches!(err, GatewayError::Decode(_)));
        assert!(err.to_string().contains("Malformed gateway frame"));
    }

    #[test]
    fn tungstenite_error_is_boxed() {
        let err = GatewayError::from(tokio_tungstenite::tungstenite::Error::ConnectionClosed);
        assert!(matches!(err, GatewayError::WebSocket(_)));
        assert!(err.to_string().contains("WebSocket error"));
    }
}
