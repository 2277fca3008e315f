use thiserror::Error;

/// Failure of a backend call
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("not authorized")]
    Unauthorized,
    #[error("server returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Backend(String),
}

impl ApiError {
    /// HTTP 404/401: the backend route or resource is not available to us.
    /// Callers report this as information rather than as a failure.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ApiError::NotFound(_) | ApiError::Unauthorized)
    }

    /// Map a non-success HTTP status to an error
    pub fn from_status(status: u16, path: &str, body: &str) -> Self {
        match status {
            404 => ApiError::NotFound(path.to_string()),
            401 => ApiError::Unauthorized,
            _ => {
                let mut message: String = body.trim().chars().take(200).collect();
                if message.is_empty() {
                    message = "no details".to_string();
                }
                ApiError::Status { status, message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_statuses() {
        assert!(ApiError::from_status(404, "/x", "").is_unavailable());
        assert!(ApiError::from_status(401, "/x", "").is_unavailable());
        assert!(!ApiError::from_status(500, "/x", "boom").is_unavailable());
        assert!(!ApiError::from_status(403, "/x", "").is_unavailable());
        assert!(!ApiError::Backend("down".to_string()).is_unavailable());
    }

    #[test]
    fn test_status_message_truncated() {
        let body = "x".repeat(500);
        match ApiError::from_status(500, "/x", &body) {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message.len(), 200);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
