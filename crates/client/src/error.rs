use reqwest::StatusCode;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Not logged in. Run `login` first.")]
    NotAuthenticated,

    #[error("Session expired. Please log in again.")]
    Unauthorized,

    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Whether the user has to go back to the entry view.
    pub fn needs_login(&self) -> bool {
        matches!(self, ClientError::NotAuthenticated | ClientError::Unauthorized)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Build an API error from a non-success response body.
    ///
    /// The backend reports failures as `{"error": "..."}`; some endpoints use
    /// `message` instead. Anything else falls back to a generic text.
    pub fn from_body(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["error", "message"].iter().find_map(|key| {
                    value
                        .get(*key)
                        .and_then(|v| v.as_str())
                        .filter(|s| !s.trim().is_empty())
                        .map(str::to_string)
                })
            })
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
        ClientError::Api { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body_prefers_error_field() {
        let err = ClientError::from_body(
            StatusCode::NOT_FOUND,
            r#"{"error": "Campaign not found", "message": "ignored"}"#,
        );
        assert_eq!(err.to_string(), "Campaign not found");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_from_body_falls_back() {
        let err = ClientError::from_body(StatusCode::BAD_REQUEST, r#"{"message": "Bad payload"}"#);
        assert_eq!(err.to_string(), "Bad payload");

        let err = ClientError::from_body(StatusCode::BAD_GATEWAY, "<html>upstream</html>");
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[test]
    fn test_needs_login() {
        assert!(ClientError::NotAuthenticated.needs_login());
        assert!(ClientError::Unauthorized.needs_login());
        assert!(!ClientError::Storage("disk full".into()).needs_login());
    }
}
