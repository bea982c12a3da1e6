use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server is offline or unreachable")]
    Offline,

    #[error("Request timed out")]
    Timeout,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Offline
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

/// Map an HTTP response to a typed result, turning error statuses into
/// the matching [`ClientError`] variant.
pub(crate) async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = check_status(response).await?;
    Ok(status.json().await?)
}

/// Like [`handle_response`] but discards the body.
pub(crate) async fn handle_empty_response(
    response: reqwest::Response,
) -> Result<(), ClientError> {
    check_status(response).await?;
    Ok(())
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        let text = response.text().await.unwrap_or_default();
        return Err(ClientError::AuthFailed(text));
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        let text = response.text().await.unwrap_or_default();
        return Err(ClientError::NotFound(text));
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(ClientError::ServerError {
            status: status.as_u16(),
            message: text,
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_matches_variants() {
        assert!(ClientError::Offline.to_string().contains("offline"));
        assert!(ClientError::Timeout.to_string().contains("timed out"));
        assert!(ClientError::AuthFailed("bad credentials".into())
            .to_string()
            .contains("Authentication failed"));

        let server = ClientError::ServerError {
            status: 500,
            message: "Internal".into(),
        };
        assert!(server.to_string().contains("500"));
    }
}
