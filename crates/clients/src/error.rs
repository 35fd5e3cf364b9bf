//! Error type shared by the HTTP clients.

use ideaforge_core::providers::ProviderError;

/// Errors from an external REST API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The body parsed but did not contain what we asked for.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<ClientError> for ProviderError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Request(e) if e.is_timeout() => ProviderError::Timeout,
            other => ProviderError::Unavailable(other.to_string()),
        }
    }
}

/// Return the response unchanged on 2xx, otherwise [`ClientError::Api`]
/// with the status and body text.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ClientError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
