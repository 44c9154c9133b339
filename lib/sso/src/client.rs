//! HTTP client for the identity provider.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::IdpConfig;
use crate::error::IdpError;
use crate::user::{IdpUser, ValidationResponse};

/// Path of the token validation endpoint, relative to the provider base URL.
const VALIDATION_PATH: &str = "passport/is_valid";

/// Validates one-time sign-in tokens.
///
/// This abstraction lets the session store be tested without a provider.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Returns the user the token was issued to.
    async fn validate_token(&self, token: &str) -> Result<IdpUser, IdpError>;
}

/// Identity provider client.
#[derive(Debug, Clone)]
pub struct IdpClient {
    http: Client,
    config: IdpConfig,
}

impl IdpClient {
    /// Creates a client for the configured provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: IdpConfig) -> Result<Self, IdpError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| IdpError::Request {
                reason: e.to_string(),
            })?;

        Ok(Self { http, config })
    }

    /// Returns the provider configuration.
    #[must_use]
    pub fn config(&self) -> &IdpConfig {
        &self.config
    }

    /// Returns the URL of the token validation endpoint.
    #[must_use]
    pub fn validation_url(&self) -> String {
        format!("{}{VALIDATION_PATH}", self.config.base_url())
    }
}

#[async_trait]
impl TokenValidator for IdpClient {
    #[instrument(skip(self, token))]
    async fn validate_token(&self, token: &str) -> Result<IdpUser, IdpError> {
        if token.is_empty() {
            return Err(IdpError::InvalidToken {
                reason: "empty token".to_string(),
            });
        }

        // The token is the raw URL remainder and is already encoded.
        let url = format!("{}?token={token}&data=true", self.validation_url());
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| IdpError::Request {
                reason: e.to_string(),
            })?;

        let body = response.text().await.map_err(|e| IdpError::Request {
            reason: e.to_string(),
        })?;

        let validation: ValidationResponse =
            serde_json::from_str(&body).map_err(|e| IdpError::MalformedResponse {
                reason: e.to_string(),
            })?;

        let user = validation.into_user()?;
        debug!(username = %user.username, "token validated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const ALICE: &str = r#"{"code":200,"success":true,"data":[
        {"id":1,"username":"alice","email":"alice@corp.example","nickname":"Alice","department":"ops"},
        {"id":2,"username":"bob"}
    ]}"#;

    /// Serves one canned response and yields the request line it received.
    async fn stub_provider(
        status: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut buf = [0_u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.expect("read");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.expect("write");
            stream.shutdown().await.ok();

            let request = String::from_utf8_lossy(&request).into_owned();
            request.lines().next().unwrap_or_default().to_string()
        });

        (format!("http://{addr}"), handle)
    }

    fn client(endpoint: &str) -> IdpClient {
        IdpClient::new(IdpConfig::new(endpoint.to_string())).expect("client")
    }

    #[test]
    fn validation_url_is_relative_to_base() {
        assert_eq!(
            client("idp.example/sso").validation_url(),
            "http://idp.example/sso/passport/is_valid"
        );
        assert_eq!(
            client("https://idp.example/").validation_url(),
            "https://idp.example/passport/is_valid"
        );
    }

    #[tokio::test]
    async fn empty_token_is_rejected_locally() {
        // Port 9 (discard) is never contacted: the token is rejected first.
        let err = client("http://127.0.0.1:9")
            .validate_token("")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            IdpError::InvalidToken {
                reason: "empty token".to_string()
            }
        );
    }

    #[tokio::test]
    async fn valid_token_returns_first_user() {
        let (endpoint, request_line) = stub_provider("200 OK", ALICE).await;

        let user = client(&endpoint).validate_token("abc123").await.expect("user");

        assert_eq!(user.username, "alice");
        assert_eq!(user.nickname.as_deref(), Some("Alice"));
        assert_eq!(
            request_line.await.expect("stub"),
            "GET /passport/is_valid?token=abc123&data=true HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn token_is_forwarded_verbatim() {
        let (endpoint, request_line) = stub_provider("200 OK", ALICE).await;

        client(&endpoint)
            .validate_token("a%2Bb&lang=en")
            .await
            .expect("user");

        assert_eq!(
            request_line.await.expect("stub"),
            "GET /passport/is_valid?token=a%2Bb&lang=en&data=true HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn unsuccessful_validation_is_invalid_token() {
        let (endpoint, _request_line) =
            stub_provider("200 OK", r#"{"code":401,"success":false,"data":[]}"#).await;

        let err = client(&endpoint).validate_token("expired").await.unwrap_err();

        assert!(matches!(err, IdpError::InvalidToken { .. }), "{err}");
    }

    #[tokio::test]
    async fn error_status_is_request_failure() {
        let (endpoint, _request_line) =
            stub_provider("500 Internal Server Error", r#"{"error":"boom"}"#).await;

        let err = client(&endpoint).validate_token("abc123").await.unwrap_err();

        assert!(matches!(err, IdpError::Request { .. }), "{err}");
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let (endpoint, _request_line) = stub_provider("200 OK", "<html>maintenance</html>").await;

        let err = client(&endpoint).validate_token("abc123").await.unwrap_err();

        assert!(matches!(err, IdpError::MalformedResponse { .. }), "{err}");
    }
}
