use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use super::models::{ApiError, RegisterBody, SpotPriceEnvelope};
use crate::config::AppConfig;

/// Remote operations the two screens depend on
///
/// The services only ever talk to this trait, so tests can swap in a
/// counting mock instead of a live HTTP stack.
#[async_trait]
pub trait HelloGoldApi: Send + Sync {
    /// POST the registration body. `Ok(())` means the server answered 2xx.
    async fn register(&self, body: &RegisterBody) -> Result<(), ApiError>;

    /// GET the current spot price envelope.
    async fn spot_price(&self) -> Result<SpotPriceEnvelope, ApiError>;
}

/// HelloGold REST client backed by reqwest
pub struct HelloGoldClient {
    http_client: HttpClient,
    register_url: String,
    spot_price_url: String,
}

impl HelloGoldClient {
    /// Create a client pointed at the endpoints from the loaded config
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http_client: HttpClient::new(),
            register_url: config.register_url.clone(),
            spot_price_url: config.spot_price_url.clone(),
        }
    }

    /// Create a client with explicit endpoint URLs (for testing)
    ///
    /// Proxy settings from the environment are ignored so local test servers
    /// are reached directly.
    #[cfg(test)]
    pub fn with_urls(register_url: String, spot_price_url: String) -> Self {
        Self {
            http_client: HttpClient::builder().no_proxy().build().unwrap(),
            register_url,
            spot_price_url,
        }
    }
}

#[async_trait]
impl HelloGoldApi for HelloGoldClient {
    /// POST users/register.json
    ///
    /// Any 2xx answer counts as success; the body is not inspected.
    async fn register(&self, body: &RegisterBody) -> Result<(), ApiError> {
        debug!("POST {}", self.register_url);

        let response = self.http_client
            .post(&self.register_url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            warn!("Registration rejected with {}: {}", status.as_u16(), body_text);
            return Err(ApiError::Transport(format!("HTTP {}: {}", status.as_u16(), body_text)));
        }

        Ok(())
    }

    /// GET spot_price.json
    ///
    /// Only the transport outcome and the JSON shape are checked here. Field
    /// validation happens in the price service.
    async fn spot_price(&self) -> Result<SpotPriceEnvelope, ApiError> {
        debug!("GET {}", self.spot_price_url);

        let response = self.http_client
            .get(&self.spot_price_url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            warn!("Spot price request failed with {}: {}", status.as_u16(), body_text);
            return Err(ApiError::Transport(format!("HTTP {}: {}", status.as_u16(), body_text)));
        }

        let body_text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response: {}", e)))?;

        serde_json::from_str::<SpotPriceEnvelope>(&body_text)
            .map_err(|e| ApiError::MalformedResponse(format!("Failed to parse response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Read one full HTTP request, body included
    async fn read_request(socket: &mut TcpStream) {
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&request);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= head_end + 4 + content_length {
                    return;
                }
            }
        }
    }

    /// Serve a single canned response and return the URL to hit
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/", addr)
    }

    /// A URL nothing is listening on
    async fn closed_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/", addr)
    }

    fn spot_client(url: String) -> HelloGoldClient {
        HelloGoldClient::with_urls("http://127.0.0.1:9/unused".to_string(), url)
    }

    fn register_client(url: String) -> HelloGoldClient {
        HelloGoldClient::with_urls(url, "http://127.0.0.1:9/unused".to_string())
    }

    fn body() -> RegisterBody {
        RegisterBody {
            email: "jane@example.com".to_string(),
            uuid: "67E55044-10B1-426F-9247-BB680E5FE0C8".to_string(),
            data: "abcDEF0123456789abcDEF0123456789".to_string(),
            tnc: "true".to_string(),
        }
    }

    #[tokio::test]
    async fn test_spot_price_decodes_valid_body() {
        let url = serve_once(
            "200 OK",
            r#"{"result":"ok","data":{"timestamp":"2019-02-19T10:15:30.123+08:00","spot_price":8123.4}}"#,
        )
        .await;

        let envelope = spot_client(url).spot_price().await.unwrap();
        assert_eq!(envelope.result.as_deref(), Some("ok"));
        let data = envelope.data.unwrap();
        assert_eq!(data.timestamp.as_deref(), Some("2019-02-19T10:15:30.123+08:00"));
        assert_eq!(data.spot_price, Some(8123.4));
    }

    #[tokio::test]
    async fn test_spot_price_server_error_is_transport() {
        let url = serve_once("500 Internal Server Error", r#"{"error":"down"}"#).await;
        let err = spot_client(url).spot_price().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(ref msg) if msg.starts_with("HTTP 500")));
    }

    #[tokio::test]
    async fn test_spot_price_non_json_is_malformed() {
        let url = serve_once("200 OK", "not json").await;
        let err = spot_client(url).spot_price().await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_spot_price_wrong_field_type_is_malformed() {
        let url = serve_once(
            "200 OK",
            r#"{"result":"ok","data":{"timestamp":"2019-02-19T10:15:30.123+08:00","spot_price":"8123.4"}}"#,
        )
        .await;
        let err = spot_client(url).spot_price().await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_spot_price_connection_refused_is_transport() {
        let err = spot_client(closed_url().await).spot_price().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn test_register_accepts_any_2xx() {
        let url = serve_once("201 Created", "").await;
        assert_eq!(register_client(url).register(&body()).await, Ok(()));
    }

    #[tokio::test]
    async fn test_register_rejection_is_transport() {
        let url = serve_once("422 Unprocessable Entity", r#"{"error":"taken"}"#).await;
        let err = register_client(url).register(&body()).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(ref msg) if msg.starts_with("HTTP 422")));
    }

    #[tokio::test]
    async fn test_register_connection_refused_is_transport() {
        let err = register_client(closed_url().await).register(&body()).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
