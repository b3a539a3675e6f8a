//! Main API client implementation

use crate::config::ClientConfig;
use crate::credentials::CredentialProvider;
use crate::endpoints::RouteApi;
use crate::error::{ApiError, ApiResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Header that makes ngrok skip its browser interstitial
const NGROK_SKIP_WARNING: &str = "ngrok-skip-browser-warning";

/// Routing backend client
///
/// Wraps `reqwest` and adds:
/// - A bearer token read from the [`CredentialProvider`] on every request
/// - Request correlation IDs for tracing
///
/// Requests are sent once. Retrying is left to the caller.
#[derive(Clone)]
pub struct RoutingClient {
    inner: Client,
    config: Arc<ClientConfig>,
    credentials: Arc<dyn CredentialProvider>,
}

impl fmt::Debug for RoutingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RoutingClient {
    /// Create a client with a specific configuration and token source
    pub fn with_config<C>(config: ClientConfig, credentials: C) -> ApiResult<Self>
    where
        C: CredentialProvider + 'static,
    {
        Self::with_shared_credentials(config, Arc::new(credentials))
    }

    /// Create a client sharing an existing token source
    pub fn with_shared_credentials(
        config: ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static("rutekita-api-client/1.0"));

        if config.skip_ngrok_warning {
            default_headers.insert(NGROK_SKIP_WARNING, HeaderValue::from_static("true"));
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            credentials,
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Access routing endpoints
    #[must_use]
    pub fn routes(&self) -> RouteApi {
        RouteApi::new(self.clone())
    }

    /// Perform a POST request and decode the JSON response
    #[instrument(skip(self, body), fields(request_id))]
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.config.endpoint_url(path);
        self.execute(Method::POST, &url, Some(body)).await
    }

    /// Execute a single request
    async fn execute<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let mut request = self
            .inner
            .request(method, url)
            .header(X_REQUEST_ID, &request_id);

        match self.credentials.bearer_token() {
            Some(token) => request = request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => warn!(request_id = %request_id, "No session token, sending unauthenticated"),
        }

        if let Some(b) = body {
            request = request.json(b);
        }

        let start = Instant::now();
        let response = request.send().await.map_err(|e| {
            debug!(request_id = %request_id, url = %url, error = %e, "Request failed");
            ApiError::Request(e)
        })?;

        debug!(
            request_id = %request_id,
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            "Response received"
        );

        handle_response(response).await
    }
}

/// Check the status and decode the body
async fn handle_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();

    if status.is_success() {
        let text = response.text().await?;
        decode_body(&text)
    } else {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ApiError::api_response(status.as_u16(), message))
    }
}

/// Decode a 2xx body, keeping JSON failures distinct from transport failures
fn decode_body<T: DeserializeOwned>(text: &str) -> ApiResult<T> {
    serde_json::from_str(text).map_err(ApiError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticToken;
    use crate::endpoints::{DijkstraRequest, DijkstraResponse};
    use rutekita_geo::GeoPoint;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    const SUCCESS_BODY: &str = r#"{"status":"success","route":[{"geometry":{"coordinates":[[106.81,-6.26]]},"cost":1.0}],"execution_time":2.0}"#;

    /// One captured HTTP request: request line, headers and body
    struct Captured {
        request_line: String,
        headers: Vec<(String, String)>,
        body: String,
    }

    impl Captured {
        fn parse(raw: &str) -> Self {
            let (head, body) = raw.split_once("\r\n\r\n").unwrap();
            let mut lines = head.split("\r\n");
            let request_line = lines.next().unwrap().to_string();
            let headers = lines
                .filter_map(|l| l.split_once(':'))
                .map(|(name, value)| (name.trim().to_lowercase(), value.trim().to_string()))
                .collect();
            Self {
                request_line,
                headers,
                body: body.to_string(),
            }
        }

        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        }
    }

    /// Answer `count` connections with a canned success and return what was sent
    fn serve(count: usize) -> (String, thread::JoinHandle<Vec<Captured>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            (0..count)
                .map(|_| {
                    let (mut stream, _) = listener.accept().unwrap();
                    let raw = read_request(&mut stream);
                    let reply = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{SUCCESS_BODY}",
                        SUCCESS_BODY.len()
                    );
                    stream.write_all(reply.as_bytes()).unwrap();
                    Captured::parse(&raw)
                })
                .collect()
        });

        (base_url, handle)
    }

    fn read_request(stream: &mut impl Read) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&raw);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|l| l.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8(raw).unwrap()
    }

    fn sample_request() -> DijkstraRequest {
        DijkstraRequest::new(GeoPoint::new(-6.2555, 106.8062), GeoPoint::new(-6.28, 106.83))
    }

    #[test]
    fn test_client_creation() {
        let client = RoutingClient::with_config(ClientConfig::development(), StaticToken::none());
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let config = ClientConfig::development().with_base_url("localhost:5000");
        let client = RoutingClient::with_config(config, StaticToken::none());
        assert!(matches!(client, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_client_with_ngrok_header() {
        let config = ClientConfig::development().with_skip_ngrok_warning(true);
        let client = RoutingClient::with_config(config, StaticToken::new("t")).unwrap();
        assert!(client.config().skip_ngrok_warning);
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_decode_body_malformed() {
        let result: ApiResult<DijkstraResponse> = decode_body("<html>502</html>");
        assert!(matches!(result, Err(ApiError::Json(_))));
    }

    #[test]
    fn test_decode_body_ok() {
        let result: ApiResult<DijkstraResponse> = decode_body(r#"{"status": "error"}"#);
        assert_eq!(result.unwrap().status, "error");
    }

    #[test]
    fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) on localhost is closed on CI machines
        let config = ClientConfig::development()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        let client = RoutingClient::with_config(config, StaticToken::new("t")).unwrap();

        let result: ApiResult<DijkstraResponse> = tokio_test::block_on(
            client.post("route/dijkstra", &serde_json::json!({})),
        );
        assert!(matches!(result, Err(ref e) if e.is_transport()));
    }

    #[test]
    fn test_dijkstra_request_on_the_wire() {
        let (base_url, server) = serve(1);
        let config = ClientConfig::development()
            .with_base_url(base_url)
            .with_skip_ngrok_warning(true);
        let client = RoutingClient::with_config(config, StaticToken::new("abc123")).unwrap();

        let response = tokio_test::block_on(client.routes().dijkstra(&sample_request())).unwrap();
        assert!(response.is_success());

        let sent = server.join().unwrap();
        let request = &sent[0];
        assert_eq!(request.request_line, "POST /route/dijkstra HTTP/1.1");
        assert_eq!(request.header("authorization"), Some("Bearer abc123"));
        assert_eq!(request.header("ngrok-skip-browser-warning"), Some("true"));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert!(request.header("x-request-id").is_some_and(|id| !id.is_empty()));

        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "start_lat": -6.2555,
                "start_lon": 106.8062,
                "end_lat": -6.28,
                "end_lon": 106.83
            })
        );
    }

    #[test]
    fn test_token_is_read_per_request() {
        let (base_url, server) = serve(2);
        let config = ClientConfig::development().with_base_url(base_url);
        let token = Arc::new(Mutex::new(None::<String>));
        let source = Arc::clone(&token);
        let client =
            RoutingClient::with_config(config, move || source.lock().unwrap().clone()).unwrap();

        tokio_test::block_on(client.routes().dijkstra(&sample_request())).unwrap();
        *token.lock().unwrap() = Some("refreshed".to_string());
        tokio_test::block_on(client.routes().dijkstra(&sample_request())).unwrap();

        let sent = server.join().unwrap();
        assert_eq!(sent[0].header("authorization"), None);
        assert_eq!(sent[1].header("authorization"), Some("Bearer refreshed"));
        assert!(sent.iter().all(|r| r.header("ngrok-skip-browser-warning").is_none()));
        assert_ne!(sent[0].header("x-request-id"), sent[1].header("x-request-id"));
    }
}
