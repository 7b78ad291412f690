// src/cdx/transport.rs
// =============================================================================
// HTTP access to the CDX server.
//
// Two requests exist:
// - GET {base}/collinfo.json                 -> JSON array of indexes
// - GET {base}/{id}-index?url={domain}/*&output=json
//                                            -> one JSON record per line
//
// Both are hidden behind the CdxTransport trait. The real implementation
// uses reqwest; the tests plug in canned responses instead so nothing in
// the test suite depends on the network.
//
// Rust concepts:
// - async_trait: async methods on a trait that we use as `&dyn` or generic
// - Send + Sync: the transport is shared by every in-flight query
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::form_urlencoded;

use super::catalog::IndexDescriptor;
use super::error::FetchError;
use crate::config::QueryConfig;

#[async_trait]
pub trait CdxTransport: Send + Sync {
    /// Raw body of the index catalog.
    async fn fetch_catalog(&self) -> Result<String, FetchError>;

    /// Raw body of one index queried for every URL under `domain`.
    async fn fetch_index(&self, index: &IndexDescriptor, domain: &str)
        -> Result<String, FetchError>;
}

// Builds the query URL for one index
//
// The domain is encoded like a form value (space -> '+', '/' -> %2F),
// then the "/*" wildcard is appended unencoded so the server matches every
// path under it.
pub fn query_url(base_url: &str, index_id: &str, domain: &str) -> String {
    format!(
        "{}/{}-index?url={}/*&output=json",
        base_url,
        index_id,
        encode_domain(domain)
    )
}

// form_urlencoded keeps '*' and escapes '~'; the CDX server is queried with
// '*' escaped (a literal '*' in the domain is not a wildcard) and '~' kept.
// A "%7E" in the output can only come from a '~', since '%' itself is
// escaped as "%25".
fn encode_domain(domain: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(domain.as_bytes()).collect();
    encoded.replace('*', "%2A").replace("%7E", "~")
}

/// reqwest-backed transport.
///
/// The client is built once; reqwest clones are cheap and share the
/// connection pool, but here every query borrows the same instance.
pub struct HttpTransport {
    client: Client,
    config: QueryConfig,
}

impl HttpTransport {
    pub fn new(config: QueryConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;
        Ok(Self { client, config })
    }

    // GET + status check + body
    //
    // Non-2xx answers are failures, the body is not even read.
    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        tracing::debug!(%url, "GET");

        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl CdxTransport for HttpTransport {
    async fn fetch_catalog(&self) -> Result<String, FetchError> {
        let url = self.config.catalog_url();
        self.get_text(&url, self.config.catalog_timeout).await
    }

    async fn fetch_index(
        &self,
        index: &IndexDescriptor,
        domain: &str,
    ) -> Result<String, FetchError> {
        let url = query_url(&self.config.base_url, index.id(), domain);
        self.get_text(&url, self.config.query_timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BROWSER_USER_AGENT;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    // Serves exactly one HTTP response on 127.0.0.1 and hands back the raw
    // request head it received
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, handle)
    }

    fn transport_for(base_url: &str) -> HttpTransport {
        HttpTransport::new(QueryConfig::default().with_base_url(base_url)).unwrap()
    }

    #[test]
    fn test_query_url_plain_domain() {
        let url = query_url("https://index.commoncrawl.org", "CC-MAIN-2024-33", "example.com");
        assert_eq!(
            url,
            "https://index.commoncrawl.org/CC-MAIN-2024-33-index?url=example.com/*&output=json"
        );
    }

    #[test]
    fn test_query_url_encodes_domain() {
        let url = query_url("http://localhost", "CC-MAIN-2023-06", "example.com/a b");
        assert_eq!(
            url,
            "http://localhost/CC-MAIN-2023-06-index?url=example.com%2Fa+b/*&output=json"
        );
    }

    #[test]
    fn test_domain_encoding_escapes_star_keeps_tilde() {
        assert_eq!(encode_domain("example.com/~user"), "example.com%2F~user");
        assert_eq!(encode_domain("a*b"), "a%2Ab");
        assert_eq!(encode_domain("100%"), "100%25");
        assert_eq!(encode_domain("a-b_c.d"), "a-b_c.d");
    }

    #[tokio::test]
    async fn test_fetch_index_sends_query_and_browser_user_agent() {
        let (base_url, server) = serve_once("200 OK", "{\"url\": \"https://example.com/\"}\n").await;
        let transport = transport_for(&base_url);

        let body = transport
            .fetch_index(&IndexDescriptor::new("CC-MAIN-2024-33"), "example.com/docs")
            .await
            .unwrap();
        assert_eq!(body, "{\"url\": \"https://example.com/\"}\n");

        let request = server.await.unwrap();
        assert!(
            request.starts_with(
                "GET /CC-MAIN-2024-33-index?url=example.com%2Fdocs/*&output=json HTTP/1.1\r\n"
            ),
            "unexpected request: {}",
            request
        );
        let expected_header = format!("user-agent: {}", BROWSER_USER_AGENT).to_lowercase();
        assert!(
            request.to_lowercase().contains(&expected_header),
            "missing browser user agent: {}",
            request
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_failure() {
        let (base_url, server) = serve_once("404 Not Found", "no captures").await;
        let transport = transport_for(&base_url);

        let error = transport
            .fetch_index(&IndexDescriptor::new("CC-MAIN-2024-33"), "example.com")
            .await
            .unwrap_err();
        assert!(matches!(error, FetchError::Status(404)), "got {:?}", error);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_catalog_path() {
        let (base_url, server) = serve_once("200 OK", "[{\"id\": \"CC-MAIN-2024-33\"}]").await;
        let transport = transport_for(&base_url);

        let body = transport.fetch_catalog().await.unwrap();
        assert_eq!(body, "[{\"id\": \"CC-MAIN-2024-33\"}]");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /collinfo.json HTTP/1.1\r\n"), "{}", request);
    }

    #[tokio::test]
    async fn test_refused_connection_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let error = transport_for(&base_url)
            .fetch_index(&IndexDescriptor::new("CC-MAIN-2024-33"), "example.com")
            .await
            .unwrap_err();
        assert!(matches!(error, FetchError::Network(_)), "got {:?}", error);
    }
}
