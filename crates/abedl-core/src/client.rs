//! HTTP client with rate limiting and retry logic
//!
//! Used for scraping the devotional site and streaming its audio files.
//! Requests are spaced by a rate limiter and transient failures are retried
//! with exponential backoff.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{AbedlError, Result};
use crate::progress::ProgressTracker;

/// Browser user agent sent to sites that reject obvious bots
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Site root that relative paths are resolved against
    pub base_url: String,
    /// User-Agent header value
    pub user_agent: String,
    /// Maximum requests per second (default: 2.0)
    pub requests_per_second: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Maximum retry attempts for transient errors (default: 3)
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.keysforkids.org".to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            requests_per_second: 2.0,
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

/// Rate limiter to control request frequency
///
/// Ensures requests are spaced at least `min_interval` apart.
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    ///
    /// Non-positive rates disable limiting.
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = if requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / requests_per_second)
        } else {
            Duration::ZERO
        };
        let now = Instant::now();
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(now.checked_sub(min_interval).unwrap_or(now))),
        }
    }

    /// Wait until the minimum interval since the previous request has passed
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }

        *last = Instant::now();
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// HTTP client wrapper with rate limiting and retry logic
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    rate_limiter: RateLimiter,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(AbedlError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            rate_limiter: RateLimiter::new(config.requests_per_second),
            max_retries: config.max_retries,
        })
    }

    /// Site root without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a path such as `/podcasts/` against the base URL
    ///
    /// Absolute URLs are returned unchanged.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Fetch a page as text
    ///
    /// # Errors
    /// - `Http` - network or HTTP errors
    /// - `NotFound` - server answered 404
    /// - `RateLimited` - server returned 429 after all retries
    pub async fn fetch(&self, path: &str) -> Result<String> {
        let url = self.resolve(path);
        let mut attempt = 0;

        loop {
            self.rate_limiter.acquire().await;

            match self.send(&url).await {
                Ok(response) => return response.text().await.map_err(AbedlError::Http),
                Err(e) if Self::is_retryable(&e) && attempt < self.max_retries => {
                    // 1s, 2s, 4s ...
                    let backoff = Duration::from_secs(1 << attempt);
                    warn!("Request to {} failed ({}), retrying in {:?}", url, e, backoff);
                    sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Stream a file to `dest`, following redirects
    ///
    /// The body is written to `<dest>.part` and renamed once complete, so an
    /// interrupted download never leaves a truncated file under the final
    /// name. The partial file is removed when the stream fails. Returns the
    /// number of bytes written.
    pub async fn download_to_file(&self, url: &str, dest: &Path) -> Result<u64> {
        let url = self.resolve(url);
        self.rate_limiter.acquire().await;

        let mut response = self.send(&url).await?;
        let total = response.content_length().unwrap_or(0);

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let partial = dest.with_extension(match dest.extension() {
            Some(ext) => format!("{}.part", ext.to_string_lossy()),
            None => "part".to_string(),
        });
        let mut file = tokio::fs::File::create(&partial).await?;
        let progress = ProgressTracker::new(total);

        let streamed = async {
            let mut downloaded: u64 = 0;
            while let Some(chunk) = response.chunk().await.map_err(AbedlError::Http)? {
                file.write_all(&chunk).await?;
                downloaded += chunk.len() as u64;
                progress.update(downloaded);
            }
            file.flush().await?;
            Ok::<_, AbedlError>(downloaded)
        }
        .await;
        drop(file);

        let downloaded = match streamed {
            Ok(downloaded) => downloaded,
            Err(e) => {
                progress.abandon();
                if let Err(remove_err) = tokio::fs::remove_file(&partial).await {
                    debug!("Could not remove {}: {}", partial.display(), remove_err);
                }
                return Err(e);
            }
        };

        tokio::fs::rename(&partial, dest).await?;
        progress.finish();

        debug!("Wrote {} bytes to {}", downloaded, dest.display());
        Ok(downloaded)
    }

    /// Send one GET and map error statuses
    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(AbedlError::Http)?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AbedlError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AbedlError::NotFound(url.to_string()));
        }

        response.error_for_status().map_err(AbedlError::Http)
    }

    /// Check if an error is worth retrying
    fn is_retryable(error: &AbedlError) -> bool {
        match error {
            AbedlError::RateLimited => true,
            AbedlError::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().map(|s| s.is_server_error()).unwrap_or(false)
            }
            _ => false,
        }
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> ClientConfig {
        ClientConfig {
            base_url: base_url.to_string(),
            requests_per_second: 100.0,
            max_retries: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_rate_limiter_creation() {
        let limiter = RateLimiter::new(2.0);
        assert_eq!(limiter.min_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_rate_limiter_disabled() {
        let limiter = RateLimiter::new(0.0);
        assert_eq!(limiter.min_interval(), Duration::ZERO);
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://www.keysforkids.org");
        assert_eq!(config.requests_per_second, 2.0);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_resolve() {
        let client = HttpClient::with_config(test_config("https://example.org/")).unwrap();
        assert_eq!(client.resolve("/a/b/"), "https://example.org/a/b/");
        assert_eq!(client.resolve("a"), "https://example.org/a");
        assert_eq!(client.resolve("https://cdn.example.net/x.mp3"), "https://cdn.example.net/x.mp3");
    }

    #[tokio::test]
    async fn test_rate_limiter_acquire() {
        let limiter = RateLimiter::new(10.0);

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Hello</h1>"))
            .mount(&server)
            .await;

        let client = HttpClient::with_config(test_config(&server.uri())).unwrap();
        let body = client.fetch("/page/").await.unwrap();
        assert_eq!(body, "<h1>Hello</h1>");
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::with_config(test_config(&server.uri())).unwrap();
        let result = client.fetch("/missing/").await;
        assert!(matches!(result, Err(AbedlError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_fetch_rate_limited_after_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .expect(2)
            .mount(&server)
            .await;

        let client = HttpClient::with_config(test_config(&server.uri())).unwrap();
        let result = client.fetch("/busy/").await;
        assert!(matches!(result, Err(AbedlError::RateLimited)));
    }

    #[tokio::test]
    async fn test_download_to_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/audio.mp3"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 4096]))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("audio.mp3");

        let client = HttpClient::with_config(test_config(&server.uri())).unwrap();
        let written = client.download_to_file("/audio.mp3", &dest).await.unwrap();

        assert_eq!(written, 4096);
        assert_eq!(std::fs::read(&dest).unwrap().len(), 4096);
        assert!(!dir.path().join("nested").join("audio.mp3.part").exists());
    }

    #[tokio::test]
    async fn test_truncated_download_removes_partial_file() {
        use tokio::io::AsyncReadExt;
        use tokio::net::TcpListener;

        // Promises 1000 bytes, sends 10, then hangs up
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\n\r\n0123456789")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("audio.mp3");

        let client = HttpClient::with_config(test_config(&format!("http://{}", addr))).unwrap();
        let result = client.download_to_file("/audio.mp3", &dest).await;

        assert!(result.is_err());
        assert!(!dest.exists());
        assert!(!dir.path().join("audio.mp3.part").exists());
    }
}
