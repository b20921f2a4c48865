// Native transport: dataset files from disk, HTTP(S) GET through reqwest.

use std::path::PathBuf;
use std::time::Duration;

use annuaire::{Fetch, LoadError};
use reqwest::header::ACCEPT;
use reqwest::Client;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = concat!("annuaire/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct NativeFetcher {
    base_dir: PathBuf,
    client: Client,
}

impl NativeFetcher {
    pub fn new(base_dir: PathBuf) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { base_dir, client })
    }

    async fn read_file(&self, location: &str) -> Result<String, LoadError> {
        let path = self.base_dir.join(location);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.display().to_string(),
                source,
            })
    }

    async fn http_get(&self, url: &str) -> Result<String, LoadError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| LoadError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LoadError::fetch(url, e))?;
        decode_body(url, body.to_vec())
    }
}

impl Fetch for NativeFetcher {
    async fn get_text(&self, url: &str) -> Result<String, LoadError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return self.http_get(url).await;
        }
        if let Some(path) = url.strip_prefix("file://") {
            return self.read_file(path).await;
        }
        if url.contains("://") {
            return Err(LoadError::UnsupportedScheme {
                url: url.to_string(),
            });
        }
        self.read_file(url).await
    }
}

/// Response bodies must be UTF-8; anything else fails the load instead of
/// being patched with replacement characters.
pub fn decode_body(url: &str, body: Vec<u8>) -> Result<String, LoadError> {
    String::from_utf8(body).map_err(|e| LoadError::fetch(url, e))
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    // Answers a single request with `response`, then closes the connection.
    async fn serve_once(response: &'static [u8]) -> std::io::Result<SocketAddr> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;
        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut request = [0_u8; 1024];
                let _ = stream.read(&mut request).await;
                let _ = stream.write_all(response).await;
                let _ = stream.shutdown().await;
            }
        });
        Ok(address)
    }

    #[test]
    fn test_decode_body_rejects_latin1() {
        let body = b"[{\"R\xe9gion\":\"Bretagne\"}]".to_vec();

        let result = decode_body("http://records.local/api", body);
        assert!(matches!(result, Err(LoadError::Fetch { .. })));
    }

    #[test]
    fn test_decode_body_keeps_utf8() -> Result<(), Box<dyn std::error::Error>> {
        let body = "[{\"Région\":\"Bretagne\"}]".as_bytes().to_vec();

        assert_eq!(decode_body("http://records.local/api", body)?, "[{\"Région\":\"Bretagne\"}]");

        Ok(())
    }

    #[tokio::test]
    async fn test_http_get_returns_body() -> Result<(), Box<dyn std::error::Error>> {
        let address = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 25\r\nConnection: close\r\n\r\n[{\"R\xc3\xa9gion\":\"Bretagne\"}]",
        )
        .await?;
        let fetcher = NativeFetcher::new(PathBuf::from("."))?;

        let body = fetcher.get_text(&format!("http://{address}/records")).await?;
        assert_eq!(body, "[{\"Région\":\"Bretagne\"}]");

        Ok(())
    }

    #[tokio::test]
    async fn test_http_get_fails_on_latin1_body() -> Result<(), Box<dyn std::error::Error>> {
        let address = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 24\r\nConnection: close\r\n\r\n[{\"R\xe9gion\":\"Bretagne\"}]",
        )
        .await?;
        let fetcher = NativeFetcher::new(PathBuf::from("."))?;

        let result = fetcher.get_text(&format!("http://{address}/records")).await;
        assert!(matches!(result, Err(LoadError::Fetch { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_http_error_status() -> Result<(), Box<dyn std::error::Error>> {
        let address =
            serve_once(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .await?;
        let fetcher = NativeFetcher::new(PathBuf::from("."))?;

        let result = fetcher.get_text(&format!("http://{address}/records")).await;
        assert!(matches!(result, Err(LoadError::Status { status: 404, .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_https_goes_through_the_client() -> Result<(), Box<dyn std::error::Error>> {
        let fetcher = NativeFetcher::new(PathBuf::from("."))?;

        // Nothing listens on port 1, so the connection itself fails.
        let result = fetcher.get_text("https://127.0.0.1:1/records").await;
        assert!(matches!(result, Err(LoadError::Fetch { .. })));

        let result = fetcher.get_text("ftp://records.local/api").await;
        assert!(matches!(result, Err(LoadError::UnsupportedScheme { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_is_an_io_error() -> Result<(), Box<dyn std::error::Error>> {
        let fetcher = NativeFetcher::new(std::env::temp_dir())?;

        let result = fetcher.get_text("annuaire-missing-dataset.json").await;
        assert!(matches!(result, Err(LoadError::Io { .. })));

        Ok(())
    }
}
