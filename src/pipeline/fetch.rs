//! Caption download: the only stage with network I/O.
//!
//! [`CaptionFetcher`] is the seam between the converter and the network.
//! The default [`HttpCaptionFetcher`] issues one GET per video against the
//! host's caption endpoint:
//!
//! ```text
//! https://fast.wistia.net/embed/captions/<TOKEN>.vtt?language=eng
//! ```
//!
//! There is no retry: a failed download is reported and that file skipped.
//! Tests and offline callers inject their own fetcher through
//! [`crate::config::ConversionConfigBuilder::fetcher`].

use crate::config::ConversionConfig;
use crate::error::Vtt2PdfError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// Source of raw caption tracks, keyed by video token.
#[async_trait]
pub trait CaptionFetcher: Send + Sync {
    /// Return the raw WebVTT text for `video_token`.
    async fn fetch(&self, video_token: &str) -> Result<String, Vtt2PdfError>;
}

/// Caption endpoint for a token under `base_url` (scheme + host, no trailing slash).
pub fn caption_url(base_url: &str, video_token: &str, language: &str) -> String {
    format!(
        "{}/embed/captions/{}.vtt?language={}",
        base_url.trim_end_matches('/'),
        video_token,
        language
    )
}

/// Downloads caption tracks over HTTPS with reqwest.
#[derive(Debug, Clone)]
pub struct HttpCaptionFetcher {
    client: reqwest::Client,
    base_url: String,
    language: String,
    timeout_secs: Option<u64>,
}

impl HttpCaptionFetcher {
    /// Fetcher for `https://<host>` captions in `language`.
    pub fn new(
        host: &str,
        language: &str,
        timeout_secs: Option<u64>,
    ) -> Result<Self, Vtt2PdfError> {
        Self::with_base_url(&format!("https://{host}"), language, timeout_secs)
    }

    /// Fetcher for an explicit base URL, e.g. a mirror or a local test server.
    pub fn with_base_url(
        base_url: &str,
        language: &str,
        timeout_secs: Option<u64>,
    ) -> Result<Self, Vtt2PdfError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Vtt2PdfError::Internal(format!("HTTP client: {e}")))?;
        Ok(Self::with_client(client, base_url, language, timeout_secs))
    }

    /// Fetcher around a caller-configured client (proxies, headers, TLS roots).
    ///
    /// `timeout_secs` is only used to report timeouts; the client's own
    /// timeout setting is what applies.
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        language: &str,
        timeout_secs: Option<u64>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            language: language.to_string(),
            timeout_secs,
        }
    }

    /// Fetcher built from `caption_host`, `language` and `request_timeout_secs`.
    pub fn from_config(config: &ConversionConfig) -> Result<Self, Vtt2PdfError> {
        Self::new(
            &config.caption_host,
            &config.language,
            config.request_timeout_secs,
        )
    }

    /// URL this fetcher would request for `video_token`.
    pub fn url_for(&self, video_token: &str) -> String {
        caption_url(&self.base_url, video_token, &self.language)
    }
}

#[async_trait]
impl CaptionFetcher for HttpCaptionFetcher {
    async fn fetch(&self, video_token: &str) -> Result<String, Vtt2PdfError> {
        let url = self.url_for(video_token);
        info!("Downloading captions from: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                Vtt2PdfError::Timeout {
                    url: url.clone(),
                    secs: self.timeout_secs,
                }
            } else {
                Vtt2PdfError::NetworkFailure {
                    url: url.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Vtt2PdfError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Vtt2PdfError::NetworkFailure {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        debug!("Downloaded {} bytes of captions", body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn local_fetcher(base: &str) -> HttpCaptionFetcher {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpCaptionFetcher::with_client(client, base, "eng", Some(5))
    }

    /// Serve exactly one canned HTTP response on a local port.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_caption_url() {
        assert_eq!(
            caption_url("https://fast.wistia.net", "ab12", "eng"),
            "https://fast.wistia.net/embed/captions/ab12.vtt?language=eng"
        );
        assert_eq!(
            caption_url("https://fast.wistia.net/", "ab12", "deu"),
            "https://fast.wistia.net/embed/captions/ab12.vtt?language=deu"
        );
    }

    #[test]
    fn test_url_for_default_host() {
        let f = HttpCaptionFetcher::from_config(&ConversionConfig::default()).unwrap();
        assert_eq!(
            f.url_for("tok"),
            "https://fast.wistia.net/embed/captions/tok.vtt?language=eng"
        );
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/vtt\r\nContent-Length: 50\r\nConnection: close\r\n\r\n\
             WEBVTT\n\n00:00:00.000 --> 00:00:02.000\nHello there.",
        )
        .await;
        let f = local_fetcher(&base);
        let body = f.fetch("abc").await.unwrap();
        assert!(body.starts_with("WEBVTT"));
        assert!(body.ends_with("Hello there."));
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let base = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let f = local_fetcher(&base);
        let err = f.fetch("missing").await.unwrap_err();
        match err {
            Vtt2PdfError::HttpStatus { status, url } => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/embed/captions/missing.vtt?language=eng"));
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // bind then drop to get a port nobody listens on
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let f = local_fetcher(&format!("http://127.0.0.1:{port}"));
        let err = f.fetch("abc").await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Network);
    }
}
