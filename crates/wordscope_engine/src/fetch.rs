use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, Url};
use wordscope_core::RequestId;
use wordscope_logging::{ws_debug, ws_warn};

use crate::{EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, LoadProgress, Stage};

/// Media types a page may be served as and still be worth counting words in.
pub const TEXT_CONTENT_TYPES: [&str; 3] = ["text/html", "application/xhtml+xml", "text/plain"];

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Number of redirects followed before giving up.
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: TEXT_CONTENT_TYPES.iter().map(|ct| ct.to_string()).collect(),
            user_agent: concat!("wordscope/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Receives load progress as it happens.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Forwards progress to the engine's event channel.
pub struct ChannelProgressSink {
    tx: Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        // The receiver is gone only when the session is shutting down.
        let _ = self.tx.send(event);
    }
}

/// Sink for callers that do not display progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: EngineEvent) {}
}

/// Downloads the raw bytes of one page.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        request_id: RequestId,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// A client per request, so the redirect policy can report how many hops
    /// this particular page took.
    fn client(&self, hops: Arc<AtomicUsize>) -> Result<Client, FetchError> {
        let limit = self.settings.redirect_limit;
        let policy = Policy::custom(move |attempt| {
            // `previous` holds every URL requested so far, the first one included.
            let followed = attempt.previous().len();
            if followed > limit {
                attempt.error(format!("more than {limit} redirects"))
            } else {
                hops.store(followed, Ordering::Relaxed);
                attempt.follow()
            }
        });

        Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .user_agent(self.settings.user_agent.as_str())
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    /// Status, declared length and media type, all checked before the body is read.
    fn accept(&self, response: &Response) -> Result<Option<String>, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(declared) = response.content_length() {
            if declared > self.settings.max_bytes {
                return Err(self.too_large(declared));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        // A server that names no media type gets the benefit of the doubt.
        if let Some(ct) = content_type.as_deref() {
            let essence = mime_essence(ct);
            let allowed = self
                .settings
                .allowed_content_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(essence));
            if !allowed {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    format!("expected {}", self.settings.allowed_content_types.join(", ")),
                ));
            }
        }
        Ok(content_type)
    }

    async fn read_body(
        &self,
        request_id: RequestId,
        response: Response,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<u8>, FetchError> {
        let report = |bytes: usize| {
            sink.emit(EngineEvent::Progress(LoadProgress {
                request_id,
                stage: Stage::Downloading,
                bytes: Some(bytes as u64),
            }))
        };

        report(0);
        let mut body = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(classify)?;
            let received = (body.len() + chunk.len()) as u64;
            if received > self.settings.max_bytes {
                return Err(self.too_large(received));
            }
            body.extend_from_slice(&chunk);
            report(body.len());
        }
        Ok(body)
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "raise max_bytes to analyse it",
        )
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(
        &self,
        request_id: RequestId,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<FetchOutput, FetchError> {
        let target = Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let hops = Arc::new(AtomicUsize::new(0));
        let client = self.client(hops.clone())?;

        ws_debug!("GET request_id={} url={}", request_id, target);
        let response = client.get(target).send().await.map_err(classify)?;
        let content_type = self.accept(&response).inspect_err(|err| {
            ws_warn!("Rejected request_id={} url={}: {}", request_id, url, err);
        })?;

        let final_url = response.url().to_string();
        let bytes = self.read_body(request_id, response, sink).await?;

        Ok(FetchOutput {
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url,
                redirect_count: hops.load(Ordering::Relaxed),
                content_type,
                byte_len: bytes.len() as u64,
            },
            bytes,
        })
    }
}

/// `text/html; charset=utf-8` -> `text/html`.
pub fn mime_essence(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

fn classify(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn essence_drops_parameters() {
        assert_eq!(mime_essence("text/html; charset=utf-8"), "text/html");
        assert_eq!(mime_essence(" text/plain "), "text/plain");
        assert_eq!(mime_essence(""), "");
    }
}
