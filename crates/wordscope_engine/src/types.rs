use std::fmt;
use std::sync::Arc;

use wordscope_core::{LoadedDocument, RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Downloading,
    Decoding,
    Extracting,
    Tokenizing,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadProgress {
    pub request_id: RequestId,
    pub stage: Stage,
    pub bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(LoadProgress),
    DocumentLoaded {
        request_id: RequestId,
        result: Result<Arc<TextDocument>, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

/// A fetched page reduced to what the frequency analysis needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    pub final_url: String,
    pub title: Option<String>,
    pub encoding_label: String,
    pub text: String,
    pub tokens: Vec<String>,
}

impl From<&TextDocument> for LoadedDocument {
    fn from(doc: &TextDocument) -> Self {
        LoadedDocument {
            final_url: doc.final_url.clone(),
            title: doc.title.clone(),
            tokens: doc.tokens.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => f.write_str("invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => f.write_str("timed out"),
            FailureKind::RedirectLimitExceeded => f.write_str("too many redirects"),
            FailureKind::TooLarge { max_bytes, actual } => match actual {
                Some(actual) => write!(f, "page too large ({actual} of at most {max_bytes} bytes)"),
                None => write!(f, "page too large (at most {max_bytes} bytes)"),
            },
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "not a text page ({content_type})")
            }
            FailureKind::Network => f.write_str("network error"),
        }
    }
}
