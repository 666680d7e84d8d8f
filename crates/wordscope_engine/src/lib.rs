//! Wordscope engine: fetch, text extraction, tokenization and chart rendering.
mod decode;
mod engine;
mod extract;
mod fetch;
mod persist;
mod pipeline;
mod render;
mod token;
mod types;

pub use decode::{decode_html, DecodedHtml};
pub use engine::EngineHandle;
pub use extract::{ExtractedText, HtmlTextExtractor, PlainTextExtractor, TextExtractor};
pub use fetch::{
    mime_essence, ChannelProgressSink, FetchSettings, Fetcher, NullProgressSink, ProgressSink,
    ReqwestFetcher, TEXT_CONTENT_TYPES,
};
pub use persist::{PersistError, SessionDir};
pub use pipeline::{DocumentCache, Pipeline, RenderResult, Rendered, DEFAULT_CACHE_CAPACITY};
pub use render::{chart_option, render_chart_html, CHART_HEIGHT_PX};
pub use token::{HanSegmentingTokenizer, Tokenizer, UnicodeWordTokenizer, WhitespaceTokenizer};
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, LoadProgress, Stage,
    TextDocument,
};
