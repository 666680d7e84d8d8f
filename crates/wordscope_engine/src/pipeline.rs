use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use wordscope_core::{normalize_url, Analysis, AnalysisSettings, ChartKind, RequestId};
use wordscope_logging::{ws_debug, ws_info, ws_warn};

use crate::extract::{HtmlTextExtractor, PlainTextExtractor, TextExtractor};
use crate::fetch::{
    mime_essence, FetchSettings, Fetcher, NullProgressSink, ProgressSink, ReqwestFetcher,
};
use crate::render::render_chart_html;
use crate::token::{HanSegmentingTokenizer, Tokenizer};
use crate::{decode_html, EngineEvent, FetchError, LoadProgress, Stage, TextDocument};

/// Documents kept per session before the least recently used one is dropped.
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

/// Successfully loaded documents keyed by normalized URL, least recently used
/// first out. Failures are never stored.
#[derive(Debug)]
pub struct DocumentCache {
    capacity: usize,
    slots: Mutex<CacheSlots>,
}

#[derive(Debug, Default)]
struct CacheSlots {
    docs: HashMap<String, Arc<TextDocument>>,
    /// Keys from least to most recently used.
    recency: VecDeque<String>,
}

impl CacheSlots {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            if let Some(k) = self.recency.remove(pos) {
                self.recency.push_back(k);
            }
        }
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl DocumentCache {
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            slots: Mutex::new(CacheSlots::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, url: &str) -> Option<Arc<TextDocument>> {
        let key = normalize_url(url);
        let mut slots = self.lock();
        let doc = slots.docs.get(&key).cloned()?;
        slots.touch(&key);
        Some(doc)
    }

    pub fn insert(&self, url: &str, doc: Arc<TextDocument>) {
        let key = normalize_url(url);
        let mut slots = self.lock();
        if slots.docs.insert(key.clone(), doc).is_some() {
            slots.touch(&key);
        } else {
            slots.recency.push_back(key);
        }
        while slots.recency.len() > self.capacity {
            if let Some(evicted) = slots.recency.pop_front() {
                ws_debug!("Evicting cached document url={}", evicted);
                slots.docs.remove(&evicted);
            }
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().docs.contains_key(&normalize_url(url))
    }

    pub fn len(&self) -> usize {
        self.lock().docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().docs.is_empty()
    }

    pub fn clear(&self) {
        let mut slots = self.lock();
        slots.docs.clear();
        slots.recency.clear();
    }

    fn lock(&self) -> MutexGuard<'_, CacheSlots> {
        // Every mutation leaves both fields in step, so a panicked holder is harmless.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderResult {
    /// No URL entered.
    Empty,
    /// Fetching failed; nothing downstream ran.
    Failed { url: String, message: String },
    Rendered(Rendered),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub document: Arc<TextDocument>,
    pub analysis: Analysis,
    pub html: String,
}

/// URL in, tokens out: fetch -> decode -> extract -> tokenize, memoized per URL.
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    tokenizer: Arc<dyn Tokenizer>,
    settings: AnalysisSettings,
    cache: DocumentCache,
}

impl Pipeline {
    pub fn new(fetch: FetchSettings, settings: AnalysisSettings) -> Self {
        Self::with_parts(
            Arc::new(ReqwestFetcher::new(fetch)),
            Arc::new(HanSegmentingTokenizer::default()),
            settings,
        )
    }

    pub fn with_parts(
        fetcher: Arc<dyn Fetcher>,
        tokenizer: Arc<dyn Tokenizer>,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            fetcher,
            tokenizer,
            settings,
            cache: DocumentCache::default(),
        }
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = DocumentCache::with_capacity(capacity);
        self
    }

    pub fn settings(&self) -> AnalysisSettings {
        self.settings
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    pub async fn load(
        &self,
        request_id: RequestId,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<Arc<TextDocument>, FetchError> {
        if let Some(doc) = self.cache.get(url) {
            ws_debug!("Cache hit request_id={} url={}", request_id, url);
            emit_stage(sink, request_id, Stage::Done);
            return Ok(doc);
        }

        let fetched = self.fetcher.fetch(request_id, url, sink).await?;

        emit_stage(sink, request_id, Stage::Decoding);
        let content_type = fetched.metadata.content_type.as_deref();
        let decoded = decode_html(&fetched.bytes, content_type);
        if decoded.replaced {
            ws_warn!(
                "Malformed {} bytes replaced request_id={} url={}",
                decoded.encoding_label,
                request_id,
                url
            );
        }

        emit_stage(sink, request_id, Stage::Extracting);
        let extracted = if is_plain_text(content_type) {
            PlainTextExtractor.extract(&decoded.html)
        } else {
            HtmlTextExtractor.extract(&decoded.html)
        };

        emit_stage(sink, request_id, Stage::Tokenizing);
        let tokens = self.tokenizer.tokenize(&extracted.text);
        ws_info!(
            "Loaded request_id={} url={} bytes={} encoding={} tokens={}",
            request_id,
            fetched.metadata.final_url,
            fetched.metadata.byte_len,
            decoded.encoding_label,
            tokens.len()
        );

        let doc = Arc::new(TextDocument {
            final_url: fetched.metadata.final_url,
            title: extracted.title,
            encoding_label: decoded.encoding_label,
            text: extracted.text,
            tokens,
        });
        self.cache.insert(url, doc.clone());
        emit_stage(sink, request_id, Stage::Done);
        Ok(doc)
    }

    /// One full recomputation for the three user inputs.
    pub async fn render(&self, url: &str, min_frequency: u64, chart: ChartKind) -> RenderResult {
        let url = url.trim();
        if url.is_empty() {
            return RenderResult::Empty;
        }
        let document = match self.load(0, url, &NullProgressSink).await {
            Ok(doc) => doc,
            Err(err) => {
                ws_warn!("Render failed url={}: {}", url, err);
                return RenderResult::Failed {
                    url: url.to_string(),
                    message: err.to_string(),
                };
            }
        };
        let analysis = Analysis::from_tokens(
            document.tokens.as_slice(),
            self.settings,
            min_frequency,
            chart,
        );
        let title = document.title.clone().unwrap_or_else(|| url.to_string());
        let html = render_chart_html(&analysis.payload, &title);
        RenderResult::Rendered(Rendered {
            document,
            analysis,
            html,
        })
    }
}

fn is_plain_text(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| mime_essence(ct).eq_ignore_ascii_case("text/plain"))
}

fn emit_stage(sink: &dyn ProgressSink, request_id: RequestId, stage: Stage) {
    ws_debug!("request_id={} stage={:?}", request_id, stage);
    sink.emit(EngineEvent::Progress(LoadProgress {
        request_id,
        stage,
        bytes: None,
    }));
}
