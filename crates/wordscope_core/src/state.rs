use wordscope_logging::ws_debug;

use crate::analysis::{clamp_min_frequency, frequency_bounds};
use crate::view_model::{AppViewModel, StatusView};
use crate::{Analysis, AnalysisSettings, ChartKind, FrequencyTable};

pub type RequestId = u64;

/// Tokenized document as delivered by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadedDocument {
    pub final_url: String,
    pub title: Option<String>,
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum DocumentState {
    #[default]
    Empty,
    Loading {
        url: String,
    },
    Failed {
        url: String,
        message: String,
    },
    Ready {
        url: String,
        title: Option<String>,
        token_count: usize,
        /// Length-filtered table; re-filtered by frequency on every view.
        table: FrequencyTable,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    settings: AnalysisSettings,
    document: DocumentState,
    min_frequency: u64,
    chart: ChartKind,
    latest_request: RequestId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(AnalysisSettings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: AnalysisSettings) -> Self {
        Self {
            settings,
            document: DocumentState::Empty,
            min_frequency: 1,
            chart: ChartKind::default(),
            latest_request: 0,
            dirty: false,
        }
    }

    pub fn settings(&self) -> AnalysisSettings {
        self.settings
    }

    pub fn chart(&self) -> ChartKind {
        self.chart
    }

    pub fn min_frequency(&self) -> u64 {
        self.min_frequency
    }

    pub fn latest_request(&self) -> RequestId {
        self.latest_request
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let (status, analysis) = match &self.document {
            DocumentState::Empty => (StatusView::Idle, None),
            DocumentState::Loading { url } => (StatusView::Loading { url: url.clone() }, None),
            DocumentState::Failed { url, message } => (
                StatusView::Failed {
                    url: url.clone(),
                    message: message.clone(),
                },
                None,
            ),
            DocumentState::Ready {
                url,
                title,
                token_count,
                table,
            } => {
                // An empty extraction shows no table and no chart, like "nothing entered yet".
                let analysis = (*token_count > 0).then(|| {
                    Analysis::compute(table, self.min_frequency, self.chart, self.settings.top_n)
                });
                (
                    StatusView::Ready {
                        url: url.clone(),
                        title: title.clone(),
                        token_count: *token_count,
                    },
                    analysis,
                )
            }
        };

        AppViewModel {
            status,
            chart: self.chart,
            min_frequency: self.min_frequency,
            analysis,
            dirty: self.dirty,
        }
    }

    pub(crate) fn begin_request(&mut self, url: String) -> RequestId {
        self.latest_request += 1;
        self.document = DocumentState::Loading { url };
        self.min_frequency = 1;
        self.dirty = true;
        self.latest_request
    }

    pub(crate) fn clear_document(&mut self) -> bool {
        if self.document == DocumentState::Empty {
            return false;
        }
        // Invalidate any in-flight request.
        self.latest_request += 1;
        self.document = DocumentState::Empty;
        self.min_frequency = 1;
        self.dirty = true;
        true
    }

    pub(crate) fn apply_loaded(
        &mut self,
        request_id: RequestId,
        result: Result<LoadedDocument, String>,
    ) -> bool {
        if request_id != self.latest_request {
            ws_debug!(
                "Ignoring stale document load request_id={} latest={}",
                request_id,
                self.latest_request
            );
            return false;
        }
        let url = match &self.document {
            DocumentState::Loading { url } => url.clone(),
            _ => return false,
        };
        self.document = match result {
            Ok(doc) => {
                let table = FrequencyTable::from_tokens(&doc.tokens)
                    .filter_by_length(self.settings.min_token_length);
                ws_debug!(
                    "Document ready url={} tokens={} distinct_after_length_filter={}",
                    url,
                    doc.tokens.len(),
                    table.len()
                );
                DocumentState::Ready {
                    url,
                    title: doc.title,
                    token_count: doc.tokens.len(),
                    table,
                }
            }
            Err(message) => DocumentState::Failed { url, message },
        };
        self.min_frequency = 1;
        self.dirty = true;
        true
    }

    pub(crate) fn set_min_frequency(&mut self, requested: u64) -> bool {
        let DocumentState::Ready { table, .. } = &self.document else {
            return false;
        };
        let bounds = frequency_bounds(table);
        if bounds.is_none() {
            return false;
        }
        let next = clamp_min_frequency(requested, bounds);
        if next == self.min_frequency {
            return false;
        }
        self.min_frequency = next;
        self.dirty = true;
        true
    }

    pub(crate) fn set_chart(&mut self, chart: ChartKind) -> bool {
        if chart == self.chart {
            return false;
        }
        self.chart = chart;
        self.dirty = true;
        true
    }
}
