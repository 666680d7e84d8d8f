use crate::{Analysis, ChartKind};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusView {
    /// No URL entered yet.
    #[default]
    Idle,
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
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub status: StatusView,
    pub chart: ChartKind,
    pub min_frequency: u64,
    /// Present only once a document with at least one token is loaded.
    pub analysis: Option<Analysis>,
    pub dirty: bool,
}
