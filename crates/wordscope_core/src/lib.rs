//! Wordscope core: word-frequency aggregation, chart model and the pure
//! session state machine.
mod analysis;
mod chart;
mod effect;
mod frequency;
mod msg;
mod normalize;
mod state;
mod update;
mod view_model;

pub use analysis::{clamp_min_frequency, frequency_bounds, Analysis, AnalysisSettings};
pub use chart::{
    ChartKind, ChartPayload, ParseChartKindError, RadarIndicator, GAUGE_BANDS,
    RADAR_AREA_OPACITY, SERIES_NAME, WORD_SIZE_RANGE,
};
pub use effect::Effect;
pub use frequency::{FrequencyTable, RankedEntry, DEFAULT_MIN_TOKEN_LENGTH, DEFAULT_TOP_N};
pub use msg::Msg;
pub use normalize::normalize_url;
pub use state::{AppState, LoadedDocument, RequestId};
pub use update::update;
pub use view_model::{AppViewModel, StatusView};
