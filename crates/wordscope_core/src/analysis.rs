use crate::{
    ChartKind, ChartPayload, FrequencyTable, RankedEntry, DEFAULT_MIN_TOKEN_LENGTH, DEFAULT_TOP_N,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub min_token_length: usize,
    pub top_n: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Everything one recomputation pass shows: computed once, shared by the
/// table and whichever chart is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Top-N of the length-filtered table; unaffected by the frequency threshold.
    pub top: Vec<RankedEntry>,
    /// The frequency-filtered table in ranking order.
    pub ranked: Vec<RankedEntry>,
    pub payload: ChartPayload,
    pub min_frequency: u64,
    /// Slider range `(1, max count)`; `None` when nothing survived the length filter.
    pub frequency_bounds: Option<(u64, u64)>,
}

impl Analysis {
    /// `min_frequency` is applied as given (at least 1). A threshold above every
    /// count leaves `ranked` and the payload empty; the slider clamps before calling.
    pub fn compute(
        table: &FrequencyTable,
        min_frequency: u64,
        chart: ChartKind,
        top_n: usize,
    ) -> Self {
        let frequency_bounds = frequency_bounds(table);
        let min_frequency = min_frequency.max(1);
        let ranked = table.filter_by_frequency(min_frequency).ranked();
        let payload = ChartPayload::build(chart, &ranked);
        Self {
            top: table.top_n(top_n),
            ranked,
            payload,
            min_frequency,
            frequency_bounds,
        }
    }

    /// Tokenized text straight to an analysis, applying the length policy.
    pub fn from_tokens<S: AsRef<str>>(
        tokens: &[S],
        settings: AnalysisSettings,
        min_frequency: u64,
        chart: ChartKind,
    ) -> Self {
        let table = FrequencyTable::from_tokens(tokens).filter_by_length(settings.min_token_length);
        Self::compute(&table, min_frequency, chart, settings.top_n)
    }
}

pub fn frequency_bounds(table: &FrequencyTable) -> Option<(u64, u64)> {
    table.max_count().map(|max| (1, max))
}

/// Clamps a requested threshold into the slider range. Without a range the
/// threshold is 1, the slider's resting value.
pub fn clamp_min_frequency(requested: u64, bounds: Option<(u64, u64)>) -> u64 {
    match bounds {
        Some((low, high)) => requested.clamp(low, high),
        None => 1,
    }
}
