use std::fmt;
use std::str::FromStr;

use crate::RankedEntry;

/// Series label used by every chart that names its value series.
pub const SERIES_NAME: &str = "frequency";
/// Font size range (px) of the smallest and largest word in a word cloud.
pub const WORD_SIZE_RANGE: (u32, u32) = (20, 100);
/// Fill opacity of the radar polygon.
pub const RADAR_AREA_OPACITY: f64 = 0.1;
/// Gauge axis bands: (upper bound as a fraction of the axis, colour).
pub const GAUGE_BANDS: [(f64, &str); 3] = [(0.3, "#67e0e3"), (0.7, "#37a2da"), (1.0, "#fd666d")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartKind {
    #[default]
    WordCloud,
    Bar,
    Line,
    Pie,
    Scatter,
    Radar,
    Gauge,
}

impl ChartKind {
    pub const ALL: [ChartKind; 7] = [
        ChartKind::WordCloud,
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Pie,
        ChartKind::Scatter,
        ChartKind::Radar,
        ChartKind::Gauge,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::WordCloud => "word-cloud",
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
            ChartKind::Radar => "radar",
            ChartKind::Gauge => "gauge",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chart type {0:?} (expected one of word-cloud, bar, line, pie, scatter, radar, gauge)")]
pub struct ParseChartKindError(pub String);

impl FromStr for ChartKind {
    type Err = ParseChartKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted == "wordcloud" || wanted == "cloud" {
            return Ok(ChartKind::WordCloud);
        }
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.label() == wanted)
            .ok_or_else(|| ParseChartKindError(s.trim().to_string()))
    }
}

/// Renderer-independent chart data.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartPayload {
    WordCloud {
        words: Vec<(String, u64)>,
        size_range: (u32, u32),
    },
    /// Bar, line and scatter share a category axis and one value series.
    Series {
        kind: ChartKind,
        series_name: String,
        categories: Vec<String>,
        values: Vec<u64>,
    },
    Pie {
        slices: Vec<(String, u64)>,
    },
    Radar {
        series_name: String,
        indicators: Vec<RadarIndicator>,
        values: Vec<u64>,
        area_opacity: f64,
    },
    Gauge {
        label: String,
        value: u64,
        bands: Vec<(f64, String)>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadarIndicator {
    pub name: String,
    pub max: u64,
}

impl ChartPayload {
    pub fn build(kind: ChartKind, ranked: &[RankedEntry]) -> Self {
        match kind {
            ChartKind::WordCloud => ChartPayload::WordCloud {
                words: pairs(ranked),
                size_range: WORD_SIZE_RANGE,
            },
            ChartKind::Bar | ChartKind::Line | ChartKind::Scatter => ChartPayload::Series {
                kind,
                series_name: SERIES_NAME.to_string(),
                categories: ranked.iter().map(|e| e.token.clone()).collect(),
                values: ranked.iter().map(|e| e.count).collect(),
            },
            ChartKind::Pie => ChartPayload::Pie {
                slices: pairs(ranked),
            },
            ChartKind::Radar => {
                let max = ranked.iter().map(|e| e.count).max().unwrap_or(0);
                ChartPayload::Radar {
                    series_name: SERIES_NAME.to_string(),
                    indicators: ranked
                        .iter()
                        .map(|e| RadarIndicator {
                            name: e.token.clone(),
                            max,
                        })
                        .collect(),
                    values: ranked.iter().map(|e| e.count).collect(),
                    area_opacity: RADAR_AREA_OPACITY,
                }
            }
            ChartKind::Gauge => ChartPayload::Gauge {
                label: SERIES_NAME.to_string(),
                value: ranked.iter().map(|e| e.count).sum(),
                bands: GAUGE_BANDS
                    .iter()
                    .map(|(upper, colour)| (*upper, (*colour).to_string()))
                    .collect(),
            },
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            ChartPayload::WordCloud { .. } => ChartKind::WordCloud,
            ChartPayload::Series { kind, .. } => *kind,
            ChartPayload::Pie { .. } => ChartKind::Pie,
            ChartPayload::Radar { .. } => ChartKind::Radar,
            ChartPayload::Gauge { .. } => ChartKind::Gauge,
        }
    }

    /// Number of plotted data points; a gauge always shows one value.
    pub fn point_count(&self) -> usize {
        match self {
            ChartPayload::WordCloud { words, .. } => words.len(),
            ChartPayload::Series { values, .. } => values.len(),
            ChartPayload::Pie { slices } => slices.len(),
            ChartPayload::Radar { values, .. } => values.len(),
            ChartPayload::Gauge { .. } => 1,
        }
    }
}

fn pairs(ranked: &[RankedEntry]) -> Vec<(String, u64)> {
    ranked.iter().map(|e| (e.token.clone(), e.count)).collect()
}
