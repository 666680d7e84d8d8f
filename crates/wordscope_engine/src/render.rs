//! ECharts rendering of chart payloads as a self-contained HTML page.

use serde_json::{json, Value};
use wordscope_core::{ChartKind, ChartPayload};

const ECHARTS_SRC: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";
const WORDCLOUD_SRC: &str =
    "https://cdn.jsdelivr.net/npm/echarts-wordcloud@2/dist/echarts-wordcloud.min.js";
/// Height of the embedded chart, matching the display surface.
pub const CHART_HEIGHT_PX: u32 = 600;

/// ECharts `option` object for a payload.
pub fn chart_option(payload: &ChartPayload) -> Value {
    match payload {
        ChartPayload::WordCloud { words, size_range } => json!({
            "tooltip": {},
            "series": [{
                "type": "wordCloud",
                "sizeRange": [size_range.0, size_range.1],
                "data": words
                    .iter()
                    .map(|(name, value)| json!({ "name": name, "value": value }))
                    .collect::<Vec<_>>(),
            }],
        }),
        ChartPayload::Series {
            kind,
            series_name,
            categories,
            values,
        } => {
            let series_type = match kind {
                ChartKind::Line => "line",
                ChartKind::Scatter => "scatter",
                _ => "bar",
            };
            json!({
                "tooltip": { "trigger": "axis" },
                "legend": { "data": [series_name] },
                "xAxis": { "type": "category", "data": categories },
                "yAxis": { "type": "value" },
                "series": [{ "name": series_name, "type": series_type, "data": values }],
            })
        }
        ChartPayload::Pie { slices } => json!({
            "tooltip": { "trigger": "item" },
            "series": [{
                "type": "pie",
                "data": slices
                    .iter()
                    .map(|(name, value)| json!({ "name": name, "value": value }))
                    .collect::<Vec<_>>(),
            }],
        }),
        ChartPayload::Radar {
            series_name,
            indicators,
            values,
            area_opacity,
        } => json!({
            "tooltip": {},
            "legend": { "data": [series_name] },
            "radar": {
                "indicator": indicators
                    .iter()
                    .map(|ind| json!({ "name": ind.name, "max": ind.max }))
                    .collect::<Vec<_>>(),
            },
            "series": [{
                "name": series_name,
                "type": "radar",
                "areaStyle": { "opacity": area_opacity },
                "data": [{ "name": series_name, "value": values }],
            }],
        }),
        ChartPayload::Gauge {
            label,
            value,
            bands,
        } => json!({
            "tooltip": {},
            "series": [{
                "type": "gauge",
                "axisLine": {
                    "lineStyle": {
                        "color": bands
                            .iter()
                            .map(|(upper, colour)| json!([upper, colour]))
                            .collect::<Vec<_>>(),
                    },
                },
                "data": [{ "name": label, "value": value }],
            }],
        }),
    }
}

/// Full HTML document embedding the chart.
pub fn render_chart_html(payload: &ChartPayload, title: &str) -> String {
    let option = chart_option(payload);
    let mut scripts = format!(r#"<script src="{ECHARTS_SRC}"></script>"#);
    if payload.kind() == ChartKind::WordCloud {
        scripts.push_str(&format!(r#"<script src="{WORDCLOUD_SRC}"></script>"#));
    }
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>{title}</title>
{scripts}
</head>
<body>
<div id="chart" style="width:100%;height:{CHART_HEIGHT_PX}px;"></div>
<script>
var chart = echarts.init(document.getElementById("chart"));
chart.setOption({option});
</script>
</body>
</html>
"#,
        title = escape_html(title),
        option = escape_script(&option.to_string()),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Keeps page-supplied words from closing the inline script.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}
