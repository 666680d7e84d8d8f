use pretty_assertions::assert_eq;
use serde_json::json;
use wordscope_core::{ChartKind, ChartPayload, RankedEntry};
use wordscope_engine::{chart_option, render_chart_html};

fn ranked() -> Vec<RankedEntry> {
    vec![RankedEntry::new("rust", 4), RankedEntry::new("cargo", 2)]
}

#[test]
fn bar_option_has_category_axis_and_values() {
    let option = chart_option(&ChartPayload::build(ChartKind::Bar, &ranked()));
    assert_eq!(option["xAxis"]["data"], json!(["rust", "cargo"]));
    assert_eq!(option["series"][0]["type"], json!("bar"));
    assert_eq!(option["series"][0]["data"], json!([4, 2]));
    assert_eq!(option["series"][0]["name"], json!("frequency"));
}

#[test]
fn line_and_scatter_use_their_series_type() {
    for (kind, series_type) in [(ChartKind::Line, "line"), (ChartKind::Scatter, "scatter")] {
        let option = chart_option(&ChartPayload::build(kind, &ranked()));
        assert_eq!(option["series"][0]["type"], json!(series_type));
    }
}

#[test]
fn word_cloud_option_carries_size_range() {
    let option = chart_option(&ChartPayload::build(ChartKind::WordCloud, &ranked()));
    assert_eq!(option["series"][0]["sizeRange"], json!([20, 100]));
    assert_eq!(
        option["series"][0]["data"][0],
        json!({ "name": "rust", "value": 4 })
    );
}

#[test]
fn radar_option_has_indicator_per_word() {
    let option = chart_option(&ChartPayload::build(ChartKind::Radar, &ranked()));
    assert_eq!(
        option["radar"]["indicator"],
        json!([{ "name": "rust", "max": 4 }, { "name": "cargo", "max": 4 }])
    );
    assert_eq!(option["series"][0]["areaStyle"]["opacity"], json!(0.1));
}

#[test]
fn gauge_option_sums_counts_with_colour_bands() {
    let option = chart_option(&ChartPayload::build(ChartKind::Gauge, &ranked()));
    assert_eq!(option["series"][0]["data"][0]["value"], json!(6));
    assert_eq!(
        option["series"][0]["axisLine"]["lineStyle"]["color"][0],
        json!([0.3, "#67e0e3"])
    );
}

#[test]
fn page_loads_wordcloud_extension_only_when_needed() {
    let cloud = render_chart_html(&ChartPayload::build(ChartKind::WordCloud, &ranked()), "t");
    let pie = render_chart_html(&ChartPayload::build(ChartKind::Pie, &ranked()), "t");
    assert!(cloud.contains("echarts-wordcloud"));
    assert!(!pie.contains("echarts-wordcloud"));
    assert!(pie.contains("height:600px"));
}

#[test]
fn hostile_words_cannot_break_out_of_the_script() {
    let ranked = vec![RankedEntry::new("</script><script>alert(1)", 1)];
    let html = render_chart_html(&ChartPayload::build(ChartKind::Pie, &ranked), "<x>");
    assert!(!html.contains("</script><script>alert"));
    assert!(html.contains("<title>&lt;x&gt;</title>"));
}
