use std::sync::Arc;

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wordscope_core::{AnalysisSettings, ChartKind, ChartPayload, RankedEntry};
use wordscope_engine::{
    EngineEvent, EngineHandle, FetchSettings, NullProgressSink, Pipeline, RenderResult,
    ReqwestFetcher, WhitespaceTokenizer,
};

const PAGE: &str = "<html><head><title>Cats</title></head><body>\
    <p>the cat sat on the mat</p><p>the mat was flat</p></body></html>";

async fn serve_page(server: &MockServer, route: &str, body: &str, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .expect(expected_hits)
        .mount(server)
        .await;
}

fn pipeline() -> Pipeline {
    Pipeline::new(FetchSettings::default(), AnalysisSettings::default())
}

#[tokio::test]
async fn render_ranks_words_and_builds_chart_page() {
    wordscope_logging::initialize_for_tests();
    let server = MockServer::start().await;
    serve_page(&server, "/cats", PAGE, 1).await;
    let url = format!("{}/cats", server.uri());

    let RenderResult::Rendered(rendered) = pipeline().render(&url, 1, ChartKind::Bar).await else {
        panic!("expected rendered result");
    };

    assert_eq!(rendered.document.title.as_deref(), Some("Cats"));
    assert_eq!(
        rendered.analysis.top[..2].to_vec(),
        vec![RankedEntry::new("the", 3), RankedEntry::new("mat", 2)]
    );
    assert!(rendered.analysis.top.iter().all(|e| e.token.chars().count() >= 2));
    assert_eq!(rendered.analysis.payload.kind(), ChartKind::Bar);
    assert!(rendered.html.contains("echarts.init"));
    assert!(rendered.html.contains("\"type\":\"bar\""));
}

#[tokio::test]
async fn threshold_and_chart_changes_reuse_the_cached_document() {
    let server = MockServer::start().await;
    serve_page(&server, "/cats", PAGE, 1).await;
    let url = format!("{}/cats", server.uri());
    let pipeline = pipeline();

    let first = pipeline.render(&url, 1, ChartKind::WordCloud).await;
    let second = pipeline.render(&format!("{url}#top"), 2, ChartKind::Pie).await;

    assert!(matches!(first, RenderResult::Rendered(_)));
    let RenderResult::Rendered(rendered) = second else {
        panic!("expected rendered result");
    };
    let ChartPayload::Pie { slices } = &rendered.analysis.payload else {
        panic!("expected pie payload");
    };
    assert_eq!(
        slices,
        &vec![("the".to_string(), 3), ("mat".to_string(), 2)]
    );
    assert_eq!(pipeline.cache().len(), 1);
    // `expect(1)` on the mock verifies the second render did not refetch.
}

#[tokio::test]
async fn threshold_above_every_count_renders_empty_chart() {
    let server = MockServer::start().await;
    serve_page(&server, "/cats", PAGE, 1).await;
    let url = format!("{}/cats", server.uri());

    let RenderResult::Rendered(rendered) = pipeline().render(&url, 50, ChartKind::Line).await else {
        panic!("expected rendered result");
    };
    assert_eq!(rendered.analysis.min_frequency, 50);
    assert!(rendered.analysis.ranked.is_empty());
    assert_eq!(rendered.analysis.payload.point_count(), 0);
    // The top table ignores the threshold.
    assert_eq!(rendered.analysis.top[0], RankedEntry::new("the", 3));
}

#[tokio::test]
async fn chinese_page_yields_multi_character_words() {
    let server = MockServer::start().await;
    let page = "<html><head><title>文本分析</title></head><body>\
        <p>文本分析与可视化工具。</p><p>文本分析很有用。</p></body></html>";
    serve_page(&server, "/zh", page, 1).await;
    let url = format!("{}/zh", server.uri());

    let RenderResult::Rendered(rendered) = pipeline().render(&url, 1, ChartKind::WordCloud).await
    else {
        panic!("expected rendered result");
    };
    assert!(!rendered.analysis.top.is_empty());
    assert!(rendered
        .analysis
        .top
        .iter()
        .all(|entry| entry.token.chars().count() >= 2));
    assert!(rendered.analysis.top[0].count >= 2);
}

#[tokio::test]
async fn stray_byte_still_renders() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mojibake"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            b"<p>hello \xff world hello</p>".to_vec(),
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;
    let url = format!("{}/mojibake", server.uri());

    let RenderResult::Rendered(rendered) = pipeline().render(&url, 1, ChartKind::Bar).await else {
        panic!("expected rendered result");
    };
    assert_eq!(rendered.analysis.top[0], RankedEntry::new("hello", 2));
}

#[tokio::test]
async fn unreachable_url_reports_failure_and_caches_nothing() {
    let pipeline = pipeline();
    // Nothing listens on port 9 of the loopback interface.
    let result = pipeline
        .render("http://127.0.0.1:9/nothing", 1, ChartKind::Bar)
        .await;
    let RenderResult::Failed { url, message } = result else {
        panic!("expected failure, got {result:?}");
    };
    assert_eq!(url, "http://127.0.0.1:9/nothing");
    assert!(message.contains("network error"), "message: {message}");
    assert!(pipeline.cache().is_empty());
}

#[tokio::test]
async fn http_error_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;
    let url = format!("{}/gone", server.uri());
    let pipeline = pipeline();

    for _ in 0..2 {
        let result = pipeline.render(&url, 1, ChartKind::Bar).await;
        assert!(matches!(result, RenderResult::Failed { .. }));
    }
}

#[tokio::test]
async fn blank_url_renders_nothing() {
    assert_eq!(pipeline().render("   ", 1, ChartKind::Bar).await, RenderResult::Empty);
}

#[tokio::test]
async fn empty_page_renders_empty_analysis() {
    let server = MockServer::start().await;
    serve_page(&server, "/empty", "<html><body></body></html>", 1).await;
    let url = format!("{}/empty", server.uri());

    let RenderResult::Rendered(rendered) = pipeline().render(&url, 1, ChartKind::Radar).await
    else {
        panic!("expected rendered result");
    };
    assert!(rendered.document.tokens.is_empty());
    assert!(rendered.analysis.top.is_empty());
    assert_eq!(rendered.analysis.frequency_bounds, None);
}

#[tokio::test]
async fn plain_text_bodies_are_tokenized_directly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<b>not html</b>", "text/plain"))
        .mount(&server)
        .await;
    let url = format!("{}/notes.txt", server.uri());
    let pipeline = Pipeline::with_parts(
        Arc::new(ReqwestFetcher::new(FetchSettings::default())),
        Arc::new(WhitespaceTokenizer),
        AnalysisSettings::default(),
    );

    let doc = pipeline.load(1, &url, &NullProgressSink).await.unwrap();
    assert_eq!(doc.tokens, vec!["<b>not", "html</b>"]);
}

#[test]
fn engine_handle_reports_document_loaded() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        serve_page(&server, "/cats", PAGE, 1).await;
        server
    });
    let url = format!("{}/cats", server.uri());

    let engine = EngineHandle::new(pipeline());
    engine.load(42, url);

    let loaded = std::iter::from_fn(|| engine.recv())
        .find_map(|event| match event {
            EngineEvent::DocumentLoaded { request_id, result } => Some((request_id, result)),
            EngineEvent::Progress(_) => None,
        })
        .expect("document event");
    assert_eq!(loaded.0, 42);
    let doc = loaded.1.expect("loaded document");
    assert_eq!(doc.tokens.len(), 11);
    assert_eq!(doc.tokens[0], "cats");
}
