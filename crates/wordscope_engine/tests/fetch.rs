use std::sync::Mutex;
use std::time::Duration;

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wordscope_engine::{
    EngineEvent, FailureKind, FetchSettings, Fetcher, LoadProgress, ProgressSink, ReqwestFetcher,
    Stage,
};

/// Keeps every downloaded-bytes report in arrival order.
#[derive(Default)]
struct RecordingSink {
    downloaded: Mutex<Vec<u64>>,
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        if let EngineEvent::Progress(LoadProgress {
            stage: Stage::Downloading,
            bytes: Some(bytes),
            ..
        }) = event
        {
            self.downloaded.lock().unwrap().push(bytes);
        }
    }
}

async fn serve(route: &str, response: ResponseTemplate) -> (MockServer, String) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    let url = format!("{}{route}", server.uri());
    (server, url)
}

fn fetcher() -> ReqwestFetcher {
    ReqwestFetcher::new(FetchSettings::default())
}

#[tokio::test]
async fn html_page_is_downloaded_with_progress() {
    let page = "<html><body>word word</body></html>";
    let (_server, url) = serve(
        "/page",
        ResponseTemplate::new(200).set_body_raw(page, "text/html; charset=utf-8"),
    )
    .await;

    let sink = RecordingSink::default();
    let output = fetcher().fetch(1, &url, &sink).await.unwrap();

    assert_eq!(output.bytes, page.as_bytes());
    assert_eq!(output.metadata.final_url, url);
    assert_eq!(output.metadata.redirect_count, 0);
    assert_eq!(output.metadata.byte_len, page.len() as u64);
    assert_eq!(
        output.metadata.content_type.as_deref(),
        Some("text/html; charset=utf-8")
    );

    let downloaded = sink.downloaded.lock().unwrap().clone();
    assert_eq!(downloaded.first(), Some(&0));
    assert_eq!(downloaded.last(), Some(&(page.len() as u64)));
}

#[tokio::test]
async fn plain_text_is_accepted() {
    let (_server, url) = serve(
        "/notes.txt",
        ResponseTemplate::new(200).set_body_raw("just words", "text/plain"),
    )
    .await;

    let output = fetcher()
        .fetch(2, &url, &RecordingSink::default())
        .await
        .unwrap();
    assert_eq!(output.bytes, b"just words");
}

#[tokio::test]
async fn redirects_are_followed_and_counted() {
    let server = MockServer::start().await;
    let target = format!("{}/new", server.uri());
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", target.as_str()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("moved", "text/html"))
        .mount(&server)
        .await;

    let url = format!("{}/old", server.uri());
    let output = fetcher()
        .fetch(3, &url, &RecordingSink::default())
        .await
        .unwrap();
    assert_eq!(output.metadata.original_url, url);
    assert!(output.metadata.final_url.ends_with("/new"));
    assert_eq!(output.metadata.redirect_count, 1);

    let strict = ReqwestFetcher::new(FetchSettings {
        redirect_limit: 0,
        ..FetchSettings::default()
    });
    let err = strict
        .fetch(4, &url, &RecordingSink::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::RedirectLimitExceeded);
}

#[tokio::test]
async fn error_status_is_a_failure() {
    let (_server, url) = serve("/gone", ResponseTemplate::new(404)).await;

    let err = fetcher()
        .fetch(5, &url, &RecordingSink::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert!(err.to_string().starts_with("http status 404"));
}

#[tokio::test]
async fn slow_server_times_out() {
    let (_server, url) = serve(
        "/slow",
        ResponseTemplate::new(200)
            .set_delay(Duration::from_millis(300))
            .set_body_raw("late", "text/html"),
    )
    .await;

    let impatient = ReqwestFetcher::new(FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    });
    let err = impatient
        .fetch(6, &url, &RecordingSink::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_page_is_rejected() {
    let (_server, url) = serve(
        "/big",
        ResponseTemplate::new(200).set_body_raw("a".repeat(64), "text/html"),
    )
    .await;

    let small = ReqwestFetcher::new(FetchSettings {
        max_bytes: 16,
        ..FetchSettings::default()
    });
    let err = small
        .fetch(7, &url, &RecordingSink::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 16,
            actual: Some(64)
        }
    );
}

#[tokio::test]
async fn non_text_media_is_rejected() {
    let (_server, url) = serve(
        "/logo.png",
        ResponseTemplate::new(200).set_body_raw(vec![0x89u8, b'P', b'N', b'G'], "image/png"),
    )
    .await;

    let err = fetcher()
        .fetch(8, &url, &RecordingSink::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "image/png".to_string()
        }
    );
}

#[tokio::test]
async fn malformed_url_never_reaches_the_network() {
    let err = fetcher()
        .fetch(9, "www.example.com/no-scheme", &RecordingSink::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
