use council_application::SearchContextPort;
use council_infrastructure::{SearchError, TavilySearch};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn search(server: &MockServer) -> TavilySearch {
    TavilySearch::new(Some("tvly-test".to_string()))
        .with_endpoint(format!("{}/search", server.uri()))
}

#[tokio::test]
async fn current_question_gets_context() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({
            "api_key": "tvly-test",
            "max_results": 5,
            "include_answer": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "The final was played on Sunday.",
            "results": [{
                "title": "Match report",
                "content": "A close game.",
                "url": "https://example.com/report"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let context = search(&server)
        .search_context("What is the latest news about the cup final?")
        .await
        .unwrap();

    assert!(context.contains("The final was played on Sunday."));
    assert!(context.contains("Match report"));
    assert!(context.contains("https://example.com/report"));
}

#[tokio::test]
async fn timeless_question_skips_search() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(0)
        .mount(&server)
        .await;

    let context = search(&server)
        .search_context("Explain how binary search works")
        .await;
    assert!(context.is_none());
}

#[tokio::test]
async fn failed_search_yields_no_context() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let search = search(&server);
    let err = search.search("latest news").await.unwrap_err();
    assert!(matches!(err, SearchError::Status { status: 401, .. }));
    assert!(search.search_context("latest news today").await.is_none());
}
