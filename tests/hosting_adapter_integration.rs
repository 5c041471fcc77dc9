//! Integration tests for the hosting adapter using wiremock

use projstat::facts::hosting::HostingAdapter;
use projstat::facts::{FactKey, FactValue, SourceAdapter, SourceResult};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn github_adapter(server: &MockServer) -> HostingAdapter {
    HostingAdapter::with_base_urls(server.uri(), server.uri(), None, None).expect("adapter should build")
}

#[tokio::test]
async fn test_github_repository_facts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/tokio-rs/tokio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "tokio",
            "description": "A runtime for writing reliable async applications",
            "homepage": "https://tokio.rs",
            "language": "Rust",
            "created_at": "2016-08-26T17:45:01Z",
            "updated_at": "2024-01-15T10:30:00Z",
            "stargazers_count": 20000,
            "watchers_count": 20000,
            "subscribers_count": 300,
            "forks_count": 2000,
            "open_issues_count": 150
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/tokio-rs/tokio/pulls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{"number": 1}, {"number": 2}])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/tokio-rs/tokio/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "tokio-1.35.0"},
            {"name": "v1.34.0"}
        ])))
        .mount(&mock_server)
        .await;

    let adapter = github_adapter(&mock_server);
    let result = adapter.fetch("tokio-rs/tokio").await;

    let facts = match result {
        SourceResult::Found(facts) => facts,
        other => panic!("expected Found, got {}", other.status_str()),
    };

    assert_eq!(facts.get(FactKey::Name), Some(&FactValue::String("tokio".into())));
    assert_eq!(facts.get(FactKey::Language), Some(&FactValue::String("Rust".into())));
    assert_eq!(facts.get(FactKey::Stars), Some(&FactValue::UInt(20000)));
    assert_eq!(facts.get(FactKey::OpenIssues), Some(&FactValue::UInt(150)));
    assert_eq!(facts.get(FactKey::OpenPullRequests), Some(&FactValue::UInt(2)));
    assert_eq!(facts.get(FactKey::Version), Some(&FactValue::String("v1.34.0".into())));
}

#[tokio::test]
async fn test_github_missing_repository_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let adapter = github_adapter(&mock_server);
    let result = adapter.fetch("nobody/nothing").await;

    match result {
        SourceResult::Unavailable(message) => assert!(message.contains("404")),
        other => panic!("expected Unavailable, got {}", other.status_str()),
    }
}

#[tokio::test]
async fn test_github_garbage_body_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>definitely not json</html>"))
        .mount(&mock_server)
        .await;

    let adapter = github_adapter(&mock_server);
    let result = adapter.fetch("tokio-rs/tokio").await;

    assert!(matches!(result, SourceResult::Malformed(_)));
}

#[tokio::test]
async fn test_gitlab_project_facts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/inkscape%2Finkscape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "inkscape",
            "description": "Vector graphics editor",
            "web_url": "https://gitlab.com/inkscape/inkscape",
            "created_at": "2017-06-09T14:16:35.615Z",
            "last_activity_at": "2024-01-15T10:30:00.000Z",
            "star_count": 3000,
            "forks_count": 1000,
            "open_issues_count": 2000
        })))
        .mount(&mock_server)
        .await;

    let adapter = github_adapter(&mock_server);
    let result = adapter.fetch("gitlab:inkscape/inkscape").await;

    let facts = match result {
        SourceResult::Found(facts) => facts,
        other => panic!("expected Found, got {}", other.status_str()),
    };

    assert_eq!(facts.get(FactKey::Name), Some(&FactValue::String("inkscape".into())));
    assert_eq!(facts.get(FactKey::Homepage), Some(&FactValue::String("https://gitlab.com/inkscape/inkscape".into())));
    assert_eq!(facts.get(FactKey::Stars), Some(&FactValue::UInt(3000)));
    assert_eq!(facts.get(FactKey::Forks), Some(&FactValue::UInt(1000)));
    assert_eq!(facts.get(FactKey::OpenIssues), Some(&FactValue::UInt(2000)));
}

#[tokio::test]
async fn test_unsupported_host_is_unavailable_without_any_request() {
    // No mock server at all: an unsupported host must fail before any
    // network traffic happens
    let adapter = HostingAdapter::with_base_urls("http://127.0.0.1:1", "http://127.0.0.1:1", None, None).unwrap();
    let result = adapter.fetch("https://bitbucket.org/owner/repo").await;

    match result {
        SourceResult::Unavailable(message) => assert!(message.contains("bitbucket.org")),
        other => panic!("expected Unavailable, got {}", other.status_str()),
    }
}
