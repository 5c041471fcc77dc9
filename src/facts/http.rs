//! Shared HTTP plumbing for the network-backed adapters.
//!
//! Responses are classified straight into [`SourceResult`] failures so
//! adapters never surface a transport problem as anything other than an
//! `Unavailable` or `Malformed` outcome.

use super::source_result::SourceResult;
use crate::Result;
use core::time::Duration;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("projstat/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build an HTTP client, optionally attaching a sensitive auth header to
/// every request.
pub(crate) fn build_client(auth_header: Option<(&'static str, &str)>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT).timeout(REQUEST_TIMEOUT);

    if let Some((name, value)) = auth_header {
        let mut header_value = HeaderValue::from_str(value)?;
        header_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(HeaderName::from_static(name), header_value);
        builder = builder.default_headers(headers);
    }

    Ok(builder.build()?)
}

/// GET a URL and decode its JSON body, classifying every failure mode.
pub(crate) async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> SourceResult<T> {
    let resp = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(e) => return SourceResult::Unavailable(format!("request to '{url}' failed: {e}")),
    };

    let status = resp.status();
    if !status.is_success() {
        let reason = match status.as_u16() {
            404 => format!("'{url}' not found (HTTP 404)"),
            401 | 403 => format!("'{url}' refused the request (HTTP {})", status.as_u16()),
            code => format!("'{url}' returned HTTP {code}"),
        };
        return SourceResult::Unavailable(reason);
    }

    match resp.json::<T>().await {
        Ok(data) => SourceResult::Found(data),
        Err(e) => SourceResult::Malformed(format!("response from '{url}' did not match the expected shape: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Payload {
        answer: u32,
    }

    #[test]
    fn test_build_client_without_auth() {
        build_client(None).unwrap();
    }

    #[test]
    fn test_build_client_with_auth() {
        build_client(Some(("authorization", "token abc123"))).unwrap();
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"answer": 42})))
            .mount(&server)
            .await;

        let client = build_client(None).unwrap();
        let result: SourceResult<Payload> = get_json(&client, &format!("{}/data", server.uri())).await;

        assert_eq!(result.found().unwrap().answer, 42);
    }

    #[tokio::test]
    async fn test_get_json_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_client(None).unwrap();
        let result: SourceResult<Payload> = get_json(&client, &format!("{}/data", server.uri())).await;

        match result {
            SourceResult::Unavailable(m) => assert!(m.contains("404")),
            other => panic!("expected Unavailable, got {}", other.status_str()),
        }
    }

    #[tokio::test]
    async fn test_get_json_bad_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let client = build_client(None).unwrap();
        let result: SourceResult<Payload> = get_json(&client, &format!("{}/data", server.uri())).await;

        assert!(matches!(result, SourceResult::Malformed(_)));
    }

    #[tokio::test]
    async fn test_get_json_connection_refused_is_unavailable() {
        let client = build_client(None).unwrap();
        // Port 1 is essentially never listening
        let result: SourceResult<Payload> = get_json(&client, "http://127.0.0.1:1/data").await;

        assert!(matches!(result, SourceResult::Unavailable(_)));
    }
}
