use csaf_retrieval_common::fetcher::{Fetcher, RetryOptions, ReqwestTransport};
use reqwest::{StatusCode, header::AUTHORIZATION};
use std::time::Duration;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn fetcher() -> Fetcher {
    Fetcher::with_transport(
        ReqwestTransport::new(Duration::from_secs(5)).unwrap(),
        RetryOptions::new()
            .max_retries(3)
            .base_delay(Duration::from_millis(1))
            .max_delay(Duration::from_millis(10)),
    )
}

fn url(server: &MockServer, p: &str) -> Url {
    Url::parse(&format!("{}{p}", server.uri())).unwrap()
}

/// A rate limited request succeeds once the server stops limiting.
#[test_log::test(tokio::test)]
async fn retry_on_too_many_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.txt"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/index.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("2024/a.json\n"))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetcher()
        .fetch::<String>(url(&server, "/index.txt"))
        .await
        .unwrap();

    assert_eq!(result.data, "2024/a.json\n");
    assert_eq!(result.response.status, StatusCode::OK);
    assert_eq!(result.response.url.path(), "/index.txt");
    assert!(!result.response.request_headers.contains_key(AUTHORIZATION));
}

#[test_log::test(tokio::test)]
async fn not_found_is_final() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch::<String>(url(&server, "/missing.json"))
        .await
        .unwrap_err();

    assert!(!err.is_retryable());
    assert_eq!(
        err.response().map(|response| response.status),
        Some(StatusCode::NOT_FOUND)
    );
}
