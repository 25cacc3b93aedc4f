use influence_api::{Client, Error, Fetcher, Query, QueryPairs};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn url_for(server: &MockServer, p: &str) -> Url {
    Client::join(&server.uri(), p).unwrap()
}

#[tokio::test]
async fn fetch_success_returns_body_bytes() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("contributors.json");

    Mock::given(method("GET"))
        .and(path("/aggregates/pol/abc123/contributors.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let url = url_for(&mock_server, "/aggregates/pol/abc123/contributors.json");
    let bytes = client.fetch(&url).await.unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), body);
}

#[tokio::test]
async fn fetch_sends_query_pairs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/aggregates/pol/abc123/contributors.json"))
        .and(query_param("cycle", "2012"))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = QueryPairs::new()
        .with_pair("cycle", "2012")
        .with_pair("apikey", "test-key")
        .add_to_url(&url_for(&mock_server, "/aggregates/pol/abc123/contributors.json"));
    let text = Client::new().fetch_text(&url).await.unwrap();
    assert_eq!(text, "[]");
}

#[tokio::test]
async fn fetch_server_error_is_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/aggregates/pol/abc123/contributors.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let url = url_for(&mock_server, "/aggregates/pol/abc123/contributors.json");
    let err = Client::new().fetch(&url).await.unwrap_err();
    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn fetch_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = url_for(&mock_server, "/missing.json");
    let result = Client::new().fetch(&url).await;
    assert!(matches!(result, Err(Error::HttpStatus { status: 404, .. })));
}

#[tokio::test]
async fn connection_refused_is_request_failed() {
    let url = Url::parse("http://127.0.0.1:9/unreachable.json").unwrap();
    let result = Client::new().fetch(&url).await;
    assert!(matches!(result, Err(Error::RequestFailed(_))));
}
