use animal_scout::scrapers::{FetchError, HttpFetcher, PageFetcher};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UA: &str = "animal-scout-tests";

fn url(server: &MockServer, rest: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), rest)).unwrap()
}

#[tokio::test]
async fn test_fetch_success_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/categorie/chiens"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(Duration::from_secs(10), UA).unwrap();
    let doc = fetcher
        .fetch(&url(&server, "/categorie/chiens?page=1"))
        .await
        .unwrap();
    assert_eq!(doc.body, "<html>ok</html>");
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(Duration::from_secs(10), UA).unwrap();
    let err = fetcher
        .fetch(&url(&server, "/categorie/chiens?page=99"))
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::HttpStatus(404));
}

#[tokio::test]
async fn test_slow_server_times_out_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(Duration::from_millis(200), UA).unwrap();
    let err = fetcher
        .fetch(&url(&server, "/categorie/moutons?page=1"))
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::Timeout);
}

#[tokio::test]
async fn test_refused_connection() {
    let fetcher = HttpFetcher::new(Duration::from_secs(2), UA).unwrap();
    let err = fetcher
        .fetch(&Url::parse("http://127.0.0.1:1/categorie/chiens?page=1").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::ConnectionFailure(_)), "got {:?}", err);
}
