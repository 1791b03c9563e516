//! Integration tests for CacheMiddleware and CachingTransport using wiremock.

use std::sync::Arc;

use chrono::Utc;
use http_body_util::BodyExt;
use httpcache::{
    CacheMiddleware, CachedResponseExt, CachingTransport, Transport, format_http_date,
};
use httpcache_memory::MemoryStore;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(store: Arc<MemoryStore>) -> ClientWithMiddleware {
    ClientBuilder::new(Client::new())
        .with(CacheMiddleware::new(store))
        .build()
}

fn cacheable(body: &str, max_age: u32) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("date", format_http_date(Utc::now()).as_str())
        .insert_header("cache-control", format!("max-age={max_age}").as_str())
}

/// Test 1: Cache miss then hit once the body was read
#[tokio::test]
async fn test_miss_then_hit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(cacheable("Hello from server", 60).insert_header("x-custom", "value"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new(1024 * 1024).unwrap());
    let client = client(Arc::clone(&store));
    let url = format!("{}/data", mock_server.uri());

    let response1 = client.get(&url).send().await.unwrap();
    assert_eq!(response1.status(), 200);
    assert!(response1.headers().get("x-cached").is_none());
    assert_eq!(response1.text().await.unwrap(), "Hello from server");
    assert_eq!(store.size(), 1);

    let response2 = client.get(&url).send().await.unwrap();
    assert_eq!(response2.status(), 200);
    assert_eq!(response2.headers().get("x-cached").unwrap(), "true");
    assert_eq!(response2.headers().get("x-custom").unwrap(), "value");
    assert_eq!(response2.text().await.unwrap(), "Hello from server");
}

/// Test 2: A response that is never read is never stored
#[tokio::test]
async fn test_unread_response_is_not_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/unread"))
        .respond_with(cacheable("payload", 60))
        .expect(2)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new(1024 * 1024).unwrap());
    let client = client(Arc::clone(&store));
    let url = format!("{}/unread", mock_server.uri());

    let response1 = client.get(&url).send().await.unwrap();
    assert_eq!(response1.status(), 200);
    drop(response1);
    assert_eq!(store.size(), 0);

    let response2 = client.get(&url).send().await.unwrap();
    assert!(response2.headers().get("x-cached").is_none());
    assert_eq!(response2.text().await.unwrap(), "payload");
}

/// Test 3: Stale entry revalidated with If-None-Match and refreshed by 304
#[tokio::test]
async fn test_revalidation_with_etag() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/etag"))
        .and(header("if-none-match", "\"v1\""))
        .respond_with(
            ResponseTemplate::new(304)
                .insert_header("date", format_http_date(Utc::now()).as_str())
                .insert_header("x-refreshed", "yes"),
        )
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/etag"))
        .respond_with(cacheable("versioned body", 0).insert_header("etag", "\"v1\""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new(1024 * 1024).unwrap());
    let client = client(store);
    let url = format!("{}/etag", mock_server.uri());

    let response1 = client.get(&url).send().await.unwrap();
    assert_eq!(response1.text().await.unwrap(), "versioned body");

    let response2 = client.get(&url).send().await.unwrap();
    assert_eq!(response2.status(), 200);
    assert_eq!(response2.headers().get("x-cached").unwrap(), "true");
    assert_eq!(response2.headers().get("x-refreshed").unwrap(), "yes");
    assert_eq!(response2.text().await.unwrap(), "versioned body");
}

/// Test 4: Server errors are passed through
#[tokio::test]
async fn test_server_error_passthrough() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new(1024 * 1024).unwrap());
    let client = client(Arc::clone(&store));
    let url = format!("{}/error", mock_server.uri());

    for _ in 0..2 {
        let response = client.get(&url).send().await.unwrap();
        assert_eq!(response.status(), 500);
        assert!(response.headers().get("x-cached").is_none());
        assert_eq!(response.text().await.unwrap(), "boom");
    }
    assert_eq!(store.size(), 0);
}

/// Test 5: POST requests always reach the server
#[tokio::test]
async fn test_post_not_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submit"))
        .respond_with(cacheable("accepted", 60))
        .expect(2)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new(1024 * 1024).unwrap());
    let client = client(Arc::clone(&store));
    let url = format!("{}/submit", mock_server.uri());

    for _ in 0..2 {
        let response = client.post(&url).body("data").send().await.unwrap();
        assert!(response.headers().get("x-cached").is_none());
        assert_eq!(response.text().await.unwrap(), "accepted");
    }
    assert_eq!(store.size(), 0);
}

/// Test 6: Bodies at or above the store ceiling are served but not cached
#[tokio::test]
async fn test_oversize_body_not_cached() {
    let mock_server = MockServer::start().await;
    let large = "x".repeat(4096);

    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(cacheable(&large, 60))
        .expect(2)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new(1024).unwrap());
    let client = client(Arc::clone(&store));
    let url = format!("{}/large", mock_server.uri());

    for _ in 0..2 {
        let response = client.get(&url).send().await.unwrap();
        assert!(response.headers().get("x-cached").is_none());
        assert_eq!(response.text().await.unwrap(), large);
    }
    assert_eq!(store.size(), 0);
}

/// Test 7: The decorator over the default reqwest transport
#[tokio::test]
async fn test_caching_transport_with_default_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(cacheable("direct body", 60))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new(1024 * 1024).unwrap());
    let transport = CachingTransport::new(store);
    let url = format!("{}/direct", mock_server.uri());

    let request = || {
        http::Request::get(url.as_str())
            .body(reqwest::Body::from(Vec::new()))
            .unwrap()
    };

    let response1 = transport.round_trip(request()).await.unwrap();
    assert!(!response1.is_cached());
    let body1 = response1.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body1, "direct body");

    let response2 = transport.round_trip(request()).await.unwrap();
    assert!(response2.is_cached());
    let body2 = response2.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body2, "direct body");
}
