//! Token cache behavior against a local OAuth endpoint.

use httptest::{matchers::*, responders::*, Expectation, Server};
use serde_json::json;

use group_status::{ImportError, TokenCache};

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn reuses_cached_token_within_ttl() {
    let server = Server::run();
    // Exactly one exchange may happen, however many callers ask
    server.expect(
        Expectation::matching(request::method_path("POST", "/oauth/token"))
            .times(1)
            .respond_with(json_encoded(json!({
                "access_token": "token-one",
                "expires_in": 3600
            }))),
    );

    let cache = TokenCache::new(
        server.url("/oauth/token").to_string(),
        "test-client",
        "test-secret",
    );
    let client = client();

    let first = cache.get_token(&client).await.expect("first token");
    let second = cache.get_token(&client).await.expect("second token");
    assert_eq!(first, "token-one");
    assert_eq!(second, "token-one");
}

#[tokio::test]
async fn refreshes_after_expiry_margin() {
    let server = Server::run();
    // expires_in of 60s is entirely consumed by the safety margin, so the
    // cached token is stale immediately and the second call re-exchanges
    server.expect(
        Expectation::matching(request::method_path("POST", "/oauth/token"))
            .times(2)
            .respond_with(json_encoded(json!({
                "access_token": "short-lived",
                "expires_in": 60
            }))),
    );

    let cache = TokenCache::new(
        server.url("/oauth/token").to_string(),
        "test-client",
        "test-secret",
    );
    let client = client();

    cache.get_token(&client).await.expect("first token");
    cache.get_token(&client).await.expect("second token");
}

#[tokio::test]
async fn non_200_exchange_is_an_auth_failure() {
    let server = Server::run();
    // A definite server answer is not transient, so no retry happens
    server.expect(
        Expectation::matching(request::method_path("POST", "/oauth/token"))
            .times(1)
            .respond_with(status_code(500).body("oauth backend down")),
    );

    let cache = TokenCache::new(
        server.url("/oauth/token").to_string(),
        "test-client",
        "test-secret",
    );

    let result = cache.get_token(&client()).await;
    assert!(matches!(result, Err(ImportError::AuthFailure(_))));
    let message = result.unwrap_err().to_string();
    assert!(message.contains("500"), "error should carry the status: {message}");
}

#[tokio::test]
async fn unreadable_token_body_is_an_auth_failure() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/oauth/token"))
            .times(1)
            .respond_with(status_code(200).body("not json")),
    );

    let cache = TokenCache::new(
        server.url("/oauth/token").to_string(),
        "test-client",
        "test-secret",
    );

    let result = cache.get_token(&client()).await;
    assert!(matches!(result, Err(ImportError::AuthFailure(_))));
}
