// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::{CacheConfig, RetryConfig};
use crate::error::ErrorCode;
use async_trait::async_trait;
use lattice_adapters::{FakeReply, FakeTransport};
use lattice_core::{FakeClock, SequentialIdGen};
use std::sync::OnceLock;
use std::time::Duration;

const BASE: &str = "https://cms.test/api";

fn config() -> ClientConfig {
    ClientConfig {
        base_url: BASE.to_string(),
        ..ClientConfig::default()
    }
}

fn no_retry() -> ClientConfig {
    ClientConfig {
        retry: RetryConfig {
            max_retries: 0,
            ..RetryConfig::default()
        },
        ..config()
    }
}

fn client_with(
    config: ClientConfig,
    fake: &FakeTransport,
    clock: &FakeClock,
) -> DataClient<FakeTransport, FakeClock> {
    DataClient::builder(fake.clone())
        .config(config)
        .clock(clock.clone())
        .ids(SequentialIdGen::new("req"))
        .build()
}

fn client(fake: &FakeTransport) -> DataClient<FakeTransport, FakeClock> {
    client_with(config(), fake, &FakeClock::new())
}

fn recorded_topics(bus: &EventBus, pattern: &str) -> Arc<Mutex<Vec<(String, Value)>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    bus.on(pattern, move |event| {
        sink.lock()
            .unwrap()
            .push((event.topic.clone(), event.payload.clone()));
        Ok(())
    });
    seen
}

// =============================================================================
// Request building
// =============================================================================

#[tokio::test]
async fn get_decodes_json_and_sends_configured_headers() {
    let fake = FakeTransport::new();
    fake.push(FakeReply::json(200, json!({"articles": [1, 2]})));
    let client = client(&fake);

    let payload = client.get("/articles").await.unwrap();

    assert_eq!(payload, Payload::Json(json!({"articles": [1, 2]})));
    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    let request = &calls[0].request;
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, "https://cms.test/api/articles");
    assert_eq!(request.header("accept"), Some("application/json"));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("authorization"), None);
    assert!(request.body.is_none());
}

#[tokio::test]
async fn post_sends_json_body_and_params() {
    let fake = FakeTransport::new();
    fake.push(FakeReply::json(201, json!({"id": 7})));
    let client = client(&fake);

    let options = RequestOptions::method(Method::Post)
        .param("draft", "true")
        .header("Accept", "application/vnd.cms+json")
        .body(json!({"title": "Launch"}));
    client.request("/articles", options).await.unwrap();

    let request = &fake.calls()[0].request;
    assert_eq!(request.url, "https://cms.test/api/articles?draft=true");
    assert_eq!(request.header("accept"), Some("application/vnd.cms+json"));
    assert_eq!(
        serde_json::from_slice::<Value>(request.body.as_deref().unwrap()).unwrap(),
        json!({"title": "Launch"})
    );
}

#[tokio::test]
async fn body_on_get_is_rejected_before_sending() {
    let fake = FakeTransport::new();
    let client = client(&fake);

    let error = client
        .request("/articles", RequestOptions::default().body(json!({})))
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidRequest);
    assert_eq!(fake.call_count(), 0);
}

#[tokio::test]
async fn relative_endpoint_without_base_is_invalid() {
    let fake = FakeTransport::new();
    let client = client_with(ClientConfig::default(), &fake, &FakeClock::new());

    let error = client.get("/articles").await.unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidRequest);
    assert_eq!(fake.call_count(), 0);
    assert_eq!(client.metrics().failed_requests, 1);
}

#[tokio::test]
async fn text_and_binary_bodies_follow_content_type() {
    let fake = FakeTransport::new();
    fake.push(FakeReply::text(200, "<rss/>"));
    fake.push(FakeReply::response(
        HttpResponse::new(200)
            .with_header("Content-Type", "image/png")
            .with_body(vec![137, 80, 78, 71]),
    ));
    let client = client(&fake);

    assert_eq!(
        client.get("/feed.xml").await.unwrap(),
        Payload::Text("<rss/>".into())
    );
    assert_eq!(
        client.get("/logo.png").await.unwrap(),
        Payload::Binary(vec![137, 80, 78, 71])
    );
}

// =============================================================================
// Cache
// =============================================================================

#[tokio::test]
async fn cached_get_within_ttl_skips_network() {
    let fake = FakeTransport::new();
    fake.always(FakeReply::json(200, json!({"headline": "hello"})));
    let clock = FakeClock::new();
    let config = ClientConfig {
        cache: CacheConfig {
            ttl: 5000,
            ..CacheConfig::default()
        },
        ..config()
    };
    let client = client_with(config, &fake, &clock);

    let first = client.get("/headlines").await.unwrap();
    clock.advance_ms(4000);
    let second = client.get("/headlines").await.unwrap();

    assert_eq!(fake.call_count(), 1);
    assert_eq!(first, second);

    clock.advance_ms(2000);
    client.get("/headlines").await.unwrap();
    assert_eq!(fake.call_count(), 2);

    let metrics = client.metrics();
    assert_eq!(metrics.cache_hits, 1);
    assert_eq!(metrics.total_requests, 3);
}

#[tokio::test]
async fn cache_key_includes_query_params() {
    let fake = FakeTransport::new();
    fake.always(FakeReply::json(200, json!([])));
    let client = client(&fake);

    let page = |n: &str| RequestOptions::default().param("page", n);
    client.request("/articles", page("1")).await.unwrap();
    client.request("/articles", page("2")).await.unwrap();
    client.request("/articles", page("1")).await.unwrap();

    assert_eq!(fake.call_count(), 2);
}

#[tokio::test]
async fn writes_are_never_cached() {
    let fake = FakeTransport::new();
    fake.always(FakeReply::json(200, json!({"ok": true})));
    let client = client(&fake);

    client.post("/articles", json!({})).await.unwrap();
    client.post("/articles", json!({})).await.unwrap();

    assert_eq!(fake.call_count(), 2);
    assert_eq!(client.metrics().cache_size, 0);
}

#[tokio::test]
async fn disabled_cache_always_fetches() {
    let fake = FakeTransport::new();
    fake.always(FakeReply::json(200, json!(1)));
    let config = ClientConfig {
        cache: CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        },
        ..config()
    };
    let client = client_with(config, &fake, &FakeClock::new());

    client.get("/a").await.unwrap();
    client.get("/a").await.unwrap();
    assert_eq!(fake.call_count(), 2);
}

#[tokio::test]
async fn failed_fetch_leaves_cached_entries_intact() {
    let fake = FakeTransport::new();
    fake.push(FakeReply::json(200, json!({"v": 1})));
    fake.push(FakeReply::status(404));
    let client = client_with(no_retry(), &fake, &FakeClock::new());

    client.get("/a").await.unwrap();
    client.get("/b").await.unwrap_err();

    assert_eq!(client.get("/a").await.unwrap(), Payload::Json(json!({"v": 1})));
    assert_eq!(fake.call_count(), 2);
}

#[tokio::test]
async fn clear_cache_by_endpoint_url_or_all() {
    let fake = FakeTransport::new();
    fake.always(FakeReply::json(200, json!(null)));
    let client = client(&fake);

    client.get("/a").await.unwrap();
    client.get("/b").await.unwrap();
    client.get("/c").await.unwrap();

    assert_eq!(client.clear_cache(Some("/a")), 1);
    assert_eq!(client.clear_cache(Some("https://cms.test/api/b")), 1);
    assert_eq!(client.clear_cache(Some("/a")), 0);
    assert_eq!(client.clear_cache(None), 1);
    assert_eq!(client.metrics().cache_size, 0);
}

// =============================================================================
// Retry and timeout
// =============================================================================

#[tokio::test(start_paused = true)]
async fn retryable_status_backs_off_exponentially() {
    let fake = FakeTransport::new();
    fake.always(FakeReply::status(503));
    let client = client(&fake);

    let error = client.get("/flaky").await.unwrap_err();

    assert_eq!(error.code, ErrorCode::HttpError);
    assert_eq!(error.status, Some(503));

    let calls = fake.calls();
    assert_eq!(calls.len(), 4);
    let expected = [1000, 2000, 4000];
    for (pair, expected_ms) in calls.windows(2).zip(expected) {
        let gap = pair[1].at - pair[0].at;
        assert!(
            gap >= Duration::from_millis(expected_ms)
                && gap < Duration::from_millis(expected_ms + 10),
            "expected ~{}ms between attempts, got {:?}",
            expected_ms,
            gap
        );
    }
}

#[tokio::test(start_paused = true)]
async fn retried_request_is_cached_on_eventual_success() {
    let fake = FakeTransport::new();
    fake.push(FakeReply::status(502));
    fake.push(FakeReply::json(200, json!({"ok": 1})));
    let client = client(&fake);

    assert_eq!(client.get("/a").await.unwrap(), Payload::Json(json!({"ok": 1})));
    assert_eq!(fake.call_count(), 2);

    client.get("/a").await.unwrap();
    assert_eq!(fake.call_count(), 2);
    let metrics = client.metrics();
    assert_eq!(metrics.successful_requests, 1);
    assert_eq!(metrics.cache_hits, 1);
}

#[tokio::test(start_paused = true)]
async fn transport_failure_is_retried_then_normalized() {
    let fake = FakeTransport::new();
    fake.always(FakeReply::error(TransportError::Connect("refused".into())));
    let config = ClientConfig {
        retry: RetryConfig {
            max_retries: 1,
            ..RetryConfig::default()
        },
        ..config()
    };
    let client = client_with(config, &fake, &FakeClock::new());

    let error = client.get("/a").await.unwrap_err();

    assert_eq!(error.code, ErrorCode::NetworkError);
    assert_eq!(error.status, None);
    assert_eq!(fake.call_count(), 2);
}

#[tokio::test]
async fn non_retryable_status_fails_immediately() {
    let fake = FakeTransport::new();
    fake.always(FakeReply::text(404, "missing"));
    let client = client(&fake);

    let error = client.get("/gone").await.unwrap_err();

    assert_eq!(error.code, ErrorCode::HttpError);
    assert_eq!(error.status, Some(404));
    assert_eq!(error.message, "HTTP 404: missing");
    assert_eq!(fake.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn timeout_is_terminal_and_not_retried() {
    let fake = FakeTransport::new();
    fake.always(FakeReply::json(200, json!(null)).delayed(Duration::from_secs(5)));
    let config = ClientConfig {
        timeout: 100,
        ..config()
    };
    let client = client_with(config, &fake, &FakeClock::new());

    let started = Instant::now();
    let error = client.get("/slow").await.unwrap_err();

    assert_eq!(error.code, ErrorCode::Timeout);
    assert_eq!(fake.call_count(), 1);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn undecodable_success_body_is_parse_error() {
    let fake = FakeTransport::new();
    fake.push(FakeReply::response(
        HttpResponse::new(200)
            .with_header("Content-Type", "application/json")
            .with_body("{ truncated"),
    ));
    let client = client(&fake);

    let error = client.get("/a").await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ParseError);
    assert_eq!(error.status, Some(200));
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test(start_paused = true)]
async fn cancel_rejects_in_flight_request() {
    let fake = FakeTransport::new();
    fake.always(FakeReply::json(200, json!(null)).delayed(Duration::from_secs(5)));
    let client = client(&fake);

    let in_flight = client.submit("/slow", RequestOptions::default());
    let id = in_flight.id().to_string();
    let handle = tokio::spawn(in_flight.wait());
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(client.active_requests(), vec![id.clone()]);
    assert!(client.cancel(&id));

    let error = handle.await.unwrap().unwrap_err();
    assert_eq!(error.code, ErrorCode::Cancelled);
    assert!(client.active_requests().is_empty());
    assert!(!client.cancel(&id), "second cancel is a no-op");
}

/// Transport that cancels every request while producing its response
#[derive(Clone, Default)]
struct CancelDuringSend {
    client: Arc<OnceLock<DataClient<CancelDuringSend>>>,
    status: Option<u16>,
}

#[async_trait]
impl HttpTransport for CancelDuringSend {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if let Some(client) = self.client.get() {
            client.cancel_all();
        }
        Ok(HttpResponse::new(self.status.unwrap_or(200))
            .with_header("Content-Type", "application/json")
            .with_body(r#"{"late":true}"#))
    }
}

#[tokio::test]
async fn cancellation_wins_over_a_received_response() {
    let transport = CancelDuringSend::default();
    let client = DataClient::new(config(), transport.clone());
    let _ = transport.client.set(client.clone());

    let error = client.get("/race").await.unwrap_err();

    assert_eq!(error.code, ErrorCode::Cancelled);
    assert!(client.active_requests().is_empty());
    assert_eq!(client.metrics().cache_size, 0, "discarded response is not cached");
}

#[tokio::test]
async fn cancellation_wins_over_an_error_response() {
    let transport = CancelDuringSend {
        status: Some(404),
        ..CancelDuringSend::default()
    };
    let client = DataClient::new(config(), transport.clone());
    let _ = transport.client.set(client.clone());

    let error = client.get("/race").await.unwrap_err();

    assert_eq!(error.code, ErrorCode::Cancelled);
    assert_eq!(error.status, None);
}

#[tokio::test]
async fn cancel_before_first_poll_sends_nothing() {
    let fake = FakeTransport::new();
    fake.always(FakeReply::json(200, json!(null)));
    let client = client(&fake);

    let in_flight = client.submit("/a", RequestOptions::default());
    assert!(client.cancel(in_flight.id()));

    let error = in_flight.wait().await.unwrap_err();
    assert!(error.is_cancelled());
    assert_eq!(fake.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancel_interrupts_retry_backoff() {
    let fake = FakeTransport::new();
    fake.always(FakeReply::status(503));
    let client = client(&fake);

    let in_flight = client.submit("/flaky", RequestOptions::default());
    let id = in_flight.id().to_string();
    let handle = tokio::spawn(in_flight.wait());
    tokio::time::sleep(Duration::from_millis(500)).await;
    client.cancel(&id);

    let error = handle.await.unwrap().unwrap_err();
    assert_eq!(error.code, ErrorCode::Cancelled);
    assert_eq!(fake.call_count(), 1);
}

#[tokio::test]
async fn cancel_all_signals_every_request() {
    let fake = FakeTransport::new();
    fake.always(FakeReply::json(200, json!(null)));
    let client = client(&fake);

    let first = client.submit("/a", RequestOptions::default());
    let second = client.submit("/b", RequestOptions::default());
    assert_eq!(client.active_requests(), vec!["req_1", "req_2"]);

    assert_eq!(client.cancel_all(), 2);
    assert!(client.active_requests().is_empty());
    assert!(first.wait().await.unwrap_err().is_cancelled());
    assert!(second.wait().await.unwrap_err().is_cancelled());
    assert_eq!(client.cancel_all(), 0);
}

#[tokio::test]
async fn dropped_handle_is_deregistered() {
    let fake = FakeTransport::new();
    let client = client(&fake);

    let in_flight = client.submit("/a", RequestOptions::default());
    assert_eq!(client.active_requests().len(), 1);
    drop(in_flight);
    assert!(client.active_requests().is_empty());
}

// =============================================================================
// Credentials
// =============================================================================

#[tokio::test]
async fn auth_token_is_applied_unless_omitted() {
    let fake = FakeTransport::new();
    fake.always(FakeReply::json(200, json!(null)));
    let client = client_with(no_retry(), &fake, &FakeClock::new());

    client.set_auth_token("abc");
    assert!(client.has_auth_token());
    client.post("/a", json!({})).await.unwrap();
    client
        .request(
            "/b",
            RequestOptions::method(Method::Post).credentials(Credentials::Omit),
        )
        .await
        .unwrap();
    client.clear_auth_token();
    client.post("/c", json!({})).await.unwrap();

    let calls = fake.calls();
    assert_eq!(calls[0].request.header("Authorization"), Some("Bearer abc"));
    assert_eq!(calls[1].request.header("Authorization"), None);
    assert_eq!(calls[2].request.header("Authorization"), None);
}

#[tokio::test]
async fn explicit_authorization_header_wins() {
    let fake = FakeTransport::new();
    fake.always(FakeReply::json(200, json!(null)));
    let client = client(&fake);
    client.set_auth_token("stored");

    client
        .request(
            "/a",
            RequestOptions::method(Method::Delete).header("authorization", "Basic Zm9v"),
        )
        .await
        .unwrap();

    let request = &fake.calls()[0].request;
    let auth: Vec<_> = request
        .headers
        .iter()
        .filter(|(k, _)| k.eq_ignore_ascii_case("authorization"))
        .collect();
    assert_eq!(auth.len(), 1);
    assert_eq!(auth[0].1, "Basic Zm9v");
}

#[tokio::test]
async fn token_updates_arrive_through_the_bus() {
    let bus = EventBus::default();
    let fake = FakeTransport::new();
    fake.always(FakeReply::json(200, json!(null)));
    let client = DataClient::builder(fake.clone())
        .config(config())
        .bus(bus.clone())
        .build();

    bus.publish(events::AUTH_TOKEN_UPDATED, json!("tok"));
    client.post("/a", json!({})).await.unwrap();
    bus.publish(events::AUTH_TOKEN_UPDATED, json!({"token": "tok2"}));
    client.post("/a", json!({})).await.unwrap();
    bus.publish(events::AUTH_TOKEN_UPDATED, json!({"token": null}));
    client.post("/a", json!({})).await.unwrap();

    let calls = fake.calls();
    assert_eq!(calls[0].request.header("Authorization"), Some("Bearer tok"));
    assert_eq!(calls[1].request.header("Authorization"), Some("Bearer tok2"));
    assert_eq!(calls[2].request.header("Authorization"), None);
}

#[test]
fn malformed_token_update_is_a_handler_failure() {
    let bus = EventBus::default();
    let client = DataClient::builder(FakeTransport::new()).bus(bus.clone()).build();
    client.set_auth_token("keep");

    let report = bus.publish_report(events::AUTH_TOKEN_UPDATED, json!(42));
    assert_eq!(report.invoked, 1);
    assert_eq!(report.failures.len(), 1);

    let report = bus.publish_report(events::AUTH_TOKEN_UPDATED, json!({"user": "x"}));
    assert_eq!(report.failures.len(), 1);
    assert!(client.has_auth_token());
}

#[test]
fn bus_subscription_does_not_keep_client_alive() {
    let bus = EventBus::default();
    let client = DataClient::builder(FakeTransport::new()).bus(bus.clone()).build();
    assert_eq!(
        bus.list_subscriptions(events::AUTH_TOKEN_UPDATED).len(),
        1
    );

    let clone = client.clone();
    drop(client);
    assert_eq!(bus.subscriber_count(), 1, "a clone still holds the client");

    drop(clone);
    assert_eq!(bus.subscriber_count(), 0);
    assert_eq!(bus.publish(events::AUTH_TOKEN_UPDATED, json!("late")), 0);
}

// =============================================================================
// Lifecycle events
// =============================================================================

#[tokio::test]
async fn lifecycle_events_are_published() {
    let bus = EventBus::default();
    let seen = recorded_topics(&bus, "api:*");
    let fake = FakeTransport::new();
    fake.push(FakeReply::json(200, json!({"id": 1})));
    fake.push(FakeReply::status(404));
    let client = DataClient::builder(fake.clone())
        .config(config())
        .bus(bus.clone())
        .ids(SequentialIdGen::new("req"))
        .build();

    client.get("/a").await.unwrap();
    client.get("/a").await.unwrap();
    client.get("/missing").await.unwrap_err();
    client.set_auth_token("t");
    client.clear_auth_token();
    client.clear_cache(None);
    client.cancel_all();

    let seen = seen.lock().unwrap();
    let topics: Vec<&str> = seen.iter().map(|(topic, _)| topic.as_str()).collect();
    assert_eq!(
        topics,
        vec![
            events::REQUEST_SUCCESS,
            events::REQUEST_SUCCESS,
            events::REQUEST_ERROR,
            events::AUTH_TOKEN_SET,
            events::AUTH_TOKEN_CLEARED,
            events::CACHE_CLEARED,
            events::ALL_REQUESTS_CANCELLED,
        ]
    );

    let (_, fetched) = &seen[0];
    assert_eq!(fetched["requestId"], "req_1");
    assert_eq!(fetched["status"], 200);
    assert_eq!(fetched["cached"], false);
    assert_eq!(fetched["bytes"], r#"{"id":1}"#.len());
    let (_, hit) = &seen[1];
    assert_eq!(hit["cached"], true);
    assert_eq!(hit["bytes"], fetched["bytes"]);
    let (_, failed) = &seen[2];
    assert_eq!(failed["error"]["code"], "HTTP_ERROR");
    assert_eq!(failed["error"]["status"], 404);
}

#[tokio::test]
async fn cancel_publishes_request_cancelled() {
    let bus = EventBus::default();
    let seen = recorded_topics(&bus, events::REQUEST_CANCELLED);
    let client = DataClient::builder(FakeTransport::new())
        .config(config())
        .bus(bus)
        .ids(SequentialIdGen::new("req"))
        .build();

    let in_flight = client.submit("/a", RequestOptions::default());
    client.cancel(in_flight.id());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].1, json!({"requestId": "req_1"}));
}

// =============================================================================
// GraphQL
// =============================================================================

#[tokio::test]
async fn graphql_returns_data_member() {
    let fake = FakeTransport::new();
    fake.push(FakeReply::json(200, json!({"data": {"article": {"id": "1"}}})));
    let mut config = config();
    config
        .endpoints
        .insert("graphql".to_string(), "/gql".to_string());
    let client = client_with(config, &fake, &FakeClock::new());

    let data = client
        .graphql("query($id: ID!) { article(id: $id) { id } }", Some(json!({"id": "1"})))
        .await
        .unwrap();

    assert_eq!(data, json!({"article": {"id": "1"}}));
    let request = &fake.calls()[0].request;
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, "https://cms.test/api/gql");
    let body: Value = serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["variables"], json!({"id": "1"}));
}

#[tokio::test]
async fn graphql_errors_are_surfaced() {
    let fake = FakeTransport::new();
    fake.push(FakeReply::json(
        200,
        json!({"data": null, "errors": [{"message": "denied"}, {"message": "bad field"}]}),
    ));
    let client = client(&fake);

    let error = client.graphql("{ secrets }", None).await.unwrap_err();

    assert_eq!(error.code, ErrorCode::GraphqlError);
    assert_eq!(error.message, "denied; bad field");
    assert_eq!(fake.calls()[0].request.url, "https://cms.test/api/graphql");
}

// =============================================================================
// Diagnostics
// =============================================================================

#[tokio::test(start_paused = true)]
async fn metrics_track_outcomes_and_latency() {
    let fake = FakeTransport::new();
    fake.push(FakeReply::json(200, json!(1)).delayed(Duration::from_millis(100)));
    fake.push(FakeReply::status(400).delayed(Duration::from_millis(300)));
    let client = client(&fake);

    client.get("/a").await.unwrap();
    client.get("/a").await.unwrap();
    client.get("/b").await.unwrap_err();

    let metrics = client.metrics();
    assert_eq!(metrics.total_requests, 3);
    assert_eq!(metrics.successful_requests, 1);
    assert_eq!(metrics.failed_requests, 1);
    assert_eq!(metrics.cache_hits, 1);
    assert!((metrics.success_rate - 0.5).abs() < 1e-9);
    assert!((metrics.cache_hit_rate - 1.0 / 3.0).abs() < 1e-9);
    assert!(
        (metrics.average_latency_ms - 200.0).abs() < 5.0,
        "latency {}",
        metrics.average_latency_ms
    );
}

#[test]
fn named_endpoints_resolve_from_config() {
    let mut config = config();
    config
        .endpoints
        .insert("articles".to_string(), "/v2/articles".to_string());
    let client = DataClient::new(config, FakeTransport::new());

    assert_eq!(client.endpoint("articles"), Some("/v2/articles"));
    assert_eq!(client.endpoint("nope"), None);
    assert!(client.bus().is_none());
}

#[test]
fn default_ids_are_uuid_request_ids() {
    let client = DataClient::new(config(), FakeTransport::new());
    let in_flight = client.submit("/a", RequestOptions::default());
    assert!(in_flight.id().starts_with("req_"));
    assert_eq!(in_flight.id().len(), "req_".len() + 32);
}
