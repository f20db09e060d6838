// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The data client: cache, retry, timeout and cancellation over a transport

use crate::cache::ResponseCache;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::events;
use crate::metrics::{ClientMetrics, MetricsState};
use crate::request::{build_url, Credentials, RequestOptions};
use crate::response::Payload;
use crate::retry::RetryPolicy;
use lattice_adapters::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
use lattice_bus::{EventBus, HandlerError, SubscriptionId};
use lattice_core::{Clock, IdGen, SystemClock, UuidIdGen};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, Weak};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Used by [`DataClient::graphql`] when no `graphql` endpoint is configured
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "/graphql";

/// Centralized HTTP client
///
/// Clones share configuration, cache, credentials and in-flight requests.
pub struct DataClient<T: HttpTransport, C: Clock = SystemClock> {
    inner: Arc<Inner<T, C>>,
}

impl<T: HttpTransport, C: Clock> Clone for DataClient<T, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<T: HttpTransport, C: Clock> {
    config: ClientConfig,
    policy: RetryPolicy,
    transport: T,
    cache: Mutex<ResponseCache<C>>,
    auth_token: RwLock<Option<String>>,
    active: Mutex<HashMap<String, CancellationToken>>,
    metrics: Mutex<MetricsState>,
    ids: Box<dyn IdGen>,
    bus: Option<EventBus>,
    auth_subscription: Mutex<Option<SubscriptionId>>,
}

/// Builder for [`DataClient`]
pub struct DataClientBuilder<T: HttpTransport, C: Clock = SystemClock> {
    transport: T,
    clock: C,
    config: ClientConfig,
    bus: Option<EventBus>,
    ids: Option<Box<dyn IdGen>>,
}

impl<T: HttpTransport> DataClient<T, SystemClock> {
    pub fn builder(transport: T) -> DataClientBuilder<T, SystemClock> {
        DataClientBuilder {
            transport,
            clock: SystemClock,
            config: ClientConfig::default(),
            bus: None,
            ids: None,
        }
    }

    /// A client without an event bus
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self::builder(transport).config(config).build()
    }
}

impl<T: HttpTransport, C: Clock> DataClientBuilder<T, C> {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Publish lifecycle events on `bus` and follow `auth:token-updated`
    pub fn bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Request id generator (defaults to `req_<uuid>`)
    pub fn ids(mut self, ids: impl IdGen + 'static) -> Self {
        self.ids = Some(Box::new(ids));
        self
    }

    /// Clock driving cache expiry
    pub fn clock<C2: Clock>(self, clock: C2) -> DataClientBuilder<T, C2> {
        DataClientBuilder {
            transport: self.transport,
            clock,
            config: self.config,
            bus: self.bus,
            ids: self.ids,
        }
    }

    pub fn build(self) -> DataClient<T, C> {
        let cache = ResponseCache::new(
            self.clock,
            self.config.cache.ttl(),
            self.config.cache.max_size,
        );
        let inner = Arc::new(Inner {
            policy: RetryPolicy::new(&self.config.retry),
            config: self.config,
            transport: self.transport,
            cache: Mutex::new(cache),
            auth_token: RwLock::new(None),
            active: Mutex::new(HashMap::new()),
            metrics: Mutex::new(MetricsState::default()),
            ids: self
                .ids
                .unwrap_or_else(|| Box::new(UuidIdGen::new("req"))),
            bus: self.bus,
            auth_subscription: Mutex::new(None),
        });
        follow_auth_updates(&inner);
        DataClient { inner }
    }
}

/// Subscribe to `auth:token-updated` without keeping the client alive
fn follow_auth_updates<T: HttpTransport, C: Clock>(inner: &Arc<Inner<T, C>>) {
    let Some(bus) = &inner.bus else {
        return;
    };
    let weak: Weak<Inner<T, C>> = Arc::downgrade(inner);
    let id = bus.on(events::AUTH_TOKEN_UPDATED, move |event| {
        let Some(inner) = weak.upgrade() else {
            return Ok(());
        };
        match token_from_payload(&event.payload)? {
            Some(token) => inner.set_auth_token(token),
            None => inner.clear_auth_token(),
        }
        Ok(())
    });
    *lock(&inner.auth_subscription) = id;
}

fn token_from_payload(payload: &Value) -> Result<Option<String>, HandlerError> {
    let token = match payload {
        Value::Object(map) => map.get("token").ok_or_else(|| {
            HandlerError::failed("token payload object has no \"token\" field")
        })?,
        other => other,
    };
    match token {
        Value::Null => Ok(None),
        Value::String(token) if token.is_empty() => Ok(None),
        Value::String(token) => Ok(Some(token.clone())),
        other => Err(HandlerError::failed(format!(
            "unrecognized token payload: {}",
            other
        ))),
    }
}

impl<T: HttpTransport, C: Clock> DataClient<T, C> {
    /// Issue a request and wait for its outcome
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Payload, ApiError> {
        self.submit(endpoint, options).wait().await
    }

    pub async fn get(&self, endpoint: &str) -> Result<Payload, ApiError> {
        self.request(endpoint, RequestOptions::default()).await
    }

    pub async fn post(&self, endpoint: &str, body: Value) -> Result<Payload, ApiError> {
        self.request(endpoint, RequestOptions::method(Method::Post).body(body))
            .await
    }

    pub async fn put(&self, endpoint: &str, body: Value) -> Result<Payload, ApiError> {
        self.request(endpoint, RequestOptions::method(Method::Put).body(body))
            .await
    }

    pub async fn patch(&self, endpoint: &str, body: Value) -> Result<Payload, ApiError> {
        self.request(endpoint, RequestOptions::method(Method::Patch).body(body))
            .await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Payload, ApiError> {
        self.request(endpoint, RequestOptions::method(Method::Delete))
            .await
    }

    /// Run a GraphQL operation, returning its `data` member.
    ///
    /// A response carrying a non-empty `errors` array fails with
    /// `GRAPHQL_ERROR`, messages joined.
    pub async fn graphql(&self, query: &str, variables: Option<Value>) -> Result<Value, ApiError> {
        let endpoint = self
            .endpoint("graphql")
            .unwrap_or(DEFAULT_GRAPHQL_ENDPOINT)
            .to_string();
        let body = json!({
            "query": query,
            "variables": variables.unwrap_or_else(|| json!({})),
        });
        let payload = self
            .request(&endpoint, RequestOptions::method(Method::Post).body(body))
            .await?;

        let Some(mut document) = payload.into_json() else {
            return Err(ApiError::parse("GraphQL response is not JSON"));
        };
        if let Some(errors) = document
            .get("errors")
            .and_then(Value::as_array)
            .filter(|errors| !errors.is_empty())
        {
            let message = errors
                .iter()
                .map(|e| e.get("message").and_then(Value::as_str).unwrap_or("unknown error"))
                .collect::<Vec<_>>()
                .join("; ");
            warn!(endpoint, %message, "graphql errors");
            return Err(ApiError::graphql(message));
        }
        Ok(document.get_mut("data").map(Value::take).unwrap_or(Value::Null))
    }

    /// Register a request without awaiting it.
    ///
    /// The id is cancellable as soon as this returns. Nothing is sent until
    /// [`InFlight::wait`] is polled; dropping the handle deregisters it.
    pub fn submit(&self, endpoint: &str, options: RequestOptions) -> InFlight<T, C> {
        let id = self.inner.ids.next();
        let token = CancellationToken::new();
        lock(&self.inner.active).insert(id.clone(), token.clone());
        InFlight {
            id,
            token,
            client: self.clone(),
            endpoint: endpoint.to_string(),
            options,
        }
    }

    /// Signal cancellation of one in-flight request
    pub fn cancel(&self, request_id: &str) -> bool {
        let Some(token) = lock(&self.inner.active).remove(request_id) else {
            return false;
        };
        token.cancel();
        info!(request_id, "request cancelled");
        self.inner
            .emit(events::REQUEST_CANCELLED, json!({ "requestId": request_id }));
        true
    }

    /// Cancel every in-flight request, returning how many were signalled
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<CancellationToken> =
            lock(&self.inner.active).drain().map(|(_, token)| token).collect();
        for token in &drained {
            token.cancel();
        }
        let count = drained.len();
        info!(count, "all requests cancelled");
        self.inner
            .emit(events::ALL_REQUESTS_CANCELLED, json!({ "count": count }));
        count
    }

    pub fn set_auth_token(&self, token: impl Into<String>) {
        self.inner.set_auth_token(token.into());
    }

    pub fn clear_auth_token(&self) {
        self.inner.clear_auth_token();
    }

    pub fn has_auth_token(&self) -> bool {
        read(&self.inner.auth_token).is_some()
    }

    /// Drop one cache entry (by resolved URL or endpoint) or all of them.
    /// Returns the number of entries removed.
    pub fn clear_cache(&self, key: Option<&str>) -> usize {
        let removed = {
            let mut cache = lock(&self.inner.cache);
            match key {
                None => cache.clear(),
                Some(key) => {
                    let resolved = build_url(&self.inner.config.base_url, key, &[]).ok();
                    let hit = cache.remove(key)
                        || resolved.is_some_and(|url| cache.remove(url.as_str()));
                    usize::from(hit)
                }
            }
        };
        debug!(key, removed, "cache cleared");
        self.inner
            .emit(events::CACHE_CLEARED, json!({ "key": key, "removed": removed }));
        removed
    }

    pub fn metrics(&self) -> ClientMetrics {
        let active = lock(&self.inner.active).len();
        let cache_size = lock(&self.inner.cache).len();
        lock(&self.inner.metrics).snapshot(active, cache_size)
    }

    /// Path registered under `name` in the configuration
    pub fn endpoint(&self, name: &str) -> Option<&str> {
        self.inner.config.endpoint(name)
    }

    /// Ids of requests currently registered, sorted
    pub fn active_requests(&self) -> Vec<String> {
        let mut ids: Vec<String> = lock(&self.inner.active).keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn bus(&self) -> Option<&EventBus> {
        self.inner.bus.as_ref()
    }
}

/// A submitted request
pub struct InFlight<T: HttpTransport, C: Clock = SystemClock> {
    id: String,
    token: CancellationToken,
    client: DataClient<T, C>,
    endpoint: String,
    options: RequestOptions,
}

impl<T: HttpTransport, C: Clock> InFlight<T, C> {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Drive the request to completion
    pub async fn wait(self) -> Result<Payload, ApiError> {
        self.client
            .inner
            .execute(&self.id, &self.token, &self.endpoint, &self.options)
            .await
    }
}

impl<T: HttpTransport, C: Clock> Drop for InFlight<T, C> {
    fn drop(&mut self) {
        lock(&self.client.inner.active).remove(&self.id);
    }
}

impl<T: HttpTransport, C: Clock> Inner<T, C> {
    async fn execute(
        &self,
        id: &str,
        token: &CancellationToken,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<Payload, ApiError> {
        let started = Instant::now();
        let method = options.method;

        if token.is_cancelled() {
            return Err(self.fail(id, method, endpoint, started, ApiError::cancelled()));
        }
        let url = match build_url(&self.config.base_url, endpoint, &options.params) {
            Ok(url) => url.to_string(),
            Err(error) => return Err(self.fail(id, method, endpoint, started, error)),
        };

        let cacheable = method == Method::Get && self.config.cache.enabled;
        if cacheable {
            let hit = lock(&self.cache).get(&url);
            if let Some(payload) = hit {
                lock(&self.metrics).record_cache_hit();
                debug!(request_id = id, url, "cache hit");
                self.emit(
                    events::REQUEST_SUCCESS,
                    json!({
                        "requestId": id,
                        "method": method.as_str(),
                        "url": url,
                        "cached": true,
                        "bytes": payload.size_hint(),
                        "durationMs": 0,
                    }),
                );
                return Ok(payload);
            }
        }

        let request = match self.prepare(options, &url) {
            Ok(request) => request,
            Err(error) => return Err(self.fail(id, method, &url, started, error)),
        };

        let outcome = match self.fetch(request, token).await {
            // Whatever raced with cancellation is discarded, response or error
            _ if token.is_cancelled() => Err(ApiError::cancelled()),
            outcome => outcome,
        };

        match outcome {
            Ok((status, payload)) => {
                let elapsed = started.elapsed();
                lock(&self.metrics).record_success(elapsed);
                if cacheable {
                    lock(&self.cache).insert(url.clone(), payload.clone());
                }
                let elapsed_ms = elapsed.as_millis() as u64;
                debug!(request_id = id, %method, url, status, elapsed_ms, "request succeeded");
                self.emit(
                    events::REQUEST_SUCCESS,
                    json!({
                        "requestId": id,
                        "method": method.as_str(),
                        "url": url,
                        "status": status,
                        "cached": false,
                        "bytes": payload.size_hint(),
                        "durationMs": elapsed_ms,
                    }),
                );
                Ok(payload)
            }
            Err(error) => Err(self.fail(id, method, &url, started, error)),
        }
    }

    /// Account for a terminal failure and hand the error back
    fn fail(&self, id: &str, method: Method, url: &str, started: Instant, error: ApiError) -> ApiError {
        let elapsed = started.elapsed();
        lock(&self.metrics).record_failure(elapsed);
        warn!(
            request_id = id,
            %method,
            url,
            code = %error.code,
            status = error.status,
            elapsed_ms = elapsed.as_millis() as u64,
            "request failed: {}",
            error.message
        );
        self.emit(
            events::REQUEST_ERROR,
            json!({
                "requestId": id,
                "method": method.as_str(),
                "url": url,
                "error": error,
            }),
        );
        error
    }

    fn prepare(&self, options: &RequestOptions, url: &str) -> Result<HttpRequest, ApiError> {
        let mut request = HttpRequest::new(options.method, url);

        let mut headers: Vec<(String, String)> = self
            .config
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (name, value) in &options.headers {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }
        let explicit_auth = headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("authorization"));
        if options.credentials == Credentials::Include && !explicit_auth {
            if let Some(token) = read(&self.auth_token).as_deref() {
                headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
            }
        }
        request.headers = headers;

        if let Some(body) = &options.body {
            if options.method.is_read() {
                return Err(ApiError::invalid(format!(
                    "{} requests cannot carry a body",
                    options.method
                )));
            }
            let bytes = serde_json::to_vec(body)
                .map_err(|e| ApiError::invalid(format!("cannot encode body: {}", e)))?;
            request.body = Some(bytes);
        }
        Ok(request)
    }

    /// Attempts plus retries; yields the final status and decoded body
    async fn fetch(
        &self,
        request: HttpRequest,
        token: &CancellationToken,
    ) -> Result<(u16, Payload), ApiError> {
        let mut retries = 0;
        loop {
            let error = match self.attempt(request.clone(), token).await {
                Ok(response) if response.is_success() => {
                    let payload = Payload::parse(response.content_type().as_deref(), &response.body)
                        .map_err(|e| e.with_status(response.status))?;
                    return Ok((response.status, payload));
                }
                Ok(response) => ApiError::http(response.status, &response.body),
                Err(error) => error,
            };

            if !self.policy.should_retry(&error, retries) {
                return Err(error);
            }
            retries += 1;
            let delay = self.policy.delay_for(retries);
            debug!(
                url = %request.url,
                retry = retries,
                max_retries = self.policy.max_retries(),
                delay_ms = delay.as_millis() as u64,
                code = %error.code,
                "retrying"
            );
            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(ApiError::cancelled()),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// One exchange under a fresh timeout window
    async fn attempt(
        &self,
        request: HttpRequest,
        token: &CancellationToken,
    ) -> Result<HttpResponse, ApiError> {
        let timeout = self.config.timeout();
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(ApiError::cancelled()),
            result = tokio::time::timeout(timeout, self.transport.send(request)) => match result {
                Ok(Ok(response)) => Ok(response),
                Ok(Err(TransportError::Timeout)) | Err(_) => Err(ApiError::timeout(timeout)),
                Ok(Err(error)) => Err(error.into()),
            },
        }
    }

    fn set_auth_token(&self, token: String) {
        *write(&self.auth_token) = Some(token);
        debug!("auth token set");
        self.emit(events::AUTH_TOKEN_SET, Value::Null);
    }

    fn clear_auth_token(&self) {
        *write(&self.auth_token) = None;
        debug!("auth token cleared");
        self.emit(events::AUTH_TOKEN_CLEARED, Value::Null);
    }

    fn emit(&self, topic: &str, payload: Value) {
        if let Some(bus) = &self.bus {
            bus.publish(topic, payload);
        }
    }
}

impl<T: HttpTransport, C: Clock> Drop for Inner<T, C> {
    fn drop(&mut self) {
        let subscription = self
            .auth_subscription
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let (Some(bus), Some(id)) = (&self.bus, subscription) {
            bus.unsubscribe(id.as_str(), None);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
