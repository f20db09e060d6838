// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Topics the client publishes and listens on

/// Published after a request resolves, including cache hits
pub const REQUEST_SUCCESS: &str = "api:request-success";
/// Published after a request fails terminally (cancellation included)
pub const REQUEST_ERROR: &str = "api:request-error";
pub const CACHE_CLEARED: &str = "api:cache-cleared";
pub const AUTH_TOKEN_SET: &str = "api:auth-token-set";
pub const AUTH_TOKEN_CLEARED: &str = "api:auth-token-cleared";
pub const REQUEST_CANCELLED: &str = "api:request-cancelled";
pub const ALL_REQUESTS_CANCELLED: &str = "api:all-requests-cancelled";

/// Listened on: payload `"token"`, `{"token": "..."}`, or `null` to clear
pub const AUTH_TOKEN_UPDATED: &str = "auth:token-updated";
