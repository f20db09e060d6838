// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response body decoding by declared content type

use crate::error::ApiError;
use serde::Serialize;
use serde_json::Value;

/// A decoded response body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum Payload {
    Json(Value),
    Text(String),
    Binary(Vec<u8>),
    /// The response had no body
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Text,
    Binary,
}

impl Payload {
    /// Decode `body` according to `content_type` (media type only, lowercase).
    /// Unrecognized or missing types are decoded as JSON.
    pub fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Self, ApiError> {
        if body.is_empty() {
            return Ok(Payload::Empty);
        }
        match classify(content_type) {
            BodyKind::Json => serde_json::from_slice(body)
                .map(Payload::Json)
                .map_err(|e| ApiError::parse(format!("invalid JSON body: {}", e))),
            BodyKind::Text => String::from_utf8(body.to_vec())
                .map(Payload::Text)
                .map_err(|e| ApiError::parse(format!("invalid UTF-8 body: {}", e))),
            BodyKind::Binary => Ok(Payload::Binary(body.to_vec())),
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Size of the decoded body, reported as `bytes` in success events
    pub fn size_hint(&self) -> usize {
        match self {
            Payload::Json(value) => value.to_string().len(),
            Payload::Text(text) => text.len(),
            Payload::Binary(bytes) => bytes.len(),
            Payload::Empty => 0,
        }
    }
}

fn classify(content_type: Option<&str>) -> BodyKind {
    let Some(media) = content_type else {
        return BodyKind::Json;
    };
    let (top, sub) = media.split_once('/').unwrap_or((media, ""));

    if sub == "json" || sub.ends_with("+json") {
        return BodyKind::Json;
    }
    if top == "text"
        || sub == "xml"
        || sub.ends_with("+xml")
        || sub == "x-www-form-urlencoded"
        || sub == "javascript"
    {
        return BodyKind::Text;
    }
    if matches!(top, "image" | "audio" | "video" | "font")
        || matches!(sub, "octet-stream" | "pdf" | "zip" | "gzip" | "wasm")
    {
        return BodyKind::Binary;
    }
    BodyKind::Json
}
