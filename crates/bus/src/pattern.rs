// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Topic matching
//!
//! A topic containing `*` or `?` is a glob pattern:
//!   - `*` matches any run of characters, including none: "layer:*"
//!   - `?` matches exactly one character: "layer:?"
//!
//! Anything else is matched literally. Patterns are compiled to an anchored
//! regex once, when the subscription is registered.

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("topic must not be empty")]
    Empty,
    #[error("invalid pattern {pattern:?}: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled topic matcher
#[derive(Clone, Debug)]
pub enum TopicPattern {
    Exact(String),
    Wildcard { source: String, matcher: Regex },
}

impl TopicPattern {
    /// Whether `topic` would be treated as a wildcard pattern
    pub fn is_wildcard(topic: &str) -> bool {
        topic.contains(['*', '?'])
    }

    pub fn parse(topic: &str) -> Result<Self, PatternError> {
        if topic.is_empty() {
            return Err(PatternError::Empty);
        }
        if !Self::is_wildcard(topic) {
            return Ok(Self::Exact(topic.to_string()));
        }

        let mut expr = String::with_capacity(topic.len() + 8);
        expr.push_str("(?s)^");
        for c in topic.chars() {
            match c {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                other => expr.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }
        expr.push('$');

        let matcher = Regex::new(&expr).map_err(|source| PatternError::Invalid {
            pattern: topic.to_string(),
            source,
        })?;
        Ok(Self::Wildcard {
            source: topic.to_string(),
            matcher,
        })
    }

    pub fn matches(&self, topic: &str) -> bool {
        match self {
            Self::Exact(exact) => exact == topic,
            Self::Wildcard { matcher, .. } => matcher.is_match(topic),
        }
    }

    /// The topic or pattern as written by the subscriber
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact(exact) => exact,
            Self::Wildcard { source, .. } => source,
        }
    }

    pub fn wildcard(&self) -> bool {
        matches!(self, Self::Wildcard { .. })
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
