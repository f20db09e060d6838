// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// Event bus settings, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusConfig {
    /// Capacity of the emission history ring
    pub max_history: usize,
    /// Log every subscribe/publish at debug level
    pub debug: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            max_history: 100,
            debug: false,
        }
    }
}
