//! Per-call resolution results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Outcome of one successful facade invocation. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub key: String,
    pub contract: String,
    pub operation: String,
    /// Identity of the provider that produced the output
    pub provider: String,
    /// Provider output, exactly as returned
    pub output: Value,
    pub diagnostics: Diagnostics,
}

impl Resolution {
    pub fn output(&self) -> &Value {
        &self.output
    }

    pub fn into_output(self) -> Value {
        self.output
    }

    /// Output as a float, when it is a number
    pub fn as_f64(&self) -> Option<f64> {
        self.output.as_f64()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub started_at: DateTime<Utc>,
    /// Time spent inside the provider call
    pub elapsed: Duration,
}
