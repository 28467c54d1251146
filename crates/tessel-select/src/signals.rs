//! Behavioral signal snapshot supplied by the caller.
//!
//! Signals are computed outside the engine (interaction logs, storage in the
//! UI layer) and passed in explicitly. Every weight is read through
//! [`clamp01`], so out-of-range or NaN inputs never skew the ordering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Clamp to `[0, 1]`, mapping NaN and `-0.0` to `+0.0`.
#[inline]
#[must_use]
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() || value <= 0.0 { 0.0 } else { value.min(1.0) }
}

/// Per-widget behavioral weights keyed by catalog id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signals {
    pub pins: Vec<String>,
    pub recency: BTreeMap<String, f64>,
    pub dwell: BTreeMap<String, f64>,
    pub prompts: BTreeMap<String, f64>,
}

impl Signals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pin(mut self, id: impl Into<String>) -> Self {
        self.pins.push(id.into());
        self
    }

    #[must_use]
    pub fn with_recency(mut self, id: impl Into<String>, weight: f64) -> Self {
        let _ = self.recency.insert(id.into(), weight);
        self
    }

    #[must_use]
    pub fn with_dwell(mut self, id: impl Into<String>, weight: f64) -> Self {
        let _ = self.dwell.insert(id.into(), weight);
        self
    }

    #[must_use]
    pub fn with_prompts(mut self, id: impl Into<String>, weight: f64) -> Self {
        let _ = self.prompts.insert(id.into(), weight);
        self
    }

    #[must_use]
    pub fn is_pinned(&self, id: &str) -> bool {
        self.pins.iter().any(|pin| pin == id)
    }

    #[must_use]
    pub fn recency(&self, id: &str) -> f64 {
        weight(&self.recency, id)
    }

    #[must_use]
    pub fn dwell(&self, id: &str) -> f64 {
        weight(&self.dwell, id)
    }

    #[must_use]
    pub fn prompts(&self, id: &str) -> f64 {
        weight(&self.prompts, id)
    }

    /// Combined signal score: pin 1.0, recency 0.6, dwell 0.3, prompts 0.4.
    #[must_use]
    pub fn signal_score(&self, id: &str) -> f64 {
        let pin = if self.is_pinned(id) { 1.0 } else { 0.0 };
        pin + self.recency(id) * 0.6 + self.dwell(id) * 0.3 + self.prompts(id) * 0.4
    }
}

fn weight(map: &BTreeMap<String, f64>, id: &str) -> f64 {
    map.get(id).copied().map_or(0.0, clamp01)
}
