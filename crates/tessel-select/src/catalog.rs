//! Widget catalog entries and user journey stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the user is in their journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Explore,
    Build,
    Operate,
}

impl Stage {
    pub const ALL: [Self; 3] = [Self::Explore, Self::Build, Self::Operate];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Explore => "explore",
            Self::Build => "build",
            Self::Operate => "operate",
        }
    }

    /// Parse a stage tag, ignoring ASCII case.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(tag.trim()))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a widget the selector may surface.
///
/// Catalog JSON uses camelCase keys; everything but `id` is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetMeta {
    pub id: String,
    #[serde(default)]
    pub stages: Vec<Stage>,
    /// Editorial weight in `[0, 1]`; out-of-range values are clamped when scored.
    #[serde(default)]
    pub priority: f64,
    #[serde(default)]
    pub mobile_friendly: bool,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl WidgetMeta {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stages: Vec::new(),
            priority: 0.0,
            mobile_friendly: false,
            categories: Vec::new(),
        }
    }

    #[must_use]
    pub fn stages(mut self, stages: impl IntoIterator<Item = Stage>) -> Self {
        self.stages = stages.into_iter().collect();
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn mobile_friendly(mut self, mobile_friendly: bool) -> Self {
        self.mobile_friendly = mobile_friendly;
        self
    }

    #[must_use]
    pub fn categories<S: Into<String>>(mut self, categories: impl IntoIterator<Item = S>) -> Self {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn fits_stage(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }

    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// True if the entry belongs to at least one of `categories`.
    #[must_use]
    pub fn in_any(&self, categories: &[String]) -> bool {
        categories.iter().any(|c| self.in_category(c))
    }
}
