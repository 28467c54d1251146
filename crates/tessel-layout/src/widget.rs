//! Widget entities placed on the dashboard grid.
//!
//! A widget's geometry (`pos`, `size`) is owned by its document and only
//! changes through the reducer in [`crate::reducer`]. The `data` payload is an
//! opaque JSON map that the layout engine carries around without reading.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tessel_core::geometry::{GridPos, GridRect, GridSize};

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Widget-specific payload. Keys are strings, values arbitrary JSON.
pub type WidgetData = serde_json::Map<String, serde_json::Value>;

/// Opaque widget identifier, unique within one document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    /// Wrap an existing identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Identifier allocated from a document sequence number.
    #[must_use]
    pub fn from_seq(seq: u64) -> Self {
        Self(format!("w-{seq}"))
    }

    /// Sequence number if this id has the allocator's `w-<n>` shape.
    #[must_use]
    pub fn seq(&self) -> Option<u64> {
        self.0.strip_prefix("w-")?.parse().ok()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for WidgetId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Closed set of widget behaviours.
///
/// The layout engine only consults the kind for its minimum and default
/// footprints. Tags that no longer exist load as [`WidgetKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WidgetKind {
    PriceChart,
    Watchlist,
    Portfolio,
    TokenStats,
    NewsFeed,
    LearnCard,
    QuickActions,
    Assistant,
    Notes,
    Unknown,
}

impl WidgetKind {
    /// Every concrete kind, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::PriceChart,
        Self::Watchlist,
        Self::Portfolio,
        Self::TokenStats,
        Self::NewsFeed,
        Self::LearnCard,
        Self::QuickActions,
        Self::Assistant,
        Self::Notes,
    ];

    /// Stable wire tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceChart => "price_chart",
            Self::Watchlist => "watchlist",
            Self::Portfolio => "portfolio",
            Self::TokenStats => "token_stats",
            Self::NewsFeed => "news_feed",
            Self::LearnCard => "learn_card",
            Self::QuickActions => "quick_actions",
            Self::Assistant => "assistant",
            Self::Notes => "notes",
            Self::Unknown => "unknown",
        }
    }

    /// Smallest footprint the widget can be rendered at.
    #[must_use]
    pub const fn min_size(self) -> GridSize {
        match self {
            Self::PriceChart | Self::Portfolio => GridSize::new(4, 3),
            Self::Watchlist | Self::NewsFeed => GridSize::new(3, 3),
            Self::LearnCard => GridSize::new(3, 2),
            Self::Assistant => GridSize::new(4, 4),
            Self::TokenStats | Self::QuickActions | Self::Notes => GridSize::new(2, 2),
            Self::Unknown => GridSize::UNIT,
        }
    }

    /// Footprint used when a widget is added without an explicit size.
    #[must_use]
    pub const fn default_size(self) -> GridSize {
        match self {
            Self::PriceChart | Self::Assistant => GridSize::new(6, 4),
            Self::Watchlist => GridSize::new(4, 4),
            Self::Portfolio => GridSize::new(6, 3),
            Self::TokenStats => GridSize::new(3, 2),
            Self::NewsFeed => GridSize::new(4, 5),
            Self::LearnCard => GridSize::new(4, 3),
            Self::QuickActions => GridSize::new(4, 2),
            Self::Notes => GridSize::new(3, 3),
            Self::Unknown => GridSize::new(2, 2),
        }
    }

    /// Parse a wire tag, mapping anything unrecognised to `Unknown`.
    ///
    /// Accepts `snake_case`, `kebab-case` and `camelCase` spellings.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        Self::from_catalog_id(tag).unwrap_or(Self::Unknown)
    }

    /// Resolve a catalog entry id to a concrete kind.
    ///
    /// Unlike [`WidgetKind::from_tag`], unrecognised ids yield `None`.
    #[must_use]
    pub fn from_catalog_id(id: &str) -> Option<Self> {
        let normalized = normalize_tag(id);
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }
}

fn normalize_tag(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len() + 4);
    for (i, ch) in tag.trim().chars().enumerate() {
        match ch {
            '-' | ' ' => out.push('_'),
            c if c.is_ascii_uppercase() => {
                if i > 0 && !out.ends_with('_') {
                    out.push('_');
                }
                out.push(c.to_ascii_lowercase());
            }
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WidgetKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WidgetKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// One widget placed on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: WidgetId,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub pos: GridPos,
    pub size: GridSize,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub data: WidgetData,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Widget {
    /// Derived rectangle for overlap tests.
    #[inline]
    #[must_use]
    pub const fn rect(&self) -> GridRect {
        GridRect::from_parts(self.pos, self.size)
    }
}

/// Arguments to [`crate::LayoutEngine::add_widget`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWidget {
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Footprint; the kind's default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<GridSize>,
    /// Requested slot; the first free slot when absent or occupied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<GridPos>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub data: WidgetData,
}

impl NewWidget {
    #[must_use]
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            title: None,
            size: None,
            pos: None,
            pinned: false,
            data: WidgetData::new(),
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn size(mut self, size: GridSize) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn at(mut self, pos: GridPos) -> Self {
        self.pos = Some(pos);
        self
    }

    #[must_use]
    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    #[must_use]
    pub fn data(mut self, data: WidgetData) -> Self {
        self.data = data;
        self
    }
}
