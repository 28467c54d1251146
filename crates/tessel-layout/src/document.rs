//! The dashboard layout document.
//!
//! A [`LayoutDocument`] is the unit of atomicity: every reducer takes one by
//! reference and returns a new one. At rest no two widget rectangles
//! overlap; [`LayoutDocument::invariant_report`] checks that (and the other
//! structural rules) for documents that arrive from outside the reducer.

use serde::{Deserialize, Serialize};
use tessel_core::geometry::GridRect;
use tessel_core::stable_hash::StableHasher;

use crate::widget::{Widget, WidgetId};

/// Current persisted layout schema version.
pub const LAYOUT_SCHEMA_VERSION: u16 = 2;

/// Persisted dashboard state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    /// Document identifier (typically one per user dashboard).
    pub id: String,
    /// Placed widgets. Order carries no meaning.
    pub widgets: Vec<Widget>,
    /// Schema version the document was written with.
    pub layout_version: u16,
    /// Next value of the `w-<n>` id allocator. Never decreases.
    pub next_seq: u64,
}

impl LayoutDocument {
    /// Empty document at the current schema version.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            widgets: Vec::new(),
            layout_version: LAYOUT_SCHEMA_VERSION,
            next_seq: 1,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Look up a widget by id.
    #[must_use]
    pub fn widget(&self, id: &WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| &w.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &WidgetId) -> bool {
        self.position_of(id).is_some()
    }

    pub(crate) fn position_of(&self, id: &WidgetId) -> Option<usize> {
        self.widgets.iter().position(|w| &w.id == id)
    }

    /// Rectangles of every widget except the one at `skip`.
    pub(crate) fn rects_except(&self, skip: Option<usize>) -> Vec<GridRect> {
        self.widgets
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .map(|(_, w)| w.rect())
            .collect()
    }

    /// Rectangles of every widget, in list order.
    #[must_use]
    pub fn rects(&self) -> Vec<GridRect> {
        self.rects_except(None)
    }

    /// Number of rows in use (lowest bottom edge).
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.widgets.iter().map(|w| w.rect().bottom()).max().unwrap_or(0)
    }

    /// Allocate a fresh id, skipping any that are already taken.
    pub(crate) fn allocate_id(&mut self) -> WidgetId {
        loop {
            let seq = self.next_seq.max(1);
            self.next_seq = seq.saturating_add(1);
            let id = WidgetId::from_seq(seq);
            if !self.contains(&id) || seq == u64::MAX {
                return id;
            }
        }
    }

    /// Sort widgets by id for deterministic serialization.
    pub fn canonicalize(&mut self) {
        self.widgets.sort_by(|a, b| a.id.cmp(&b.id));
    }

    /// Deterministic digest over canonical document content.
    ///
    /// Widget order does not affect the hash.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut ordered: Vec<&Widget> = self.widgets.iter().collect();
        ordered.sort_by(|a, b| a.id.cmp(&b.id));

        let mut hasher = StableHasher::new();
        hasher.write_str(&self.id);
        hasher.write_u16(self.layout_version);
        hasher.write_u64(self.next_seq);
        hasher.write_u64(ordered.len() as u64);
        for widget in ordered {
            hasher.write_str(widget.id.as_str());
            hasher.write_str(widget.kind.as_str());
            hasher.write_bool(widget.title.is_some());
            if let Some(title) = &widget.title {
                hasher.write_str(title);
            }
            hasher.write_u32(widget.pos.x);
            hasher.write_u32(widget.pos.y);
            hasher.write_u32(widget.size.w);
            hasher.write_u32(widget.size.h);
            hasher.write_bool(widget.pinned);
            // serde_json::Map is ordered by key, so this is canonical.
            hasher.write_str(&serde_json::Value::Object(widget.data.clone()).to_string());
            hasher.write_u64(widget.created_at);
            hasher.write_u64(widget.updated_at);
        }
        hasher.finish()
    }

    /// Inspect structural invariants for a grid of `cols` columns.
    #[must_use]
    pub fn invariant_report(&self, cols: u32) -> LayoutInvariantReport {
        let mut issues = Vec::new();
        let mut seen = rustc_hash::FxHashSet::default();

        for (index, widget) in self.widgets.iter().enumerate() {
            if !seen.insert(&widget.id) {
                issues.push(LayoutInvariantIssue {
                    code: LayoutInvariantCode::DuplicateId,
                    widget_id: widget.id.clone(),
                    other: None,
                    message: format!("widget id {} appears more than once", widget.id),
                });
            }

            let min = widget.kind.min_size();
            if widget.size.max(min) != widget.size {
                issues.push(LayoutInvariantIssue {
                    code: LayoutInvariantCode::BelowMinimumSize,
                    widget_id: widget.id.clone(),
                    other: None,
                    message: format!(
                        "size {}x{} is below {} minimum {}x{}",
                        widget.size.w, widget.size.h, widget.kind, min.w, min.h
                    ),
                });
            }

            if out_of_bounds(widget.rect(), cols) {
                issues.push(LayoutInvariantIssue {
                    code: LayoutInvariantCode::OutOfBounds,
                    widget_id: widget.id.clone(),
                    other: None,
                    message: format!(
                        "rect x={} y={} w={} h={} leaves the {cols}-column grid",
                        widget.pos.x, widget.pos.y, widget.size.w, widget.size.h
                    ),
                });
            }

            for other in &self.widgets[index + 1..] {
                if widget.rect().overlaps(&other.rect()) {
                    issues.push(LayoutInvariantIssue {
                        code: LayoutInvariantCode::Overlap,
                        widget_id: widget.id.clone(),
                        other: Some(other.id.clone()),
                        message: format!("widget {} overlaps widget {}", widget.id, other.id),
                    });
                }
            }
        }

        LayoutInvariantReport { issues }
    }
}

impl Default for LayoutDocument {
    fn default() -> Self {
        Self::new("default")
    }
}

fn out_of_bounds(rect: GridRect, cols: u32) -> bool {
    let past_columns = if rect.w >= cols {
        rect.x != 0
    } else {
        rect.right() > cols
    };
    past_columns || rect.bottom_exact() > u64::from(u32::MAX)
}

/// Stable code for invariant findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutInvariantCode {
    DuplicateId,
    Overlap,
    OutOfBounds,
    BelowMinimumSize,
}

/// One invariant finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInvariantIssue {
    pub code: LayoutInvariantCode,
    pub widget_id: WidgetId,
    /// Second widget involved, for pairwise findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<WidgetId>,
    pub message: String,
}

/// All findings for one document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutInvariantReport {
    pub issues: Vec<LayoutInvariantIssue>,
}

impl LayoutInvariantReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    #[must_use]
    pub fn has(&self, code: LayoutInvariantCode) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{WidgetData, WidgetKind};
    use tessel_core::geometry::{GridPos, GridSize};

    fn widget(id: &str, kind: WidgetKind, x: u32, y: u32, w: u32, h: u32) -> Widget {
        Widget {
            id: WidgetId::new(id),
            kind,
            title: None,
            pos: GridPos::new(x, y),
            size: GridSize::new(w, h),
            pinned: false,
            data: WidgetData::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn new_document_is_empty_current_version() {
        let doc = LayoutDocument::new("home");
        assert!(doc.is_empty());
        assert_eq!(doc.layout_version, LAYOUT_SCHEMA_VERSION);
        assert_eq!(doc.row_count(), 0);
    }

    #[test]
    fn allocate_id_skips_taken_ids() {
        let mut doc = LayoutDocument::new("home");
        doc.widgets.push(widget("w-1", WidgetKind::Notes, 0, 0, 2, 2));
        let id = doc.allocate_id();
        assert_eq!(id.as_str(), "w-2");
        assert_eq!(doc.next_seq, 3);
    }

    #[test]
    fn state_hash_ignores_widget_order() {
        let mut a = LayoutDocument::new("home");
        a.widgets.push(widget("w-1", WidgetKind::Notes, 0, 0, 2, 2));
        a.widgets.push(widget("w-2", WidgetKind::Notes, 2, 0, 2, 2));
        let mut b = a.clone();
        b.widgets.reverse();
        assert_eq!(a.state_hash(), b.state_hash());

        b.widgets[0].pinned = true;
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn canonicalize_sorts_by_id() {
        let mut doc = LayoutDocument::new("home");
        doc.widgets.push(widget("w-b", WidgetKind::Notes, 0, 0, 2, 2));
        doc.widgets.push(widget("w-a", WidgetKind::Notes, 2, 0, 2, 2));
        doc.canonicalize();
        assert_eq!(doc.widgets[0].id.as_str(), "w-a");
    }

    #[test]
    fn invariant_report_flags_each_code() {
        let mut doc = LayoutDocument::new("home");
        doc.widgets.push(widget("a", WidgetKind::Notes, 0, 0, 4, 4));
        doc.widgets.push(widget("a", WidgetKind::Notes, 2, 2, 4, 4));
        doc.widgets.push(widget("c", WidgetKind::PriceChart, 10, 10, 4, 3));
        doc.widgets.push(widget("d", WidgetKind::Assistant, 0, 20, 1, 1));

        let report = doc.invariant_report(12);
        assert!(report.has(LayoutInvariantCode::DuplicateId));
        assert!(report.has(LayoutInvariantCode::Overlap));
        assert!(report.has(LayoutInvariantCode::OutOfBounds));
        assert!(report.has(LayoutInvariantCode::BelowMinimumSize));
    }

    #[test]
    fn rows_near_the_limit_keep_full_height() {
        let mut doc = LayoutDocument::new("home");
        doc.widgets.push(widget("a", WidgetKind::Notes, 0, u32::MAX - 1, 4, 3));
        doc.widgets.push(widget("b", WidgetKind::Notes, 0, u32::MAX, 4, 3));

        let report = doc.invariant_report(12);
        assert!(report.has(LayoutInvariantCode::Overlap));
        assert!(report.has(LayoutInvariantCode::OutOfBounds));
    }

    #[test]
    fn full_width_widget_at_zero_is_in_bounds() {
        let mut doc = LayoutDocument::new("home");
        doc.widgets.push(widget("wide", WidgetKind::Unknown, 0, 0, 20, 1));
        assert!(doc.invariant_report(12).is_clean());
    }
}
