//! Deterministic normalization for documents built outside the reducer.
//!
//! Legacy or hand-edited documents can break every rule the reducer keeps:
//! duplicate ids, undersized or out-of-bounds widgets, overlaps. The repair
//! pass fixes all of them without dropping a widget:
//!
//! 1. later duplicates of an id get a freshly allocated id;
//! 2. sizes are lifted to the kind minimum and positions clamped;
//! 3. widgets settle in list order; one that overlaps an already settled
//!    widget is re-placed by the skyline scan.

use serde::{Deserialize, Serialize};
use tessel_core::geometry::{GridPos, GridRect, GridSize};

use crate::config::LayoutConfig;
use crate::document::LayoutDocument;
use crate::grid::{clamp_to_grid, next_non_overlapping_pos_with_cap, overlaps_any};
use crate::widget::WidgetId;

/// One change made by [`repair_document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RepairAction {
    RenamedDuplicateId { from: WidgetId, to: WidgetId },
    LiftedSize { id: WidgetId, from: GridSize, to: GridSize },
    Clamped { id: WidgetId, from: GridPos, to: GridPos },
    Relocated { id: WidgetId, from: GridPos, to: GridPos },
}

/// Repaired document plus the changes that were needed.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    pub document: LayoutDocument,
    pub actions: Vec<RepairAction>,
}

impl RepairOutcome {
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.actions.is_empty()
    }
}

/// Normalize `doc` so it satisfies every layout invariant under `config`.
///
/// A document that already satisfies them comes back equal to the input
/// with no actions.
#[must_use]
pub fn repair_document(doc: &LayoutDocument, config: &LayoutConfig) -> RepairOutcome {
    let cols = config.effective_cols();
    let mut document = doc.clone();
    let mut actions = Vec::new();

    // Keep the allocator ahead of every `w-<n>` id already in use.
    let highest = document
        .widgets
        .iter()
        .filter_map(|w| w.id.seq())
        .max()
        .unwrap_or(0);
    document.next_seq = document.next_seq.max(highest.saturating_add(1)).max(1);

    let mut seen = rustc_hash::FxHashSet::default();
    for index in 0..document.widgets.len() {
        let id = document.widgets[index].id.clone();
        if !seen.insert(id.clone()) {
            let fresh = document.allocate_id();
            let _ = seen.insert(fresh.clone());
            document.widgets[index].id = fresh.clone();
            actions.push(RepairAction::RenamedDuplicateId { from: id, to: fresh });
        }
    }

    let mut settled: Vec<GridRect> = Vec::with_capacity(document.widgets.len());
    for widget in &mut document.widgets {
        let lifted = widget.size.max(widget.kind.min_size());
        if lifted != widget.size {
            actions.push(RepairAction::LiftedSize {
                id: widget.id.clone(),
                from: widget.size,
                to: lifted,
            });
            widget.size = lifted;
        }

        let clamped = clamp_to_grid(widget.pos, widget.size, cols);
        if clamped != widget.pos {
            actions.push(RepairAction::Clamped {
                id: widget.id.clone(),
                from: widget.pos,
                to: clamped,
            });
            widget.pos = clamped;
        }

        if overlaps_any(&widget.rect(), &settled) {
            let to =
                next_non_overlapping_pos_with_cap(&settled, widget.size, cols, config.max_scan_rows);
            actions.push(RepairAction::Relocated {
                id: widget.id.clone(),
                from: widget.pos,
                to,
            });
            widget.pos = to;
        }
        settled.push(widget.rect());
    }

    for action in &actions {
        tracing::warn!(?action, document = %document.id, "repaired layout document");
    }

    RepairOutcome { document, actions }
}
