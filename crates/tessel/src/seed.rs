//! Seeding: turn a widget selection into placed widgets.
//!
//! Each selected catalog entry whose id names a [`WidgetKind`] is added with
//! the kind's default footprint and no explicit position, in selection
//! order, so placement follows the ranking. Entries are skipped when their
//! kind is unknown or already on the dashboard.

use serde::Serialize;
use tessel_layout::{Clock, LayoutDocument, LayoutEngine, NewWidget, WidgetId, WidgetKind};
use tessel_select::{SelectionRequest, Signals, WidgetMeta, select_widgets};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The catalog id does not name a widget kind.
    UnknownKind,
    /// A widget of this kind is already on the dashboard.
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub catalog_id: String,
    pub reason: SkipReason,
}

/// Result of [`seed_document`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeedOutcome {
    pub document: LayoutDocument,
    /// Ids of the widgets added, in placement order.
    pub added: Vec<WidgetId>,
    pub skipped: Vec<SkippedEntry>,
}

/// Add every placeable entry of `selection` to `doc`.
///
/// A widget is pinned when its catalog id is in `signals.pins`.
#[must_use]
pub fn seed_document<C: Clock>(
    engine: &LayoutEngine<C>,
    doc: &LayoutDocument,
    selection: &[WidgetMeta],
    signals: &Signals,
) -> SeedOutcome {
    let mut document = doc.clone();
    let mut added = Vec::new();
    let mut skipped = Vec::new();

    for meta in selection {
        let Some(kind) = WidgetKind::from_catalog_id(&meta.id) else {
            tracing::debug!(catalog_id = %meta.id, "seed skipped unknown widget kind");
            skipped.push(SkippedEntry {
                catalog_id: meta.id.clone(),
                reason: SkipReason::UnknownKind,
            });
            continue;
        };
        if document.widgets.iter().any(|w| w.kind == kind) {
            skipped.push(SkippedEntry {
                catalog_id: meta.id.clone(),
                reason: SkipReason::AlreadyPresent,
            });
            continue;
        }

        let new = NewWidget::new(kind).pinned(signals.is_pinned(&meta.id));
        document = engine.add_widget(&document, new);
        if let Some(widget) = document.widgets.last() {
            added.push(widget.id.clone());
        }
    }

    tracing::debug!(
        document = %document.id,
        added = added.len(),
        skipped = skipped.len(),
        "dashboard seeded"
    );
    SeedOutcome {
        document,
        added,
        skipped,
    }
}

/// Run selection for `request` and seed `doc` with the result.
#[must_use]
pub fn select_and_seed<C: Clock>(
    engine: &LayoutEngine<C>,
    doc: &LayoutDocument,
    request: &SelectionRequest<'_>,
) -> SeedOutcome {
    let selection = select_widgets(request);
    seed_document(engine, doc, &selection, request.signals)
}
