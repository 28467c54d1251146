//! Pure state transitions over [`LayoutDocument`].
//!
//! Every reducer borrows its input and returns a new document, so the input
//! is never mutated. Targeting an id that is not in the document is a silent
//! no-op that returns an equal document. Every geometry-changing reducer
//! leaves the document overlap-free.

use tessel_core::geometry::{GridPos, GridRect, GridSize};

use crate::clock::{Clock, SystemClock};
use crate::config::LayoutConfig;
use crate::document::LayoutDocument;
use crate::grid::{
    PlacementLimits, clamp_to_grid, next_non_overlapping_pos_with_cap, overlaps_any,
    resolve_collision,
};
use crate::repair::{RepairOutcome, repair_document};
use crate::widget::{NewWidget, Widget, WidgetData, WidgetId};

/// Reducer bound to a configuration and a time source.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine<C = SystemClock> {
    config: LayoutConfig,
    clock: C,
}

impl LayoutEngine<SystemClock> {
    /// Engine with the given configuration and the wall clock.
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> LayoutEngine<C> {
    /// Engine with an explicit time source.
    #[must_use]
    pub fn with_clock(config: LayoutConfig, clock: C) -> Self {
        Self { config, clock }
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn cols(&self) -> u32 {
        self.config.effective_cols()
    }

    fn limits(&self) -> PlacementLimits {
        PlacementLimits {
            max_scan_rows: self.config.max_scan_rows,
            push_down_iterations: self.config.push_down_iterations,
        }
    }

    /// Add a widget with a fresh id.
    ///
    /// The size is lifted to the kind minimum. A requested position is
    /// clamped and kept if free; otherwise, or without one, the widget goes to
    /// the first free slot. Never fails.
    #[must_use]
    pub fn add_widget(&self, doc: &LayoutDocument, new: NewWidget) -> LayoutDocument {
        let now = self.clock.now_ms();
        let cols = self.cols();
        let mut next = doc.clone();
        let id = next.allocate_id();

        let size = new
            .size
            .unwrap_or_else(|| new.kind.default_size())
            .max(new.kind.min_size());
        let existing = next.rects();
        let requested = new.pos.map(|pos| clamp_to_grid(pos, size, cols));
        let pos = match requested {
            Some(pos) if !overlaps_any(&GridRect::from_parts(pos, size), &existing) => pos,
            _ => next_non_overlapping_pos_with_cap(&existing, size, cols, self.config.max_scan_rows),
        };

        tracing::debug!(
            op = "add",
            widget_id = %id,
            kind = %new.kind,
            x = pos.x,
            y = pos.y,
            w = size.w,
            h = size.h,
            relocated = requested.is_some_and(|r| r != pos),
            "widget added"
        );

        next.widgets.push(Widget {
            id,
            kind: new.kind,
            title: new.title,
            pos,
            size,
            pinned: new.pinned,
            data: new.data,
            created_at: now,
            updated_at: now,
        });
        next
    }

    /// Move a widget. Size is unchanged; collisions follow the configured
    /// [`crate::CollisionPolicy`].
    #[must_use]
    pub fn move_widget(&self, doc: &LayoutDocument, id: &WidgetId, to: GridPos) -> LayoutDocument {
        let Some(index) = doc.position_of(id) else {
            return not_found(doc, "move", id);
        };
        let size = doc.widgets[index].size;
        self.settle(doc, index, to, size, "move")
    }

    /// Resize a widget, lifting the request to the kind minimum and
    /// re-resolving its position with the new footprint.
    #[must_use]
    pub fn resize_widget(
        &self,
        doc: &LayoutDocument,
        id: &WidgetId,
        new_size: GridSize,
    ) -> LayoutDocument {
        let Some(index) = doc.position_of(id) else {
            return not_found(doc, "resize", id);
        };
        let widget = &doc.widgets[index];
        let size = new_size.max(widget.kind.min_size());
        self.settle(doc, index, widget.pos, size, "resize")
    }

    /// Remove a widget. Remaining widgets are not repacked.
    #[must_use]
    pub fn remove_widget(&self, doc: &LayoutDocument, id: &WidgetId) -> LayoutDocument {
        if !doc.contains(id) {
            return not_found(doc, "remove", id);
        }
        let mut next = doc.clone();
        next.widgets.retain(|w| &w.id != id);
        tracing::debug!(op = "remove", widget_id = %id, "widget removed");
        next
    }

    /// Flip the `pinned` flag. No positional effect.
    #[must_use]
    pub fn toggle_pin_widget(&self, doc: &LayoutDocument, id: &WidgetId) -> LayoutDocument {
        self.update(doc, id, "toggle_pin", |widget| widget.pinned = !widget.pinned)
    }

    /// Alias for [`LayoutEngine::toggle_pin_widget`].
    #[must_use]
    pub fn pin_widget(&self, doc: &LayoutDocument, id: &WidgetId) -> LayoutDocument {
        self.toggle_pin_widget(doc, id)
    }

    /// Set the `pinned` flag explicitly.
    #[must_use]
    pub fn set_pinned(&self, doc: &LayoutDocument, id: &WidgetId, pinned: bool) -> LayoutDocument {
        self.update(doc, id, "set_pinned", |widget| widget.pinned = pinned)
    }

    /// Shallow-merge `partial` into the widget's data.
    ///
    /// Keys in `partial` overwrite; other keys are kept. Nested objects are
    /// replaced wholesale, not merged.
    #[must_use]
    pub fn upsert_widget_data(
        &self,
        doc: &LayoutDocument,
        id: &WidgetId,
        partial: WidgetData,
    ) -> LayoutDocument {
        self.update(doc, id, "upsert_data", move |widget| {
            for (key, value) in partial {
                let _ = widget.data.insert(key, value);
            }
        })
    }

    /// Replace (or clear) the widget title.
    #[must_use]
    pub fn set_title(
        &self,
        doc: &LayoutDocument,
        id: &WidgetId,
        title: Option<String>,
    ) -> LayoutDocument {
        self.update(doc, id, "set_title", move |widget| widget.title = title)
    }

    /// Normalize a document built outside the reducer.
    #[must_use]
    pub fn repair(&self, doc: &LayoutDocument) -> RepairOutcome {
        repair_document(doc, &self.config)
    }

    fn update(
        &self,
        doc: &LayoutDocument,
        id: &WidgetId,
        op: &'static str,
        apply: impl FnOnce(&mut Widget),
    ) -> LayoutDocument {
        let Some(index) = doc.position_of(id) else {
            return not_found(doc, op, id);
        };
        let mut next = doc.clone();
        let widget = &mut next.widgets[index];
        apply(widget);
        widget.updated_at = self.clock.now_ms();
        tracing::debug!(op, widget_id = %id, "widget updated");
        next
    }

    /// Place widget `index` at `to` with `size`, resolving collisions.
    fn settle(
        &self,
        doc: &LayoutDocument,
        index: usize,
        to: GridPos,
        size: GridSize,
        op: &'static str,
    ) -> LayoutDocument {
        let now = self.clock.now_ms();
        let cols = self.cols();
        let requested = clamp_to_grid(to, size, cols);
        let others = doc.rects_except(Some(index));
        let placement = resolve_collision(
            &others,
            GridRect::from_parts(requested, size),
            cols,
            self.config.collision_policy,
            self.limits(),
        );

        let mut next = doc.clone();
        {
            let widget = &mut next.widgets[index];
            widget.pos = placement.mover;
            widget.size = size;
            widget.updated_at = now;
        }
        // `others` skipped `index`, so shift indices at or past it by one.
        for &(other, pos) in &placement.displaced {
            let target = if other >= index { other + 1 } else { other };
            let widget = &mut next.widgets[target];
            widget.pos = pos;
            widget.updated_at = now;
        }

        tracing::debug!(
            op,
            widget_id = %next.widgets[index].id,
            x = placement.mover.x,
            y = placement.mover.y,
            w = size.w,
            h = size.h,
            relocated = placement.relocated_from(requested),
            displaced = placement.displaced.len(),
            "widget placed"
        );
        next
    }
}

fn not_found(doc: &LayoutDocument, op: &'static str, id: &WidgetId) -> LayoutDocument {
    tracing::debug!(op, widget_id = %id, "widget not found; no-op");
    doc.clone()
}
