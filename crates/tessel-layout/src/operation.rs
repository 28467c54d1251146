//! Serializable reducer operations.
//!
//! [`LayoutOperation`] is the wire form an API layer dispatches through
//! [`LayoutEngine::apply_operation`]. The outcome carries before/after state
//! hashes and the ids that changed, for journaling and diagnostics.

use serde::{Deserialize, Serialize};
use tessel_core::geometry::{GridPos, GridSize};

use crate::clock::Clock;
use crate::document::LayoutDocument;
use crate::reducer::LayoutEngine;
use crate::widget::{NewWidget, WidgetData, WidgetId};

/// Every document mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LayoutOperation {
    Add { widget: NewWidget },
    Move { id: WidgetId, to: GridPos },
    Resize { id: WidgetId, size: GridSize },
    Remove { id: WidgetId },
    TogglePin { id: WidgetId },
    SetPinned { id: WidgetId, pinned: bool },
    UpsertData { id: WidgetId, data: WidgetData },
    SetTitle {
        id: WidgetId,
        #[serde(default)]
        title: Option<String>,
    },
}

impl LayoutOperation {
    /// Operation family.
    #[must_use]
    pub const fn kind(&self) -> LayoutOperationKind {
        match self {
            Self::Add { .. } => LayoutOperationKind::Add,
            Self::Move { .. } => LayoutOperationKind::Move,
            Self::Resize { .. } => LayoutOperationKind::Resize,
            Self::Remove { .. } => LayoutOperationKind::Remove,
            Self::TogglePin { .. } => LayoutOperationKind::TogglePin,
            Self::SetPinned { .. } => LayoutOperationKind::SetPinned,
            Self::UpsertData { .. } => LayoutOperationKind::UpsertData,
            Self::SetTitle { .. } => LayoutOperationKind::SetTitle,
        }
    }

    /// Widget targeted by the operation; `None` for adds.
    #[must_use]
    pub fn target(&self) -> Option<&WidgetId> {
        match self {
            Self::Add { .. } => None,
            Self::Move { id, .. }
            | Self::Resize { id, .. }
            | Self::Remove { id }
            | Self::TogglePin { id }
            | Self::SetPinned { id, .. }
            | Self::UpsertData { id, .. }
            | Self::SetTitle { id, .. } => Some(id),
        }
    }
}

/// Stable operation discriminator used in logs and journals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutOperationKind {
    Add,
    Move,
    Resize,
    Remove,
    TogglePin,
    SetPinned,
    UpsertData,
    SetTitle,
}

/// Result of applying one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationOutcome {
    pub document: LayoutDocument,
    pub kind: LayoutOperationKind,
    /// False when the target id was absent and the operation was a no-op.
    pub applied: bool,
    /// Ids added, removed or changed, sorted.
    pub touched: Vec<WidgetId>,
    pub before_hash: u64,
    pub after_hash: u64,
}

impl<C: Clock> LayoutEngine<C> {
    /// Apply one operation and report what changed.
    #[must_use]
    pub fn apply_operation(&self, doc: &LayoutDocument, operation: LayoutOperation) -> OperationOutcome {
        let kind = operation.kind();
        let applied = operation.target().is_none_or(|id| doc.contains(id));
        let document = match operation {
            LayoutOperation::Add { widget } => self.add_widget(doc, widget),
            LayoutOperation::Move { id, to } => self.move_widget(doc, &id, to),
            LayoutOperation::Resize { id, size } => self.resize_widget(doc, &id, size),
            LayoutOperation::Remove { id } => self.remove_widget(doc, &id),
            LayoutOperation::TogglePin { id } => self.toggle_pin_widget(doc, &id),
            LayoutOperation::SetPinned { id, pinned } => self.set_pinned(doc, &id, pinned),
            LayoutOperation::UpsertData { id, data } => self.upsert_widget_data(doc, &id, data),
            LayoutOperation::SetTitle { id, title } => self.set_title(doc, &id, title),
        };
        OperationOutcome {
            touched: touched_ids(doc, &document),
            before_hash: doc.state_hash(),
            after_hash: document.state_hash(),
            document,
            kind,
            applied,
        }
    }

    /// Apply operations in order, returning the final document.
    #[must_use]
    pub fn apply_all(
        &self,
        doc: &LayoutDocument,
        operations: impl IntoIterator<Item = LayoutOperation>,
    ) -> LayoutDocument {
        operations
            .into_iter()
            .fold(doc.clone(), |current, operation| {
                self.apply_operation(&current, operation).document
            })
    }
}

fn touched_ids(before: &LayoutDocument, after: &LayoutDocument) -> Vec<WidgetId> {
    let mut touched: Vec<WidgetId> = after
        .widgets
        .iter()
        .filter(|widget| before.widget(&widget.id) != Some(*widget))
        .map(|widget| widget.id.clone())
        .collect();
    touched.extend(
        before
            .widgets
            .iter()
            .filter(|widget| !after.contains(&widget.id))
            .map(|widget| widget.id.clone()),
    );
    touched.sort();
    touched.dedup();
    touched
}
