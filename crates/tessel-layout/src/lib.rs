#![forbid(unsafe_code)]

//! Adaptive dashboard layout: grid placement, collision resolution and the
//! pure document reducer.
//!
//! # Role in Tessel
//! `tessel-layout` owns the [`LayoutDocument`] and every transition on it.
//! An API layer loads a document (see [`persist`]), applies reducer calls or
//! [`LayoutOperation`]s through a [`LayoutEngine`], and stores the result.
//! The engine never performs I/O and never mutates its input.
//!
//! ```
//! use tessel_layout::{GridPos, GridSize, LayoutConfig, LayoutDocument, LayoutEngine, NewWidget, WidgetKind};
//!
//! let engine = LayoutEngine::new(LayoutConfig::default());
//! let doc = LayoutDocument::new("home");
//! let doc = engine.add_widget(&doc, NewWidget::new(WidgetKind::Notes).size(GridSize::new(4, 3)));
//! assert_eq!(doc.widgets[0].pos, GridPos::new(0, 0));
//! ```

pub mod clock;
pub mod config;
pub mod document;
pub mod grid;
pub mod operation;
pub mod persist;
pub mod reducer;
pub mod repair;
pub mod widget;

pub use tessel_core::geometry::{GridPos, GridRect, GridSize};

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{LayoutConfig, LayoutConfigError};
pub use document::{
    LAYOUT_SCHEMA_VERSION, LayoutDocument, LayoutInvariantCode, LayoutInvariantIssue,
    LayoutInvariantReport,
};
pub use grid::{
    CollisionPolicy, DEFAULT_COLS, DEFAULT_MAX_SCAN_ROWS, DEFAULT_PUSH_DOWN_ITERATIONS,
    Placement, PlacementLimits, clamp_to_grid, next_non_overlapping_pos,
    next_non_overlapping_pos_with_cap, rects_overlap, resolve_collision,
};
pub use operation::{LayoutOperation, LayoutOperationKind, OperationOutcome};
pub use persist::{DeserializeReport, PersistError, deserialize, deserialize_with_report, serialize};
pub use reducer::LayoutEngine;
pub use repair::{RepairAction, RepairOutcome, repair_document};
pub use widget::{NewWidget, Timestamp, Widget, WidgetData, WidgetId, WidgetKind};
