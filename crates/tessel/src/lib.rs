#![forbid(unsafe_code)]

//! Tessel public facade crate.
//!
//! Re-exports the layout engine and the selection engine, and composes them
//! in [`seed`]: a fresh dashboard is filled from the ranked catalog.

use std::fmt;

// --- Layout re-exports -----------------------------------------------------

pub use tessel_layout::{
    Clock, CollisionPolicy, DeserializeReport, GridPos, GridRect, GridSize, LayoutConfig,
    LayoutConfigError, LayoutDocument, LayoutEngine, LayoutOperation, LayoutOperationKind,
    ManualClock, NewWidget, OperationOutcome, PersistError, RepairOutcome, SystemClock, Widget,
    WidgetData, WidgetId, WidgetKind, deserialize, deserialize_with_report, serialize,
};

// --- Selection re-exports --------------------------------------------------

pub use tessel_select::{
    SelectionOutcome, SelectionPolicy, SelectionPolicyError, SelectionRequest, SelectionWeights,
    Signals, Stage, WidgetMeta, select_widgets, select_widgets_explained,
};

pub mod seed;

pub use seed::{SeedOutcome, SkipReason, SkippedEntry, select_and_seed, seed_document};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Tessel callers.
#[derive(Debug)]
pub enum Error {
    /// A stored layout document could not be read.
    Persist(PersistError),
    /// Layout configuration failed to load or validate.
    LayoutConfig(LayoutConfigError),
    /// Selection policy failed to load or validate.
    SelectionPolicy(SelectionPolicyError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persist(err) => write!(f, "layout document: {err}"),
            Self::LayoutConfig(err) => write!(f, "layout config: {err}"),
            Self::SelectionPolicy(err) => write!(f, "selection policy: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Persist(err) => Some(err),
            Self::LayoutConfig(err) => Some(err),
            Self::SelectionPolicy(err) => Some(err),
        }
    }
}

impl From<PersistError> for Error {
    fn from(err: PersistError) -> Self {
        Self::Persist(err)
    }
}

impl From<LayoutConfigError> for Error {
    fn from(err: LayoutConfigError) -> Self {
        Self::LayoutConfig(err)
    }
}

impl From<SelectionPolicyError> for Error {
    fn from(err: SelectionPolicyError) -> Self {
        Self::SelectionPolicy(err)
    }
}

/// Standard result type for Tessel APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, GridPos, GridSize, LayoutConfig, LayoutDocument, LayoutEngine, NewWidget, Result,
        SelectionPolicy, SelectionRequest, Signals, Stage, WidgetId, WidgetKind, WidgetMeta,
        seed_document, select_widgets,
    };

    pub use crate::{core, layout, select};
}

pub use tessel_core as core;
pub use tessel_layout as layout;
pub use tessel_select as select;
