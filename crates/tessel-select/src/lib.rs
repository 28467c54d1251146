#![forbid(unsafe_code)]

//! Multi-signal widget selection for Tessel dashboards.
//!
//! Given a catalog of [`WidgetMeta`] entries, the user's journey [`Stage`]
//! and a [`Signals`] snapshot, [`select_widgets`] returns an ordered subset
//! of at most `max` entries. Ordering is fully deterministic (see [`rank`])
//! and a set of required categories is guaranteed coverage where the catalog
//! allows it. No clock, randomness or I/O is involved.
//!
//! ```
//! use tessel_select::{SelectionRequest, Signals, Stage, WidgetMeta, select_widgets};
//!
//! let registry = vec![
//!     WidgetMeta::new("price_chart").stages([Stage::Explore]).categories(["insight"]),
//!     WidgetMeta::new("learn_card").categories(["learn"]),
//! ];
//! let signals = Signals::new().with_pin("learn_card");
//! let picked = select_widgets(&SelectionRequest::new(Stage::Explore, &signals, &registry));
//! assert_eq!(picked[0].id, "learn_card");
//! ```

pub mod catalog;
pub mod policy;
pub mod rank;
pub mod select;
pub mod signals;

pub use catalog::{Stage, WidgetMeta};
pub use policy::{
    DEFAULT_ALPHA, DEFAULT_BETA, DEFAULT_GAMMA, DEFAULT_MAX, DEFAULT_REQUIRED_CATEGORIES,
    SelectionPolicy, SelectionPolicyError, SelectionWeights,
};
pub use rank::{RankedWidget, compare_ranked, rank_candidates, score};
pub use select::{
    CoverageReplacement, SelectionOutcome, SelectionRequest, select_widgets,
    select_widgets_explained,
};
pub use signals::{Signals, clamp01};
