//! Top-`max` selection with required-category coverage.

use serde::Serialize;

use crate::catalog::{Stage, WidgetMeta};
use crate::policy::{SelectionPolicy, SelectionWeights};
use crate::rank::{RankedWidget, rank_candidates};
use crate::signals::Signals;

/// Inputs for one selection run.
///
/// `signals` and `registry` are borrowed; everything else comes from a
/// [`SelectionPolicy`] (the default one unless [`Self::with_policy`] is used).
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRequest<'a> {
    pub stage: Stage,
    pub signals: &'a Signals,
    pub registry: &'a [WidgetMeta],
    pub weights: SelectionWeights,
    pub max: usize,
    pub required_categories: Vec<String>,
    pub mobile_only: bool,
}

impl<'a> SelectionRequest<'a> {
    pub fn new(stage: Stage, signals: &'a Signals, registry: &'a [WidgetMeta]) -> Self {
        Self::from_policy(stage, signals, registry, &SelectionPolicy::default())
    }

    pub fn from_policy(
        stage: Stage,
        signals: &'a Signals,
        registry: &'a [WidgetMeta],
        policy: &SelectionPolicy,
    ) -> Self {
        Self {
            stage,
            signals,
            registry,
            weights: policy.weights,
            max: policy.max,
            required_categories: policy.required_categories.clone(),
            mobile_only: policy.mobile_only,
        }
    }

    #[must_use]
    pub fn with_policy(self, policy: &SelectionPolicy) -> Self {
        Self::from_policy(self.stage, self.signals, self.registry, policy)
    }

    #[must_use]
    pub fn with_weights(mut self, weights: SelectionWeights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    #[must_use]
    pub fn with_required_categories<S: Into<String>>(
        mut self,
        categories: impl IntoIterator<Item = S>,
    ) -> Self {
        self.required_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_mobile_only(mut self, mobile_only: bool) -> Self {
        self.mobile_only = mobile_only;
        self
    }
}

/// A coverage swap: `added` took slot `slot` from `removed` to cover `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageReplacement {
    pub category: String,
    pub slot: usize,
    pub removed: String,
    pub added: String,
}

/// Selection result with the coverage bookkeeping that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionOutcome {
    pub selected: Vec<WidgetMeta>,
    /// Required categories present in `selected`, in request order.
    pub satisfied: Vec<String>,
    /// Required categories no candidate or free slot could cover.
    pub unsatisfied: Vec<String>,
    pub replacements: Vec<CoverageReplacement>,
}

impl SelectionOutcome {
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.selected.iter().map(|meta| meta.id.as_str()).collect()
    }

    #[must_use]
    pub fn is_fully_covered(&self) -> bool {
        self.unsatisfied.is_empty()
    }
}

/// Ordered subset of the registry for the request's stage and signals.
#[must_use]
pub fn select_widgets(request: &SelectionRequest<'_>) -> Vec<WidgetMeta> {
    select_widgets_explained(request).selected
}

/// Like [`select_widgets`], also reporting category coverage.
///
/// After the top-`max` cut, each required category missing from the
/// selection is covered by the highest-scoring candidate not yet included
/// that offers it. That candidate takes the slot of the last included entry
/// belonging to no required category. With no such slot, or no such
/// candidate, the category stays unsatisfied.
#[must_use]
pub fn select_widgets_explained(request: &SelectionRequest<'_>) -> SelectionOutcome {
    let span = tracing::debug_span!(
        "tessel.select",
        stage = %request.stage,
        candidates = request.registry.len()
    );
    let _guard = span.enter();

    let ranked = rank_candidates(request);
    let mut selected: Vec<&RankedWidget<'_>> = ranked.iter().take(request.max).collect();

    let mut required: Vec<String> = Vec::with_capacity(request.required_categories.len());
    for category in &request.required_categories {
        if !required.contains(category) {
            required.push(category.clone());
        }
    }

    let mut outcome = SelectionOutcome::default();
    for category in &required {
        if selected.iter().any(|r| r.meta.in_category(category)) {
            outcome.satisfied.push(category.clone());
            continue;
        }

        let Some(candidate) = best_candidate(&ranked, &selected, category) else {
            tracing::debug!(category = %category, "no candidate offers required category");
            outcome.unsatisfied.push(category.clone());
            continue;
        };
        let Some(slot) = selected.iter().rposition(|r| !r.meta.in_any(&required)) else {
            tracing::debug!(category = %category, "no replaceable slot for required category");
            outcome.unsatisfied.push(category.clone());
            continue;
        };

        tracing::debug!(
            category = %category,
            slot,
            removed = %selected[slot].id(),
            added = %candidate.id(),
            "coverage replacement"
        );
        outcome.replacements.push(CoverageReplacement {
            category: category.clone(),
            slot,
            removed: selected[slot].id().to_string(),
            added: candidate.id().to_string(),
        });
        selected[slot] = candidate;
        outcome.satisfied.push(category.clone());
    }

    outcome.selected = selected.iter().map(|r| r.meta.clone()).collect();
    outcome
}

/// Highest-scoring excluded candidate in `category`; ranking order breaks ties.
fn best_candidate<'r, 'a>(
    ranked: &'r [RankedWidget<'a>],
    selected: &[&RankedWidget<'a>],
    category: &str,
) -> Option<&'r RankedWidget<'a>> {
    let mut best: Option<&'r RankedWidget<'a>> = None;
    for candidate in ranked {
        if !candidate.meta.in_category(category)
            || selected.iter().any(|s| s.id() == candidate.id())
        {
            continue;
        }
        if best.is_none_or(|b| candidate.score.total_cmp(&b.score).is_gt()) {
            best = Some(candidate);
        }
    }
    best
}
