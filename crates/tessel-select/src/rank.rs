//! Candidate scoring and the deterministic ranking order.
//!
//! # Ordering
//!
//! 1. pinned entries before unpinned ones, regardless of score;
//! 2. higher (clamped) dwell first;
//! 3. higher score first;
//! 4. ascending FNV-1a 32-bit hash of the id;
//! 5. ascending id, so the order stays total under hash collisions.
//!
//! Floats are compared with `total_cmp`, which keeps the order total even
//! for non-finite weights.

use std::cmp::Ordering;

use rustc_hash::FxHashSet;
use tessel_core::stable_hash::fnv1a32_str;

use crate::catalog::{Stage, WidgetMeta};
use crate::policy::SelectionWeights;
use crate::select::SelectionRequest;
use crate::signals::{Signals, clamp01};

/// One scored candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedWidget<'a> {
    pub meta: &'a WidgetMeta,
    pub score: f64,
    pub pinned: bool,
    pub dwell: f64,
    pub tie_hash: u32,
}

impl RankedWidget<'_> {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.meta.id
    }
}

/// `stage_fit * alpha + signal * beta + clamp01(priority) * gamma`.
#[must_use]
pub fn score(meta: &WidgetMeta, stage: Stage, signals: &Signals, weights: SelectionWeights) -> f64 {
    let stage_fit = if meta.fits_stage(stage) { 1.0 } else { 0.0 };
    stage_fit * weights.alpha
        + signals.signal_score(&meta.id) * weights.beta
        + clamp01(meta.priority) * weights.gamma
}

/// Total order used for selection.
#[must_use]
pub fn compare_ranked(a: &RankedWidget<'_>, b: &RankedWidget<'_>) -> Ordering {
    b.pinned
        .cmp(&a.pinned)
        .then_with(|| b.dwell.total_cmp(&a.dwell))
        .then_with(|| b.score.total_cmp(&a.score))
        .then_with(|| a.tie_hash.cmp(&b.tie_hash))
        .then_with(|| a.meta.id.cmp(&b.meta.id))
}

/// Score and order every candidate in the request's registry.
///
/// Duplicate ids keep their first occurrence. With `mobile_only` set, entries
/// that are not mobile friendly are dropped before scoring.
#[must_use]
pub fn rank_candidates<'a>(request: &SelectionRequest<'a>) -> Vec<RankedWidget<'a>> {
    let mut seen = FxHashSet::default();
    let mut ranked: Vec<RankedWidget<'a>> = request
        .registry
        .iter()
        .filter(|&meta| !request.mobile_only || meta.mobile_friendly)
        .filter(|&meta| seen.insert(meta.id.as_str()))
        .map(|meta| RankedWidget {
            meta,
            score: score(meta, request.stage, request.signals, request.weights),
            pinned: request.signals.is_pinned(&meta.id),
            dwell: request.signals.dwell(&meta.id),
            tie_hash: fnv1a32_str(&meta.id),
        })
        .collect();
    ranked.sort_by(compare_ranked);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<'a>(ranked: &'a [RankedWidget<'_>]) -> Vec<&'a str> {
        ranked.iter().map(RankedWidget::id).collect()
    }

    #[test]
    fn score_blends_stage_signal_and_priority() {
        let meta = WidgetMeta::new("chart").stages([Stage::Explore]).priority(0.5);
        let signals = Signals::new().with_recency("chart", 1.0);
        let weights = SelectionWeights::default();
        let expected = 0.6 + 0.6 * 0.3 + 0.5 * 0.1;
        assert!((score(&meta, Stage::Explore, &signals, weights) - expected).abs() < 1e-12);
        let off_stage = 0.6 * 0.3 + 0.5 * 0.1;
        assert!((score(&meta, Stage::Operate, &signals, weights) - off_stage).abs() < 1e-12);
    }

    #[test]
    fn priority_is_clamped() {
        let signals = Signals::new();
        let weights = SelectionWeights::default();
        let high = WidgetMeta::new("a").priority(40.0);
        let nan = WidgetMeta::new("b").priority(f64::NAN);
        assert!((score(&high, Stage::Build, &signals, weights) - 0.1).abs() < 1e-12);
        assert_eq!(score(&nan, Stage::Build, &signals, weights), 0.0);
    }

    #[test]
    fn pinned_beats_dwell_beats_score() {
        let registry = vec![
            WidgetMeta::new("top").stages([Stage::Build]).priority(1.0),
            WidgetMeta::new("dwelled"),
            WidgetMeta::new("pinned"),
        ];
        let signals = Signals::new().with_pin("pinned").with_dwell("dwelled", 0.9);
        let request = SelectionRequest::new(Stage::Build, &signals, &registry);
        let ranked = rank_candidates(&request);
        assert_eq!(ids(&ranked), ["pinned", "dwelled", "top"]);
    }

    #[test]
    fn negative_zero_dwell_ties_with_no_dwell() {
        let registry = vec![
            WidgetMeta::new("a"),
            WidgetMeta::new("b").stages([Stage::Explore]),
        ];
        let signals: Signals = serde_json::from_str(r#"{"dwell":{"b":-0.0}}"#).unwrap();
        assert!(signals.dwell.get("b").is_some_and(|d| d.is_sign_negative()));

        let ranked = rank_candidates(&SelectionRequest::new(Stage::Explore, &signals, &registry));
        assert_eq!(ids(&ranked), ["b", "a"]);
        assert_eq!(compare_ranked(&ranked[0], &ranked[1]), Ordering::Less);
        assert!(ranked.iter().all(|r| r.dwell.is_sign_positive()));
    }

    #[test]
    fn equal_scores_order_by_id_hash() {
        let registry = vec![WidgetMeta::new("alpha"), WidgetMeta::new("beta"), WidgetMeta::new("gamma")];
        let signals = Signals::new();
        let ranked = rank_candidates(&SelectionRequest::new(Stage::Explore, &signals, &registry));
        let hashes: Vec<u32> = ranked.iter().map(|r| r.tie_hash).collect();
        let mut sorted = hashes.clone();
        sorted.sort_unstable();
        assert_eq!(hashes, sorted);
        assert_eq!(ranked[0].tie_hash, fnv1a32_str(ranked[0].id()));
    }

    #[test]
    fn duplicates_keep_first_and_mobile_filter_applies() {
        let registry = vec![
            WidgetMeta::new("chart").priority(0.2).mobile_friendly(true),
            WidgetMeta::new("chart").priority(0.9).mobile_friendly(true),
            WidgetMeta::new("depth").priority(1.0),
        ];
        let signals = Signals::new();
        let request = SelectionRequest::new(Stage::Explore, &signals, &registry);
        let ranked = rank_candidates(&request);
        assert_eq!(ranked.len(), 2);
        let chart = ranked.iter().find(|r| r.id() == "chart").unwrap();
        assert_eq!(chart.meta.priority, 0.2);

        let mobile = rank_candidates(&request.clone().with_mobile_only(true));
        assert_eq!(ids(&mobile), ["chart"]);
    }
}
