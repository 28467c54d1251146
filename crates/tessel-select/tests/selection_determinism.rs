//! Determinism and coverage properties of widget selection.
//!
//! Run:
//!   cargo test -p tessel-select --test selection_determinism

use proptest::prelude::*;
use tessel_core::stable_hash::fnv1a32_str;
use tessel_select::{
    SelectionPolicy, SelectionRequest, Signals, Stage, WidgetMeta, rank_candidates,
    select_widgets, select_widgets_explained,
};

fn market(id: &str, priority: f64) -> WidgetMeta {
    WidgetMeta::new(id)
        .stages([Stage::Explore])
        .priority(priority)
        .categories(["market"])
}

#[test]
fn small_max_still_covers_every_required_category() {
    let registry = vec![
        market("chart", 1.0),
        market("ticker", 0.9),
        market("depth", 0.8),
        market("volume", 0.7),
        WidgetMeta::new("tips").priority(0.1).categories(["learn"]),
        WidgetMeta::new("swap").priority(0.2).categories(["action"]),
        WidgetMeta::new("analysis").priority(0.3).categories(["insight"]),
    ];
    let signals = Signals::new();
    let request = SelectionRequest::new(Stage::Explore, &signals, &registry).with_max(4);
    let outcome = select_widgets_explained(&request);

    assert_eq!(outcome.ids(), ["chart", "tips", "swap", "analysis"]);
    assert_eq!(outcome.satisfied, ["insight", "action", "learn"]);
    assert!(outcome.is_fully_covered());
    let removed: Vec<&str> = outcome.replacements.iter().map(|r| r.removed.as_str()).collect();
    assert_eq!(removed, ["volume", "depth", "ticker"]);
}

#[test]
fn pinned_widget_leads_regardless_of_score() {
    let registry = vec![
        market("chart", 1.0),
        WidgetMeta::new("notes").categories(["learn"]),
    ];
    let signals = Signals::new().with_pin("notes");
    let selected = select_widgets(&SelectionRequest::new(Stage::Explore, &signals, &registry));
    assert_eq!(selected[0].id, "notes");
    assert_eq!(selected[1].id, "chart");
}

#[test]
fn identical_entries_order_by_stable_hash() {
    let ids = ["delta", "alpha", "charlie", "bravo", "echo"];
    let registry: Vec<WidgetMeta> = ids.iter().map(|id| market(id, 0.5)).collect();
    let signals = Signals::new();
    let ranked = rank_candidates(&SelectionRequest::new(Stage::Explore, &signals, &registry));

    let mut expected: Vec<&str> = ids.to_vec();
    expected.sort_by_key(|id| (fnv1a32_str(id), *id));
    let actual: Vec<&str> = ranked.iter().map(|r| r.id()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn registry_order_does_not_change_the_result() {
    let mut registry = vec![
        market("chart", 0.4),
        market("ticker", 0.4),
        WidgetMeta::new("tips").categories(["learn"]),
        WidgetMeta::new("swap").priority(0.6).categories(["action"]),
    ];
    let signals = Signals::new().with_dwell("ticker", 0.2);
    let forward = select_widgets(&SelectionRequest::new(Stage::Explore, &signals, &registry));
    registry.reverse();
    let reversed = select_widgets(&SelectionRequest::new(Stage::Explore, &signals, &registry));
    assert_eq!(forward, reversed);
}

#[test]
fn policy_drives_request_defaults() {
    let registry = vec![
        market("chart", 1.0).mobile_friendly(true),
        market("depth", 1.0),
    ];
    let signals = Signals::new();
    let policy = SelectionPolicy::default().with_max(1).with_mobile_only(true);
    let request = SelectionRequest::new(Stage::Explore, &signals, &registry).with_policy(&policy);
    let selected = select_widgets(&request);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id, "chart");
}

const IDS: [&str; 10] = [
    "price_chart",
    "watchlist",
    "portfolio",
    "token_stats",
    "news_feed",
    "learn_card",
    "quick_actions",
    "assistant",
    "notes",
    "swap",
];
const CATEGORIES: [&str; 5] = ["insight", "action", "learn", "market", "social"];

fn arb_meta() -> impl Strategy<Value = WidgetMeta> {
    (
        0..IDS.len(),
        proptest::collection::vec(0..Stage::ALL.len(), 0..3),
        -0.5f64..1.5,
        any::<bool>(),
        proptest::collection::vec(0..CATEGORIES.len(), 0..3),
    )
        .prop_map(|(id, stages, priority, mobile, categories)| {
            WidgetMeta::new(IDS[id])
                .stages(stages.into_iter().map(|i| Stage::ALL[i]))
                .priority(priority)
                .mobile_friendly(mobile)
                .categories(categories.into_iter().map(|i| CATEGORIES[i]))
        })
}

fn arb_signals() -> impl Strategy<Value = Signals> {
    let weights = proptest::collection::btree_map(
        (0..IDS.len()).prop_map(|i| IDS[i].to_string()),
        -0.5f64..1.5,
        0..6,
    );
    (
        proptest::collection::vec((0..IDS.len()).prop_map(|i| IDS[i].to_string()), 0..3),
        weights.clone(),
        weights.clone(),
        weights,
    )
        .prop_map(|(pins, recency, dwell, prompts)| Signals {
            pins,
            recency,
            dwell,
            prompts,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn selection_is_bounded_unique_and_repeatable(
        registry in proptest::collection::vec(arb_meta(), 0..16),
        signals in arb_signals(),
        stage in 0..Stage::ALL.len(),
        max in 0usize..10,
        mobile_only in any::<bool>(),
    ) {
        let request = SelectionRequest::new(Stage::ALL[stage], &signals, &registry)
            .with_max(max)
            .with_mobile_only(mobile_only);
        let outcome = select_widgets_explained(&request);

        prop_assert!(outcome.selected.len() <= max);
        let mut ids = outcome.ids();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), outcome.selected.len());

        for meta in &outcome.selected {
            prop_assert!(registry.iter().any(|m| m.id == meta.id));
            prop_assert!(!mobile_only || meta.mobile_friendly);
        }
        for category in &outcome.satisfied {
            prop_assert!(outcome.selected.iter().any(|m| m.in_category(category)));
        }
        prop_assert_eq!(
            outcome.satisfied.len() + outcome.unsatisfied.len(),
            request.required_categories.len()
        );

        prop_assert_eq!(select_widgets_explained(&request), outcome);
    }

    #[test]
    fn ranking_respects_pin_and_dwell_precedence(
        registry in proptest::collection::vec(arb_meta(), 1..16),
        signals in arb_signals(),
    ) {
        let request = SelectionRequest::new(Stage::Build, &signals, &registry);
        let ranked = rank_candidates(&request);
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.pinned || !b.pinned);
            if a.pinned == b.pinned {
                prop_assert!(a.dwell >= b.dwell);
                if a.dwell == b.dwell {
                    prop_assert!(a.score >= b.score);
                }
            }
        }
    }
}
