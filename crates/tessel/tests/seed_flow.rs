//! Selection → seeding → reducer → persistence, end to end.

use tessel::{
    GridPos, LayoutConfig, LayoutDocument, LayoutEngine, LayoutOperation, ManualClock, SkipReason,
    SelectionRequest, Signals, Stage, WidgetId, WidgetKind, WidgetMeta, deserialize,
    select_and_seed, select_widgets_explained, seed_document, serialize,
};

fn catalog() -> Vec<WidgetMeta> {
    vec![
        WidgetMeta::new("price_chart")
            .stages([Stage::Explore])
            .priority(0.9)
            .categories(["insight"]),
        WidgetMeta::new("watchlist")
            .stages([Stage::Explore])
            .priority(0.8)
            .categories(["insight"]),
        WidgetMeta::new("quick_actions")
            .stages([Stage::Build])
            .priority(0.7)
            .categories(["action"]),
        WidgetMeta::new("learn_card")
            .stages([Stage::Explore])
            .priority(0.5)
            .categories(["learn"]),
        WidgetMeta::new("news_feed")
            .stages([Stage::Explore])
            .priority(0.6)
            .categories(["insight"]),
        WidgetMeta::new("hologram").stages([Stage::Explore]).priority(1.0),
    ]
}

fn engine() -> LayoutEngine<ManualClock> {
    LayoutEngine::with_clock(LayoutConfig::default(), ManualClock::new(1_000))
}

#[test]
fn selection_seeds_an_empty_dashboard() {
    let registry = catalog();
    let signals = Signals::new().with_pin("quick_actions");
    let request = SelectionRequest::new(Stage::Explore, &signals, &registry).with_max(4);

    let selection = select_widgets_explained(&request);
    assert_eq!(
        selection.ids(),
        ["quick_actions", "learn_card", "price_chart", "watchlist"]
    );

    let outcome = seed_document(
        &engine(),
        &LayoutDocument::new("home"),
        &selection.selected,
        &signals,
    );
    assert!(outcome.skipped.is_empty());
    assert_eq!(outcome.added.len(), 4);

    let doc = &outcome.document;
    let placed: Vec<(WidgetKind, GridPos, bool)> = doc
        .widgets
        .iter()
        .map(|w| (w.kind, w.pos, w.pinned))
        .collect();
    assert_eq!(
        placed,
        [
            (WidgetKind::QuickActions, GridPos::new(0, 0), true),
            (WidgetKind::LearnCard, GridPos::new(4, 0), false),
            (WidgetKind::PriceChart, GridPos::new(0, 3), false),
            (WidgetKind::Watchlist, GridPos::new(8, 0), false),
        ]
    );
    assert!(doc.invariant_report(12).is_clean());
}

#[test]
fn select_and_seed_matches_the_two_step_path() {
    let registry = catalog();
    let signals = Signals::new().with_dwell("news_feed", 0.4);
    let request = SelectionRequest::new(Stage::Explore, &signals, &registry);
    let doc = LayoutDocument::new("home");

    let combined = select_and_seed(&engine(), &doc, &request);
    let selection = tessel::select_widgets(&request);
    let manual = seed_document(&engine(), &doc, &selection, &signals);
    assert_eq!(combined, manual);
    assert!(
        combined
            .skipped
            .iter()
            .any(|s| s.catalog_id == "hologram" && s.reason == SkipReason::UnknownKind)
    );
}

#[test]
fn reseeding_adds_nothing() {
    let registry = catalog();
    let signals = Signals::new();
    let request = SelectionRequest::new(Stage::Explore, &signals, &registry);
    let engine = engine();

    let first = select_and_seed(&engine, &LayoutDocument::new("home"), &request);
    let second = select_and_seed(&engine, &first.document, &request);
    assert!(second.added.is_empty());
    assert_eq!(second.document, first.document);
    assert!(
        second
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::AlreadyPresent || s.catalog_id == "hologram")
    );
}

#[test]
fn seeded_dashboard_survives_edits_and_persistence() {
    let registry = catalog();
    let signals = Signals::new();
    let request = SelectionRequest::new(Stage::Explore, &signals, &registry);
    let engine = engine();
    let seeded = select_and_seed(&engine, &LayoutDocument::new("home"), &request).document;

    let first = seeded.widgets[0].id.clone();
    let edited = engine.apply_all(
        &seeded,
        [
            LayoutOperation::Move {
                id: first.clone(),
                to: GridPos::new(7, 1),
            },
            LayoutOperation::TogglePin { id: first.clone() },
        ],
    );
    assert!(edited.invariant_report(12).is_clean());
    assert!(edited.widget(&first).is_some_and(|w| w.pinned));

    let missing = engine.apply_operation(
        &edited,
        LayoutOperation::Remove {
            id: WidgetId::new("missing"),
        },
    );
    assert!(!missing.applied);
    assert_eq!(missing.before_hash, missing.after_hash);
    let last = missing.document;

    let text = serialize(&last).unwrap();
    assert_eq!(deserialize(&text).unwrap(), last);
}
