#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tessel_layout::{
    CollisionPolicy, GridPos, GridSize, LayoutConfig, LayoutDocument, LayoutEngine,
    LayoutOperation, ManualClock, NewWidget, WidgetData, WidgetId, WidgetKind,
};

#[derive(Debug, Arbitrary)]
struct Input {
    push_down: bool,
    cols: u8,
    ops: Vec<Op>,
}

#[derive(Debug, Arbitrary)]
enum Op {
    Add {
        kind: u8,
        size: Option<(u8, u8)>,
        at: Option<(u8, u8)>,
    },
    Move { target: u8, x: u8, y: u8, high: bool },
    Resize { target: u8, w: u8, h: u8 },
    Remove { target: u8 },
    TogglePin { target: u8 },
    Upsert { target: u8, key: u8, value: u32 },
}

fn target(doc: &LayoutDocument, index: u8) -> WidgetId {
    // Indices past the end address an id that does not exist.
    doc.widgets
        .get(usize::from(index))
        .map_or_else(|| WidgetId::new("absent"), |w| w.id.clone())
}

fn to_operation(doc: &LayoutDocument, op: Op) -> LayoutOperation {
    match op {
        Op::Add { kind, size, at } => {
            let kind = WidgetKind::ALL[usize::from(kind) % WidgetKind::ALL.len()];
            let mut widget = NewWidget::new(kind);
            if let Some((w, h)) = size {
                widget = widget.size(GridSize::new(u32::from(w % 32), u32::from(h % 16)));
            }
            if let Some((x, y)) = at {
                widget = widget.at(GridPos::new(u32::from(x), u32::from(y)));
            }
            LayoutOperation::Add { widget }
        }
        Op::Move { target: t, x, y, high } => {
            // `high` measures the row from the bottom of the coordinate space.
            let y = if high { u32::MAX - u32::from(y) } else { u32::from(y) };
            LayoutOperation::Move {
                id: target(doc, t),
                to: GridPos::new(u32::from(x), y),
            }
        }
        Op::Resize { target: t, w, h } => LayoutOperation::Resize {
            id: target(doc, t),
            size: GridSize::new(u32::from(w % 32), u32::from(h % 16)),
        },
        Op::Remove { target: t } => LayoutOperation::Remove { id: target(doc, t) },
        Op::TogglePin { target: t } => LayoutOperation::TogglePin { id: target(doc, t) },
        Op::Upsert { target: t, key, value } => {
            let mut data = WidgetData::new();
            let _ = data.insert(format!("k{}", key % 4), serde_json::Value::from(value));
            LayoutOperation::UpsertData {
                id: target(doc, t),
                data,
            }
        }
    }
}

fuzz_target!(|input: Input| {
    let policy = if input.push_down {
        CollisionPolicy::PushDown
    } else {
        CollisionPolicy::RelocateMover
    };
    let config = LayoutConfig::default()
        .with_cols(u32::from(input.cols % 24).max(1))
        .with_collision_policy(policy)
        .with_max_scan_rows(256);
    let cols = config.effective_cols();
    let engine = LayoutEngine::with_clock(config, ManualClock::new(0));

    let mut doc = LayoutDocument::new("fuzz");
    for op in input.ops.into_iter().take(128) {
        let operation = to_operation(&doc, op);
        let before = doc.clone();
        let outcome = engine.apply_operation(&doc, operation);

        assert_eq!(doc, before, "input document mutated");
        if !outcome.applied {
            assert_eq!(outcome.document, doc, "no-op changed the document");
        }
        let report = outcome.document.invariant_report(cols);
        assert!(report.is_clean(), "invariant violations: {:?}", report.issues);

        engine.clock().advance(1);
        doc = outcome.document;
    }
});
