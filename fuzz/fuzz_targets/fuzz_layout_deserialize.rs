#![no_main]

use libfuzzer_sys::fuzz_target;
use tessel_layout::{DEFAULT_COLS, LayoutConfig, deserialize_with_report, serialize};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Any JSON object must load into a valid document.
    let Ok((doc, _report)) = deserialize_with_report(text, &LayoutConfig::default()) else {
        return;
    };
    let report = doc.invariant_report(DEFAULT_COLS);
    assert!(report.is_clean(), "loaded document invalid: {:?}", report.issues);

    // A loaded document re-serializes and loads back with the same geometry.
    let Ok(json) = serialize(&doc) else {
        return;
    };
    let reloaded = tessel_layout::deserialize(&json).expect("serialized document reloads");
    assert_eq!(reloaded.rects(), doc.rects());
    assert_eq!(reloaded.next_seq, doc.next_seq);
});
