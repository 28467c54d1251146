//! JSON persistence with lenient loading.
//!
//! [`serialize`] writes the canonical camelCase form. [`deserialize`] accepts
//! anything shaped roughly like a layout document, including documents from
//! older schema versions, and fills gaps with an explicit defaulting pass
//! rather than failing:
//!
//! | missing / malformed | default |
//! |---|---|
//! | document `id` | `"default"` |
//! | `layoutVersion` | 1 (pre-versioning document) |
//! | widget `id` | freshly allocated `w-<n>` |
//! | widget `type` | `unknown` |
//! | `pos` | `{x: 0, y: 0}` (or legacy flat `x`/`y`) |
//! | `size` | the kind's default footprint (or legacy flat `w`/`h`) |
//! | `pinned` | `false` |
//! | `data` | `{}` |
//! | `createdAt` / `updatedAt` | 0 / `createdAt` |
//!
//! Negative or fractional coordinates are floored into range. Both camelCase
//! and snake_case keys are read. The defaulted document then goes through
//! [`repair_document`], so a loaded document always satisfies the layout
//! invariants. Only input that is not a JSON object at all is an error.

use std::fmt;

use serde_json::{Map, Value};
use tessel_core::geometry::{GridPos, GridSize};

use crate::config::LayoutConfig;
use crate::document::{LAYOUT_SCHEMA_VERSION, LayoutDocument};
use crate::repair::{RepairAction, repair_document};
use crate::widget::{Timestamp, Widget, WidgetData, WidgetId, WidgetKind};

/// Errors from [`serialize`] / [`deserialize`].
#[derive(Debug)]
pub enum PersistError {
    /// Input is not JSON, or the document could not be encoded.
    Json(serde_json::Error),
    /// Input is JSON but its top level is not an object.
    NotAnObject,
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "layout JSON error: {e}"),
            Self::NotAnObject => write!(f, "layout document must be a JSON object"),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::NotAnObject => None,
        }
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// What the loader had to fill in or fix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeserializeReport {
    /// Schema version found in the input.
    pub source_version: u16,
    /// Paths of fields that were absent or malformed and got defaults.
    pub defaulted: Vec<String>,
    /// Repairs applied after defaulting.
    pub repairs: Vec<RepairAction>,
    /// Entries that could not be used at all, and other notes.
    pub warnings: Vec<String>,
}

impl DeserializeReport {
    /// True when the input was a complete, valid, current-version document.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.source_version == LAYOUT_SCHEMA_VERSION
            && self.defaulted.is_empty()
            && self.repairs.is_empty()
            && self.warnings.is_empty()
    }
}

/// Encode a document as compact JSON.
pub fn serialize(doc: &LayoutDocument) -> Result<String, PersistError> {
    Ok(serde_json::to_string(doc)?)
}

/// Encode a document as indented JSON.
pub fn serialize_pretty(doc: &LayoutDocument) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Load a document with the default 12-column configuration.
pub fn deserialize(input: &str) -> Result<LayoutDocument, PersistError> {
    deserialize_with_report(input, &LayoutConfig::default()).map(|(doc, _)| doc)
}

/// Load a document and report every default and repair applied.
pub fn deserialize_with_report(
    input: &str,
    config: &LayoutConfig,
) -> Result<(LayoutDocument, DeserializeReport), PersistError> {
    let value: Value = serde_json::from_str(input)?;
    from_value(&value, config)
}

/// Load a document from an already parsed JSON value.
pub fn from_value(
    value: &Value,
    config: &LayoutConfig,
) -> Result<(LayoutDocument, DeserializeReport), PersistError> {
    let Value::Object(root) = value else {
        return Err(PersistError::NotAnObject);
    };
    let mut report = DeserializeReport::default();

    let id = match field(root, &["id"]).and_then(as_text) {
        Some(id) => id,
        None => {
            report.defaulted.push("id".into());
            "default".to_string()
        }
    };

    report.source_version = match field(root, &["layoutVersion", "layout_version"]).and_then(as_u64)
    {
        Some(version) => u16::try_from(version).unwrap_or(u16::MAX),
        None => {
            report.defaulted.push("layoutVersion".into());
            1
        }
    };
    if report.source_version > LAYOUT_SCHEMA_VERSION {
        report.warnings.push(format!(
            "layout version {} is newer than supported {LAYOUT_SCHEMA_VERSION}; loaded leniently",
            report.source_version
        ));
    }

    let next_seq = field(root, &["nextSeq", "next_seq"]).and_then(as_u64);
    if next_seq.is_none() && report.source_version >= LAYOUT_SCHEMA_VERSION {
        report.defaulted.push("nextSeq".into());
    }

    let mut document = LayoutDocument {
        id,
        widgets: Vec::new(),
        layout_version: LAYOUT_SCHEMA_VERSION,
        next_seq: next_seq.unwrap_or(1),
    };

    let entries: &[Value] = match field(root, &["widgets"]) {
        Some(Value::Array(entries)) => entries,
        _ => {
            report.defaulted.push("widgets".into());
            &[]
        }
    };

    let mut pending_ids = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let Value::Object(raw) = entry else {
            report
                .warnings
                .push(format!("widgets[{index}] is not an object; skipped"));
            continue;
        };
        let (widget, has_id) = default_widget(raw, index, &mut report.defaulted);
        if !has_id {
            pending_ids.push(document.widgets.len());
        }
        document.widgets.push(widget);
    }

    // Allocate missing ids only after every explicit id is known.
    let highest = document
        .widgets
        .iter()
        .filter_map(|w| w.id.seq())
        .max()
        .unwrap_or(0);
    document.next_seq = document.next_seq.max(highest.saturating_add(1));
    for slot in pending_ids {
        document.widgets[slot].id = document.allocate_id();
    }

    let outcome = repair_document(&document, config);
    report.repairs = outcome.actions;

    if !report.defaulted.is_empty() || !report.warnings.is_empty() {
        tracing::debug!(
            document = %outcome.document.id,
            source_version = report.source_version,
            defaulted = report.defaulted.len(),
            warnings = report.warnings.len(),
            "layout document loaded with defaults"
        );
    }

    Ok((outcome.document, report))
}

/// Build one widget from a raw JSON object. Returns whether an id was found.
fn default_widget(raw: &Map<String, Value>, index: usize, defaulted: &mut Vec<String>) -> (Widget, bool) {
    let mut note = |name: &str| defaulted.push(format!("widgets[{index}].{name}"));

    let id = field(raw, &["id"]).and_then(as_text);
    if id.is_none() {
        note("id");
    }

    let kind = match field(raw, &["type", "kind"]).and_then(Value::as_str) {
        Some(tag) => WidgetKind::from_tag(tag),
        None => {
            note("type");
            WidgetKind::Unknown
        }
    };

    let title = field(raw, &["title"]).and_then(Value::as_str).map(str::to_owned);

    let pos = match field(raw, &["pos", "position"]) {
        Some(Value::Object(pos)) => {
            let x = field(pos, &["x"]).and_then(as_cell);
            let y = field(pos, &["y"]).and_then(as_cell);
            if x.is_none() || y.is_none() {
                note("pos");
            }
            GridPos::new(x.unwrap_or(0), y.unwrap_or(0))
        }
        _ => match (field(raw, &["x"]).and_then(as_cell), field(raw, &["y"]).and_then(as_cell)) {
            (Some(x), Some(y)) => GridPos::new(x, y),
            (x, y) => {
                note("pos");
                GridPos::new(x.unwrap_or(0), y.unwrap_or(0))
            }
        },
    };

    let fallback = kind.default_size();
    let size = match field(raw, &["size"]) {
        Some(Value::Object(size)) => {
            let w = field(size, &["w", "width"]).and_then(as_cell);
            let h = field(size, &["h", "height"]).and_then(as_cell);
            if w.is_none() || h.is_none() {
                note("size");
            }
            GridSize::new(w.unwrap_or(fallback.w), h.unwrap_or(fallback.h))
        }
        _ => match (field(raw, &["w"]).and_then(as_cell), field(raw, &["h"]).and_then(as_cell)) {
            (Some(w), Some(h)) => GridSize::new(w, h),
            (w, h) => {
                note("size");
                GridSize::new(w.unwrap_or(fallback.w), h.unwrap_or(fallback.h))
            }
        },
    };

    let pinned = match field(raw, &["pinned"]) {
        Some(Value::Bool(pinned)) => *pinned,
        Some(_) => {
            note("pinned");
            false
        }
        None => false,
    };

    let data = match field(raw, &["data"]) {
        Some(Value::Object(data)) => data.clone(),
        Some(Value::Null) | None => WidgetData::new(),
        Some(_) => {
            note("data");
            WidgetData::new()
        }
    };

    let created_at: Timestamp = match field(raw, &["createdAt", "created_at"]).and_then(as_u64) {
        Some(ts) => ts,
        None => {
            note("createdAt");
            0
        }
    };
    let updated_at = match field(raw, &["updatedAt", "updated_at"]).and_then(as_u64) {
        Some(ts) => ts,
        None => {
            note("updatedAt");
            created_at
        }
    };

    let has_id = id.is_some();
    let widget = Widget {
        id: id.map_or_else(|| WidgetId::new(""), WidgetId::new),
        kind,
        title,
        pos,
        size,
        pinned,
        data,
        created_at,
        updated_at,
    };
    (widget, has_id)
}

fn field<'a>(object: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| object.get(*name))
}

/// Strings as-is; numbers rendered (legacy numeric ids).
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Non-negative whole number, flooring fractions and clamping negatives.
fn as_u64(value: &Value) -> Option<u64> {
    let number = match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Some(u);
            }
            n.as_f64()?
        }
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    // `as` saturates and maps NaN to 0.
    Some(number.floor().max(0.0) as u64)
}

fn as_cell(value: &Value) -> Option<u32> {
    as_u64(value).map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}
