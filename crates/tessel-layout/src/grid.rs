//! Grid placement and collision resolution.
//!
//! The grid has a fixed number of columns and unbounded rows. All functions
//! here are pure and total: they take rectangles by reference and return new
//! positions.
//!
//! # Placement
//!
//! [`next_non_overlapping_pos`] is a skyline scan: rows top to bottom, and
//! within a row columns left to right, returning the first slot whose
//! rectangle overlaps nothing. The result depends only on the inputs, which
//! keeps layouts reproducible.
//!
//! # Collisions
//!
//! When a move or resize lands on occupied cells, [`resolve_collision`]
//! applies one of two policies:
//!
//! - [`CollisionPolicy::RelocateMover`]: the moved widget yields and is
//!   re-placed by the skyline scan over every other widget. Nobody else moves.
//! - [`CollisionPolicy::PushDown`]: the moved widget keeps its slot and any
//!   widget it lands on is nudged down one row at a time, cascading, until the
//!   layout is overlap-free.

use serde::{Deserialize, Serialize};
use tessel_core::geometry::{GridPos, GridRect, GridSize};

/// Default number of grid columns.
pub const DEFAULT_COLS: u32 = 12;

/// Default row bound for the skyline scan.
pub const DEFAULT_MAX_SCAN_ROWS: u32 = 1_000;

/// Default total row-nudge budget for push-down resolution.
pub const DEFAULT_PUSH_DOWN_ITERATIONS: u32 = 10_000;

/// How a move/resize that lands on occupied cells is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The moved widget is re-placed at the first free slot; others hold still.
    #[default]
    RelocateMover,
    /// The moved widget keeps its slot; intruded widgets are pushed down.
    PushDown,
}

/// Search bounds for placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementLimits {
    pub max_scan_rows: u32,
    pub push_down_iterations: u32,
}

impl Default for PlacementLimits {
    fn default() -> Self {
        Self {
            max_scan_rows: DEFAULT_MAX_SCAN_ROWS,
            push_down_iterations: DEFAULT_PUSH_DOWN_ITERATIONS,
        }
    }
}

/// Clamp a position so a widget of `size` stays inside `cols` columns.
///
/// `x` lands in `[0, cols - size.w]`; when the widget is at least as wide as
/// the grid the only legal column is 0. Rows are unbounded except that the
/// bottom edge must fit in a `u32`.
#[inline]
#[must_use]
pub fn clamp_to_grid(pos: GridPos, size: GridSize, cols: u32) -> GridPos {
    let max_x = cols.saturating_sub(size.w);
    GridPos::new(pos.x.min(max_x), pos.y.min(last_row(size)))
}

/// Lowest top row at which a widget of `size` still ends within `u32`.
#[inline]
fn last_row(size: GridSize) -> u32 {
    u32::MAX.saturating_sub(size.h)
}

/// Half-open overlap test; touching edges do not overlap.
#[inline]
#[must_use]
pub fn rects_overlap(a: &GridRect, b: &GridRect) -> bool {
    a.overlaps(b)
}

/// Whether `candidate` overlaps any rectangle in `existing`.
#[inline]
#[must_use]
pub fn overlaps_any(candidate: &GridRect, existing: &[GridRect]) -> bool {
    existing.iter().any(|other| candidate.overlaps(other))
}

/// First free slot for `size`, scanning rows top-down and columns
/// left-to-right, bounded by [`DEFAULT_MAX_SCAN_ROWS`].
#[must_use]
pub fn next_non_overlapping_pos(existing: &[GridRect], size: GridSize, cols: u32) -> GridPos {
    next_non_overlapping_pos_with_cap(existing, size, cols, DEFAULT_MAX_SCAN_ROWS)
}

/// Skyline scan with an explicit row cap.
///
/// Rows at or below the lowest existing bottom edge are always free, so the
/// scan stops there. If that edge lies beyond `max_rows` the scan gives up at
/// the cap and falls back to column 0 of the first row below everything,
/// which keeps the result overlap-free. When nothing fits below that edge
/// before the last representable row, the scan resumes past the cap instead.
#[must_use]
pub fn next_non_overlapping_pos_with_cap(
    existing: &[GridRect],
    size: GridSize,
    cols: u32,
    max_rows: u32,
) -> GridPos {
    let floor = existing.iter().map(GridRect::bottom_exact).max().unwrap_or(0);
    let last_x = cols.saturating_sub(size.w);
    let last_y = last_row(size);
    let scan_end = u32::try_from(floor).map_or(max_rows, |floor| floor.min(max_rows));

    if let Some(pos) = scan_rows(existing, size, last_x, 0, scan_end) {
        return pos;
    }

    match u32::try_from(floor) {
        Ok(floor) if floor <= last_y => {
            if floor > max_rows {
                tracing::warn!(
                    max_rows,
                    floor,
                    w = size.w,
                    h = size.h,
                    "skyline scan hit row cap; placing below existing layout"
                );
            }
            return GridPos::new(0, floor);
        }
        _ => {}
    }

    tracing::warn!(
        max_rows,
        floor,
        w = size.w,
        h = size.h,
        "no room below existing layout; scanning past row cap"
    );
    scan_rows(existing, size, last_x, scan_end, last_y.saturating_add(1))
        .unwrap_or(GridPos::new(0, last_y))
}

/// First free slot in rows `from..to`, columns `0..=last_x`.
fn scan_rows(
    existing: &[GridRect],
    size: GridSize,
    last_x: u32,
    from: u32,
    to: u32,
) -> Option<GridPos> {
    (from..to).find_map(|y| {
        (0..=last_x)
            .map(|x| GridPos::new(x, y))
            .find(|pos| !overlaps_any(&GridRect::from_parts(*pos, size), existing))
    })
}

/// Result of resolving one move/resize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Final position of the moved widget.
    pub mover: GridPos,
    /// New positions for other widgets, as `(index into others, pos)`.
    pub displaced: Vec<(usize, GridPos)>,
}

impl Placement {
    /// Whether the mover ended up somewhere other than `requested`.
    #[must_use]
    pub fn relocated_from(&self, requested: GridPos) -> bool {
        self.mover != requested
    }
}

/// Resolve a requested (already clamped) rectangle against the other widgets.
///
/// `others` must be overlap-free among themselves; the result is overlap-free
/// including the mover.
#[must_use]
pub fn resolve_collision(
    others: &[GridRect],
    requested: GridRect,
    cols: u32,
    policy: CollisionPolicy,
    limits: PlacementLimits,
) -> Placement {
    if !overlaps_any(&requested, others) {
        return Placement {
            mover: requested.pos(),
            displaced: Vec::new(),
        };
    }
    let size = GridSize::new(requested.w, requested.h);
    match policy {
        CollisionPolicy::RelocateMover => Placement {
            mover: next_non_overlapping_pos_with_cap(others, size, cols, limits.max_scan_rows),
            displaced: Vec::new(),
        },
        CollisionPolicy::PushDown => Placement {
            mover: requested.pos(),
            displaced: push_down(others, requested, cols, limits),
        },
    }
}

/// Push intruded widgets down until nothing overlaps.
///
/// Widgets settle in `(y, x, index)` order against the mover and everything
/// settled before them, moving one row per step. Once the shared step budget
/// is spent, or a widget would be pushed past the last row, remaining
/// offenders are re-placed by the skyline scan instead.
fn push_down(
    others: &[GridRect],
    mover: GridRect,
    cols: u32,
    limits: PlacementLimits,
) -> Vec<(usize, GridPos)> {
    let mut order: Vec<usize> = (0..others.len()).collect();
    order.sort_by_key(|&i| (others[i].y, others[i].x, i));

    let mut settled = Vec::with_capacity(others.len() + 1);
    settled.push(mover);
    let mut budget = limits.push_down_iterations;
    let mut exhausted = false;
    let mut displaced = Vec::new();

    for index in order {
        let original = others[index];
        let mut rect = original;
        while overlaps_any(&rect, &settled) {
            let at_last_row = rect.y >= last_row(GridSize::new(rect.w, rect.h));
            if budget == 0 || at_last_row {
                if budget == 0 && !exhausted {
                    tracing::warn!(
                        iterations = limits.push_down_iterations,
                        "push-down budget exhausted; re-placing remaining widgets"
                    );
                    exhausted = true;
                }
                let size = GridSize::new(rect.w, rect.h);
                let pos = next_non_overlapping_pos_with_cap(
                    &settled,
                    size,
                    cols,
                    limits.max_scan_rows,
                );
                rect = GridRect::from_parts(pos, size);
                break;
            }
            budget -= 1;
            rect.y += 1;
        }
        if rect != original {
            displaced.push((index, rect.pos()));
        }
        settled.push(rect);
    }

    displaced.sort_by_key(|&(index, _)| index);
    displaced
}
