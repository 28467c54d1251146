#![forbid(unsafe_code)]

//! Grid geometry primitives.
//!
//! All coordinates are whole cells on a column-bounded, row-unbounded grid
//! (origin at top-left). Coordinates are unsigned, so negative geometry cannot
//! be represented; callers feeding untrusted numbers clamp before building
//! these values.

use serde::{Deserialize, Serialize};

/// Cell position of a widget's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    /// Column (0-indexed).
    pub x: u32,
    /// Row (0-indexed).
    pub y: u32,
}

impl GridPos {
    /// Grid origin.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a new position.
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for GridPos {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x, y)
    }
}

/// Widget footprint in cells.
///
/// Both spans are at least one cell; [`GridSize::new`] lifts zero to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    /// Width in columns.
    pub w: u32,
    /// Height in rows.
    pub h: u32,
}

impl GridSize {
    /// Smallest legal footprint.
    pub const UNIT: Self = Self { w: 1, h: 1 };

    /// Create a new size, lifting zero spans to one cell.
    #[inline]
    pub const fn new(w: u32, h: u32) -> Self {
        Self {
            w: if w == 0 { 1 } else { w },
            h: if h == 0 { 1 } else { h },
        }
    }

    /// Component-wise maximum with another size.
    #[inline]
    #[must_use]
    pub const fn max(self, other: Self) -> Self {
        Self {
            w: if self.w > other.w { self.w } else { other.w },
            h: if self.h > other.h { self.h } else { other.h },
        }
    }

    /// Area in cells.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::UNIT
    }
}

impl From<(u32, u32)> for GridSize {
    fn from((w, h): (u32, u32)) -> Self {
        Self::new(w, h)
    }
}

/// Derived rectangle used for overlap testing. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridRect {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    /// Width in cells.
    pub w: u32,
    /// Height in cells.
    pub h: u32,
}

impl GridRect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Build from a position and footprint.
    #[inline]
    pub const fn from_parts(pos: GridPos, size: GridSize) -> Self {
        Self::new(pos.x, pos.y, size.w, size.h)
    }

    /// Top-left corner.
    #[inline]
    pub const fn pos(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }

    /// Right edge (exclusive), saturating at `u32::MAX`.
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Bottom edge (exclusive), saturating at `u32::MAX`.
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Right edge (exclusive) without saturation.
    #[inline]
    pub const fn right_exact(&self) -> u64 {
        self.x as u64 + self.w as u64
    }

    /// Bottom edge (exclusive) without saturation.
    #[inline]
    pub const fn bottom_exact(&self) -> u64 {
        self.y as u64 + self.h as u64
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Check if a cell is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x
            && (x as u64) < self.right_exact()
            && y >= self.y
            && (y as u64) < self.bottom_exact()
    }

    /// Half-open overlap test. Rectangles that only touch along an edge do
    /// not overlap. Edges are compared in `u64`, so rectangles reaching past
    /// `u32::MAX` keep their full extent.
    #[inline]
    pub const fn overlaps(&self, other: &GridRect) -> bool {
        (self.x as u64) < other.right_exact()
            && self.right_exact() > other.x as u64
            && (self.y as u64) < other.bottom_exact()
            && self.bottom_exact() > other.y as u64
    }
}
