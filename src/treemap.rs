//!
//! Squarified treemap layout
//! -------------------------
//! Places one rectangle per hierarchy member on a fixed canvas so that each
//! rectangle's area is proportional to the member's total, while keeping aspect
//! ratios close to 1 (Bruls, Huizing, van Wijk). Rows are laid along the shorter
//! side of the remaining free space, growing while the worst aspect ratio improves.

use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::storage::HierarchyTotal;

/// Side length of the square canvas the chart is drawn on.
pub const CANVAS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
}

/// One laid-out hierarchy member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapTile {
    pub label: String,
    pub value: f64,
    /// Fraction of the grand total, 0..=1.
    pub share: f64,
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Scale sizes so they sum to the area `dx * dy`.
pub fn normalize_sizes(sizes: &[f64], dx: f64, dy: f64) -> Vec<f64> {
    let total: f64 = sizes.iter().sum();
    let area = dx * dy;
    sizes.iter().map(|s| s * area / total).collect()
}

fn layout_row(sizes: &[f64], x: f64, y: f64, dy: f64) -> Vec<Rect> {
    let width = sizes.iter().sum::<f64>() / dy;
    let mut y = y;
    sizes
        .iter()
        .map(|s| {
            let r = Rect { x, y, dx: width, dy: s / width };
            y += s / width;
            r
        })
        .collect()
}

fn layout_col(sizes: &[f64], x: f64, y: f64, dx: f64) -> Vec<Rect> {
    let height = sizes.iter().sum::<f64>() / dx;
    let mut x = x;
    sizes
        .iter()
        .map(|s| {
            let r = Rect { x, y, dx: s / height, dy: height };
            x += s / height;
            r
        })
        .collect()
}

fn layout(sizes: &[f64], free: Rect) -> Vec<Rect> {
    if free.dx >= free.dy { layout_row(sizes, free.x, free.y, free.dy) } else { layout_col(sizes, free.x, free.y, free.dx) }
}

fn leftover(sizes: &[f64], free: Rect) -> Rect {
    let covered: f64 = sizes.iter().sum();
    if free.dx >= free.dy {
        let width = covered / free.dy;
        Rect { x: free.x + width, y: free.y, dx: free.dx - width, dy: free.dy }
    } else {
        let height = covered / free.dx;
        Rect { x: free.x, y: free.y + height, dx: free.dx, dy: free.dy - height }
    }
}

fn worst_ratio(sizes: &[f64], free: Rect) -> f64 {
    layout(sizes, free)
        .iter()
        .map(|r| (r.dx / r.dy).max(r.dy / r.dx))
        .fold(0.0, f64::max)
}

/// Lay out already-normalized, strictly positive sizes (largest first) inside
/// the rectangle `(x, y, dx, dy)`. Returns one rectangle per size, in order.
pub fn squarify(sizes: &[f64], x: f64, y: f64, dx: f64, dy: f64) -> Vec<Rect> {
    let mut out = Vec::with_capacity(sizes.len());
    let mut free = Rect { x, y, dx, dy };
    let mut rest = sizes;
    while !rest.is_empty() {
        if rest.len() == 1 {
            out.extend(layout(rest, free));
            break;
        }
        let mut i = 1;
        while i < rest.len() && worst_ratio(&rest[..i], free) >= worst_ratio(&rest[..i + 1], free) {
            i += 1;
        }
        let (current, remaining) = rest.split_at(i);
        out.extend(layout(current, free));
        free = leftover(current, free);
        rest = remaining;
    }
    out
}

/// Lay out hierarchy totals on the `CANVAS x CANVAS` square. Zero totals are
/// dropped; empty input, negative totals and an all-zero aggregation are errors.
pub fn layout_totals(totals: &[HierarchyTotal]) -> AppResult<Vec<TreemapTile>> {
    if totals.is_empty() {
        return Err(AppError::data("empty_dataset", "No data available to build the treemap."));
    }
    if let Some(neg) = totals.iter().find(|t| t.value < 0.0 || t.value.is_nan()) {
        return Err(AppError::data(
            "negative_values",
            format!("cannot size a treemap tile for '{}' with value {}", neg.label, neg.value),
        ));
    }
    let mut kept: Vec<&HierarchyTotal> = totals.iter().filter(|t| t.value > 0.0).collect();
    if kept.is_empty() {
        return Err(AppError::data("degenerate_aggregation", "All totals are zero; nothing to lay out."));
    }
    kept.sort_by(|a, b| b.value.total_cmp(&a.value));
    let grand: f64 = kept.iter().map(|t| t.value).sum();
    let values: Vec<f64> = kept.iter().map(|t| t.value).collect();
    let rects = squarify(&normalize_sizes(&values, CANVAS, CANVAS), 0.0, 0.0, CANVAS, CANVAS);
    crate::tprintln!("[treemap] laid out {} tiles (dropped {})", rects.len(), totals.len() - kept.len());
    Ok(kept
        .into_iter()
        .zip(rects)
        .map(|(t, r)| TreemapTile {
            label: t.label.clone(),
            value: t.value,
            share: t.value / grand,
            x: r.x,
            y: r.y,
            dx: r.dx,
            dy: r.dy,
            x2: r.x + r.dx,
            y2: r.y + r.dy,
        })
        .collect())
}
