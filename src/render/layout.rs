//! Layout geometry.
//!
//! Pure integer geometry for the three packing modes. Nothing here touches
//! pixels; the drawing code in [`super::compose`] consumes these plans.
//!
//! ```text
//! horizontal              vertical         grid (5 items)
//! +----+ +--------+       +------+         +--+ +--+ +--+
//! |img | |  img   |       | img  |         |  | |  | |  |   row 0: 3 items
//! +----+ +--------+       +------+         +--+ +--+ +--+
//! |band| |  band  |       | band |         +----+ +----+
//! +----+ +--------+       +------+         |    | |    |   row 1: 2 items,
//!                         +------+         +----+ +----+   scaled to row 0 width
//!                         | img  |
//! ```
//!
//! Extents are accumulated in 64 bits; a plan that does not fit `u32` fails
//! with [`CollageError::SurfaceCreation`].

use crate::error::CollageError;

/// An axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

/// Where one item lands inside a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub image: Rect,
    /// Present only for items with a non-empty label.
    pub label: Option<Rect>,
}

/// Geometry of a single strip (one row or one column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripPlan {
    pub width: u32,
    pub height: u32,
    pub slots: Vec<Slot>,
}

impl StripPlan {
    fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            slots: Vec::new(),
        }
    }
}

/// One grid row: its strip plus where the rescaled strip goes.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPlan {
    /// Index of the row's first item.
    pub start: usize,
    pub strip: StripPlan,
    /// Factor from the row's native width to the grid width.
    pub scale: f32,
    pub y: u32,
    pub scaled_height: u32,
}

/// Geometry of the grid layout.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPlan {
    pub width: u32,
    pub height: u32,
    pub rows: Vec<RowPlan>,
}

/// Number of items in each grid row.
///
/// `floor(sqrt(n))` rows for `n > 1` (one row otherwise); the remainder goes
/// one extra item at a time to the earliest rows.
pub fn partition_rows(count: usize) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    let rows = if count > 1 { isqrt(count) } else { 1 };
    let base = count / rows;
    let extra = count % rows;
    (0..rows).map(|r| base + usize::from(r < extra)).collect()
}

fn isqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r > 0 && r.checked_mul(r).is_none_or(|sq| sq > n) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).is_some_and(|sq| sq <= n) {
        r += 1;
    }
    r
}

/// Error for a layout whose geometry does not fit a `u32` surface.
fn too_large(width: u64, height: u64) -> CollageError {
    CollageError::SurfaceCreation {
        width,
        height,
        reason: "layout does not fit in a 32-bit surface".to_string(),
    }
}

/// Narrow a 64-bit extent, failing with the full strip size for context.
fn fit(value: u64, width: u64, height: u64) -> Result<u32, CollageError> {
    u32::try_from(value).map_err(|_| too_large(width, height))
}

/// Scale `along` so that `across` becomes `target` (aspect preserved).
///
/// The result is not narrowed; callers check it fits.
fn scale_dim(along: u32, across: u32, target: u32) -> u64 {
    if across == 0 {
        return 0;
    }
    ((along as f64 * target as f64 / across as f64).round() as u64).max(1)
}

/// Images side by side at the tallest image's height, bands beneath.
///
/// `band` is the label band height (0 when no item has a label);
/// `labeled[i]` says whether item `i` gets a band drawn.
pub fn plan_horizontal(
    sizes: &[(u32, u32)],
    gap: u32,
    band: u32,
    labeled: &[bool],
) -> Result<StripPlan, CollageError> {
    if sizes.is_empty() {
        return Ok(StripPlan::empty());
    }
    let height = sizes.iter().map(|&(_, h)| h).max().unwrap_or(0);
    let total_height = height as u64 + band as u64;
    let total_height32 = fit(total_height, 0, total_height)?;

    let mut x = 0u64;
    let mut slots = Vec::with_capacity(sizes.len());
    for (i, &(w, h)) in sizes.iter().enumerate() {
        if i > 0 {
            x = x.saturating_add(gap as u64);
        }
        let width = scale_dim(w, h, height);
        let left = fit(x, x.saturating_add(width), total_height)?;
        let width32 = fit(width, x.saturating_add(width), total_height)?;
        let label = (band > 0 && labeled.get(i).copied().unwrap_or(false))
            .then(|| Rect::new(left, height, width32, band));
        slots.push(Slot {
            image: Rect::new(left, 0, width32, height),
            label,
        });
        x = x.saturating_add(width);
    }

    Ok(StripPlan {
        width: fit(x, x, total_height)?,
        height: total_height32,
        slots,
    })
}

/// Images stacked at the widest image's width, each band under its image.
pub fn plan_vertical(
    sizes: &[(u32, u32)],
    gap: u32,
    band: u32,
    labeled: &[bool],
) -> Result<StripPlan, CollageError> {
    if sizes.is_empty() {
        return Ok(StripPlan::empty());
    }
    let width = sizes.iter().map(|&(w, _)| w).max().unwrap_or(0);
    let wide = width as u64;

    let mut y = 0u64;
    let mut slots = Vec::with_capacity(sizes.len());
    for (i, &(w, h)) in sizes.iter().enumerate() {
        if i > 0 {
            y = y.saturating_add(gap as u64);
        }
        let height = scale_dim(h, w, width);
        let bottom = y.saturating_add(height).saturating_add(band as u64);
        let top = fit(y, wide, bottom)?;
        let height32 = fit(height, wide, bottom)?;
        let band_top = fit(y.saturating_add(height), wide, bottom)?;
        let label = (band > 0 && labeled.get(i).copied().unwrap_or(false))
            .then(|| Rect::new(0, band_top, width, band));
        slots.push(Slot {
            image: Rect::new(0, top, width, height32),
            label,
        });
        y = bottom;
    }

    Ok(StripPlan {
        width,
        height: fit(y, wide, y)?,
        slots,
    })
}

/// Rows of horizontal strips, each rescaled to the widest row.
///
/// `row_band` gives the band height for a row from its scale factor, so the
/// caller can keep bands a constant height after rescaling.
pub fn plan_grid<F>(
    sizes: &[(u32, u32)],
    gap: u32,
    labeled: &[bool],
    row_band: F,
) -> Result<GridPlan, CollageError>
where
    F: Fn(f32) -> u32,
{
    let counts = partition_rows(sizes.len());

    let mut start = 0;
    let mut natives = Vec::with_capacity(counts.len());
    for &count in &counts {
        let range = start..start + count;
        let native = plan_horizontal(&sizes[range.clone()], gap, 0, &labeled[range])?;
        natives.push((start, count, native.width));
        start += count;
    }
    let width = natives.iter().map(|&(_, _, w)| w).max().unwrap_or(0);
    let wide = width as u64;

    let mut y = 0u64;
    let mut rows = Vec::with_capacity(natives.len());
    for (i, &(start, count, native_width)) in natives.iter().enumerate() {
        if i > 0 {
            y = y.saturating_add(gap as u64);
        }
        let scale = if native_width == 0 {
            0.0
        } else {
            width as f32 / native_width as f32
        };
        let band = if scale > 0.0 { row_band(scale) } else { 0 };
        let range = start..start + count;
        let strip = plan_horizontal(&sizes[range.clone()], gap, band, &labeled[range])?;
        let scaled = (strip.height as f64 * scale as f64).round() as u64;
        let top = fit(y, wide, y.saturating_add(scaled))?;
        let scaled_height = fit(scaled, wide, y.saturating_add(scaled))?;
        rows.push(RowPlan {
            start,
            strip,
            scale,
            y: top,
            scaled_height,
        });
        y = y.saturating_add(scaled);
    }

    Ok(GridPlan {
        width,
        height: fit(y, wide, y)?,
        rows,
    })
}
