//! Heatmap rendering of aggregated t-value matrices.
//!
//! Renders one or two regions-by-measurements panels as color-mapped grids
//! with a diverging blue-white-red colormap, measurement labels along the
//! bottom, and a shared color bar. With masking enabled, cells whose paired
//! p-value exceeds the threshold are drawn in a neutral gray, so only the
//! significant effects carry color.
//!
//! The renderer treats the matrices as-is: an all-zero column renders as
//! the neutral center color. Callers that want to rule out zero-by-omission
//! columns should check [`AggregationContext::assert_complete`] first.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontTransform, TextStyle};

use std::path::Path;

use crate::aggregate::AggregationContext;
use crate::error::{Result, RoistatsError};

const TITLE_HEIGHT: i32 = 28;
const XLABEL_HEIGHT: i32 = 110;
const COLORBAR_WIDTH: i32 = 70;
const PANEL_GAP: i32 = 16;
const MARGIN: i32 = 10;

// Anchor colors of the diverging map (cool blue over white to warm red).
const COLD: (u8, u8, u8) = (59, 76, 192);
const WARM: (u8, u8, u8) = (180, 4, 38);
const MASKED: RGBColor = RGBColor(225, 225, 225);


/// Rendering options for [`render`] and [`render_pair`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapOptions {
    /// Color scale limits. `None` derives a symmetric range from the data.
    pub value_range: Option<(f64, f64)>,
    /// Draw cells with a p-value above this threshold in the mask color.
    pub mask_above: Option<f64>,
    pub cell_width: i32,
    pub cell_height: i32,
}

impl Default for HeatmapOptions {
    fn default() -> HeatmapOptions {
        HeatmapOptions {
            value_range: Some((-4.0, 4.0)),
            mask_above: None,
            cell_width: 42,
            cell_height: 11,
        }
    }
}


fn render_err<E: std::fmt::Display>(err: E) -> RoistatsError {
    RoistatsError::Render(err.to_string())
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

/// Map a value in `[lo, hi]` onto the diverging colormap, clamping outliers.
fn diverging_color(value: f64, lo: f64, hi: f64) -> RGBColor {
    let t = if hi > lo {
        ((value - lo) / (hi - lo)).max(0.0).min(1.0)
    } else {
        0.5
    };
    if t < 0.5 {
        let s = t * 2.0;
        RGBColor(lerp(COLD.0, 255, s), lerp(COLD.1, 255, s), lerp(COLD.2, 255, s))
    } else {
        let s = (t - 0.5) * 2.0;
        RGBColor(lerp(255, WARM.0, s), lerp(255, WARM.1, s), lerp(255, WARM.2, s))
    }
}

fn panel_size(ctx: &AggregationContext, opts: &HeatmapOptions) -> (i32, i32) {
    let (rows, cols) = ctx.shape();
    (cols as i32 * opts.cell_width, rows as i32 * opts.cell_height)
}

fn draw_panel(
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    x0: i32,
    y0: i32,
    ctx: &AggregationContext,
    title: &str,
    lo: f64,
    hi: f64,
    opts: &HeatmapOptions,
) -> Result<()> {
    let (rows, cols) = ctx.shape();
    let (grid_w, grid_h) = panel_size(ctx, opts);
    let t = ctx.t_values();
    let p = ctx.p_values();

    let title_style = TextStyle::from(("sans-serif", 18)).pos(Pos::new(HPos::Center, VPos::Top));
    root.draw(&Text::new(
        String::from(title),
        (x0 + grid_w / 2, y0),
        title_style,
    ))
    .map_err(render_err)?;

    let grid_top = y0 + TITLE_HEIGHT;
    for i in 0..rows {
        for j in 0..cols {
            let masked = match opts.mask_above {
                Some(alpha) => p[[i, j]] > alpha,
                None => false,
            };
            let color = if masked {
                MASKED
            } else {
                diverging_color(t[[i, j]], lo, hi)
            };
            let cx0 = x0 + j as i32 * opts.cell_width;
            let cy0 = grid_top + i as i32 * opts.cell_height;
            root.draw(&Rectangle::new(
                [(cx0, cy0), (cx0 + opts.cell_width, cy0 + opts.cell_height)],
                color.filled(),
            ))
            .map_err(render_err)?;
        }
    }

    // measurement labels, rotated below the grid
    let label_style = TextStyle::from(("sans-serif", 14))
        .transform(FontTransform::Rotate90)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for (j, label) in ctx.measurements().display_labels().iter().enumerate() {
        let lx = x0 + j as i32 * opts.cell_width + opts.cell_width / 2;
        root.draw(&Text::new(label.clone(), (lx, grid_top + grid_h + 6), label_style.clone()))
            .map_err(render_err)?;
    }

    Ok(())
}

fn draw_colorbar(
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    x0: i32,
    y0: i32,
    height: i32,
    lo: f64,
    hi: f64,
) -> Result<()> {
    let bar_w = 22;
    for y in 0..height {
        let v = hi - (hi - lo) * (y as f64 / height.max(1) as f64);
        root.draw(&Rectangle::new(
            [(x0, y0 + y), (x0 + bar_w, y0 + y + 1)],
            diverging_color(v, lo, hi).filled(),
        ))
        .map_err(render_err)?;
    }

    let tick_style = TextStyle::from(("sans-serif", 13)).pos(Pos::new(HPos::Left, VPos::Center));
    for &(v, y) in &[(hi, y0), ((hi + lo) / 2.0, y0 + height / 2), (lo, y0 + height)] {
        root.draw(&Text::new(format!("{:.1}", v), (x0 + bar_w + 4, y), tick_style.clone()))
            .map_err(render_err)?;
    }
    Ok(())
}

fn resolve_range(contexts: &[&AggregationContext], opts: &HeatmapOptions) -> (f64, f64) {
    match opts.value_range {
        Some(range) => range,
        None => {
            let mut m: f64 = 0.0;
            for ctx in contexts {
                let (_, hi) = ctx.value_range();
                m = m.max(hi);
            }
            (-m, m)
        }
    }
}


/// Render one matrix as a single heatmap panel with a color bar.
pub fn render<P: AsRef<Path>>(
    path: P,
    ctx: &AggregationContext,
    title: &str,
    opts: &HeatmapOptions,
) -> Result<()> {
    let (lo, hi) = resolve_range(&[ctx], opts);
    let (grid_w, grid_h) = panel_size(ctx, opts);
    let width = (MARGIN + grid_w + PANEL_GAP + COLORBAR_WIDTH + MARGIN) as u32;
    let height = (MARGIN + TITLE_HEIGHT + grid_h + XLABEL_HEIGHT + MARGIN) as u32;

    let root = BitMapBackend::new(path.as_ref(), (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    draw_panel(&root, MARGIN, MARGIN, ctx, title, lo, hi, opts)?;
    draw_colorbar(&root, MARGIN + grid_w + PANEL_GAP, MARGIN + TITLE_HEIGHT, grid_h, lo, hi)?;
    root.present().map_err(render_err)?;
    Ok(())
}


/// Render two matrices as side-by-side panels sharing one color scale and
/// color bar, the layout used to compare two independent variables or two
/// comparison levels.
///
/// Both contexts must have the same shape.
pub fn render_pair<P: AsRef<Path>>(
    path: P,
    left: &AggregationContext,
    right: &AggregationContext,
    titles: (&str, &str),
    opts: &HeatmapOptions,
) -> Result<()> {
    if left.shape() != right.shape() {
        return Err(RoistatsError::ShapeMismatch(
            left.shape().0 * left.shape().1,
            right.shape().0 * right.shape().1,
            String::from("paired heatmap panels"),
        ));
    }

    let (lo, hi) = resolve_range(&[left, right], opts);
    let (grid_w, grid_h) = panel_size(left, opts);
    let width = (MARGIN + grid_w * 2 + PANEL_GAP * 2 + COLORBAR_WIDTH + MARGIN) as u32;
    let height = (MARGIN + TITLE_HEIGHT + grid_h + XLABEL_HEIGHT + MARGIN) as u32;

    let root = BitMapBackend::new(path.as_ref(), (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    draw_panel(&root, MARGIN, MARGIN, left, titles.0, lo, hi, opts)?;
    draw_panel(&root, MARGIN + grid_w + PANEL_GAP, MARGIN, right, titles.1, lo, hi, opts)?;
    draw_colorbar(
        &root,
        MARGIN + grid_w * 2 + PANEL_GAP * 2,
        MARGIN + TITLE_HEIGHT,
        grid_h,
        lo,
        hi,
    )?;
    root.present().map_err(render_err)?;
    Ok(())
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn the_colormap_endpoints_and_center_are_correct() {
        assert_eq!(RGBColor(COLD.0, COLD.1, COLD.2), diverging_color(-4.0, -4.0, 4.0));
        assert_eq!(RGBColor(WARM.0, WARM.1, WARM.2), diverging_color(4.0, -4.0, 4.0));
        assert_eq!(RGBColor(255, 255, 255), diverging_color(0.0, -4.0, 4.0));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(diverging_color(-4.0, -4.0, 4.0), diverging_color(-10.0, -4.0, 4.0));
        assert_eq!(diverging_color(4.0, -4.0, 4.0), diverging_color(99.0, -4.0, 4.0));
    }
}
