//! plot/mod.rs — Shared drawing helpers for the figure modules.

pub mod peaks;
pub mod style;

use std::error::Error;

use plotters::coord::Shift;
use plotters::prelude::*;

/// Pad a data range so marks do not sit on the plot border. Degenerate
/// ranges get a fixed half-unit pad.
pub fn padded_range(min_val: f32, max_val: f32) -> (f32, f32) {
    let span = (max_val - min_val).abs();
    let pad = if span < 1e-6 { 0.5 } else { span * 0.05 };
    (min_val - pad, max_val + pad)
}

/// Fixed-width histogram counts over `[min, max]`, NaN values skipped.
/// Returns `(bin_start, count)` per bin.
pub fn histogram_counts(values: &[f32], min: f32, max: f32, bin_width: f32) -> Vec<(f32, usize)> {
    if bin_width <= 0.0 || max <= min {
        return Vec::new();
    }
    let bins = ((max - min) / bin_width).ceil().max(1.0) as usize;
    let mut counts = vec![0usize; bins];
    for &value in values {
        if !value.is_finite() || value < min || value > max {
            continue;
        }
        let idx = (((value - min) / bin_width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    (0..bins)
        .map(|i| (min + i as f32 * bin_width, counts[i]))
        .collect()
}

/// Draw a multi-line monospace text block, horizontally centered, with the
/// block's vertical center at `v_center` (0.0 = top of the area).
pub fn draw_text_block<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    font_px: i32,
    v_center: f32,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let (w, h) = area.dim_in_pixel();
    let style = ("monospace", font_px).into_font().color(&BLACK);
    let line_height = (font_px as f32 * 1.5).round() as i32;

    let lines: Vec<&str> = text.lines().collect();
    let block_h = line_height * lines.len() as i32;
    let mut y = (h as f32 * v_center) as i32 - block_h / 2;

    for line in lines {
        if !line.trim().is_empty() {
            let (tw, _) = area.estimate_text_size(line, &style)?;
            let x = ((w as i32 - tw as i32) / 2).max(0);
            area.draw(&Text::new(line.to_string(), (x, y), style.clone()))?;
        }
        y += line_height;
    }
    Ok(())
}
