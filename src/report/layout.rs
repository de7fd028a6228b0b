//! report/layout.rs — Height-ratio row splitting for report pages.

use plotters::coord::Shift;
use plotters::prelude::*;

/// Split an area into horizontal rows whose heights follow `ratios`.
///
/// The last row absorbs rounding remainders, so the rows always tile the
/// full area.
pub fn split_rows<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    ratios: &[f32],
) -> Vec<DrawingArea<DB, Shift>> {
    assert!(!ratios.is_empty());
    let mut rows = Vec::with_capacity(ratios.len());
    let mut rest = area.clone();
    let mut remaining: f32 = ratios.iter().sum();

    for (i, &ratio) in ratios.iter().enumerate() {
        if i + 1 == ratios.len() {
            rows.push(rest);
            break;
        }
        let h = rest.dim_in_pixel().1 as f32;
        let cut = (h * ratio / remaining).round() as i32;
        let (top, bottom) = rest.split_vertically(cut);
        rows.push(top);
        rest = bottom;
        remaining -= ratio;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_ratios_and_tile_the_page() {
        let mut buf = String::new();
        {
            let root = SVGBackend::with_string(&mut buf, (100, 1000)).into_drawing_area();
            let rows = split_rows(&root, &[1.0, 1.0, 2.0]);
            assert_eq!(rows.len(), 3);
            let heights: Vec<u32> = rows.iter().map(|r| r.dim_in_pixel().1).collect();
            assert_eq!(heights, vec![250, 250, 500]);
        }
    }

    #[test]
    fn single_ratio_is_the_whole_area() {
        let mut buf = String::new();
        {
            let root = SVGBackend::with_string(&mut buf, (100, 300)).into_drawing_area();
            let rows = split_rows(&root, &[0.7]);
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].dim_in_pixel().1, 300);
        }
    }
}
