//! plot/style.rs — Color cycle and post-draw styling hooks.

use std::error::Error;

use plotters::coord::Shift;
use plotters::prelude::*;

/// Default per-group color cycle shared by the peak plots.
pub const COLOR_CYCLE: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
];

/// Color for group `index`, wrapping around the cycle.
pub fn cycle_color(index: usize) -> RGBColor {
    COLOR_CYCLE[index % COLOR_CYCLE.len()]
}

/// Styling applied to a drawing area after its data has been rendered.
///
/// Plot functions accept any implementer, so callers can swap aesthetics
/// without touching plot internals. Closures over a drawing area implement
/// it directly.
pub trait AreaStyler<DB: DrawingBackend> {
    fn style(&self, area: &DrawingArea<DB, Shift>) -> Result<(), Box<dyn Error>>;
}

impl<DB: DrawingBackend, F> AreaStyler<DB> for F
where
    F: Fn(&DrawingArea<DB, Shift>) -> Result<(), Box<dyn Error>>,
{
    fn style(&self, area: &DrawingArea<DB, Shift>) -> Result<(), Box<dyn Error>> {
        self(area)
    }
}

/// Draws a caption in the top-left corner of the styled area.
#[derive(Clone, Debug)]
pub struct CaptionStyler {
    pub caption: String,
    pub font_px: i32,
}

impl CaptionStyler {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            font_px: 20,
        }
    }
}

impl<DB: DrawingBackend> AreaStyler<DB> for CaptionStyler
where
    DB::ErrorType: 'static,
{
    fn style(&self, area: &DrawingArea<DB, Shift>) -> Result<(), Box<dyn Error>> {
        let style = ("sans-serif", self.font_px).into_font().color(&BLACK);
        area.draw(&Text::new(self.caption.clone(), (10, 10), style))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_wraps_around() {
        assert_eq!(cycle_color(0), cycle_color(COLOR_CYCLE.len()));
        assert_ne!(cycle_color(0), cycle_color(1));
    }
}
