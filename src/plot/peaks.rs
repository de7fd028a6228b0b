//! plot/peaks.rs — Scatter plots and Gaussian reconstructions of peak fits.

use std::error::Error;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::core::gaussian::{gaussian, gen_freqs};
use crate::data::utils::BandRecord;
use crate::plot::padded_range;
use crate::plot::style::{cycle_color, AreaStyler};

/// Frequency step of reconstructed peak curves.
pub const FIT_FREQ_STEP: f32 = 0.1;

/// Buffer added around the observed center frequencies when no explicit
/// frequency range is given for a fits plot.
const FIT_FREQ_BUFFER: f32 = 4.0;

/// One fitted peak: center frequency, power, bandwidth. NaN fields mark a
/// spectrum where the peak was absent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeakParams {
    pub cf: f32,
    pub pw: f32,
    pub bw: f32,
}

impl PeakParams {
    pub fn new(cf: f32, pw: f32, bw: f32) -> Self {
        Self { cf, pw, bw }
    }

    /// A peak is missing when any of its parameters is not finite.
    pub fn is_missing(&self) -> bool {
        !(self.cf.is_finite() && self.pw.is_finite() && self.bw.is_finite())
    }
}

/// Peak data for one plot call: a single set, or several labeled groups
/// accumulated onto one shared chart.
#[derive(Clone, Debug)]
pub enum PeakSet<'a> {
    Single(&'a [PeakParams]),
    Groups(&'a [Vec<PeakParams>]),
}

impl<'a> PeakSet<'a> {
    fn groups(&self) -> Vec<&'a [PeakParams]> {
        match self {
            PeakSet::Single(set) => vec![set],
            PeakSet::Groups(groups) => groups.iter().map(|g| g.as_slice()).collect(),
        }
    }

    fn is_single(&self) -> bool {
        matches!(self, PeakSet::Single(_))
    }
}

/// Peak rows of a band record, one row per fitted spectrum.
pub fn band_peak_matrix(record: &BandRecord) -> Vec<PeakParams> {
    record
        .cf
        .iter()
        .zip(record.pw.iter())
        .zip(record.bw.iter())
        .map(|((&cf, &pw), &bw)| PeakParams::new(cf, pw, bw))
        .collect()
}

/// Options shared by the peak plots. `colors` and `labels` run parallel to
/// the groups; a single entry broadcasts across all of them, and an empty
/// `colors` falls back to the default cycle.
#[derive(Clone, Debug)]
pub struct PeakPlotOptions {
    pub freq_range: Option<(f32, f32)>,
    pub colors: Vec<RGBColor>,
    pub labels: Vec<String>,
    /// Marker area per unit of bandwidth (scatter plot).
    pub size_scale: f32,
    /// Mark/line opacity; `None` picks the per-plot default.
    pub alpha: Option<f64>,
    /// Per-curve stroke width; the average curve draws at three times this.
    pub line_width: u32,
}

impl Default for PeakPlotOptions {
    fn default() -> Self {
        Self {
            freq_range: None,
            colors: Vec::new(),
            labels: Vec::new(),
            size_scale: 150.0,
            alpha: None,
            line_width: 1,
        }
    }
}

impl PeakPlotOptions {
    fn color(&self, group: usize) -> RGBColor {
        match self.colors.len() {
            0 => cycle_color(group),
            1 => self.colors[0],
            n => self.colors[group % n],
        }
    }

    fn label(&self, group: usize) -> Option<&str> {
        match self.labels.len() {
            0 => None,
            1 => Some(self.labels[0].as_str()),
            _ => self.labels.get(group).map(|s| s.as_str()),
        }
    }
}

/// Marker radius in pixels for a marker area of `bw * size_scale` px².
fn marker_radius(bw: f32, size_scale: f32) -> i32 {
    let area = (bw * size_scale).max(0.0);
    ((area / std::f32::consts::PI).sqrt().round() as i32).max(1)
}

/// Default frequency range for a fits plot: the observed center frequencies
/// plus a fixed buffer, with the lower bound floored at zero.
pub fn default_fit_range(groups: &[&[PeakParams]]) -> (f32, f32) {
    let mut min_cf = f32::INFINITY;
    let mut max_cf = f32::NEG_INFINITY;
    for peak in groups.iter().flat_map(|g| g.iter()) {
        if peak.is_missing() {
            continue;
        }
        min_cf = min_cf.min(peak.cf);
        max_cf = max_cf.max(peak.cf);
    }
    if !min_cf.is_finite() || !max_cf.is_finite() {
        return (0.0, 1.0);
    }
    ((min_cf - FIT_FREQ_BUFFER).max(0.0), max_cf + FIT_FREQ_BUFFER)
}

/// Plot peak parameters as dots: center frequency on x, power on y, marker
/// area proportional to bandwidth.
///
/// The y axis always starts at zero; the x axis is clamped to `freq_range`
/// when one is given. Grouped input shares one chart, one color cycle, and
/// a legend when labels are present.
pub fn plot_peak_params<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    peaks: &PeakSet<'_>,
    opts: &PeakPlotOptions,
    styler: Option<&dyn AreaStyler<DB>>,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let groups = peaks.groups();
    let present: Vec<PeakParams> = groups
        .iter()
        .flat_map(|g| g.iter())
        .filter(|p| !p.is_missing())
        .copied()
        .collect();

    let x_range = opts.freq_range.unwrap_or_else(|| {
        let min = present.iter().map(|p| p.cf).fold(f32::INFINITY, f32::min);
        let max = present.iter().map(|p| p.cf).fold(f32::NEG_INFINITY, f32::max);
        if min.is_finite() {
            padded_range(min, max)
        } else {
            (0.0, 1.0)
        }
    });
    let y_max = present
        .iter()
        .map(|p| p.pw)
        .fold(0.0f32, f32::max)
        .max(1e-6)
        * 1.1;

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.0..x_range.1, 0.0f32..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Center Frequency")
        .y_desc("Power")
        .draw()?;

    let alpha = opts.alpha.unwrap_or(0.7);
    for (i, group) in groups.iter().enumerate() {
        let color = opts.color(i);
        let size_scale = opts.size_scale;
        let series = chart.draw_series(
            group
                .iter()
                .filter(|p| !p.is_missing())
                .map(|p| {
                    Circle::new(
                        (p.cf, p.pw),
                        marker_radius(p.bw, size_scale),
                        color.mix(alpha).filled(),
                    )
                }),
        )?;
        if let Some(label) = opts.label(i) {
            series
                .label(label)
                .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
        }
    }

    if !opts.labels.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    if let Some(styler) = styler {
        styler.style(area)?;
    }
    Ok(())
}

/// Plot Gaussian reconstructions of peak fits, one faint curve per peak and
/// one bold average curve per group.
///
/// The average sums curves with missing peaks contributing zero and divides
/// by the *total* peak count, so absent peaks pull the average down rather
/// than being dropped from the denominator.
pub fn plot_peak_fits<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    peaks: &PeakSet<'_>,
    opts: &PeakPlotOptions,
    styler: Option<&dyn AreaStyler<DB>>,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let groups = peaks.groups();
    let freq_range = opts
        .freq_range
        .unwrap_or_else(|| default_fit_range(&groups));
    let freqs = gen_freqs(freq_range, FIT_FREQ_STEP);

    // Reconstruct every curve up front so the y range covers all groups.
    let mut group_curves: Vec<(Vec<Vec<f32>>, Vec<f32>)> = Vec::with_capacity(groups.len());
    let mut y_max = 0.0f32;
    for group in &groups {
        let mut curves = Vec::with_capacity(group.len());
        let mut avg = vec![0.0f32; freqs.len()];
        for peak in group.iter() {
            if peak.is_missing() {
                continue;
            }
            let curve = gaussian(&freqs, peak.cf, peak.pw, peak.bw);
            for (acc, &y) in avg.iter_mut().zip(curve.iter()) {
                *acc += y;
            }
            curves.push(curve);
        }
        if !group.is_empty() {
            let denom = group.len() as f32;
            for acc in avg.iter_mut() {
                *acc /= denom;
            }
        }
        y_max = curves
            .iter()
            .flat_map(|c| c.iter())
            .chain(avg.iter())
            .fold(y_max, |m, &y| m.max(y));
        group_curves.push((curves, avg));
    }
    let y_max = y_max.max(1e-6) * 1.05;

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(freq_range.0..freq_range.1, 0.0f32..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Frequency")
        .y_desc("log(Power)")
        .draw()?;

    let alpha = opts.alpha.unwrap_or(0.35);
    let avg_width = opts.line_width * 3;
    for (i, (curves, avg)) in group_curves.iter().enumerate() {
        if groups[i].is_empty() {
            continue;
        }
        let color = opts.color(i);
        // A lone ungrouped set with no explicit color gets a black average,
        // so the aggregate stands out from the per-peak curves.
        let avg_color = if peaks.is_single() && opts.colors.is_empty() {
            BLACK
        } else {
            color
        };

        for curve in curves {
            chart.draw_series(LineSeries::new(
                freqs.iter().copied().zip(curve.iter().copied()),
                color.mix(alpha).stroke_width(opts.line_width),
            ))?;
        }

        let series = chart.draw_series(LineSeries::new(
            freqs.iter().copied().zip(avg.iter().copied()),
            avg_color.stroke_width(avg_width),
        ))?;
        if let Some(label) = opts.label(i) {
            series.label(label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], avg_color)
            });
        }
    }

    if !opts.labels.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    if let Some(styler) = styler {
        styler.style(area)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_buffers_around_center_frequencies() {
        let peaks = [PeakParams::new(8.0, 0.5, 1.0), PeakParams::new(12.0, 0.7, 1.5)];
        let range = default_fit_range(&[&peaks]);
        assert_eq!(range, (4.0, 16.0));
    }

    #[test]
    fn default_range_floors_at_zero() {
        let peaks = [PeakParams::new(1.0, 0.5, 1.0), PeakParams::new(2.0, 0.7, 1.5)];
        let range = default_fit_range(&[&peaks]);
        assert_eq!(range, (0.0, 6.0));
    }

    #[test]
    fn default_range_skips_missing_peaks() {
        let peaks = [
            PeakParams::new(f32::NAN, f32::NAN, f32::NAN),
            PeakParams::new(10.0, 0.5, 2.0),
        ];
        let range = default_fit_range(&[&peaks]);
        assert_eq!(range, (6.0, 14.0));
    }

    #[test]
    fn default_range_falls_back_when_all_missing() {
        let peaks = [PeakParams::new(f32::NAN, f32::NAN, f32::NAN)];
        assert_eq!(default_fit_range(&[&peaks]), (0.0, 1.0));
    }

    #[test]
    fn marker_radius_grows_with_bandwidth_area() {
        let small = marker_radius(1.0, 150.0);
        let large = marker_radius(4.0, 150.0);
        assert!(large > small);
        // Area is linear in bandwidth, so radius grows with its square root.
        assert_eq!(large, small * 2);
    }

    #[test]
    fn missing_detection_requires_all_finite() {
        assert!(PeakParams::new(f32::NAN, 1.0, 1.0).is_missing());
        assert!(PeakParams::new(1.0, f32::NAN, 1.0).is_missing());
        assert!(!PeakParams::new(1.0, 1.0, 1.0).is_missing());
    }

    #[test]
    fn single_peak_average_equals_its_curve() {
        // One row: summing one curve and dividing by a count of one must be
        // an exact no-op.
        let freqs = gen_freqs((4.0, 16.0), FIT_FREQ_STEP);
        let peak = PeakParams::new(10.0, 0.8, 1.2);
        let curve = gaussian(&freqs, peak.cf, peak.pw, peak.bw);
        let avg: Vec<f32> = curve.iter().map(|&y| y / 1.0).collect();
        assert_eq!(curve, avg);
    }

    #[test]
    fn color_broadcast_and_cycling() {
        let mut opts = PeakPlotOptions::default();
        assert_ne!(opts.color(0), opts.color(1));

        opts.colors = vec![RGBColor(1, 2, 3)];
        assert_eq!(opts.color(0), opts.color(5));

        opts.labels = vec!["only".into()];
        assert_eq!(opts.label(3), Some("only"));
    }

    #[test]
    fn band_matrix_rows_follow_record_columns() {
        let record = BandRecord {
            label: "alpha".into(),
            cf: vec![9.0, 10.0],
            pw: vec![0.5, 0.6],
            bw: vec![2.0, 2.5],
        };
        let rows = band_peak_matrix(&record);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], PeakParams::new(10.0, 0.6, 2.5));
    }
}
