//! report/mod.rs — Multi-panel SVG summary reports for spectral model fits.
//!
//! Each report is one fixed-layout page: a results text block on top, the
//! model object's own plots in the middle, and (optionally) a settings text
//! block at the bottom. Panel counts depend on the data — one row per band,
//! an extra row when a knee parameter is present — and any rendering
//! failure aborts the whole report; partial pages are never written.

pub mod layout;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{debug, info};

use crate::config::ReportConfig;
use crate::data::utils::periodic_labels;
use crate::data::ModelResults;
use crate::plot::draw_text_block;
use crate::report::layout::split_rows;

/// Reports are written as vector pages in this format.
pub const SAVE_FORMAT: &str = "svg";

/// Extra page height for event reports, which stack four rows per band.
const EVENT_EXTRA_HEIGHT: u32 = 600;

/// Vertical centers for the text panels (fraction from the panel top).
const RESULTS_TEXT_CENTER: f32 = 0.3;
const SETTINGS_TEXT_CENTER: f32 = 0.9;

/// Text blocks every reportable object must provide.
pub trait ReportText {
    /// Human-readable summary of the fit results.
    fn results_text(&self) -> String;
    /// Human-readable summary of the settings the fit ran with.
    fn settings_text(&self) -> String;
}

/// A single power spectrum model: one data panel.
pub trait ModelReport: ReportText {
    fn plot(&self, area: &DrawingArea<SVGBackend<'_>, Shift>) -> Result<(), Box<dyn Error>>;
}

/// A group of models fit across multiple spectra: three data panels.
pub trait GroupReport: ReportText {
    fn plot_aperiodic(
        &self,
        area: &DrawingArea<SVGBackend<'_>, Shift>,
    ) -> Result<(), Box<dyn Error>>;
    fn plot_goodness(
        &self,
        area: &DrawingArea<SVGBackend<'_>, Shift>,
    ) -> Result<(), Box<dyn Error>>;
    fn plot_peak_frequencies(
        &self,
        area: &DrawingArea<SVGBackend<'_>, Shift>,
    ) -> Result<(), Box<dyn Error>>;
}

/// Models fit over a spectrogram: one panel per parameter row, band count
/// taken from the results mapping.
pub trait TimeReport: ReportText {
    fn results(&self) -> &ModelResults;
    fn plot(&self, panels: &[DrawingArea<SVGBackend<'_>, Shift>]) -> Result<(), Box<dyn Error>>;
}

/// Models fit over a set of events (event × time matrices of parameters).
pub trait EventReport: ReportText {
    fn results(&self) -> &ModelResults;
    fn plot(&self, panels: &[DrawingArea<SVGBackend<'_>, Shift>]) -> Result<(), Box<dyn Error>>;
}

/// Knobs shared by the `save_*_report` family.
#[derive(Clone, Debug)]
pub struct ReportOptions {
    /// Append the settings text block to the end of the report.
    pub add_settings: bool,
    pub config: ReportConfig,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            add_settings: true,
            config: ReportConfig::default(),
        }
    }
}

/// Resolve the output path: append the save format when the name lacks it,
/// prepend the directory when one is given (current directory otherwise).
fn resolve_report_path(file_path: Option<&Path>, file_name: &str) -> PathBuf {
    let ext = format!(".{SAVE_FORMAT}");
    let file = if file_name.ends_with(&ext) {
        file_name.to_string()
    } else {
        format!("{file_name}{ext}")
    };
    match file_path {
        Some(dir) => dir.join(file),
        None => PathBuf::from(file),
    }
}

/// Generate and save a report page for a single power spectrum model.
pub fn save_model_report<M: ModelReport + ?Sized>(
    model: &M,
    file_name: &str,
    file_path: Option<&Path>,
    opts: &ReportOptions,
) -> Result<PathBuf, Box<dyn Error>> {
    let out = resolve_report_path(file_path, file_name);
    let cfg = &opts.config;

    // Render fully in memory; the file is only written once the whole page
    // succeeded, so a failed panel never leaves a partial report behind.
    let mut page = String::new();
    {
        let root =
            SVGBackend::with_string(&mut page, (cfg.page_width, cfg.page_height)).into_drawing_area();
        root.fill(&WHITE)?;

        let ratios: &[f32] = if opts.add_settings {
            &[0.5, 1.0, 0.25]
        } else {
            &[0.45, 1.0]
        };
        let rows = split_rows(&root, ratios);

        draw_text_block(&rows[0], &model.results_text(), cfg.font_px, RESULTS_TEXT_CENTER)?;
        model.plot(&rows[1])?;
        if opts.add_settings {
            draw_text_block(&rows[2], &model.settings_text(), cfg.font_px, SETTINGS_TEXT_CENTER)?;
        }

        root.present()?;
    }
    fs::write(&out, page)?;
    info!("saved model report to {}", out.display());
    Ok(out)
}

/// Generate and save a report page for a group of model fits.
pub fn save_group_report<G: GroupReport + ?Sized>(
    group: &G,
    file_name: &str,
    file_path: Option<&Path>,
    opts: &ReportOptions,
) -> Result<PathBuf, Box<dyn Error>> {
    let out = resolve_report_path(file_path, file_name);
    let cfg = &opts.config;

    let mut page = String::new();
    {
        let root =
            SVGBackend::with_string(&mut page, (cfg.page_width, cfg.page_height)).into_drawing_area();
        root.fill(&WHITE)?;

        let ratios: &[f32] = if opts.add_settings {
            &[1.0, 1.0, 1.0, 0.5]
        } else {
            &[0.8, 1.0, 1.0]
        };
        let rows = split_rows(&root, ratios);

        draw_text_block(&rows[0], &group.results_text(), cfg.font_px, RESULTS_TEXT_CENTER)?;

        let cols = rows[1].split_evenly((1, 2));
        group.plot_aperiodic(&cols[0])?;
        group.plot_goodness(&cols[1])?;
        group.plot_peak_frequencies(&rows[2])?;

        if opts.add_settings {
            draw_text_block(&rows[3], &group.settings_text(), cfg.font_px, SETTINGS_TEXT_CENTER)?;
        }

        root.present()?;
    }
    fs::write(&out, page)?;
    info!("saved group report to {}", out.display());
    Ok(out)
}

/// Generate and save a report page for models of a spectrogram.
///
/// The page grows with the number of bands: one parameter row per band plus
/// two fixed rows, all handed to the model's own plot.
pub fn save_time_report<T: TimeReport + ?Sized>(
    model: &T,
    file_name: &str,
    file_path: Option<&Path>,
    opts: &ReportOptions,
) -> Result<PathBuf, Box<dyn Error>> {
    let out = resolve_report_path(file_path, file_name);
    let cfg = &opts.config;

    let n_bands = periodic_labels(model.results()).n_bands();
    debug!("time report layout: {n_bands} band rows");

    let mut ratios = vec![1.0f32];
    ratios.extend(std::iter::repeat(0.5).take(n_bands + 2));
    if opts.add_settings {
        ratios.push(0.4);
    }

    let mut page = String::new();
    {
        let root =
            SVGBackend::with_string(&mut page, (cfg.page_width, cfg.page_height)).into_drawing_area();
        root.fill(&WHITE)?;
        let rows = split_rows(&root, &ratios);

        draw_text_block(&rows[0], &model.results_text(), cfg.font_px, RESULTS_TEXT_CENTER)?;
        model.plot(&rows[1..1 + n_bands + 2])?;
        if opts.add_settings {
            let last = rows.len() - 1;
            draw_text_block(&rows[last], &model.settings_text(), cfg.font_px, SETTINGS_TEXT_CENTER)?;
        }

        root.present()?;
    }
    fs::write(&out, page)?;
    info!("saved time report to {}", out.display());
    Ok(out)
}

/// Generate and save a report page for models of an event set.
///
/// Four parameter rows per band, separated by thin spacer rows; an extra
/// aperiodic row appears when the results carry a knee parameter.
pub fn save_event_report<E: EventReport + ?Sized>(
    model: &E,
    file_name: &str,
    file_path: Option<&Path>,
    opts: &ReportOptions,
) -> Result<PathBuf, Box<dyn Error>> {
    let out = resolve_report_path(file_path, file_name);
    let cfg = &opts.config;

    let results = model.results();
    let n_bands = periodic_labels(results).n_bands();
    let has_knee = results.contains_key("knee");
    debug!("event report layout: {n_bands} band rows, knee: {has_knee}");

    let mut ratios = vec![2.75f32];
    ratios.extend(std::iter::repeat(1.0).take(if has_knee { 3 } else { 2 }));
    for _ in 0..n_bands {
        ratios.extend_from_slice(&[0.25, 1.0, 1.0, 1.0]);
    }
    ratios.push(0.25);
    ratios.extend_from_slice(&[1.0, 1.0]);
    if opts.add_settings {
        ratios.push(1.5);
    }

    let size = (cfg.page_width, cfg.page_height + EVENT_EXTRA_HEIGHT);
    let mut page = String::new();
    {
        let root = SVGBackend::with_string(&mut page, size).into_drawing_area();
        root.fill(&WHITE)?;
        let rows = split_rows(&root, &ratios);

        draw_text_block(&rows[0], &model.results_text(), cfg.font_px, RESULTS_TEXT_CENTER)?;
        model.plot(&rows[1..rows.len() - 1])?;
        if opts.add_settings {
            let last = rows.len() - 1;
            draw_text_block(&rows[last], &model.settings_text(), cfg.font_px, SETTINGS_TEXT_CENTER)?;
        }

        root.present()?;
    }
    fs::write(&out, page)?;
    info!("saved event report to {}", out.display());
    Ok(out)
}
