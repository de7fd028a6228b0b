//! sim.rs — Synthetic fit results for demos and end-to-end tests.
//!
//! Nothing here fits anything: the generators fabricate plausible model
//! parameters (aperiodic components, per-band peaks with random dropout)
//! and wrap them in objects implementing the report traits, so the full
//! plotting and report pipeline can run without the upstream fitting stage.

use std::error::Error;

use plotters::coord::Shift;
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::gaussian::{gaussian, gen_freqs};
use crate::data::utils::band_records;
use crate::data::{ModelResults, ResultsValue};
use crate::plot::peaks::PeakParams;
use crate::plot::style::cycle_color;
use crate::plot::{histogram_counts, padded_range};
use crate::report::{EventReport, GroupReport, ModelReport, ReportText, TimeReport};

/// One simulated oscillatory band.
#[derive(Clone, Debug)]
pub struct BandSpec {
    pub name: String,
    pub cf: f32,
    pub pw: f32,
    pub bw: f32,
}

impl BandSpec {
    pub fn new(name: &str, cf: f32, pw: f32, bw: f32) -> Self {
        Self {
            name: name.to_string(),
            cf,
            pw,
            bw,
        }
    }
}

/// Parameters of the synthetic data set.
#[derive(Clone, Debug)]
pub struct SimSpec {
    pub n_spectra: usize,
    pub n_times: usize,
    pub n_events: usize,
    pub bands: Vec<BandSpec>,
    pub knee: bool,
    /// Chance that a band peak is absent from a given spectrum.
    pub dropout: f64,
    pub seed: u64,
}

impl SimSpec {
    pub fn demo_defaults() -> Self {
        Self {
            n_spectra: 40,
            n_times: 60,
            n_events: 12,
            bands: vec![
                BandSpec::new("alpha", 10.0, 0.6, 1.2),
                BandSpec::new("beta", 21.0, 0.35, 1.8),
            ],
            knee: false,
            dropout: 0.1,
            seed: 42,
        }
    }
}

fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn jittered(rng: &mut StdRng, base: f32, spread: f32, n: usize) -> Vec<f32> {
    (0..n)
        .map(|_| base + rng.random_range(-spread..spread))
        .collect()
}

fn drift_series(rng: &mut StdRng, base: f32, amp: f32, noise: f32, n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| base + amp * (i as f32 * 0.15).sin() + rng.random_range(-noise..noise))
        .collect()
}

fn finite_mean(values: &[f32]) -> f32 {
    let mut sum = 0.0f32;
    let mut count = 0usize;
    for &v in values {
        if v.is_finite() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        f32::NAN
    } else {
        sum / count as f32
    }
}

/// Per-spectrum results for a group of fits, flat-key wire format.
pub fn sim_group_results(spec: &SimSpec) -> ModelResults {
    let mut rng = seeded_rng(spec.seed);
    let n = spec.n_spectra;

    let mut results = ModelResults::new();
    results.insert("offset", ResultsValue::Series(jittered(&mut rng, 1.0, 0.4, n)));
    if spec.knee {
        results.insert("knee", ResultsValue::Series(jittered(&mut rng, 15.0, 5.0, n)));
    }
    results.insert(
        "exponent",
        ResultsValue::Series(jittered(&mut rng, 1.5, 0.3, n)),
    );
    results.insert("error", ResultsValue::Series(jittered(&mut rng, 0.05, 0.03, n)));
    results.insert(
        "r_squared",
        ResultsValue::Series(jittered(&mut rng, 0.95, 0.03, n)),
    );

    for band in &spec.bands {
        let mut cf = Vec::with_capacity(n);
        let mut pw = Vec::with_capacity(n);
        let mut bw = Vec::with_capacity(n);
        for _ in 0..n {
            if rng.random_bool(spec.dropout) {
                // Peak absent from this spectrum: all three attributes missing.
                cf.push(f32::NAN);
                pw.push(f32::NAN);
                bw.push(f32::NAN);
            } else {
                cf.push(band.cf + rng.random_range(-1.0..1.0));
                pw.push((band.pw + rng.random_range(-0.2..0.2)).max(0.05));
                bw.push((band.bw + rng.random_range(-0.5..0.5)).max(0.2));
            }
        }
        results.insert(format!("{}_cf", band.name), ResultsValue::Series(cf));
        results.insert(format!("{}_pw", band.name), ResultsValue::Series(pw));
        results.insert(format!("{}_bw", band.name), ResultsValue::Series(bw));
    }
    results
}

/// Per-time-bin results for a spectrogram fit, one series per key.
pub fn sim_time_results(spec: &SimSpec) -> ModelResults {
    let mut rng = seeded_rng(spec.seed.wrapping_add(1));
    let n = spec.n_times;

    let mut results = ModelResults::new();
    results.insert(
        "offset",
        ResultsValue::Series(drift_series(&mut rng, 1.0, 0.2, 0.05, n)),
    );
    if spec.knee {
        results.insert(
            "knee",
            ResultsValue::Series(drift_series(&mut rng, 15.0, 2.0, 0.5, n)),
        );
    }
    results.insert(
        "exponent",
        ResultsValue::Series(drift_series(&mut rng, 1.5, 0.3, 0.05, n)),
    );
    results.insert(
        "error",
        ResultsValue::Series(drift_series(&mut rng, 0.05, 0.01, 0.01, n)),
    );
    results.insert(
        "r_squared",
        ResultsValue::Series(drift_series(&mut rng, 0.95, 0.02, 0.01, n)),
    );

    for band in &spec.bands {
        let mut cf = drift_series(&mut rng, band.cf, 0.6, 0.2, n);
        let mut pw = drift_series(&mut rng, band.pw, 0.1, 0.05, n);
        let mut bw = drift_series(&mut rng, band.bw, 0.2, 0.1, n);
        for i in 0..n {
            if rng.random_bool(spec.dropout) {
                cf[i] = f32::NAN;
                pw[i] = f32::NAN;
                bw[i] = f32::NAN;
            }
        }
        results.insert(format!("{}_cf", band.name), ResultsValue::Series(cf));
        results.insert(format!("{}_pw", band.name), ResultsValue::Series(pw));
        results.insert(format!("{}_bw", band.name), ResultsValue::Series(bw));
    }
    results
}

/// Event-set results: per key, one row per event and one column per time bin.
pub fn sim_event_results(spec: &SimSpec) -> ModelResults {
    let mut rng = seeded_rng(spec.seed.wrapping_add(2));
    let time_keys = sim_time_results(spec);

    let mut results = ModelResults::new();
    for (key, value) in time_keys.iter() {
        let Some(base) = value.series() else { continue };
        let rows: Vec<Vec<f32>> = (0..spec.n_events)
            .map(|_| {
                let event_shift = rng.random_range(-0.1..0.1f32);
                base.iter().map(|&v| v + event_shift).collect()
            })
            .collect();
        results.insert(key, ResultsValue::Matrix(rows));
    }
    results
}

fn frame(lines: &[String]) -> String {
    let bar = "=".repeat(70);
    let mut out = String::new();
    out.push_str(&bar);
    out.push('\n');
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&bar);
    out
}

fn series<'a>(results: &'a ModelResults, key: &str) -> &'a [f32] {
    results.get(key).and_then(|v| v.series()).unwrap_or(&[])
}

/// A simulated single power spectrum model fit.
#[derive(Clone, Debug)]
pub struct SimModel {
    pub freqs: Vec<f32>,
    pub spectrum: Vec<f32>,
    pub model_fit: Vec<f32>,
    pub aperiodic_fit: Vec<f32>,
    pub offset: f32,
    pub exponent: f32,
    pub knee: Option<f32>,
    pub peaks: Vec<PeakParams>,
    pub error: f32,
    pub r_squared: f32,
    pub seed: u64,
}

/// Build one synthetic model fit: aperiodic background plus one peak per
/// configured band, with measurement noise layered on the "observed"
/// spectrum.
pub fn sim_model(spec: &SimSpec) -> SimModel {
    let mut rng = seeded_rng(spec.seed);
    let freqs = gen_freqs((3.0, 40.0), 0.25);

    let offset = 1.0 + rng.random_range(-0.2..0.2f32);
    let exponent = 1.5 + rng.random_range(-0.2..0.2f32);
    let knee = if spec.knee {
        Some(15.0 + rng.random_range(-3.0..3.0f32))
    } else {
        None
    };

    let aperiodic_fit: Vec<f32> = freqs
        .iter()
        .map(|&f| match knee {
            Some(k) => offset - (k + f.powf(exponent)).log10(),
            None => offset - exponent * f.log10(),
        })
        .collect();

    let peaks: Vec<PeakParams> = spec
        .bands
        .iter()
        .map(|band| {
            PeakParams::new(
                band.cf + rng.random_range(-0.5..0.5f32),
                (band.pw + rng.random_range(-0.1..0.1f32)).max(0.05),
                (band.bw + rng.random_range(-0.2..0.2f32)).max(0.2),
            )
        })
        .collect();

    let mut model_fit = aperiodic_fit.clone();
    for peak in &peaks {
        let curve = gaussian(&freqs, peak.cf, peak.pw, peak.bw);
        for (m, y) in model_fit.iter_mut().zip(curve) {
            *m += y;
        }
    }

    let spectrum: Vec<f32> = model_fit
        .iter()
        .map(|&m| m + rng.random_range(-0.05..0.05f32))
        .collect();

    let n = freqs.len() as f32;
    let error = spectrum
        .iter()
        .zip(&model_fit)
        .map(|(s, m)| (s - m).abs())
        .sum::<f32>()
        / n;
    let mean = spectrum.iter().sum::<f32>() / n;
    let ss_tot: f32 = spectrum.iter().map(|&s| (s - mean) * (s - mean)).sum();
    let ss_res: f32 = spectrum
        .iter()
        .zip(&model_fit)
        .map(|(s, m)| (s - m) * (s - m))
        .sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

    SimModel {
        freqs,
        spectrum,
        model_fit,
        aperiodic_fit,
        offset,
        exponent,
        knee,
        peaks,
        error,
        r_squared,
        seed: spec.seed,
    }
}

impl ReportText for SimModel {
    fn results_text(&self) -> String {
        let mut lines = vec![
            "POWER SPECTRUM MODEL".to_string(),
            String::new(),
            format!(
                "Frequency range: {:.2} - {:.2} Hz",
                self.freqs.first().copied().unwrap_or(0.0),
                self.freqs.last().copied().unwrap_or(0.0)
            ),
        ];
        match self.knee {
            Some(knee) => lines.push(format!(
                "Aperiodic (offset, knee, exponent): {:.3}, {:.3}, {:.3}",
                self.offset, knee, self.exponent
            )),
            None => lines.push(format!(
                "Aperiodic (offset, exponent): {:.3}, {:.3}",
                self.offset, self.exponent
            )),
        }
        lines.push(String::new());
        lines.push(format!("{} peaks fit:", self.peaks.len()));
        for peak in &self.peaks {
            lines.push(format!(
                "CF {:6.2}   PW {:6.3}   BW {:6.2}",
                peak.cf, peak.pw, peak.bw
            ));
        }
        lines.push(String::new());
        lines.push(format!(
            "Error: {:.4}   R^2: {:.4}",
            self.error, self.r_squared
        ));
        frame(&lines)
    }

    fn settings_text(&self) -> String {
        frame(&[
            "MODEL SETTINGS".to_string(),
            String::new(),
            format!("Seed : {}", self.seed),
            "Frequency resolution : 0.25 Hz".to_string(),
            format!(
                "Aperiodic mode : {}",
                if self.knee.is_some() { "knee" } else { "fixed" }
            ),
        ])
    }
}

impl ModelReport for SimModel {
    fn plot(&self, area: &DrawingArea<SVGBackend<'_>, Shift>) -> Result<(), Box<dyn Error>> {
        let y_min = self
            .spectrum
            .iter()
            .chain(&self.model_fit)
            .fold(f32::INFINITY, |m, &y| m.min(y));
        let y_max = self
            .spectrum
            .iter()
            .chain(&self.model_fit)
            .fold(f32::NEG_INFINITY, |m, &y| m.max(y));
        let (y_lo, y_hi) = padded_range(y_min, y_max);
        let x_hi = self.freqs.last().copied().unwrap_or(1.0);

        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(self.freqs[0]..x_hi, y_lo..y_hi)?;
        chart
            .configure_mesh()
            .x_desc("Frequency")
            .y_desc("log(Power)")
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                self.freqs.iter().copied().zip(self.spectrum.iter().copied()),
                &BLACK,
            ))?
            .label("Original Spectrum")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

        chart
            .draw_series(LineSeries::new(
                self.freqs.iter().copied().zip(self.model_fit.iter().copied()),
                RED.stroke_width(2),
            ))?
            .label("Full Model Fit")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

        chart
            .draw_series(LineSeries::new(
                self.freqs
                    .iter()
                    .copied()
                    .zip(self.aperiodic_fit.iter().copied()),
                BLUE.stroke_width(2),
            ))?
            .label("Aperiodic Fit")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }
}

/// A simulated group of model fits over many spectra.
#[derive(Clone, Debug)]
pub struct SimGroup {
    pub results: ModelResults,
    pub n_spectra: usize,
    pub seed: u64,
}

pub fn sim_group(spec: &SimSpec) -> SimGroup {
    SimGroup {
        results: sim_group_results(spec),
        n_spectra: spec.n_spectra,
        seed: spec.seed,
    }
}

fn scatter_panel(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    xs: &[f32],
    ys: &[f32],
    x_desc: &str,
    y_desc: &str,
    color: RGBColor,
) -> Result<(), Box<dyn Error>> {
    let points: Vec<(f32, f32)> = xs
        .iter()
        .zip(ys.iter())
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();

    let (x_lo, x_hi) = match points.iter().map(|p| p.0).fold(
        (f32::INFINITY, f32::NEG_INFINITY),
        |(lo, hi), x| (lo.min(x), hi.max(x)),
    ) {
        (lo, hi) if lo.is_finite() => padded_range(lo, hi),
        _ => (0.0, 1.0),
    };
    let (y_lo, y_hi) = match points.iter().map(|p| p.1).fold(
        (f32::INFINITY, f32::NEG_INFINITY),
        |(lo, hi), y| (lo.min(y), hi.max(y)),
    ) {
        (lo, hi) if lo.is_finite() => padded_range(lo, hi),
        _ => (0.0, 1.0),
    };

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;
    chart.draw_series(
        points
            .into_iter()
            .map(|(x, y)| Circle::new((x, y), 4, color.mix(0.7).filled())),
    )?;
    Ok(())
}

impl ReportText for SimGroup {
    fn results_text(&self) -> String {
        let bands = crate::data::utils::band_labels_of(&self.results);
        frame(&[
            "GROUP RESULTS".to_string(),
            String::new(),
            format!("Number of spectra: {}", self.n_spectra),
            format!(
                "Bands fit: {}",
                if bands.is_empty() {
                    "none".to_string()
                } else {
                    bands.join(", ")
                }
            ),
            String::new(),
            format!(
                "Aperiodic exponent (mean): {:.3}",
                finite_mean(series(&self.results, "exponent"))
            ),
            format!(
                "Error (mean): {:.4}   R^2 (mean): {:.4}",
                finite_mean(series(&self.results, "error")),
                finite_mean(series(&self.results, "r_squared"))
            ),
        ])
    }

    fn settings_text(&self) -> String {
        frame(&[
            "GROUP SETTINGS".to_string(),
            String::new(),
            format!("Seed : {}", self.seed),
            format!("Spectra : {}", self.n_spectra),
        ])
    }
}

impl GroupReport for SimGroup {
    fn plot_aperiodic(
        &self,
        area: &DrawingArea<SVGBackend<'_>, Shift>,
    ) -> Result<(), Box<dyn Error>> {
        scatter_panel(
            area,
            series(&self.results, "offset"),
            series(&self.results, "exponent"),
            "Offset",
            "Exponent",
            cycle_color(0),
        )
    }

    fn plot_goodness(
        &self,
        area: &DrawingArea<SVGBackend<'_>, Shift>,
    ) -> Result<(), Box<dyn Error>> {
        scatter_panel(
            area,
            series(&self.results, "error"),
            series(&self.results, "r_squared"),
            "Error",
            "R^2",
            cycle_color(1),
        )
    }

    fn plot_peak_frequencies(
        &self,
        area: &DrawingArea<SVGBackend<'_>, Shift>,
    ) -> Result<(), Box<dyn Error>> {
        let cfs: Vec<f32> = band_records(&self.results)?
            .iter()
            .flat_map(|record| record.cf.iter().copied())
            .filter(|cf| cf.is_finite())
            .collect();

        let (min, max) = cfs
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &cf| {
                (lo.min(cf), hi.max(cf))
            });
        let (min, max) = if min.is_finite() {
            ((min - 2.0).max(0.0), max + 2.0)
        } else {
            (0.0, 1.0)
        };

        let counts = histogram_counts(&cfs, min, max, 1.0);
        let y_max = counts
            .iter()
            .map(|(_, c)| *c as f32)
            .fold(0.0f32, f32::max)
            .max(1.0);

        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(min..max, 0.0f32..(y_max * 1.1))?;
        chart
            .configure_mesh()
            .x_desc("Peak Center Frequency")
            .y_desc("count")
            .draw()?;

        for (bin_start, count) in counts {
            chart.draw_series(std::iter::once(Rectangle::new(
                [(bin_start, 0.0), (bin_start + 1.0, count as f32)],
                cycle_color(0).mix(0.6).filled(),
            )))?;
        }
        Ok(())
    }
}

fn line_panel(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    series_set: &[(&str, &[f32], RGBColor)],
    y_desc: &str,
) -> Result<(), Box<dyn Error>> {
    let x_max = series_set
        .iter()
        .map(|(_, vals, _)| vals.len())
        .max()
        .unwrap_or(1)
        .max(1) as f32;

    let (mut y_lo, mut y_hi) = (f32::INFINITY, f32::NEG_INFINITY);
    for (_, vals, _) in series_set {
        for &v in vals.iter().filter(|v| v.is_finite()) {
            y_lo = y_lo.min(v);
            y_hi = y_hi.max(v);
        }
    }
    let (y_lo, y_hi) = if y_lo.is_finite() {
        padded_range(y_lo, y_hi)
    } else {
        (0.0, 1.0)
    };

    let mut chart = ChartBuilder::on(area)
        .margin(5)
        .x_label_area_size(25)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0f32..x_max, y_lo..y_hi)?;
    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc(y_desc)
        .draw()?;

    for (label, vals, color) in series_set {
        let color = *color;
        let points: Vec<(f32, f32)> = vals
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| (i as f32, v))
            .collect();
        chart
            .draw_series(LineSeries::new(points, color))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

/// Simulated spectrogram fit: parameters over time bins.
#[derive(Clone, Debug)]
pub struct SimTime {
    pub results: ModelResults,
    pub seed: u64,
}

pub fn sim_time(spec: &SimSpec) -> SimTime {
    SimTime {
        results: sim_time_results(spec),
        seed: spec.seed,
    }
}

impl ReportText for SimTime {
    fn results_text(&self) -> String {
        let bands = crate::data::utils::band_labels_of(&self.results);
        let n_times = series(&self.results, "exponent").len();
        frame(&[
            "SPECTROGRAM RESULTS".to_string(),
            String::new(),
            format!("Time bins: {n_times}"),
            format!(
                "Bands fit: {}",
                if bands.is_empty() {
                    "none".to_string()
                } else {
                    bands.join(", ")
                }
            ),
            String::new(),
            format!(
                "Aperiodic exponent (mean): {:.3}",
                finite_mean(series(&self.results, "exponent"))
            ),
            format!(
                "Error (mean): {:.4}   R^2 (mean): {:.4}",
                finite_mean(series(&self.results, "error")),
                finite_mean(series(&self.results, "r_squared"))
            ),
        ])
    }

    fn settings_text(&self) -> String {
        frame(&[
            "SPECTROGRAM SETTINGS".to_string(),
            String::new(),
            format!("Seed : {}", self.seed),
        ])
    }
}

impl TimeReport for SimTime {
    fn results(&self) -> &ModelResults {
        &self.results
    }

    fn plot(&self, panels: &[DrawingArea<SVGBackend<'_>, Shift>]) -> Result<(), Box<dyn Error>> {
        let mut panels = panels.iter();

        if let Some(panel) = panels.next() {
            line_panel(
                panel,
                &[
                    ("Offset", series(&self.results, "offset"), cycle_color(0)),
                    ("Exponent", series(&self.results, "exponent"), cycle_color(1)),
                ],
                "Aperiodic",
            )?;
        }
        if let Some(panel) = panels.next() {
            line_panel(
                panel,
                &[
                    ("Error", series(&self.results, "error"), cycle_color(2)),
                    ("R^2", series(&self.results, "r_squared"), cycle_color(3)),
                ],
                "Goodness",
            )?;
        }
        for (i, record) in band_records(&self.results)?.iter().enumerate() {
            let Some(panel) = panels.next() else { break };
            let label = if record.label.is_empty() {
                "peak"
            } else {
                record.label.as_str()
            };
            line_panel(
                panel,
                &[(label, record.cf.as_slice(), cycle_color(4 + i))],
                "Center Frequency",
            )?;
        }
        Ok(())
    }
}

/// Simulated event-set fit: per key, an event × time matrix.
#[derive(Clone, Debug)]
pub struct SimEvent {
    pub results: ModelResults,
    pub seed: u64,
}

pub fn sim_event(spec: &SimSpec) -> SimEvent {
    SimEvent {
        results: sim_event_results(spec),
        seed: spec.seed,
    }
}

impl ReportText for SimEvent {
    fn results_text(&self) -> String {
        let bands = crate::data::utils::band_labels_of(&self.results);
        let n_events = self
            .results
            .get("exponent")
            .and_then(|v| v.matrix())
            .map(|m| m.len())
            .unwrap_or(0);
        frame(&[
            "EVENT SET RESULTS".to_string(),
            String::new(),
            format!("Events: {n_events}"),
            format!(
                "Bands fit: {}",
                if bands.is_empty() {
                    "none".to_string()
                } else {
                    bands.join(", ")
                }
            ),
        ])
    }

    fn settings_text(&self) -> String {
        frame(&[
            "EVENT SET SETTINGS".to_string(),
            String::new(),
            format!("Seed : {}", self.seed),
        ])
    }
}

impl EventReport for SimEvent {
    fn results(&self) -> &ModelResults {
        &self.results
    }

    fn plot(&self, panels: &[DrawingArea<SVGBackend<'_>, Shift>]) -> Result<(), Box<dyn Error>> {
        // Thin rows in the layout are spacers, not data panels.
        let mut panels = panels.iter().filter(|p| p.dim_in_pixel().1 >= 40);

        for (i, (key, value)) in self.results.iter().enumerate() {
            let Some(matrix) = value.matrix() else { continue };
            let Some(panel) = panels.next() else { break };

            let n_cols = matrix.iter().map(|row| row.len()).max().unwrap_or(0);
            let mean: Vec<f32> = (0..n_cols)
                .map(|t| {
                    let column: Vec<f32> = matrix
                        .iter()
                        .filter_map(|row| row.get(t).copied())
                        .collect();
                    finite_mean(&column)
                })
                .collect();

            line_panel(panel, &[(key, mean.as_slice(), cycle_color(i))], key)?;
        }
        Ok(())
    }
}
