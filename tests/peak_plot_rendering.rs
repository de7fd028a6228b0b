use plotters::prelude::*;
use specviz::plot::peaks::{
    plot_peak_fits, plot_peak_params, PeakParams, PeakPlotOptions, PeakSet,
};

#[test]
fn single_set_scatter_renders() {
    let peaks = [
        PeakParams::new(10.0, 0.6, 1.2),
        PeakParams::new(21.0, 0.3, 2.0),
    ];
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (800, 600)).into_drawing_area();
        root.fill(&WHITE).unwrap();
        plot_peak_params(&root, &PeakSet::Single(&peaks), &PeakPlotOptions::default(), None)
            .unwrap();
        root.present().unwrap();
    }
    assert!(buf.contains("<svg"));
    assert!(buf.contains("Center Frequency"));
}

#[test]
fn grouped_scatter_draws_a_legend() {
    let groups = vec![
        vec![PeakParams::new(10.0, 0.6, 1.2)],
        vec![PeakParams::new(21.0, 0.3, 2.0)],
    ];
    let opts = PeakPlotOptions {
        labels: vec!["alpha".into(), "beta".into()],
        ..Default::default()
    };
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (800, 600)).into_drawing_area();
        root.fill(&WHITE).unwrap();
        plot_peak_params(&root, &PeakSet::Groups(&groups), &opts, None).unwrap();
        root.present().unwrap();
    }
    assert!(buf.contains("alpha"));
    assert!(buf.contains("beta"));
}

#[test]
fn missing_peaks_do_not_break_the_scatter() {
    let peaks = [
        PeakParams::new(f32::NAN, f32::NAN, f32::NAN),
        PeakParams::new(12.0, 0.5, 1.5),
    ];
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (800, 600)).into_drawing_area();
        root.fill(&WHITE).unwrap();
        plot_peak_params(&root, &PeakSet::Single(&peaks), &PeakPlotOptions::default(), None)
            .unwrap();
        root.present().unwrap();
    }
    assert!(buf.contains("<svg"));
}

#[test]
fn fits_render_with_default_range() {
    let peaks = [
        PeakParams::new(8.0, 0.6, 1.2),
        PeakParams::new(12.0, 0.4, 1.5),
    ];
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (800, 600)).into_drawing_area();
        root.fill(&WHITE).unwrap();
        plot_peak_fits(&root, &PeakSet::Single(&peaks), &PeakPlotOptions::default(), None)
            .unwrap();
        root.present().unwrap();
    }
    assert!(buf.contains("log(Power)"));
}

#[test]
fn fits_respect_an_explicit_range_with_missing_rows() {
    let groups = vec![
        vec![
            PeakParams::new(10.0, 0.6, 1.2),
            PeakParams::new(f32::NAN, f32::NAN, f32::NAN),
        ],
        vec![PeakParams::new(20.0, 0.3, 1.8)],
    ];
    let opts = PeakPlotOptions {
        freq_range: Some((3.0, 35.0)),
        labels: vec!["cond_a".into(), "cond_b".into()],
        ..Default::default()
    };
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (800, 600)).into_drawing_area();
        root.fill(&WHITE).unwrap();
        plot_peak_fits(&root, &PeakSet::Groups(&groups), &opts, None).unwrap();
        root.present().unwrap();
    }
    assert!(buf.contains("cond_a"));
    assert!(buf.contains("cond_b"));
}

#[test]
fn all_missing_peaks_render_an_empty_chart() {
    let peaks = [PeakParams::new(f32::NAN, f32::NAN, f32::NAN)];
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (800, 600)).into_drawing_area();
        root.fill(&WHITE).unwrap();
        plot_peak_fits(&root, &PeakSet::Single(&peaks), &PeakPlotOptions::default(), None)
            .unwrap();
        root.present().unwrap();
    }
    assert!(buf.contains("<svg"));
}
