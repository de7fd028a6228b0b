use std::error::Error;
use std::fs::{create_dir_all, write};
use std::path::Path;

use clap::Parser;
use plotters::prelude::*;

use specviz::config::ReportConfig;
use specviz::data::utils::band_records;
use specviz::plot::peaks::{
    band_peak_matrix, plot_peak_fits, plot_peak_params, PeakParams, PeakPlotOptions, PeakSet,
};
use specviz::plot::style::CaptionStyler;
use specviz::report::{
    save_event_report, save_group_report, save_model_report, save_time_report, ReportOptions,
};
use specviz::sim::{
    sim_event, sim_group, sim_group_results, sim_model, sim_time, SimSpec,
};

/// Render a gallery of demo figures and reports from synthetic fits.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Output directory for figures
    #[arg(long, default_value = "target/plots/reports")]
    out_dir: String,

    /// Path to render config TOML
    #[arg(long, default_value = "specviz.toml")]
    config: String,

    /// Simulation seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Skip the settings text block in reports
    #[arg(long, default_value_t = false)]
    no_settings: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let out_dir = Path::new(&args.out_dir);
    create_dir_all(out_dir)?;

    let spec = SimSpec {
        seed: args.seed,
        ..SimSpec::demo_defaults()
    };
    let opts = ReportOptions {
        add_settings: !args.no_settings,
        config: ReportConfig::load_or_default(&args.config),
    };

    plot_peak_gallery(out_dir, &spec)?;
    write_band_csv(out_dir, &spec)?;

    save_model_report(&sim_model(&spec), "model_report", Some(out_dir), &opts)?;
    save_group_report(&sim_group(&spec), "group_report", Some(out_dir), &opts)?;
    save_time_report(&sim_time(&spec), "time_report", Some(out_dir), &opts)?;
    save_event_report(&sim_event(&spec), "event_report", Some(out_dir), &opts)?;

    println!("Saved demo reports to {}", out_dir.display());
    Ok(())
}

fn plot_peak_gallery(out_dir: &Path, spec: &SimSpec) -> Result<(), Box<dyn Error>> {
    let results = sim_group_results(spec);
    let records = band_records(&results)?;
    let groups: Vec<Vec<PeakParams>> = records.iter().map(band_peak_matrix).collect();
    let labels: Vec<String> = records
        .iter()
        .map(|r| {
            if r.label.is_empty() {
                "peak".to_string()
            } else {
                r.label.clone()
            }
        })
        .collect();

    let params_path = out_dir.join("peak_params.svg");
    {
        let root = SVGBackend::new(&params_path, (1200, 700)).into_drawing_area();
        root.fill(&WHITE)?;
        let opts = PeakPlotOptions {
            labels: labels.clone(),
            ..Default::default()
        };
        let caption = CaptionStyler::new("Peak Parameters");
        plot_peak_params(&root, &PeakSet::Groups(&groups), &opts, Some(&caption))?;
        root.present()?;
    }

    let fits_path = out_dir.join("peak_fits.svg");
    {
        let root = SVGBackend::new(&fits_path, (1200, 700)).into_drawing_area();
        root.fill(&WHITE)?;
        let opts = PeakPlotOptions {
            labels,
            ..Default::default()
        };
        let caption = CaptionStyler::new("Peak Fits");
        plot_peak_fits(&root, &PeakSet::Groups(&groups), &opts, Some(&caption))?;
        root.present()?;
    }
    Ok(())
}

fn write_band_csv(out_dir: &Path, spec: &SimSpec) -> Result<(), Box<dyn Error>> {
    let results = sim_group_results(spec);
    let records = band_records(&results)?;
    let mut csv = String::from("band,spectrum,cf,pw,bw\n");
    for record in &records {
        for i in 0..record.cf.len() {
            csv.push_str(&format!(
                "{},{},{:.4},{:.4},{:.4}\n",
                record.label, i, record.cf[i], record.pw[i], record.bw[i]
            ));
        }
    }
    write(out_dir.join("band_params.csv"), csv)?;
    Ok(())
}
