use std::fs;
use std::path::PathBuf;

use specviz::report::{
    save_event_report, save_group_report, save_model_report, save_time_report, ReportOptions,
};
use specviz::sim::{sim_event, sim_group, sim_model, sim_time, SimSpec};

fn unique_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!(
        "specviz_report_test_{}_{}",
        name,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    fs::create_dir_all(&p).unwrap();
    p
}

fn assert_svg_page(path: &PathBuf) {
    let contents = fs::read_to_string(path).expect("report file readable");
    assert!(contents.contains("<svg"), "not an svg page: {}", path.display());
}

#[test]
fn model_report_writes_one_svg_page() {
    let dir = unique_dir("model");
    let model = sim_model(&SimSpec::demo_defaults());

    let path =
        save_model_report(&model, "model_report", Some(&dir), &ReportOptions::default()).unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("svg"));
    assert_svg_page(&path);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn group_report_writes_one_svg_page() {
    let dir = unique_dir("group");
    let group = sim_group(&SimSpec::demo_defaults());

    let path =
        save_group_report(&group, "group_report", Some(&dir), &ReportOptions::default()).unwrap();
    assert_svg_page(&path);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn time_report_scales_with_bands() {
    let dir = unique_dir("time");
    let time = sim_time(&SimSpec::demo_defaults());

    let path =
        save_time_report(&time, "time_report", Some(&dir), &ReportOptions::default()).unwrap();
    assert_svg_page(&path);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn time_report_accepts_zero_bands() {
    let dir = unique_dir("time_nobands");
    let spec = SimSpec {
        bands: Vec::new(),
        ..SimSpec::demo_defaults()
    };
    let time = sim_time(&spec);

    let path = save_time_report(&time, "no_bands", Some(&dir), &ReportOptions::default()).unwrap();
    assert_svg_page(&path);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn event_report_handles_knee_layouts() {
    let dir = unique_dir("event");

    let plain = sim_event(&SimSpec::demo_defaults());
    let path =
        save_event_report(&plain, "event_plain", Some(&dir), &ReportOptions::default()).unwrap();
    assert_svg_page(&path);

    let spec = SimSpec {
        knee: true,
        ..SimSpec::demo_defaults()
    };
    let kneed = sim_event(&spec);
    let path =
        save_event_report(&kneed, "event_knee", Some(&dir), &ReportOptions::default()).unwrap();
    assert_svg_page(&path);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn settings_block_can_be_dropped() {
    let dir = unique_dir("nosettings");
    let model = sim_model(&SimSpec::demo_defaults());
    let opts = ReportOptions {
        add_settings: false,
        ..Default::default()
    };

    let path = save_model_report(&model, "no_settings", Some(&dir), &opts).unwrap();
    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("MODEL SETTINGS"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn extension_is_appended_once() {
    let dir = unique_dir("ext");
    let model = sim_model(&SimSpec::demo_defaults());

    let path =
        save_model_report(&model, "named.svg", Some(&dir), &ReportOptions::default()).unwrap();
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("named.svg"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn unwritable_target_fails_the_whole_report() {
    let mut missing = std::env::temp_dir();
    missing.push("specviz_report_test_does_not_exist");
    missing.push("deeper");

    let model = sim_model(&SimSpec::demo_defaults());
    let result = save_model_report(&model, "never", Some(&missing), &ReportOptions::default());
    assert!(result.is_err(), "report into a missing directory must fail");
}
