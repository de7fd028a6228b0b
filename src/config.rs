use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Page geometry and typography for report rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "ReportConfig::default_page_width")]
    pub page_width: u32,
    #[serde(default = "ReportConfig::default_page_height")]
    pub page_height: u32,
    #[serde(default = "ReportConfig::default_font_px")]
    pub font_px: i32,
}

impl ReportConfig {
    fn default_page_width() -> u32 {
        1600
    }
    fn default_page_height() -> u32 {
        2000
    }
    fn default_font_px() -> i32 {
        16
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page_width: Self::default_page_width(),
            page_height: Self::default_page_height(),
            font_px: Self::default_font_px(),
        }
    }
}

impl ReportConfig {
    /// Load the config from `path`, falling back to defaults on any
    /// read/parse problem. When the file does not exist, write a fully
    /// commented default file so the knobs are discoverable.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        eprintln!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    eprintln!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        // File does not exist: write commented defaults and return them.
        let default_cfg = Self::default();
        if let Ok(text) = toml::to_string_pretty(&default_cfg) {
            let mut commented = String::new();
            for line in text.lines() {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    commented.push('\n');
                } else {
                    commented.push_str("# ");
                    commented.push_str(line);
                    commented.push('\n');
                }
            }
            if let Err(err) = fs::write(path_obj, commented) {
                eprintln!("Failed to write default config to {path}: {err}");
            }
        } else {
            eprintln!("Failed to serialize default config; continuing with defaults");
        }
        default_cfg
    }
}
