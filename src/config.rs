use std::f64::consts::{FRAC_PI_2, PI};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::radial::SceneOptions;
use crate::radial::color::HeatGradient;
use crate::radial::layout::{CellMeasure, LayoutParams};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub radial: RadialConfig,
    pub colors: ColorsConfig,
    pub keybinds: KeybindsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    pub color_support: String,
    pub show_usage_panel: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 5000,
            color_support: "auto".to_string(),
            show_usage_panel: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RadialConfig {
    pub edge_radius: f64,
    pub label_padding: f64,
    /// Scene units per terminal cell when measuring labels.
    pub label_cell_width: f64,
    pub min_angle_range: f64,
    pub max_angle_range: f64,
    pub curve_offset: f64,
    pub zoom_step: f64,
    /// Cells moved per arrow key press.
    pub pan_step: u16,
    pub excluded_names: Vec<String>,
}

impl Default for RadialConfig {
    fn default() -> Self {
        RadialConfig {
            edge_radius: 500.0,
            label_padding: 30.0,
            label_cell_width: 9.0,
            min_angle_range: PI / 10.0,
            max_angle_range: FRAC_PI_2,
            curve_offset: -50.0,
            zoom_step: 1.1,
            pan_step: 4,
            excluded_names: vec!["System Idle Process".to_string()],
        }
    }
}

impl RadialConfig {
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            edge_radius: self.edge_radius,
            label_padding: self.label_padding,
            min_angle_range: self.min_angle_range,
            max_angle_range: self.max_angle_range,
            curve_offset: self.curve_offset,
        }
    }

    pub fn measure(&self) -> CellMeasure {
        CellMeasure {
            cell_width: self.label_cell_width,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub theme: String,
    pub cool: String,
    pub hot: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            theme: "dark".to_string(),
            cool: "#458588".to_string(),
            hot: "#ff0000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub zoom_in: String,
    pub zoom_out: String,
    pub reset_view: String,
    pub refresh: String,
    pub toggle_usage: String,
    pub help: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            zoom_in: "+".to_string(),
            zoom_out: "-".to_string(),
            reset_view: "0".to_string(),
            refresh: "r".to_string(),
            toggle_usage: "s".to_string(),
            help: "?".to_string(),
        }
    }
}

impl Config {
    pub fn scene_options(&self) -> SceneOptions {
        SceneOptions {
            params: self.radial.layout_params(),
            gradient: HeatGradient::from_hex(&self.colors.cool, &self.colors.hot),
            excluded_names: self.radial.excluded_names.clone(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("radialtop").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "invalid config, using defaults"
                );
                Config::default()
            }
        },
        Err(_) => Config::default(),
    }
}

pub fn parse_key(s: &str) -> Option<crossterm::event::KeyCode> {
    use crossterm::event::KeyCode;
    match s {
        "Enter" => Some(KeyCode::Enter),
        "Escape" | "Esc" => Some(KeyCode::Esc),
        "Tab" => Some(KeyCode::Tab),
        "Backspace" => Some(KeyCode::Backspace),
        "Delete" => Some(KeyCode::Delete),
        "Space" => Some(KeyCode::Char(' ')),
        s if s.chars().count() == 1 => s.chars().next().map(KeyCode::Char),
        _ => None,
    }
}
