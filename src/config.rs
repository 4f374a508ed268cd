use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::audio::blast::DEFAULT_MIN_RUN_WINDOWS;
use crate::audio::detect::{
    DEFAULT_BAND_HALF_WIDTH_HZ, DEFAULT_BASS_HZ, DEFAULT_INTENSITY_THRESHOLD, DEFAULT_SNARE_HZ,
};
use crate::audio::segment::DEFAULT_STEP_SECONDS;
use crate::error::{AnalysisError, Result};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub blast: BlastConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Window length in seconds; governs time resolution.
    #[serde(default = "default_step_seconds")]
    pub step_seconds: f64,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    #[serde(default = "default_bass_hz")]
    pub bass_hz: f32,
    #[serde(default = "default_snare_hz")]
    pub snare_hz: f32,
    #[serde(default = "default_band_half_width_hz")]
    pub band_half_width_hz: f32,
    #[serde(default = "default_intensity_threshold")]
    pub intensity_threshold: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlastConfig {
    #[serde(default = "default_min_run_windows")]
    pub min_run_windows: usize,
    /// Report a run still open at the end of the song. Off by default.
    #[serde(default)]
    pub close_trailing_run: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            step_seconds: default_step_seconds(),
            parallel: default_parallel(),
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            bass_hz: default_bass_hz(),
            snare_hz: default_snare_hz(),
            band_half_width_hz: default_band_half_width_hz(),
            intensity_threshold: default_intensity_threshold(),
        }
    }
}

impl Default for BlastConfig {
    fn default() -> Self {
        Self {
            min_run_windows: default_min_run_windows(),
            close_trailing_run: false,
        }
    }
}

fn default_step_seconds() -> f64 { DEFAULT_STEP_SECONDS }
fn default_parallel() -> bool { true }
fn default_bass_hz() -> f32 { DEFAULT_BASS_HZ }
fn default_snare_hz() -> f32 { DEFAULT_SNARE_HZ }
fn default_band_half_width_hz() -> f32 { DEFAULT_BAND_HALF_WIDTH_HZ }
fn default_intensity_threshold() -> f32 { DEFAULT_INTENSITY_THRESHOLD }
fn default_min_run_windows() -> usize { DEFAULT_MIN_RUN_WINDOWS }

impl Config {
    /// Reject values that would make the analysis meaningless, before any
    /// audio is touched. Sample-rate dependent checks happen in the segmenter.
    pub fn validate(&self) -> Result<()> {
        let step = self.analysis.step_seconds;
        if !step.is_finite() || step <= 0.0 {
            return Err(AnalysisError::config(format!(
                "step_seconds must be positive, got {}",
                step
            )));
        }

        let d = &self.detector;
        positive("band_half_width_hz", d.band_half_width_hz)?;
        positive("intensity_threshold", d.intensity_threshold)?;
        non_negative("bass_hz", d.bass_hz)?;
        non_negative("snare_hz", d.snare_hz)?;

        if self.blast.min_run_windows == 0 {
            return Err(AnalysisError::config("min_run_windows must be at least 1"));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::config(format!("{} must be positive, got {}", name, value)))
    }
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::config(format!("{} must be non-negative, got {}", name, value)))
    }
}

/// Explicit path first, then `blastbeat.toml` in the working directory, then
/// the user's config directories.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("blastbeat.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("blastbeat").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("blastbeat").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Option<Config> {
    match toml::from_str(content) {
        Ok(config) => Some(config),
        Err(err) => {
            log::debug!("Config parse error: {}", err);
            None
        }
    }
}
