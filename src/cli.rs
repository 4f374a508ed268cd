use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "blastbeat", about = "Find blast beat passages in an isolated drum track")]
pub struct Cli {
    /// Input audio file, ideally a separated drums stem (WAV, MP3, FLAC, OGG)
    pub input: PathBuf,

    /// Config file (default: blastbeat.toml, then ~/.config/blastbeat/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Window length in seconds
    #[arg(short, long)]
    pub step: Option<f64>,

    /// Bass drum target frequency (Hz)
    #[arg(long)]
    pub bass_hz: Option<f32>,

    /// Snare target frequency (Hz)
    #[arg(long)]
    pub snare_hz: Option<f32>,

    /// Half-width of the band around each target frequency (Hz)
    #[arg(long)]
    pub band_width: Option<f32>,

    /// Summed magnitude a band must exceed to count as a hit
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Minimum number of consecutive snare+bass windows for a blast
    #[arg(short, long)]
    pub min_run: Option<usize>,

    /// Also report a blast that runs until the end of the song
    #[arg(long)]
    pub close_trailing_run: bool,

    /// Analyse windows on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Write a JSON report to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Include per-window classifications in the output
    #[arg(short, long)]
    pub windows: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Cli {
    /// Command-line values take precedence over the config file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(step) = self.step {
            config.analysis.step_seconds = step;
        }
        if self.sequential {
            config.analysis.parallel = false;
        }
        if let Some(hz) = self.bass_hz {
            config.detector.bass_hz = hz;
        }
        if let Some(hz) = self.snare_hz {
            config.detector.snare_hz = hz;
        }
        if let Some(width) = self.band_width {
            config.detector.band_half_width_hz = width;
        }
        if let Some(threshold) = self.threshold {
            config.detector.intensity_threshold = threshold;
        }
        if let Some(min_run) = self.min_run {
            config.blast.min_run_windows = min_run;
        }
        if self.close_trailing_run {
            config.blast.close_trailing_run = true;
        }
    }
}
