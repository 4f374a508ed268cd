use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::audio::analysis::Analysis;
use crate::audio::types::{BlastRange, Classification, Signal};

/// Serializable summary of one run, shaped for plotting tools.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub input: String,
    pub sample_rate: f32,
    pub total_samples: usize,
    pub duration_secs: f32,
    pub step_seconds: f64,
    pub blasts: Vec<BlastEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows: Option<&'a [Classification]>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BlastEntry {
    pub start_sample: usize,
    pub end_sample: usize,
    pub start_secs: f32,
    pub end_secs: f32,
}

impl BlastEntry {
    fn new(range: &BlastRange, sample_rate: f32) -> Self {
        let (start_secs, end_secs) = range.to_seconds(sample_rate);
        Self {
            start_sample: range.start_sample,
            end_sample: range.end_sample,
            start_secs,
            end_secs,
        }
    }
}

impl<'a> Report<'a> {
    pub fn new(
        input: &Path,
        signal: &Signal,
        step_seconds: f64,
        analysis: &'a Analysis,
        include_windows: bool,
    ) -> Self {
        let sample_rate = signal.sample_rate();
        Self {
            input: input.display().to_string(),
            sample_rate,
            total_samples: signal.len(),
            duration_secs: signal.duration(),
            step_seconds,
            blasts: analysis
                .blasts
                .iter()
                .map(|b| BlastEntry::new(b, sample_rate))
                .collect(),
            windows: include_windows.then_some(analysis.classifications.as_slice()),
        }
    }

    pub fn print(&self) {
        println!("{} ({:.1}s @ {}Hz)", self.input, self.duration_secs, self.sample_rate);

        if let Some(windows) = self.windows {
            println!("Windows:");
            for (i, w) in windows.iter().enumerate() {
                println!(
                    "  [{:4}] {:>8.2}s  snare {:<5} ({})  bass {:<5} ({})",
                    i,
                    w.window.start as f32 / self.sample_rate,
                    w.snare_present,
                    format_energy(w.snare_energy),
                    w.bass_present,
                    format_energy(w.bass_energy),
                );
            }
        }

        if self.blasts.is_empty() {
            println!("No blast beats found");
            return;
        }
        println!("Blast beats:");
        for b in &self.blasts {
            println!(
                "  {}  -  {}  ({:.1}s)",
                format_time(b.start_secs),
                format_time(b.end_secs),
                b.end_secs - b.start_secs
            );
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        log::info!("Wrote report to {}", path.display());
        Ok(())
    }
}

fn format_energy(energy: Option<f32>) -> String {
    energy.map_or_else(|| "-".to_string(), |e| format!("{:.1}", e))
}

fn format_time(secs: f32) -> String {
    let total_secs = secs as u64;
    let centis = ((secs - total_secs as f32) * 100.0) as u64;
    format!("{:02}:{:02}.{:02}", total_secs / 60, total_secs % 60, centis)
}
