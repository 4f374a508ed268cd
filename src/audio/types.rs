use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// Mono audio, read-only once built.
#[derive(Clone, Debug)]
pub struct Signal {
    samples: Vec<f32>,
    sample_rate: f32,
}

impl Signal {
    pub fn new(samples: Vec<f32>, sample_rate: f32) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(AnalysisError::config(format!(
                "sample rate must be positive, got {}",
                sample_rate
            )));
        }
        if samples.is_empty() {
            return Err(AnalysisError::invalid_input("signal", "no samples"));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Time in seconds of the given sample index.
    pub fn seconds_at(&self, index: usize) -> f32 {
        index as f32 / self.sample_rate
    }

    pub fn duration(&self) -> f32 {
        self.seconds_at(self.samples.len())
    }
}

/// Half-open sample range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WindowRange {
    pub start: usize,
    pub end: usize,
}

/// One-sided magnitude spectrum of a window.
#[derive(Clone, Debug, Default)]
pub struct Spectrum {
    pub frequencies: Vec<f32>,
    pub magnitudes: Vec<f32>,
}

/// Per-window drum detection result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Classification {
    pub window: WindowRange,
    pub snare_present: bool,
    pub bass_present: bool,
    /// Sum of magnitudes in the snare band, `None` if no bin fell inside it
    pub snare_energy: Option<f32>,
    pub bass_energy: Option<f32>,
}

impl Classification {
    /// Snare and bass drum hit in the same window.
    pub fn is_blast(&self) -> bool {
        self.snare_present && self.bass_present
    }
}

/// Detected blast passage in sample indices, end exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BlastRange {
    pub start_sample: usize,
    pub end_sample: usize,
}

impl BlastRange {
    pub fn to_seconds(&self, sample_rate: f32) -> (f32, f32) {
        (
            self.start_sample as f32 / sample_rate,
            self.end_sample as f32 / sample_rate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_rejects_bad_sample_rate() {
        assert!(matches!(
            Signal::new(vec![0.0; 4], 0.0),
            Err(AnalysisError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Signal::new(vec![0.0; 4], f32::NAN),
            Err(AnalysisError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn signal_rejects_empty_samples() {
        assert!(matches!(
            Signal::new(Vec::new(), 44100.0),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn signal_time_axis() {
        let signal = Signal::new(vec![0.0; 25], 10.0).unwrap();
        assert_eq!(signal.seconds_at(10), 1.0);
        assert_eq!(signal.duration(), 2.5);
    }

    #[test]
    fn blast_range_in_seconds() {
        let range = BlastRange {
            start_sample: 4410,
            end_sample: 22050,
        };
        let (start, end) = range.to_seconds(44100.0);
        assert!((start - 0.1).abs() < 1e-6);
        assert!((end - 0.5).abs() < 1e-6);
    }
}
