use indicatif::ProgressBar;
use rayon::prelude::*;
use rustfft::FftPlanner;

use super::detect::DrumClassifier;
use super::spectrum::magnitude_spectrum;
use super::types::{Classification, Signal, WindowRange};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};

pub const DEFAULT_STEP_SECONDS: f64 = 0.1;

/// Cuts a signal into fixed-length windows and classifies each one.
///
/// The last window keeps whatever samples remain, so its spectrum has a
/// coarser bin spacing than the others. It is analysed all the same.
pub struct Segmenter {
    step_seconds: f64,
    parallel: bool,
    classifier: DrumClassifier,
    progress: Option<ProgressBar>,
}

impl Segmenter {
    pub fn new(config: &AnalysisConfig, classifier: DrumClassifier) -> Result<Self> {
        let step_seconds = config.step_seconds;
        if !step_seconds.is_finite() || step_seconds <= 0.0 {
            return Err(AnalysisError::config(format!(
                "step duration must be positive, got {}s",
                step_seconds
            )));
        }
        Ok(Self {
            step_seconds,
            parallel: config.parallel,
            classifier,
            progress: None,
        })
    }

    /// Advance `progress` once per analysed window.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Window length in samples at the given rate.
    pub fn step_samples(&self, sample_rate: f32) -> Result<usize> {
        let step = (self.step_seconds * f64::from(sample_rate)).floor();
        if !step.is_finite() || step < 1.0 {
            return Err(AnalysisError::config(format!(
                "step of {}s is shorter than one sample at {} Hz",
                self.step_seconds, sample_rate
            )));
        }
        Ok(step as usize)
    }

    pub fn window_count(&self, signal: &Signal) -> Result<usize> {
        let step = self.step_samples(signal.sample_rate())?;
        Ok(signal.len().div_ceil(step))
    }

    /// One classification per window, in window order.
    pub fn classify(&self, signal: &Signal) -> Result<Vec<Classification>> {
        let sample_rate = signal.sample_rate();
        let step = self.step_samples(sample_rate)?;
        let samples = signal.samples();

        if samples.len() % step != 0 {
            log::debug!(
                "Trailing window has {} of {} samples",
                samples.len() % step,
                step
            );
        }

        let windows: Vec<WindowRange> = window_ranges(samples.len(), step).collect();

        if self.parallel {
            windows
                .par_iter()
                .enumerate()
                .map_init(FftPlanner::<f32>::new, |planner, (index, &window)| {
                    self.classify_window(planner, index, window, samples, sample_rate)
                })
                .collect()
        } else {
            let mut planner = FftPlanner::<f32>::new();
            windows
                .iter()
                .enumerate()
                .map(|(index, &window)| {
                    self.classify_window(&mut planner, index, window, samples, sample_rate)
                })
                .collect()
        }
    }

    fn classify_window(
        &self,
        planner: &mut FftPlanner<f32>,
        index: usize,
        window: WindowRange,
        samples: &[f32],
        sample_rate: f32,
    ) -> Result<Classification> {
        let spectrum = magnitude_spectrum(&samples[window.start..window.end], sample_rate, planner)
            .map_err(|e| e.in_window(index))?;
        let hits = self.classifier.classify(&spectrum);

        if let Some(ref pb) = self.progress {
            pb.inc(1);
        }

        Ok(Classification {
            window,
            snare_present: hits.snare_present,
            bass_present: hits.bass_present,
            snare_energy: hits.snare_energy,
            bass_energy: hits.bass_energy,
        })
    }
}

/// `[k*step, min((k+1)*step, len))` for every k covering `len`.
pub fn window_ranges(len: usize, step: usize) -> impl Iterator<Item = WindowRange> {
    (0..len).step_by(step.max(1)).map(move |start| WindowRange {
        start,
        end: (start + step).min(len),
    })
}
