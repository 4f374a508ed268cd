use indicatif::ProgressBar;

use super::blast::BlastDetector;
use super::detect::DrumClassifier;
use super::segment::Segmenter;
use super::types::{BlastRange, Classification, Signal};
use crate::config::Config;
use crate::error::Result;

/// Output of one pass over a song.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub classifications: Vec<Classification>,
    pub blasts: Vec<BlastRange>,
}

/// Classify every window of `signal`, then look for blast runs.
pub fn analyze(signal: &Signal, config: &Config, progress: Option<ProgressBar>) -> Result<Analysis> {
    config.validate()?;

    let classifier = DrumClassifier::from_config(&config.detector)?;
    let detector = BlastDetector::new(&config.blast)?;
    let mut segmenter = Segmenter::new(&config.analysis, classifier)?;

    let windows = segmenter.window_count(signal)?;
    if let Some(pb) = progress {
        pb.set_length(windows as u64);
        segmenter = segmenter.with_progress(pb);
    }

    log::info!(
        "Pass 1: Classifying {} windows of {:.3}s...",
        windows,
        config.analysis.step_seconds
    );
    let classifications = segmenter.classify(signal)?;

    let snare = classifications.iter().filter(|c| c.snare_present).count();
    let bass = classifications.iter().filter(|c| c.bass_present).count();
    let both = classifications.iter().filter(|c| c.is_blast()).count();
    log::info!(
        "Windows with snare: {}, bass drum: {}, both: {}",
        snare,
        bass,
        both
    );

    log::info!(
        "Pass 2: Blast runs (min {} windows)...",
        config.blast.min_run_windows
    );
    let blasts = detector.detect(&classifications);
    log::info!("Found {} blast passage(s)", blasts.len());

    Ok(Analysis {
        classifications,
        blasts,
    })
}
