use super::types::Spectrum;
use crate::config::DetectorConfig;
use crate::error::{AnalysisError, Result};

pub const DEFAULT_BAND_HALF_WIDTH_HZ: f32 = 10.0;
/// Empirically tuned on drum stems; not a physical unit.
pub const DEFAULT_INTENSITY_THRESHOLD: f32 = 37.6;
pub const DEFAULT_BASS_HZ: f32 = 50.0;
pub const DEFAULT_SNARE_HZ: f32 = 300.0;

/// Decides whether a spectrum carries enough magnitude around a frequency.
///
/// The sum of magnitudes inside `[f - w, f + w]` stands in for band energy.
/// The threshold is absolute, so results depend on input amplitude scaling.
#[derive(Clone, Copy, Debug)]
pub struct BandDetector {
    half_width_hz: f32,
    threshold: f32,
}

impl Default for BandDetector {
    fn default() -> Self {
        Self {
            half_width_hz: DEFAULT_BAND_HALF_WIDTH_HZ,
            threshold: DEFAULT_INTENSITY_THRESHOLD,
        }
    }
}

impl BandDetector {
    pub fn new(half_width_hz: f32, threshold: f32) -> Result<Self> {
        if !half_width_hz.is_finite() || half_width_hz <= 0.0 {
            return Err(AnalysisError::config(format!(
                "band half-width must be positive, got {}",
                half_width_hz
            )));
        }
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(AnalysisError::config(format!(
                "intensity threshold must be positive, got {}",
                threshold
            )));
        }
        Ok(Self {
            half_width_hz,
            threshold,
        })
    }

    /// Sum of magnitudes of the bins within the band, `None` if the band is empty.
    pub fn band_energy(&self, spectrum: &Spectrum, target_hz: f32) -> Option<f32> {
        let low = target_hz - self.half_width_hz;
        let high = target_hz + self.half_width_hz;

        let mut in_band = spectrum
            .frequencies
            .iter()
            .zip(spectrum.magnitudes.iter())
            .filter(|&(&f, _)| f >= low && f <= high)
            .map(|(_, &m)| m)
            .peekable();

        in_band.peek()?;
        Some(in_band.sum())
    }

    pub fn is_present(&self, spectrum: &Spectrum, target_hz: f32) -> bool {
        self.exceeds(self.band_energy(spectrum, target_hz))
    }

    fn exceeds(&self, energy: Option<f32>) -> bool {
        energy.map_or(false, |e| e > self.threshold)
    }
}

/// Outcome of classifying one spectrum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrumHits {
    pub snare_present: bool,
    pub bass_present: bool,
    pub snare_energy: Option<f32>,
    pub bass_energy: Option<f32>,
}

/// Runs the band detector around the bass drum and snare frequencies.
#[derive(Clone, Copy, Debug)]
pub struct DrumClassifier {
    bass_hz: f32,
    snare_hz: f32,
    band: BandDetector,
}

impl Default for DrumClassifier {
    fn default() -> Self {
        Self {
            bass_hz: DEFAULT_BASS_HZ,
            snare_hz: DEFAULT_SNARE_HZ,
            band: BandDetector::default(),
        }
    }
}

impl DrumClassifier {
    pub fn new(bass_hz: f32, snare_hz: f32, band: BandDetector) -> Result<Self> {
        for (name, hz) in [("bass", bass_hz), ("snare", snare_hz)] {
            if !hz.is_finite() || hz < 0.0 {
                return Err(AnalysisError::config(format!(
                    "{} frequency must be non-negative, got {}",
                    name, hz
                )));
            }
        }
        Ok(Self {
            bass_hz,
            snare_hz,
            band,
        })
    }

    pub fn from_config(config: &DetectorConfig) -> Result<Self> {
        let band = BandDetector::new(config.band_half_width_hz, config.intensity_threshold)?;
        Self::new(config.bass_hz, config.snare_hz, band)
    }

    pub fn classify(&self, spectrum: &Spectrum) -> DrumHits {
        let snare_energy = self.band.band_energy(spectrum, self.snare_hz);
        let bass_energy = self.band.band_energy(spectrum, self.bass_hz);

        DrumHits {
            snare_present: self.band.exceeds(snare_energy),
            bass_present: self.band.exceeds(bass_energy),
            snare_energy,
            bass_energy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::spectrum::tests::{compute, tone};

    fn flat(bins: usize, bin_hz: f32, magnitude: f32) -> Spectrum {
        Spectrum {
            frequencies: (0..bins).map(|i| i as f32 * bin_hz).collect(),
            magnitudes: vec![magnitude; bins],
        }
    }

    #[test]
    fn band_edges_are_inclusive() {
        // bins at 0, 10, 20, ..., band around 50 covers 40, 50, 60
        let spectrum = flat(20, 10.0, 1.0);
        let band = BandDetector::default();
        assert_eq!(band.band_energy(&spectrum, 50.0), Some(3.0));
    }

    #[test]
    fn threshold_is_strict() {
        let spectrum = flat(20, 10.0, 1.0);
        let at = BandDetector::new(10.0, 3.0).unwrap();
        let below = BandDetector::new(10.0, 2.999).unwrap();
        assert!(!at.is_present(&spectrum, 50.0));
        assert!(below.is_present(&spectrum, 50.0));
    }

    #[test]
    fn empty_band_is_absent_for_any_threshold() {
        // 0, 100, 200, ... Hz: nothing within 50 +/- 10
        let spectrum = flat(10, 100.0, 1000.0);
        for threshold in [1e-6, 1.0, 37.6, 1e9] {
            let band = BandDetector::new(10.0, threshold).unwrap();
            assert_eq!(band.band_energy(&spectrum, 50.0), None);
            assert!(!band.is_present(&spectrum, 50.0));
        }
        assert!(!BandDetector::default().is_present(&Spectrum::default(), 50.0));
    }

    #[test]
    fn raising_threshold_never_flips_absent_to_present() {
        let window = tone(300.0, 0.2, 4000.0, 400);
        let spectrum = compute(&window, 4000.0).unwrap();
        let mut seen_absent = false;
        for step in 1..200 {
            let band = BandDetector::new(10.0, step as f32).unwrap();
            let present = band.is_present(&spectrum, 300.0);
            if seen_absent {
                assert!(!present, "threshold {} flipped back to present", step);
            }
            seen_absent |= !present;
        }
        assert!(seen_absent);
    }

    #[test]
    fn rejects_non_positive_parameters() {
        assert!(BandDetector::new(0.0, 37.6).is_err());
        assert!(BandDetector::new(10.0, 0.0).is_err());
        assert!(BandDetector::new(10.0, -1.0).is_err());
        assert!(DrumClassifier::new(-50.0, 300.0, BandDetector::default()).is_err());
        assert!(DrumClassifier::new(50.0, f32::INFINITY, BandDetector::default()).is_err());
    }

    #[test]
    fn classifier_detects_each_drum_independently() {
        let sr = 4410.0;
        let len = 441; // 10 Hz bins
        let classifier = DrumClassifier::default();

        let bass = tone(50.0, 1.0, sr, len);
        let hits = classifier.classify(&compute(&bass, sr).unwrap());
        assert!(hits.bass_present);
        assert!(!hits.snare_present);

        let snare = tone(300.0, 1.0, sr, len);
        let hits = classifier.classify(&compute(&snare, sr).unwrap());
        assert!(!hits.bass_present);
        assert!(hits.snare_present);

        let both: Vec<f32> = bass.iter().zip(&snare).map(|(a, b)| a + b).collect();
        let hits = classifier.classify(&compute(&both, sr).unwrap());
        assert!(hits.bass_present && hits.snare_present);

        let silence = vec![0.0; len];
        let hits = classifier.classify(&compute(&silence, sr).unwrap());
        assert!(!hits.bass_present && !hits.snare_present);
        assert_eq!(hits.bass_energy, Some(0.0));
    }

    #[test]
    fn builds_from_config() {
        let config = DetectorConfig {
            bass_hz: 60.0,
            snare_hz: 250.0,
            band_half_width_hz: 5.0,
            intensity_threshold: 1.0,
        };
        let classifier = DrumClassifier::from_config(&config).unwrap();
        let spectrum = flat(100, 5.0, 1.0);
        let hits = classifier.classify(&spectrum);
        // 55, 60, 65 Hz and 245, 250, 255 Hz
        assert_eq!(hits.bass_energy, Some(3.0));
        assert_eq!(hits.snare_energy, Some(3.0));
        assert!(hits.bass_present && hits.snare_present);
    }
}
