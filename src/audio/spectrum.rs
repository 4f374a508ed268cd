use rustfft::{num_complex::Complex, FftPlanner};

use super::types::Spectrum;
use crate::error::{AnalysisError, Result};

const STAGE: &str = "spectral transform";

/// One-sided magnitude spectrum of `window`.
///
/// No window function is applied. Only bins `0..N/2` are kept, so the
/// Nyquist bin of an even-length window is dropped along with the mirrored
/// half. Bin `n` sits at `n * sample_rate / N` Hz.
pub fn magnitude_spectrum(
    window: &[f32],
    sample_rate: f32,
    planner: &mut FftPlanner<f32>,
) -> Result<Spectrum> {
    let n = window.len();
    if n == 0 {
        return Err(AnalysisError::invalid_input(STAGE, "zero-length window"));
    }

    let fft = planner.plan_fft_forward(n);
    let mut buffer: Vec<Complex<f32>> = window.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buffer);

    let half = n / 2;
    let bin_hz = sample_rate / n as f32;
    let frequencies = (0..half).map(|i| i as f32 * bin_hz).collect();
    let magnitudes = buffer[..half].iter().map(|c| c.norm()).collect();

    Ok(Spectrum {
        frequencies,
        magnitudes,
    })
}
