use super::types::{BlastRange, Classification};
use crate::config::BlastConfig;
use crate::error::{AnalysisError, Result};

pub const DEFAULT_MIN_RUN_WINDOWS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunState {
    Idle,
    InRun { start: usize, count: usize },
}

/// Finds runs of consecutive windows where snare and bass drum co-occur.
///
/// A run is only reported once a non-blast window closes it. A run that
/// reaches the last window is dropped unless `close_trailing_run` is set.
#[derive(Clone, Copy, Debug)]
pub struct BlastDetector {
    min_run_windows: usize,
    close_trailing_run: bool,
}

impl Default for BlastDetector {
    fn default() -> Self {
        Self {
            min_run_windows: DEFAULT_MIN_RUN_WINDOWS,
            close_trailing_run: false,
        }
    }
}

impl BlastDetector {
    pub fn new(config: &BlastConfig) -> Result<Self> {
        if config.min_run_windows == 0 {
            return Err(AnalysisError::config("minimum run length must be at least 1"));
        }
        Ok(Self {
            min_run_windows: config.min_run_windows,
            close_trailing_run: config.close_trailing_run,
        })
    }

    pub fn detect(&self, classifications: &[Classification]) -> Vec<BlastRange> {
        let mut blasts = Vec::new();
        let mut state = RunState::Idle;

        for class in classifications {
            let window_start = class.window.start;
            state = match (state, class.is_blast()) {
                (RunState::Idle, true) => RunState::InRun {
                    start: window_start,
                    count: 1,
                },
                (RunState::InRun { start, count }, true) => RunState::InRun {
                    start,
                    count: count + 1,
                },
                (RunState::InRun { start, count }, false) => {
                    self.close(&mut blasts, start, window_start, count);
                    RunState::Idle
                }
                (RunState::Idle, false) => RunState::Idle,
            };
        }

        if let RunState::InRun { start, count } = state {
            if self.close_trailing_run {
                let end = classifications.last().map_or(start, |c| c.window.end);
                self.close(&mut blasts, start, end, count);
            } else if count >= self.min_run_windows {
                log::debug!(
                    "Run of {} windows from sample {} reaches the end of the song; not reported",
                    count,
                    start
                );
            }
        }

        blasts
    }

    fn close(&self, blasts: &mut Vec<BlastRange>, start: usize, end: usize, count: usize) {
        if count >= self.min_run_windows {
            log::debug!("Blast run of {} windows: samples {}..{}", count, start, end);
            blasts.push(BlastRange {
                start_sample: start,
                end_sample: end,
            });
        } else {
            log::trace!("Discarding run of {} windows at sample {}", count, start);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::types::WindowRange;

    /// Windows of `size` samples; `true` marks a snare+bass window.
    fn sequence(flags: &[bool], size: usize) -> Vec<Classification> {
        flags
            .iter()
            .enumerate()
            .map(|(i, &hit)| Classification {
                window: WindowRange {
                    start: i * size,
                    end: (i + 1) * size,
                },
                snare_present: hit,
                bass_present: hit,
                snare_energy: None,
                bass_energy: None,
            })
            .collect()
    }

    fn detector(min_run_windows: usize, close_trailing_run: bool) -> BlastDetector {
        BlastDetector::new(&BlastConfig {
            min_run_windows,
            close_trailing_run,
        })
        .unwrap()
    }

    #[test]
    fn ten_hertz_scenario() {
        // sample rate 10, 1 s steps: five 10-sample windows
        let classes = sequence(&[true, true, true, true, false], 10);
        assert_eq!(
            detector(4, false).detect(&classes),
            vec![BlastRange {
                start_sample: 0,
                end_sample: 40
            }]
        );
        assert!(detector(5, false).detect(&classes).is_empty());
    }

    #[test]
    fn run_one_short_of_minimum_is_dropped() {
        let classes = sequence(&[false, true, true, true, false, false], 100);
        assert!(BlastDetector::default().detect(&classes).is_empty());
    }

    #[test]
    fn run_of_exactly_minimum_is_reported() {
        let classes = sequence(&[false, true, true, true, true, false, false], 100);
        assert_eq!(
            BlastDetector::default().detect(&classes),
            vec![BlastRange {
                start_sample: 100,
                end_sample: 500
            }]
        );
    }

    #[test]
    fn run_touching_the_end_is_not_reported() {
        let classes = sequence(&[false, true, true, true, true, true, true], 100);
        assert!(BlastDetector::default().detect(&classes).is_empty());

        let all = sequence(&[true; 12], 100);
        assert!(BlastDetector::default().detect(&all).is_empty());
    }

    #[test]
    fn trailing_run_reported_when_enabled() {
        let mut classes = sequence(&[false, true, true, true, true, true], 100);
        classes.last_mut().unwrap().window.end = 537;
        assert_eq!(
            detector(4, true).detect(&classes),
            vec![BlastRange {
                start_sample: 100,
                end_sample: 537
            }]
        );

        let short = sequence(&[false, true, true], 100);
        assert!(detector(4, true).detect(&short).is_empty());
    }

    #[test]
    fn requires_both_drums() {
        let mut classes = sequence(&[true, true, true, true, true, true, false], 10);
        classes[2].bass_present = false;
        // runs of 2 and 3 around the snare-only window
        assert!(BlastDetector::default().detect(&classes).is_empty());
        assert_eq!(
            detector(2, false).detect(&classes),
            vec![
                BlastRange {
                    start_sample: 0,
                    end_sample: 20
                },
                BlastRange {
                    start_sample: 30,
                    end_sample: 60
                },
            ]
        );
    }

    #[test]
    fn several_runs_in_time_order() {
        let flags = [
            true, true, true, true, false, true, false, true, true, true, true, true, false,
        ];
        let blasts = BlastDetector::default().detect(&sequence(&flags, 10));
        assert_eq!(
            blasts,
            vec![
                BlastRange {
                    start_sample: 0,
                    end_sample: 40
                },
                BlastRange {
                    start_sample: 70,
                    end_sample: 120
                },
            ]
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(BlastDetector::default().detect(&[]).is_empty());
    }

    #[test]
    fn zero_minimum_is_rejected() {
        let config = BlastConfig {
            min_run_windows: 0,
            close_trailing_run: false,
        };
        assert!(BlastDetector::new(&config).is_err());
    }
}
