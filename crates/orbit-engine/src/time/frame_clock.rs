use crate::error::ConfigError;

/// Frame-rate sampling parameters.
///
/// The counter cycles over `window_frames` frames and a sample is taken when
/// the counter reaches `sample_frame - 1`, so consecutive samples are
/// `window_frames` frames apart. The reported rate is scaled by
/// `window_frames`, which makes every report after the first exact.
/// The first report measures only `sample_frame` frames against the same
/// numerator and overstates the rate by `window_frames / sample_frame`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RateConfig {
    /// Length of the counter cycle, and the numerator of the rate formula.
    pub window_frames: u32,

    /// 1-based position within the cycle at which a sample is taken.
    pub sample_frame: u32,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            window_frames: 500,
            sample_frame: 100,
        }
    }
}

impl RateConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_frames == 0 {
            return Err(ConfigError::EmptyRateWindow);
        }
        if self.sample_frame == 0 || self.sample_frame > self.window_frames {
            return Err(ConfigError::SampleFrame {
                sample_frame: self.sample_frame,
                window_frames: self.window_frames,
            });
        }
        Ok(())
    }
}

/// One frame-rate report.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameRate {
    pub frames_per_second: f64,

    /// Ticks between this sample and the previous one.
    pub elapsed_ticks: u64,
}

/// Periodic frame-rate sampler.
///
/// Owns the cycling frame counter and the last-sample tick mark; nothing else
/// reads or writes them. Advance once per presented frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    config: RateConfig,
    ticks_per_second: u64,
    counter: u32,
    last_sample: u64,
}

impl FrameClock {
    /// Creates a clock whose first sample is measured from `start_ticks`.
    ///
    /// `config` must have passed [`RateConfig::validate`].
    pub fn new(config: RateConfig, ticks_per_second: u64, start_ticks: u64) -> Self {
        debug_assert!(config.validate().is_ok());
        Self {
            config,
            ticks_per_second,
            counter: 0,
            last_sample: start_ticks,
        }
    }

    /// Advances the counter by one frame.
    ///
    /// Returns a report when this frame is the sampling frame of the cycle and
    /// time has moved since the previous sample. A zero-tick interval skips the
    /// report and keeps the old mark, so the next interval spans two cycles.
    pub fn advance(&mut self, now_ticks: u64) -> Option<FrameRate> {
        let mut report = None;

        if self.counter == self.config.sample_frame - 1 {
            let elapsed_ticks = now_ticks.saturating_sub(self.last_sample);
            if elapsed_ticks > 0 {
                let frames_per_second = f64::from(self.config.window_frames)
                    * self.ticks_per_second as f64
                    / elapsed_ticks as f64;
                self.last_sample = now_ticks;
                report = Some(FrameRate {
                    frames_per_second,
                    elapsed_ticks,
                });
            }
        }

        self.counter = (self.counter + 1) % self.config.window_frames;
        report
    }

    /// Position within the current cycle (frames advanced modulo the window).
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Tick reading of the most recent sample.
    pub fn last_sample(&self) -> u64 {
        self.last_sample
    }

    pub fn config(&self) -> RateConfig {
        self.config
    }
}
