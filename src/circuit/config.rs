use std::time::Duration;

use serde::Deserialize;

use crate::common::Size;
use crate::utils::Verify;

/// Frame duration in milliseconds
pub const FRAME_DURATION_MS: u64 = 30;

/// Distance gates are stepped by when auto placement lands on another item
pub const OVERLAP: f64 = 75.;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CircuitConfig {
    pub playfield: Size,
    pub frame_duration_ms: u64,
    pub overlap: f64,
}

impl CircuitConfig {
    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.frame_duration_ms)
    }

    // seconds, the unit gates see in `update`
    pub fn frame_elapsed(&self) -> f64 {
        self.frame_duration().as_secs_f64()
    }

    /// Auto placement step. Non-positive overlaps never leave an occupied spot,
    /// so they fall back to the default.
    pub fn placement_step(&self) -> f64 {
        if self.overlap > 0. {
            self.overlap
        } else {
            OVERLAP
        }
    }
}

impl Verify for CircuitConfig {
    fn verify(&self) -> eyre::Result<()> {
        eyre::ensure!(
            self.overlap > 0.,
            "overlap must be positive, got {}",
            self.overlap
        );
        eyre::ensure!(
            self.playfield.width() > 0. && self.playfield.height() > 0.,
            "playfield must have a positive size, got {:?}",
            self.playfield
        );
        eyre::ensure!(self.frame_duration_ms > 0, "frame duration must be positive");

        Ok(())
    }
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            playfield: Size(1150., 800.),
            frame_duration_ms: FRAME_DURATION_MS,
            overlap: OVERLAP,
        }
    }
}
