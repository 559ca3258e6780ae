//! Game tuning parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default tuning constants.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Run shape
    pub const TOTAL_QUESTIONS: usize = 25;
    pub const MAX_WRONG: u32 = 3;

    // Timing (seconds unless noted)
    pub const QUESTION_TIME: f64 = 5.0;
    pub const FAST_THRESHOLD: f64 = 1.0;
    pub const ADVANCE_DELAY_MS: u32 = 650;

    // Loop
    pub const MAX_FRAME_STEP: f64 = 0.05;
    pub const FIXED_STEP: f64 = 1.0 / 60.0;
}

/// Per-run configuration. Every field falls back to its [`Params`] value when
/// missing from the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub total_questions: usize,
    pub max_wrong: u32,
    pub question_time: f64,
    pub fast_threshold: f64,
    /// Wall-clock pause between an answer and the next round.
    pub advance_delay_ms: u32,
    /// Largest frame delta accepted from the animation callback.
    pub max_frame_step: f64,
    /// Sub-step used by deterministic stepping.
    pub fixed_step: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_questions: Params::TOTAL_QUESTIONS,
            max_wrong: Params::MAX_WRONG,
            question_time: Params::QUESTION_TIME,
            fast_threshold: Params::FAST_THRESHOLD,
            advance_delay_ms: Params::ADVANCE_DELAY_MS,
            max_frame_step: Params::MAX_FRAME_STEP,
            fixed_step: Params::FIXED_STEP,
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) camelCase JSON object and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_questions == 0 {
            return Err(Error::InvalidConfig("totalQuestions must be at least 1".into()));
        }
        if self.max_wrong == 0 {
            return Err(Error::InvalidConfig("maxWrong must be at least 1".into()));
        }
        if !(self.question_time > 0.0) {
            return Err(Error::InvalidConfig("questionTime must be positive".into()));
        }
        if !(self.fast_threshold >= 0.0) {
            return Err(Error::InvalidConfig("fastThreshold must not be negative".into()));
        }
        if !(self.max_frame_step > 0.0) || !(self.fixed_step > 0.0) {
            return Err(Error::InvalidConfig("frame steps must be positive".into()));
        }
        Ok(())
    }

    /// Number of fixed sub-steps covering `ms` milliseconds (at least one).
    pub fn steps_for(&self, ms: f64) -> usize {
        let steps = (ms / (self.fixed_step * 1000.0)).round();
        if steps.is_finite() && steps >= 1.0 {
            steps as usize
        } else {
            1
        }
    }
}
