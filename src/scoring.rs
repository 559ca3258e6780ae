//! Scoring rules. Everything here is pure; values stay fractional until the
//! end-of-run summary floors them.

use serde::Serialize;

use crate::config::GameConfig;

pub const POINTS_PER_SECOND: f64 = 100.0;
pub const ROUND_BONUS: f64 = 100.0;
pub const FAST_BONUS: f64 = 100.0;
pub const PERFECT_BONUS: i64 = 500;

/// Points for a correct answer given the time left and the 0-based round index.
pub fn earned_points(time_remaining: f64, round_index: usize) -> f64 {
    let time_points = (time_remaining * POINTS_PER_SECOND).round().max(0.0);
    time_points + round_index as f64 * ROUND_BONUS
}

/// Answered within the fast window at the start of the countdown.
pub fn is_fast(config: &GameConfig, time_remaining: f64) -> bool {
    config.question_time - time_remaining <= config.fast_threshold
}

/// Score shown in the HUD during play.
pub fn running_score(base_points: f64, fast_count: u32) -> f64 {
    base_points + f64::from(fast_count) * FAST_BONUS
}

/// Run-scoped accumulators the summary is computed from.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunTally {
    pub round_index: usize,
    pub answered_count: usize,
    pub wrong_count: u32,
    pub base_points: f64,
    pub fast_count: u32,
    pub total_time_left: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSummary {
    pub answered: usize,
    pub wrong_count: u32,
    pub base_points: i64,
    pub fast_bonus: i64,
    pub perfect_bonus: i64,
    pub time_bonus: i64,
    pub total: i64,
}

impl EndSummary {
    pub fn compute(tally: &RunTally, config: &GameConfig) -> Self {
        let completed = tally.round_index >= config.total_questions;
        let perfect_bonus = if tally.wrong_count == 0 && completed { PERFECT_BONUS } else { 0 };
        let time_bonus = tally.total_time_left.floor();
        let fast_bonus = f64::from(tally.fast_count) * FAST_BONUS;
        let total = tally.base_points + fast_bonus + perfect_bonus as f64 + time_bonus;
        Self {
            answered: tally.answered_count.min(config.total_questions),
            wrong_count: tally.wrong_count,
            base_points: tally.base_points.floor() as i64,
            fast_bonus: fast_bonus.floor() as i64,
            perfect_bonus,
            time_bonus: time_bonus as i64,
            total: total.floor() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_time_first_round_is_500() {
        assert_eq!(earned_points(5.0, 0), 500.0);
    }

    #[test]
    fn later_rounds_add_fixed_bonus() {
        assert_eq!(earned_points(2.346, 3), 235.0 + 300.0);
        assert_eq!(earned_points(0.0, 0), 0.0);
        assert_eq!(earned_points(0.0, 24), 2400.0);
    }

    #[test]
    fn fast_window_is_inclusive() {
        let c = GameConfig::default();
        assert!(is_fast(&c, 5.0));
        assert!(is_fast(&c, 4.0));
        assert!(!is_fast(&c, 3.99));
    }

    #[test]
    fn running_score_adds_fast_bonus() {
        assert_eq!(running_score(1234.0, 3), 1534.0);
    }

    #[test]
    fn perfect_run_summary() {
        let c = GameConfig::default();
        let tally = RunTally {
            round_index: 25,
            answered_count: 25,
            wrong_count: 0,
            base_points: 40_000.0,
            fast_count: 10,
            total_time_left: 87.9,
        };
        let s = EndSummary::compute(&tally, &c);
        assert_eq!(s.perfect_bonus, 500);
        assert_eq!(s.time_bonus, 87);
        assert_eq!(s.fast_bonus, 1000);
        assert_eq!(s.total, 40_000 + 1000 + 500 + 87);
        assert_eq!(s.answered, 25);
    }

    #[test]
    fn no_perfect_bonus_with_mistakes_or_early_end() {
        let c = GameConfig::default();
        let with_wrong = RunTally { round_index: 25, answered_count: 25, wrong_count: 1, ..Default::default() };
        assert_eq!(EndSummary::compute(&with_wrong, &c).perfect_bonus, 0);
        let early = RunTally { round_index: 7, answered_count: 7, wrong_count: 0, ..Default::default() };
        assert_eq!(EndSummary::compute(&early, &c).perfect_bonus, 0);
    }
}
