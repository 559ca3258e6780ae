//! Round / scoring state machine.
//!
//! `GameState` owns everything scoped to a run. Transitions are methods on it;
//! the browser shell only forwards input, frame deltas and the deferred
//! advance, and reads state back for drawing.
//!
//! Answering (or timing out) locks input and reports a [`Resolution`]. The
//! caller is expected to call [`GameState::advance_round`] once the result
//! pause (`GameConfig::advance_delay_ms`) has elapsed on the wall clock. A
//! caller that defers the advance should remember [`GameState::run_id`] and go
//! through [`GameState::advance_round_of`] so a late call cannot leak into a
//! later run.

use rand::Rng;
use serde::Serialize;

use crate::catalog::Country;
use crate::config::GameConfig;
use crate::error::{Error, Result};
use crate::layout::{Layout, Viewport};
use crate::particles::ParticleSystem;
use crate::round::{OPTION_COUNT, Round, draw_question_order, new_round};
use crate::scoring::{self, EndSummary, RunTally};
use crate::storage::{self, HighScoreStore};

pub const PROMPT_TEXT: &str = "Pick an answer!";
pub const CORRECT_TEXT: &str = "Correct!";
pub const WRONG_TEXT: &str = "Wrong answer!";
pub const TIMEOUT_TEXT: &str = "Time's up!";
pub const COORDINATE_SYSTEM: &str = "origin top-left, +x right, +y down";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Start,
    Playing,
    Over,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Good,
    Bad,
}

/// How the active round was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Correct,
    Wrong,
    TimedOut,
}

/// Frame delta tracker for the animation callback.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous frame, clamped to `max_step` so a suspended
    /// tab does not dump seconds of countdown in one go. The first frame is 0.
    pub fn delta(&mut self, now_ms: f64, max_step: f64) -> f64 {
        let last = self.last_ms.replace(now_ms).unwrap_or(now_ms);
        ((now_ms - last) / 1000.0).clamp(0.0, max_step)
    }
}

pub struct GameState {
    config: GameConfig,
    catalog: Vec<Country>,
    mode: Mode,
    round_index: usize,
    answered_count: usize,
    wrong_count: u32,
    base_points: f64,
    fast_count: u32,
    total_time_left: f64,
    score: f64,
    question_order: Vec<Country>,
    current: Option<Round>,
    locked: bool,
    result_text: &'static str,
    result_tone: Tone,
    end_summary: Option<EndSummary>,
    completed_all: bool,
    high_score: i64,
    new_record: bool,
    particles: ParticleSystem,
    viewport: Viewport,
    run_id: u64,
}

impl GameState {
    pub fn new(catalog: Vec<Country>, config: GameConfig) -> Self {
        Self {
            config,
            catalog,
            mode: Mode::Start,
            round_index: 0,
            answered_count: 0,
            wrong_count: 0,
            base_points: 0.0,
            fast_count: 0,
            total_time_left: 0.0,
            score: 0.0,
            question_order: Vec::new(),
            current: None,
            locked: false,
            result_text: "",
            result_tone: Tone::Good,
            end_summary: None,
            completed_all: false,
            high_score: 0,
            new_record: false,
            particles: ParticleSystem::new(),
            viewport: Viewport::default(),
            run_id: 0,
        }
    }

    /// Swaps in a new catalog and config and returns to the start screen.
    /// Viewport, best score and the run counter carry over.
    pub fn reconfigure(&mut self, catalog: Vec<Country>, config: GameConfig) {
        let run_id = self.run_id.wrapping_add(1);
        let viewport = self.viewport;
        let high_score = self.high_score;
        *self = Self::new(catalog, config);
        self.run_id = run_id;
        self.viewport = viewport;
        self.high_score = high_score;
    }

    // --- Transitions ---------------------------------------------------------

    /// Starts (or restarts) a run. Fails only when the catalog cannot supply a
    /// full set of distinct questions and options.
    pub fn start_game<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let required = self.config.total_questions.max(OPTION_COUNT);
        if self.catalog.len() < required {
            return Err(Error::CatalogTooSmall { available: self.catalog.len(), required });
        }

        self.run_id = self.run_id.wrapping_add(1);
        self.round_index = 0;
        self.answered_count = 0;
        self.wrong_count = 0;
        self.base_points = 0.0;
        self.fast_count = 0;
        self.total_time_left = 0.0;
        self.score = 0.0;
        self.end_summary = None;
        self.completed_all = false;
        self.new_record = false;
        self.particles.clear();

        self.question_order = draw_question_order(&self.catalog, self.config.total_questions, rng);
        self.current = self.next_round(rng);
        self.locked = false;
        self.set_result(PROMPT_TEXT, Tone::Good);
        self.mode = Mode::Playing;
        log::info!(
            "run started: {} questions, {} mistakes allowed",
            self.config.total_questions,
            self.config.max_wrong
        );
        Ok(())
    }

    /// Player picked option `index`. Ignored while locked, outside play or
    /// when the index is out of range.
    pub fn submit_answer(&mut self, index: usize) -> Option<Resolution> {
        if self.mode != Mode::Playing || self.locked || index >= OPTION_COUNT {
            return None;
        }
        let round = self.current.as_mut()?;
        round.picked = Some(index);
        let correct = round.is_correct(index);
        let time_remaining = round.time_remaining;
        self.locked = true;

        self.total_time_left += time_remaining;
        if correct {
            self.base_points += scoring::earned_points(time_remaining, self.round_index);
            // Only correct answers are eligible for the fast bonus.
            if scoring::is_fast(&self.config, time_remaining) {
                self.fast_count += 1;
            }
        }
        self.score = scoring::running_score(self.base_points, self.fast_count);

        let resolution = if correct {
            self.set_result(CORRECT_TEXT, Tone::Good);
            Resolution::Correct
        } else {
            self.wrong_count += 1;
            self.set_result(WRONG_TEXT, Tone::Bad);
            Resolution::Wrong
        };
        log::debug!(
            "round {} answered {:?} with {:.2}s left",
            self.round_index + 1,
            resolution,
            time_remaining
        );
        Some(resolution)
    }

    /// Countdown hit zero: a forced wrong answer with no time credit.
    pub fn on_timeout(&mut self) -> Option<Resolution> {
        if self.mode != Mode::Playing || self.locked || self.current.is_none() {
            return None;
        }
        self.locked = true;
        self.wrong_count += 1;
        self.set_result(TIMEOUT_TEXT, Tone::Bad);
        log::debug!("round {} timed out", self.round_index + 1);
        Some(Resolution::TimedOut)
    }

    /// Moves past a resolved round. A no-op unless a round is awaiting its
    /// advance, so a late deferred call cannot disturb a fresh run.
    pub fn advance_round<R: Rng + ?Sized>(&mut self, rng: &mut R, store: &mut dyn HighScoreStore) {
        if self.mode != Mode::Playing || !self.locked {
            return;
        }
        self.answered_count += 1;
        self.round_index += 1;
        if self.wrong_count >= self.config.max_wrong {
            self.end_run(false, rng, store);
            return;
        }
        if self.round_index >= self.config.total_questions {
            self.end_run(true, rng, store);
            return;
        }
        self.current = self.next_round(rng);
        self.locked = false;
        self.set_result(PROMPT_TEXT, Tone::Good);
    }

    /// `advance_round` for a deferred caller holding the `run_id` it saw when
    /// the round resolved. Ignored once another run has started.
    pub fn advance_round_of<R: Rng + ?Sized>(&mut self, run_id: u64, rng: &mut R, store: &mut dyn HighScoreStore) {
        if run_id != self.run_id {
            log::debug!("dropping advance for run {run_id}, current run is {}", self.run_id);
            return;
        }
        self.advance_round(rng, store);
    }

    fn end_run<R: Rng + ?Sized>(&mut self, completed_all: bool, rng: &mut R, store: &mut dyn HighScoreStore) {
        let summary = EndSummary::compute(&self.tally(), &self.config);
        self.score = summary.total as f64;
        self.completed_all = completed_all;
        self.end_summary = Some(summary);

        let update = storage::record_total(store, summary.total);
        self.high_score = update.high_score;
        self.new_record = update.new_record;
        if update.new_record {
            let (x, y) = Layout::new(self.viewport).celebration_origin;
            self.particles.burst(x, y, rng);
        }

        self.locked = false;
        self.mode = Mode::Over;
        log::info!(
            "run over ({}): total {}, best {}{}",
            if completed_all { "cleared" } else { "out of lives" },
            summary.total,
            self.high_score,
            if self.new_record { ", new record" } else { "" }
        );
    }

    // --- Time ---------------------------------------------------------------

    /// Advances timers and particles by `dt` seconds.
    pub fn update(&mut self, dt: f64) -> Option<Resolution> {
        let mut resolution = None;
        if self.mode == Mode::Playing && !self.locked {
            if let Some(round) = self.current.as_mut() {
                round.time_remaining = (round.time_remaining - dt).max(0.0);
                if round.time_remaining <= 0.0 {
                    resolution = self.on_timeout();
                }
            }
        }
        self.particles.update(dt);
        resolution
    }

    /// Deterministic stepping: `ms` of simulated time in fixed sub-steps,
    /// independent of the animation callback. Returns the first resolution
    /// that occurred.
    pub fn advance_time(&mut self, ms: f64) -> Option<Resolution> {
        let steps = self.config.steps_for(ms);
        let dt = self.config.fixed_step;
        let mut first = None;
        for _ in 0..steps {
            let r = self.update(dt);
            first = first.or(r);
        }
        first
    }

    // --- Queries ------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &[Country] {
        &self.catalog
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Changes every time a run starts or the game is reconfigured.
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn round_index(&self) -> usize {
        self.round_index
    }

    pub fn answered_count(&self) -> usize {
        self.answered_count
    }

    pub fn wrong_count(&self) -> u32 {
        self.wrong_count
    }

    pub fn base_points(&self) -> f64 {
        self.base_points
    }

    pub fn fast_count(&self) -> u32 {
        self.fast_count
    }

    pub fn total_time_left(&self) -> f64 {
        self.total_time_left
    }

    /// Running score while playing, final total once the run is over.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn current(&self) -> Option<&Round> {
        self.current.as_ref()
    }

    pub fn time_remaining(&self) -> f64 {
        self.current.as_ref().map_or(0.0, |r| r.time_remaining)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn result(&self) -> (&'static str, Tone) {
        (self.result_text, self.result_tone)
    }

    pub fn end_summary(&self) -> Option<&EndSummary> {
        self.end_summary.as_ref()
    }

    pub fn end_title(&self) -> String {
        if self.completed_all {
            format!("All {} Flags Cleared", self.config.total_questions)
        } else {
            "Game Over".to_string()
        }
    }

    pub fn high_score(&self) -> i64 {
        self.high_score
    }

    /// Reads the stored best so the start screen can show it.
    pub fn refresh_high_score(&mut self, store: &dyn HighScoreStore) {
        self.high_score = storage::load_high_score(store);
    }

    pub fn is_new_record(&self) -> bool {
        self.new_record
    }

    /// New-record banner stays up while the confetti is still falling.
    pub fn is_celebrating(&self) -> bool {
        self.mode == Mode::Over && self.new_record && !self.particles.is_empty()
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn layout(&self) -> Layout {
        Layout::new(self.viewport)
    }

    /// Structured view of the current state for automation.
    pub fn snapshot(&self) -> Snapshot<'_> {
        let round = self.current.as_ref();
        Snapshot {
            mode: self.mode,
            coordinate_system: COORDINATE_SYSTEM,
            round_index: self.round_index,
            total_questions: self.config.total_questions,
            wrong_count: self.wrong_count,
            max_wrong: self.config.max_wrong,
            timer: self.time_remaining(),
            score: self.score.floor() as i64,
            result_text: self.result_text,
            end_summary: self.end_summary,
            current_flag_code: round.map(|r| r.country.code.as_str()),
            options: round.map(|r| r.options.iter().map(|c| c.name.as_str()).collect()).unwrap_or_default(),
            correct_index: round.map(|r| r.correct_index),
        }
    }

    // --- Helpers ------------------------------------------------------------

    fn next_round<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Round> {
        let target = self.question_order.get(self.round_index)?;
        Some(new_round(&self.catalog, target, self.config.question_time, rng))
    }

    fn set_result(&mut self, text: &'static str, tone: Tone) {
        self.result_text = text;
        self.result_tone = tone;
    }

    fn tally(&self) -> RunTally {
        RunTally {
            round_index: self.round_index,
            answered_count: self.answered_count,
            wrong_count: self.wrong_count,
            base_points: self.base_points,
            fast_count: self.fast_count,
            total_time_left: self.total_time_left,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub mode: Mode,
    pub coordinate_system: &'static str,
    pub round_index: usize,
    pub total_questions: usize,
    pub wrong_count: u32,
    pub max_wrong: u32,
    pub timer: f64,
    pub score: i64,
    pub result_text: &'static str,
    pub end_summary: Option<EndSummary>,
    pub current_flag_code: Option<&'a str>,
    pub options: Vec<&'a str>,
    pub correct_index: Option<usize>,
}

impl Snapshot<'_> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
