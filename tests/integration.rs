// Whole-run scenarios driven natively: seeded RNG, in-memory high score store,
// simulated time instead of the animation loop.

use flag_rush::catalog::default_catalog;
use flag_rush::game::{CORRECT_TEXT, PROMPT_TEXT, TIMEOUT_TEXT, WRONG_TEXT};
use flag_rush::storage::{HIGH_SCORE_KEY, MemoryStore};
use flag_rush::{GameConfig, GameState, Mode, Resolution};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn new_game(config: GameConfig) -> GameState {
    GameState::new(default_catalog().to_vec(), config)
}

fn correct_index(game: &GameState) -> usize {
    game.current().expect("a round is active").correct_index
}

fn wrong_index(game: &GameState) -> usize {
    (correct_index(game) + 1) % flag_rush::OPTION_COUNT
}

/// Answers every remaining question instantly and correctly.
fn play_perfect(game: &mut GameState, rng: &mut StdRng, store: &mut MemoryStore) {
    while game.mode() == Mode::Playing {
        let idx = correct_index(game);
        assert_eq!(game.submit_answer(idx), Some(Resolution::Correct));
        game.advance_round(rng, store);
    }
}

/// Plays a full default run, answering wrong on the given 0-based rounds.
fn play_with_mistakes(wrong_rounds: &[usize], seed: u64) -> GameState {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut store = MemoryStore::new();
    let mut game = new_game(GameConfig::default());
    game.start_game(&mut rng).unwrap();
    while game.mode() == Mode::Playing {
        let idx = if wrong_rounds.contains(&game.round_index()) {
            wrong_index(&game)
        } else {
            correct_index(&game)
        };
        game.submit_answer(idx).unwrap();
        game.advance_round(&mut rng, &mut store);
    }
    game
}

#[test]
fn perfect_run_clears_every_flag() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut store = MemoryStore::new();
    let mut game = new_game(GameConfig::default());
    game.start_game(&mut rng).unwrap();
    play_perfect(&mut game, &mut rng, &mut store);

    assert_eq!(game.mode(), Mode::Over);
    assert_eq!(game.end_title(), "All 25 Flags Cleared");
    let summary = *game.end_summary().unwrap();
    assert_eq!(summary.answered, 25);
    assert_eq!(summary.wrong_count, 0);
    // 25 * 500 + 100 * (0 + 1 + ... + 24)
    assert_eq!(summary.base_points, 42_500);
    assert_eq!(summary.fast_bonus, 2_500);
    assert_eq!(summary.perfect_bonus, 500);
    assert_eq!(summary.time_bonus, 125);
    assert_eq!(summary.total, 45_625);

    assert_eq!(store.value(), Some("45625"));
    assert_eq!(game.high_score(), 45_625);
    assert!(game.is_new_record());
    assert!(game.is_celebrating());
    assert!(!game.particles().is_empty());
}

#[test]
fn repeating_a_score_is_not_a_new_record() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut store = MemoryStore::with_value("45625");
    let mut game = new_game(GameConfig::default());
    game.refresh_high_score(&store);
    assert_eq!(game.high_score(), 45_625);

    game.start_game(&mut rng).unwrap();
    play_perfect(&mut game, &mut rng, &mut store);

    assert_eq!(game.end_summary().unwrap().total, 45_625);
    assert!(!game.is_new_record());
    assert!(!game.is_celebrating());
    assert!(game.particles().is_empty());
    assert_eq!(store.value(), Some("45625"));
}

#[test]
fn third_mistake_ends_the_run() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut store = MemoryStore::new();
    let mut game = new_game(GameConfig::default());
    game.start_game(&mut rng).unwrap();

    for n in 1..=3 {
        let idx = wrong_index(&game);
        assert_eq!(game.submit_answer(idx), Some(Resolution::Wrong));
        assert_eq!(game.result().0, WRONG_TEXT);
        assert_eq!(game.wrong_count(), n);
        game.advance_round(&mut rng, &mut store);
    }

    assert_eq!(game.mode(), Mode::Over);
    assert_eq!(game.end_title(), "Game Over");
    let summary = game.end_summary().unwrap();
    assert_eq!(summary.answered, 3);
    assert_eq!(summary.base_points, 0);
    assert_eq!(summary.fast_bonus, 0);
    assert_eq!(summary.perfect_bonus, 0);
    // Wrong answers still bank their remaining time.
    assert_eq!(summary.time_bonus, 15);
    assert_eq!(summary.total, 15);
    assert_eq!(store.value(), Some("15"));
}

#[test]
fn countdown_runs_out_into_a_timeout() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut store = MemoryStore::new();
    let mut game = new_game(GameConfig::default());
    game.start_game(&mut rng).unwrap();

    assert_eq!(game.advance_time(1000.0), None);
    assert!((game.time_remaining() - 4.0).abs() < 1e-6);

    assert_eq!(game.advance_time(4100.0), Some(Resolution::TimedOut));
    assert!(game.is_locked());
    assert_eq!(game.time_remaining(), 0.0);
    assert_eq!(game.wrong_count(), 1);
    assert_eq!(game.result().0, TIMEOUT_TEXT);

    // Answers are ignored until the round advances.
    assert_eq!(game.submit_answer(correct_index(&game)), None);
    game.advance_round(&mut rng, &mut store);
    assert_eq!(game.round_index(), 1);
    assert!(!game.is_locked());
    assert_eq!(game.result().0, PROMPT_TEXT);
    assert!((game.time_remaining() - 5.0).abs() < 1e-9);
}

#[test]
fn timer_is_frozen_while_a_result_is_shown() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut game = new_game(GameConfig::default());
    game.start_game(&mut rng).unwrap();
    game.advance_time(500.0);
    let idx = correct_index(&game);
    game.submit_answer(idx);
    assert_eq!(game.result().0, CORRECT_TEXT);
    let frozen = game.time_remaining();
    assert_eq!(game.advance_time(2000.0), None);
    assert_eq!(game.time_remaining(), frozen);
}

#[test]
fn stale_advance_does_not_skip_a_round() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut store = MemoryStore::new();
    let mut game = new_game(GameConfig::default());
    game.start_game(&mut rng).unwrap();

    let idx = correct_index(&game);
    game.submit_answer(idx);
    game.advance_round(&mut rng, &mut store);
    game.advance_round(&mut rng, &mut store);
    assert_eq!(game.round_index(), 1);
    assert_eq!(game.answered_count(), 1);

    // A deferred advance from a finished run must not touch the restart.
    game.submit_answer(correct_index(&game));
    game.start_game(&mut rng).unwrap();
    game.advance_round(&mut rng, &mut store);
    assert_eq!(game.round_index(), 0);
    assert_eq!(game.mode(), Mode::Playing);
}

#[test]
fn restart_resets_the_run() {
    let mut rng = StdRng::seed_from_u64(13);
    let mut store = MemoryStore::new();
    let mut game = new_game(GameConfig::default());
    game.start_game(&mut rng).unwrap();
    for _ in 0..3 {
        let idx = wrong_index(&game);
        game.submit_answer(idx);
        game.advance_round(&mut rng, &mut store);
    }
    assert_eq!(game.mode(), Mode::Over);

    game.start_game(&mut rng).unwrap();
    assert_eq!(game.mode(), Mode::Playing);
    assert_eq!(game.round_index(), 0);
    assert_eq!(game.wrong_count(), 0);
    assert_eq!(game.score(), 0.0);
    assert!(game.end_summary().is_none());
    assert!(game.particles().is_empty());
    assert_eq!(game.high_score(), 15);
}

#[test]
fn shorter_run_from_json_config() {
    let config = GameConfig::from_json(r#"{"totalQuestions": 5, "maxWrong": 1}"#).unwrap();
    assert_eq!(config.question_time, 5.0);
    let mut rng = StdRng::seed_from_u64(17);
    let mut store = MemoryStore::new();
    let mut game = new_game(config);
    game.start_game(&mut rng).unwrap();
    play_perfect(&mut game, &mut rng, &mut store);
    assert_eq!(game.end_title(), "All 5 Flags Cleared");
    assert_eq!(game.end_summary().unwrap().answered, 5);

    let mut game = new_game(GameConfig::from_json(r#"{"maxWrong": 1}"#).unwrap());
    game.start_game(&mut rng).unwrap();
    let idx = wrong_index(&game);
    game.submit_answer(idx);
    game.advance_round(&mut rng, &mut store);
    assert_eq!(game.end_title(), "Game Over");
}

#[test]
fn snapshot_tracks_the_run() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut game = new_game(GameConfig::default());
    let json: serde_json::Value = serde_json::from_str(&game.snapshot().to_json().unwrap()).unwrap();
    assert_eq!(json["mode"], "start");
    assert!(json["currentFlagCode"].is_null());

    game.start_game(&mut rng).unwrap();
    let json: serde_json::Value = serde_json::from_str(&game.snapshot().to_json().unwrap()).unwrap();
    assert_eq!(json["mode"], "playing");
    assert_eq!(json["totalQuestions"], 25);
    assert_eq!(json["options"].as_array().unwrap().len(), 4);
    let code = json["currentFlagCode"].as_str().unwrap();
    assert_eq!(code, game.current().unwrap().country.code.as_str());
}

#[test]
fn storage_key_is_stable() {
    assert_eq!(HIGH_SCORE_KEY, "flagGameHighScore");
}

#[test]
fn finishing_with_spare_lives_is_a_win_without_perfect_bonus() {
    let game = play_with_mistakes(&[3, 10], 29);
    assert_eq!(game.mode(), Mode::Over);
    assert_eq!(game.end_title(), "All 25 Flags Cleared");
    assert_eq!(game.round_index(), 25);
    let summary = game.end_summary().unwrap();
    assert_eq!(summary.answered, 25);
    assert_eq!(summary.wrong_count, 2);
    assert_eq!(summary.perfect_bonus, 0);
    assert_eq!(summary.fast_bonus, 2_300);
}

#[test]
fn last_life_lost_on_the_final_question_is_a_loss() {
    let game = play_with_mistakes(&[0, 1, 24], 31);
    assert_eq!(game.mode(), Mode::Over);
    assert_eq!(game.round_index(), 25);
    assert_eq!(game.end_title(), "Game Over");
    let summary = game.end_summary().unwrap();
    assert_eq!(summary.answered, 25);
    assert_eq!(summary.wrong_count, 3);
    assert_eq!(summary.perfect_bonus, 0);
}

#[test]
fn deferred_advance_from_an_earlier_run_is_dropped() {
    let mut rng = StdRng::seed_from_u64(37);
    let mut store = MemoryStore::new();
    let mut game = new_game(GameConfig::default());
    game.start_game(&mut rng).unwrap();
    let idx = correct_index(&game);
    game.submit_answer(idx);
    let stale = game.run_id();

    // Relaunch during the result pause, start again and answer before the
    // old timer fires.
    game.reconfigure(default_catalog().to_vec(), GameConfig::default());
    assert_eq!(game.mode(), Mode::Start);
    game.start_game(&mut rng).unwrap();
    let idx = correct_index(&game);
    game.submit_answer(idx);
    assert!(game.is_locked());

    game.advance_round_of(stale, &mut rng, &mut store);
    assert_eq!(game.round_index(), 0);
    assert!(game.is_locked());

    let current = game.run_id();
    assert_ne!(current, stale);
    game.advance_round_of(current, &mut rng, &mut store);
    assert_eq!(game.round_index(), 1);
    assert!(!game.is_locked());
}

#[test]
fn reconfigure_keeps_best_score_and_viewport() {
    let mut rng = StdRng::seed_from_u64(41);
    let mut store = MemoryStore::with_value("900");
    let mut game = new_game(GameConfig::default());
    game.refresh_high_score(&store);
    game.set_viewport(flag_rush::layout::Viewport { width: 400.0, height: 800.0 });
    game.start_game(&mut rng).unwrap();
    let before = game.run_id();

    let config = GameConfig::from_json(r#"{"totalQuestions": 5}"#).unwrap();
    game.reconfigure(default_catalog().to_vec(), config);
    assert_ne!(game.run_id(), before);
    assert_eq!(game.mode(), Mode::Start);
    assert_eq!(game.config().total_questions, 5);
    assert_eq!(game.high_score(), 900);
    assert_eq!(game.viewport().width, 400.0);
    game.advance_round(&mut rng, &mut store);
    assert_eq!(game.round_index(), 0);
}
