//! Flag Rush core crate.
//!
//! A timed flag quiz: name the country behind each flag before the countdown
//! runs out, with a limited number of mistakes per run. The game logic
//! (catalog, rounds, scoring, state machine, particles, layout) is plain Rust
//! and runs natively under `cargo test`; `app` and `render` hold the browser
//! glue driving it through a canvas.

use wasm_bindgen::prelude::*;

mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod game;
pub mod layout;
pub mod particles;
mod render;
pub mod round;
pub mod scoring;
pub mod storage;

pub use catalog::{Country, RegionCode};
pub use config::{GameConfig, Params};
pub use error::{Error, Result};
pub use game::{FrameClock, GameState, Mode, Resolution, Snapshot, Tone};
pub use round::{OPTION_COUNT, Round};
pub use scoring::EndSummary;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    let _ = console_log::init_with_level(log::Level::Info);
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> std::result::Result<(), JsValue> {
    app::launch(GameConfig::default())
}

/// Same as `start_game` with a partial camelCase JSON config, e.g.
/// `{"totalQuestions": 10}`.
#[wasm_bindgen]
pub fn start_game_with_config(config_json: &str) -> std::result::Result<(), JsValue> {
    app::launch(GameConfig::from_json(config_json)?)
}

/// JSON description of the current state for automated inspection.
#[wasm_bindgen]
pub fn render_game_to_text() -> std::result::Result<String, JsValue> {
    app::snapshot_json()
}

/// Advance simulated time by `ms` in fixed 1/60 s steps, then redraw.
#[wasm_bindgen(js_name = advanceTime)]
pub fn advance_time(ms: f64) -> std::result::Result<(), JsValue> {
    app::step(ms)
}
