//! Browser shell: owns the canvas, drives the animation loop and forwards
//! keyboard / pointer input into `GameState`.
//!
//! All state lives in one thread-local slot touched serially by the frame
//! callback, the input listeners and the deferred round advance.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

use crate::catalog::{self, AllowList, CanvasGlyphProbe, Country, EmbeddedNames, IntlNames, RegionNames};
use crate::config::GameConfig;
use crate::error::Error;
use crate::game::{FrameClock, GameState, Mode, Resolution};
use crate::layout::Viewport;
use crate::render;
use crate::round::OPTION_COUNT;
use crate::storage::{HighScoreStore, LocalStorageStore, MemoryStore};

const CANVAS_ID: &str = "flag-rush-canvas";

struct App {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    game: GameState,
    clock: FrameClock,
    store: Box<dyn HighScoreStore>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Creates the canvas, wires input and starts the frame loop. Calling it again
/// only swaps in a fresh game with the new config.
pub fn launch(config: GameConfig) -> Result<(), JsValue> {
    config.validate()?;
    let catalog = load_catalog(&config).to_vec();

    let relaunched = APP.with(|cell| {
        let mut slot = cell.borrow_mut();
        let Some(app) = slot.as_mut() else { return false };
        app.game.reconfigure(catalog.clone(), config.clone());
        app.game.refresh_high_score(app.store.as_ref());
        true
    });
    if relaunched {
        log::info!("game reconfigured");
        return Ok(());
    }

    let win = window().ok_or_else(|| Error::Js("no window".into()))?;
    let doc = win.document().ok_or_else(|| Error::Js("no document".into()))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        c.set_attribute(
            "style",
            "position:fixed; inset:0; width:100vw; height:100vh; display:block; touch-action:none; background:#eef1f4;",
        )
        .ok();
        doc.body().ok_or_else(|| Error::Js("no body".into()))?.append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| Error::Js("2d context unavailable".into()))?
        .dyn_into()?;

    let store: Box<dyn HighScoreStore> = match LocalStorageStore::open() {
        Some(store) => Box::new(store),
        None => {
            log::warn!("localStorage unavailable, high score kept in memory only");
            Box::new(MemoryStore::new())
        }
    };

    let mut game = GameState::new(catalog, config);
    game.refresh_high_score(store.as_ref());
    let mut app = App { canvas, ctx, game, clock: FrameClock::new(), store };
    resize(&mut app)?;
    APP.with(|cell| cell.replace(Some(app)));

    install_listeners(&win, &doc)?;
    start_loop();
    Ok(())
}

/// JSON snapshot of the running game, or `null` before launch.
pub fn snapshot_json() -> Result<String, JsValue> {
    APP.with(|cell| -> Result<String, JsValue> {
        match cell.borrow().as_ref() {
            Some(app) => Ok(app.game.snapshot().to_json()?),
            None => Ok("null".to_string()),
        }
    })
}

/// Deterministic stepping hook: simulate `ms` then redraw once.
pub fn step(ms: f64) -> Result<(), JsValue> {
    with_app(|app| {
        if let Some(resolution) = app.game.advance_time(ms) {
            schedule_advance(&app.game, resolution);
        }
        render::render(&app.ctx, &app.game)
    })
    .unwrap_or(Ok(()))
}

fn with_app<T>(f: impl FnOnce(&mut App) -> T) -> Option<T> {
    APP.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn load_catalog(config: &GameConfig) -> &'static [Country] {
    let required = config.total_questions.max(OPTION_COUNT);
    catalog::cached_catalog(|| {
        let names: Box<dyn RegionNames> = match IntlNames::new() {
            Some(names) => Box::new(names),
            None => {
                log::warn!("Intl.DisplayNames unavailable, using the embedded name table");
                Box::new(EmbeddedNames)
            }
        };
        let probed = match CanvasGlyphProbe::new() {
            Ok(mut probe) => catalog::build_catalog(names.as_ref(), &mut probe),
            Err(err) => {
                log::warn!("flag probe unavailable ({err}), using the static allow-list");
                Vec::new()
            }
        };
        if probed.len() >= required {
            probed
        } else {
            log::warn!(
                "only {} flags render on this platform, falling back to the static allow-list",
                probed.len()
            );
            catalog::build_catalog(&EmbeddedNames, &mut AllowList::default())
        }
    })
}

// --- Frame loop -------------------------------------------------------------

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_app(|app| tick(app, ts));
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn tick(app: &mut App, now: f64) {
    let dt = app.clock.delta(now, app.game.config().max_frame_step);
    if let Some(resolution) = app.game.update(dt) {
        schedule_advance(&app.game, resolution);
    }
    if let Err(err) = render::render(&app.ctx, &app.game) {
        log::error!("render failed: {err:?}");
    }
}

/// Queues the round advance after the result pause. Runs on the wall clock, not
/// on simulated time, and only for the run that was live when it was queued.
fn schedule_advance(game: &GameState, resolution: Resolution) {
    let delay_ms = game.config().advance_delay_ms;
    let run_id = game.run_id();
    log::debug!("{resolution:?}, next round in {delay_ms}ms");
    let callback = Closure::once_into_js(move || {
        with_app(|app| {
            let mut rng = rand::thread_rng();
            app.game.advance_round_of(run_id, &mut rng, app.store.as_mut());
        });
    });
    let scheduled = window().map(|w| {
        w.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            i32::try_from(delay_ms).unwrap_or(i32::MAX),
        )
    });
    if !matches!(scheduled, Some(Ok(_))) {
        log::error!("could not schedule the next round");
    }
}

// --- Input ------------------------------------------------------------------

fn start_run(app: &mut App) {
    let mut rng = rand::thread_rng();
    if let Err(err) = app.game.start_game(&mut rng) {
        log::error!("cannot start a run: {err}");
    }
}

fn answer(app: &mut App, index: usize) {
    if let Some(resolution) = app.game.submit_answer(index) {
        schedule_advance(&app.game, resolution);
    }
}

fn on_key(app: &mut App, evt: &web_sys::KeyboardEvent) {
    let key = evt.key();
    if key.eq_ignore_ascii_case("f") {
        toggle_fullscreen();
        return;
    }
    match app.game.mode() {
        Mode::Playing => {
            if key == " " {
                evt.prevent_default();
                return;
            }
            if let Some(digit) = key.parse::<usize>().ok().filter(|d| (1..=OPTION_COUNT).contains(d)) {
                answer(app, digit - 1);
            }
        }
        Mode::Start | Mode::Over => {
            if key == "Enter" {
                start_run(app);
            }
        }
    }
}

fn on_pointer(app: &mut App, x: f64, y: f64) {
    let layout = app.game.layout();
    match app.game.mode() {
        Mode::Playing => {
            if let Some(index) = layout.option_at(x, y) {
                answer(app, index);
            }
        }
        Mode::Start if layout.start_button.contains(x, y) => start_run(app),
        Mode::Over if layout.restart_button.contains(x, y) => start_run(app),
        _ => {}
    }
}

fn install_listeners(win: &web_sys::Window, doc: &web_sys::Document) -> Result<(), JsValue> {
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            with_app(|app| on_key(app, &evt));
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        // Pointer events are delivered as MouseEvent subclasses; offsets are
        // canvas-local CSS pixels, the same space the layout uses.
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let (x, y) = (f64::from(evt.offset_x()), f64::from(evt.offset_y()));
            with_app(|app| on_pointer(app, x, y));
        }) as Box<dyn FnMut(_)>);
        let canvas = with_app(|app| app.canvas.clone()).ok_or_else(|| Error::Js("app not initialised".into()))?;
        canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move || {
            with_app(|app| {
                if let Err(err) = resize(app) {
                    log::warn!("resize failed: {err:?}");
                }
            });
        }) as Box<dyn FnMut()>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        doc.add_event_listener_with_callback("fullscreenchange", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

/// Matches the backing store to the CSS box times the device pixel ratio and
/// scales the context so drawing stays in CSS pixels.
fn resize(app: &mut App) -> Result<(), JsValue> {
    let rect = app.canvas.get_bounding_client_rect();
    let viewport = if rect.width() > 0.0 && rect.height() > 0.0 {
        Viewport { width: rect.width(), height: rect.height() }
    } else {
        Viewport::default()
    };
    let scale = window().map(|w| w.device_pixel_ratio()).filter(|s| *s > 0.0).unwrap_or(1.0);
    app.canvas.set_width((viewport.width * scale).round() as u32);
    app.canvas.set_height((viewport.height * scale).round() as u32);
    app.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0)?;
    app.game.set_viewport(viewport);
    Ok(())
}

fn toggle_fullscreen() {
    let Some(doc) = window().and_then(|w| w.document()) else { return };
    if doc.fullscreen_element().is_none() {
        if let Some(root) = doc.document_element() {
            // Denied requests (no user gesture, iframe policy) are not fatal.
            let _ = root.request_fullscreen();
        }
    } else {
        doc.exit_fullscreen();
    }
}
