//! Immediate-mode canvas drawing. Every frame is redrawn from `GameState` and
//! the viewport `Layout`; nothing is retained between frames.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::game::{GameState, Mode, Tone};
use crate::layout::{Layout, Rect};

const INK: &str = "#1f2933";
const INK_DARK: &str = "#111827";
const CARD_FILL: &str = "#ffffff";
const CARD_BORDER: &str = "#e2e6ea";
const SUCCESS: &str = "#2e7d32";
const WARNING: &str = "#f4b400";
const DANGER: &str = "#d93025";
const OPTION_PALETTE: [&str; 4] = ["#f7b7b2", "#fce7a5", "#b7d7ff", "#bdecc9"];
const UI_FONT: &str = "\"Manrope\", \"Segoe UI\", sans-serif";
const TITLE_FONT: &str = "\"Sora\", \"Segoe UI\", sans-serif";
pub const EMOJI_FONT: &str = "\"Apple Color Emoji\", \"Segoe UI Emoji\", \"Noto Color Emoji\", sans-serif";

pub fn render(ctx: &CanvasRenderingContext2d, game: &GameState) -> Result<(), JsValue> {
    let layout = game.layout();
    let vp = layout.viewport;
    ctx.clear_rect(0.0, 0.0, vp.width, vp.height);
    draw_background(ctx, &layout)?;
    match game.mode() {
        Mode::Start => draw_start_screen(ctx, game, &layout)?,
        Mode::Playing => {
            draw_flag_card(ctx, game, &layout)?;
            draw_hud(ctx, game, &layout)?;
            draw_options(ctx, game, &layout)?;
            draw_result_text(ctx, game, &layout)?;
        }
        Mode::Over => draw_end_card(ctx, game, &layout)?,
    }
    draw_particles(ctx, game);
    Ok(())
}

fn draw_background(ctx: &CanvasRenderingContext2d, layout: &Layout) -> Result<(), JsValue> {
    let vp = layout.viewport;
    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, vp.height);
    gradient.add_color_stop(0.0, "#f7f8fa")?;
    gradient.add_color_stop(1.0, "#eef1f4")?;
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, vp.width, vp.height);
    Ok(())
}

fn draw_start_screen(ctx: &CanvasRenderingContext2d, game: &GameState, layout: &Layout) -> Result<(), JsValue> {
    let vp = layout.viewport;
    let cx = vp.width / 2.0;
    ctx.save();
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str(INK_DARK);
    ctx.set_font(&format!("{}px {TITLE_FONT}", layout.font_px(0.08)));
    ctx.fill_text("Flag Rush", cx, vp.height * 0.28)?;

    let cfg = game.config();
    ctx.set_fill_style_str(INK);
    ctx.set_font(&format!("{}px {UI_FONT}", layout.font_px(0.032)));
    ctx.fill_text(
        &format!(
            "Name {} flags, {:.0}s each. {} mistakes and you're out.",
            cfg.total_questions, cfg.question_time, cfg.max_wrong
        ),
        cx,
        vp.height * 0.42,
    )?;
    ctx.fill_text("Keys 1-4 answer, F toggles fullscreen", cx, vp.height * 0.48)?;
    if game.high_score() > 0 {
        ctx.fill_text(&format!("Best: {}", game.high_score()), cx, vp.height * 0.54)?;
    }
    draw_button(ctx, layout, &layout.start_button, "Start")?;
    ctx.restore();
    Ok(())
}

fn draw_hud(ctx: &CanvasRenderingContext2d, game: &GameState, layout: &Layout) -> Result<(), JsValue> {
    let hud = layout.hud;
    let cfg = game.config();
    let time_remaining = game.time_remaining();
    let time_color = if time_remaining > 4.0 {
        SUCCESS
    } else if time_remaining > 1.0 {
        WARNING
    } else {
        DANGER
    };
    ctx.save();
    ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
    ctx.set_stroke_style_str(CARD_BORDER);
    ctx.set_line_width(2.0);
    round_rect(ctx, &hud, 16.0)?;
    ctx.fill();
    ctx.stroke();

    ctx.set_fill_style_str(INK);
    ctx.set_font(&format!("{}px {UI_FONT}", layout.font_px(0.026)));
    ctx.set_text_baseline("middle");
    ctx.set_text_align("left");
    let y = hud.center_y();
    let question = (game.round_index() + 1).min(cfg.total_questions);
    ctx.fill_text(&format!("Q {question}/{}", cfg.total_questions), hud.x + 16.0, y)?;
    ctx.fill_text(&format!("Wrong {}/{}", game.wrong_count(), cfg.max_wrong), hud.x + hud.w * 0.3, y)?;
    ctx.set_fill_style_str(time_color);
    ctx.fill_text(&format!("{time_remaining:.2}s"), hud.x + hud.w * 0.55, y)?;
    ctx.set_fill_style_str(INK);
    ctx.fill_text(&format!("Score {}", game.score().floor()), hud.x + hud.w * 0.82, y)?;
    ctx.restore();
    Ok(())
}

fn draw_flag_card(ctx: &CanvasRenderingContext2d, game: &GameState, layout: &Layout) -> Result<(), JsValue> {
    let Some(round) = game.current() else { return Ok(()) };
    let card = layout.flag_card;
    ctx.save();
    ctx.set_fill_style_str(CARD_FILL);
    ctx.set_stroke_style_str(CARD_BORDER);
    ctx.set_line_width(2.0);
    round_rect(ctx, &card, 20.0)?;
    ctx.fill();
    ctx.stroke();
    ctx.set_fill_style_str(INK_DARK);
    ctx.set_font(&format!("{}px {EMOJI_FONT}", (card.h * 0.65).round()));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(&round.country.code.flag_emoji(), card.center_x(), card.center_y())?;
    ctx.restore();
    Ok(())
}

fn draw_options(ctx: &CanvasRenderingContext2d, game: &GameState, layout: &Layout) -> Result<(), JsValue> {
    let Some(round) = game.current() else { return Ok(()) };
    let font_size = layout.font_px(0.032).max(14.0);
    ctx.save();
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_font(&format!("{font_size}px {UI_FONT}"));
    for (slot, (country, rect)) in round.options.iter().zip(layout.options.iter()).enumerate() {
        ctx.set_fill_style_str(OPTION_PALETTE[slot % OPTION_PALETTE.len()]);
        // Reveal the answer only while the result pause is showing.
        let (outline, width) = match round.picked {
            Some(_) if slot == round.correct_index => (SUCCESS, 4.0),
            Some(picked) if slot == picked => (DANGER, 4.0),
            _ => ("rgba(15, 24, 39, 0.15)", 2.0),
        };
        ctx.set_stroke_style_str(outline);
        ctx.set_line_width(width);
        round_rect(ctx, rect, 14.0)?;
        ctx.fill();
        ctx.stroke();

        ctx.set_fill_style_str(INK);
        let lines = wrap_text(ctx, &country.name, rect.w * 0.85)?;
        let lines = &lines[..lines.len().min(2)];
        let line_height = font_size * 1.1;
        let start_y = rect.center_y() - (lines.len().saturating_sub(1) as f64 * line_height) / 2.0;
        for (i, line) in lines.iter().enumerate() {
            ctx.fill_text(line, rect.center_x(), start_y + i as f64 * line_height)?;
        }
        // Keyboard hint.
        ctx.set_font(&format!("{}px {UI_FONT}", (font_size * 0.6).round()));
        ctx.set_text_align("left");
        ctx.set_fill_style_str("rgba(15, 24, 39, 0.45)");
        ctx.fill_text(&(slot + 1).to_string(), rect.x + 10.0, rect.y + font_size * 0.6)?;
        ctx.set_text_align("center");
        ctx.set_font(&format!("{font_size}px {UI_FONT}"));
    }
    ctx.restore();
    Ok(())
}

fn draw_result_text(ctx: &CanvasRenderingContext2d, game: &GameState, layout: &Layout) -> Result<(), JsValue> {
    let (text, tone) = game.result();
    if text.is_empty() {
        return Ok(());
    }
    ctx.save();
    ctx.set_font(&format!("{}px {UI_FONT}", layout.font_px(0.03)));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str(match tone {
        Tone::Good => SUCCESS,
        Tone::Bad => DANGER,
    });
    ctx.fill_text(text, layout.viewport.width / 2.0, layout.result_y)?;
    ctx.restore();
    Ok(())
}

fn draw_end_card(ctx: &CanvasRenderingContext2d, game: &GameState, layout: &Layout) -> Result<(), JsValue> {
    let Some(summary) = game.end_summary() else { return Ok(()) };
    let card = layout.end_card;
    let vp = layout.viewport;
    let cx = vp.width / 2.0;
    let cfg = game.config();
    ctx.save();
    ctx.set_fill_style_str(CARD_FILL);
    ctx.set_stroke_style_str(CARD_BORDER);
    ctx.set_line_width(2.0);
    round_rect(ctx, &card, 24.0)?;
    ctx.fill();
    ctx.stroke();

    ctx.set_fill_style_str(INK_DARK);
    ctx.set_text_align("center");
    ctx.set_text_baseline("top");
    ctx.set_font(&format!("{}px {TITLE_FONT}", layout.font_px(0.052)));
    ctx.fill_text(&game.end_title(), cx, card.y + card.h * 0.1)?;

    ctx.set_font(&format!("{}px {UI_FONT}", layout.font_px(0.05)));
    ctx.fill_text(&format!("Total Score: {}", summary.total), cx, card.y + card.h * 0.25)?;

    ctx.set_font(&format!("{}px {UI_FONT}", layout.font_px(0.032)));
    let lines = [
        format!("Questions answered: {}/{}", summary.answered, cfg.total_questions),
        format!("Wrong answers: {}/{}", summary.wrong_count, cfg.max_wrong),
        format!("Question points: {}", summary.base_points),
        format!("Fast answers bonus: {} ({} fast)", summary.fast_bonus, game.fast_count()),
        format!("Perfect run bonus: {}", summary.perfect_bonus),
        format!("Time left bonus: {}", summary.time_bonus),
    ];
    let line_height = vp.height * 0.045;
    let mut y = card.y + card.h * 0.40;
    for line in &lines {
        ctx.fill_text(line, cx, y)?;
        y += line_height;
    }

    let high = if game.is_new_record() {
        format!("New Record! {}", game.high_score())
    } else {
        format!("High Score: {}", game.high_score())
    };
    if game.is_new_record() {
        ctx.set_fill_style_str(SUCCESS);
    }
    ctx.fill_text(&high, cx, card.y + card.h * 0.84)?;

    if game.is_celebrating() {
        ctx.set_fill_style_str(DANGER);
        ctx.set_font(&format!("{}px {TITLE_FONT}", layout.font_px(0.06)));
        ctx.set_text_baseline("middle");
        ctx.fill_text("New Record!", cx, (card.y / 2.0).max(layout.font_px(0.04)))?;
    }
    draw_button(ctx, layout, &layout.restart_button, "Play Again")?;
    ctx.restore();
    Ok(())
}

fn draw_particles(ctx: &CanvasRenderingContext2d, game: &GameState) {
    let particles = game.particles();
    if particles.is_empty() {
        return;
    }
    ctx.save();
    for p in particles.iter() {
        ctx.set_fill_style_str(p.color);
        ctx.set_global_alpha(p.alpha());
        ctx.fill_rect(p.x, p.y, p.size, p.size);
    }
    ctx.restore();
}

fn draw_button(ctx: &CanvasRenderingContext2d, layout: &Layout, rect: &Rect, label: &str) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_fill_style_str(INK_DARK);
    round_rect(ctx, rect, rect.h / 2.0)?;
    ctx.fill();
    ctx.set_fill_style_str(CARD_FILL);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_font(&format!("{}px {UI_FONT}", layout.font_px(0.034)));
    ctx.fill_text(label, rect.center_x(), rect.center_y())?;
    ctx.restore();
    Ok(())
}

fn round_rect(ctx: &CanvasRenderingContext2d, rect: &Rect, radius: f64) -> Result<(), JsValue> {
    let Rect { x, y, w, h } = *rect;
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.arc_to(x + w, y, x + w, y + h, r)?;
    ctx.arc_to(x + w, y + h, x, y + h, r)?;
    ctx.arc_to(x, y + h, x, y, r)?;
    ctx.arc_to(x, y, x + w, y, r)?;
    ctx.close_path();
    Ok(())
}

/// Greedy word wrap against the current font.
fn wrap_text(ctx: &CanvasRenderingContext2d, text: &str, max_width: f64) -> Result<Vec<String>, JsValue> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() { word.to_string() } else { format!("{line} {word}") };
        if !line.is_empty() && ctx.measure_text(&candidate)?.width() > max_width {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    Ok(lines)
}
