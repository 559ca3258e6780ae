//! Screen geometry derived purely from the viewport size.
//!
//! Coordinates are CSS pixels, origin top-left, +x right, +y down. The renderer
//! draws into these rects and pointer input is hit-tested against the same
//! values, so drawing and input never disagree.

use crate::round::OPTION_COUNT;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 960.0, height: 640.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    #[cfg(test)]
    fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

// Fractions of the viewport.
const PADDING: f64 = 0.04;
const HUD_HEIGHT: f64 = 0.07;
const OPTIONS_TOP: f64 = 0.72;
const OPTION_GAP: f64 = 0.025;
const CARD_WIDTH: f64 = 0.60;
const CARD_HEIGHT: f64 = 0.32;
const CARD_MIN_HEIGHT: f64 = 0.24;
const CARD_TOP: f64 = 0.14;
const CARD_MIN_TOP: f64 = 0.08;
const END_CARD_WIDTH: f64 = 0.72;
const END_CARD_HEIGHT: f64 = 0.62;
const END_CARD_LIFT: f64 = 0.05;
const BUTTON_WIDTH: f64 = 0.30;
const BUTTON_HEIGHT: f64 = 0.08;

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub viewport: Viewport,
    pub hud: Rect,
    pub flag_card: Rect,
    pub options: [Rect; OPTION_COUNT],
    pub options_top: f64,
    /// Vertical centre of the transient "Correct!" / "Time's up!" line.
    pub result_y: f64,
    pub end_card: Rect,
    pub restart_button: Rect,
    pub start_button: Rect,
    /// Where the new-record confetti bursts from.
    pub celebration_origin: (f64, f64),
}

impl Layout {
    pub fn new(viewport: Viewport) -> Self {
        let Viewport { width: w, height: h } = viewport;
        let padding = w * PADDING;

        let hud = Rect::new(padding, padding, w - 2.0 * padding, h * HUD_HEIGHT);

        // Two by two option grid filling the band under the flag.
        let options_top = h * OPTIONS_TOP;
        let gap = w * OPTION_GAP;
        let grid_w = w - 2.0 * padding;
        let grid_h = (h - padding - options_top).max(0.0);
        let cell_w = ((grid_w - gap) / 2.0).max(0.0);
        let cell_h = ((grid_h - gap) / 2.0).max(0.0);
        let options = std::array::from_fn(|i| {
            let col = (i % 2) as f64;
            let row = (i / 2) as f64;
            Rect::new(padding + col * (cell_w + gap), options_top + row * (cell_h + gap), cell_w, cell_h)
        });

        // Flag card, shrunk then lifted so it clears the options.
        let card_w = w * CARD_WIDTH;
        let mut card_h = h * CARD_HEIGHT;
        let mut card_y = h * CARD_TOP;
        let margin = (h * 0.06).max(24.0);
        let max_bottom = options_top - margin;
        if card_y + card_h > max_bottom {
            card_h = (h * CARD_MIN_HEIGHT).max(max_bottom - card_y);
        }
        if card_y + card_h > max_bottom {
            card_y = (h * CARD_MIN_TOP).max(max_bottom - card_h);
        }
        let flag_card = Rect::new(w / 2.0 - card_w / 2.0, card_y, card_w, card_h);

        let result_gap = (h * 0.04).max(24.0);
        let mut result_y = (flag_card.bottom() + options_top) / 2.0;
        if result_y > options_top - result_gap {
            result_y = options_top - result_gap;
        }
        if result_y < flag_card.bottom() + result_gap {
            result_y = flag_card.bottom() + result_gap;
        }

        let end_w = w * END_CARD_WIDTH;
        let end_h = h * END_CARD_HEIGHT;
        let end_card = Rect::new(w / 2.0 - end_w / 2.0, h / 2.0 - end_h / 2.0 - h * END_CARD_LIFT, end_w, end_h);

        let button_w = w * BUTTON_WIDTH;
        let button_h = h * BUTTON_HEIGHT;
        let restart_button = Rect::new(w / 2.0 - button_w / 2.0, end_card.bottom() + h * 0.03, button_w, button_h);
        let start_button = Rect::new(w / 2.0 - button_w / 2.0, h * 0.62, button_w, button_h);

        Self {
            viewport,
            hud,
            flag_card,
            options,
            options_top,
            result_y,
            end_card,
            restart_button,
            start_button,
            celebration_origin: (w / 2.0, h * 0.2),
        }
    }

    /// Index of the option card under a pointer position.
    pub fn option_at(&self, x: f64, y: f64) -> Option<usize> {
        self.options.iter().position(|r| r.contains(x, y))
    }

    /// Font size in px scaled to the viewport height.
    pub fn font_px(&self, fraction: f64) -> f64 {
        (self.viewport.height * fraction).round()
    }
}
