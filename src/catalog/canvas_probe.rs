use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{GlyphProbe, RegionCode, is_multicolored};
use crate::error::{Error, Result};
use crate::render::EMOJI_FONT;

const PROBE_SIZE: u32 = 64;

/// Renders each flag glyph off-screen and samples its pixels. Platforms without
/// colour flag emoji draw the two regional indicator letters instead, which
/// fail the saturation check.
pub struct CanvasGlyphProbe {
    ctx: CanvasRenderingContext2d,
}

impl CanvasGlyphProbe {
    pub fn new() -> Result<Self> {
        let doc = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| Error::Js("no document".into()))?;
        let canvas: HtmlCanvasElement = doc
            .create_element("canvas")
            .map_err(Error::js)?
            .dyn_into()
            .map_err(|_| Error::Js("created element is not a canvas".into()))?;
        canvas.set_width(PROBE_SIZE);
        canvas.set_height(PROBE_SIZE);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(Error::js)?
            .ok_or_else(|| Error::Js("2d context unavailable".into()))?
            .dyn_into()
            .map_err(|_| Error::Js("unexpected context type".into()))?;
        ctx.set_text_baseline("top");
        ctx.set_font(&format!("48px {EMOJI_FONT}"));
        Ok(Self { ctx })
    }
}

impl GlyphProbe for CanvasGlyphProbe {
    fn renders_flag(&mut self, code: RegionCode) -> bool {
        let size = f64::from(PROBE_SIZE);
        self.ctx.clear_rect(0.0, 0.0, size, size);
        if self.ctx.fill_text(&code.flag_emoji(), 0.0, 0.0).is_err() {
            return false;
        }
        match self.ctx.get_image_data(0.0, 0.0, size, size) {
            Ok(image) => is_multicolored(&image.data()),
            Err(_) => false,
        }
    }
}
