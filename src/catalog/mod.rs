//! Country catalog: the set of regions eligible to appear as a flag prompt or
//! as a distractor.
//!
//! Building the catalog is a three step pipeline:
//! 1. enumerate candidate region codes (locale database, or every letter pair
//!    `AA..ZZ` when it cannot enumerate),
//! 2. resolve each code to a display name, dropping codes without one,
//! 3. keep only codes whose flag glyph actually renders in colour.
//!
//! Steps 1/2 sit behind [`RegionNames`] and step 3 behind [`GlyphProbe`] so the
//! browser can plug in `Intl.DisplayNames` and canvas sampling while native
//! builds use the embedded name table and allow-list.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

mod canvas_probe;
mod intl_names;
mod region_names;

pub use canvas_probe::CanvasGlyphProbe;
pub use intl_names::IntlNames;
pub use region_names::REGION_NAMES;

/// First regional indicator symbol (🇦).
const REGIONAL_INDICATOR_A: u32 = 0x1F1E6;

// Pixel heuristic for the canvas probe.
const CHANNEL_SPREAD_MIN: u8 = 15;
const COLORED_PIXELS_MIN: usize = 12;

/// Two-letter ISO 3166-1 style region identifier, always uppercase ASCII.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionCode([u8; 2]);

impl RegionCode {
    pub fn new(code: &str) -> Result<Self> {
        match code.as_bytes() {
            &[a, b] if a.is_ascii_uppercase() && b.is_ascii_uppercase() => Ok(Self([a, b])),
            _ => Err(Error::InvalidRegionCode(code.to_string())),
        }
    }

    fn from_letters(a: u8, b: u8) -> Self {
        debug_assert!(a.is_ascii_uppercase() && b.is_ascii_uppercase());
        Self([a, b])
    }

    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII uppercase by construction.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }

    /// Flag emoji: one regional indicator symbol per letter.
    pub fn flag_emoji(&self) -> String {
        self.0
            .iter()
            .filter_map(|&b| char::from_u32(REGIONAL_INDICATOR_A + u32::from(b - b'A')))
            .collect()
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RegionCode::new(s)
    }
}

impl Serialize for RegionCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Country {
    pub code: RegionCode,
    pub name: String,
}

impl Country {
    pub fn new(code: RegionCode, name: impl Into<String>) -> Self {
        Self { code, name: name.into() }
    }
}

/// Source of region codes and their display names.
pub trait RegionNames {
    /// Every region code the source knows about; `None` when it cannot enumerate.
    fn region_codes(&self) -> Option<Vec<RegionCode>>;
    fn display_name(&self, code: RegionCode) -> Option<String>;
}

/// Decides whether a flag glyph renders as a real multi-coloured flag.
pub trait GlyphProbe {
    fn renders_flag(&mut self, code: RegionCode) -> bool;
}

/// Embedded English name table, used when the locale database is unavailable.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedNames;

impl RegionNames for EmbeddedNames {
    fn region_codes(&self) -> Option<Vec<RegionCode>> {
        Some(
            REGION_NAMES
                .iter()
                .filter_map(|(code, _)| RegionCode::new(code).ok())
                .collect(),
        )
    }

    fn display_name(&self, code: RegionCode) -> Option<String> {
        REGION_NAMES
            .iter()
            .find(|(c, _)| *c == code.as_str())
            .map(|(_, name)| (*name).to_string())
    }
}

/// Static list of codes known to render correctly in common emoji fonts.
#[derive(Clone, Debug)]
pub struct AllowList(HashSet<RegionCode>);

impl AllowList {
    pub fn new(codes: impl IntoIterator<Item = RegionCode>) -> Self {
        Self(codes.into_iter().collect())
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(REGION_NAMES.iter().filter_map(|(code, _)| RegionCode::new(code).ok()))
    }
}

impl GlyphProbe for AllowList {
    fn renders_flag(&mut self, code: RegionCode) -> bool {
        self.0.contains(&code)
    }
}

/// Every letter pair `AA..ZZ`, the fallback when no code list is available.
pub fn all_letter_pairs() -> impl Iterator<Item = RegionCode> {
    (b'A'..=b'Z').flat_map(|a| (b'A'..=b'Z').map(move |b| RegionCode::from_letters(a, b)))
}

/// True when an RGBA buffer holds enough saturated pixels to be a colour flag
/// rather than a blank box or a pair of monochrome letters.
pub fn is_multicolored(rgba: &[u8]) -> bool {
    let mut colored = 0;
    for px in rgba.chunks_exact(4) {
        let (r, g, b, a) = (px[0], px[1], px[2], px[3]);
        if a == 0 {
            continue;
        }
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        if max - min > CHANNEL_SPREAD_MIN {
            colored += 1;
            if colored > COLORED_PIXELS_MIN {
                return true;
            }
        }
    }
    false
}

pub fn build_catalog(names: &dyn RegionNames, probe: &mut dyn GlyphProbe) -> Vec<Country> {
    let codes: Vec<RegionCode> = match names.region_codes() {
        Some(codes) if !codes.is_empty() => codes,
        _ => {
            log::debug!("no region list available, scanning every letter pair");
            all_letter_pairs().collect()
        }
    };

    let mut seen = HashSet::new();
    let mut resolved = Vec::new();
    for code in codes {
        if seen.contains(&code) {
            continue;
        }
        let Some(name) = names.display_name(code) else { continue };
        if name.is_empty() || name == code.as_str() {
            continue;
        }
        seen.insert(code);
        resolved.push(Country::new(code, name));
    }

    let total = resolved.len();
    let catalog: Vec<Country> = resolved.into_iter().filter(|c| probe.renders_flag(c.code)).collect();
    log::info!("country catalog: {} of {} regions have a renderable flag", catalog.len(), total);
    catalog
}

static CATALOG: OnceLock<Vec<Country>> = OnceLock::new();

/// Returns the process-wide catalog, building it with `build` on first use.
pub fn cached_catalog(build: impl FnOnce() -> Vec<Country>) -> &'static [Country] {
    CATALOG.get_or_init(build)
}

/// Catalog from the embedded name table and static allow-list.
pub fn default_catalog() -> &'static [Country] {
    cached_catalog(|| build_catalog(&EmbeddedNames, &mut AllowList::default()))
}
