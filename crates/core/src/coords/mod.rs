//! Coordinate triplets (`<digit><glyph><digit>`) and the scan that finds them.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Anchor phrase that precedes the coordinate data in published documents.
pub const DEFAULT_ANCHOR: &str = "y-coordinate";

/// Number of characters after the anchor that are searched.
pub const DEFAULT_WINDOW_CHARS: usize = 100;

/// The closed set of glyphs that may sit between two coordinate digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "char")]
pub enum Marker {
    /// `█`
    FullBlock,
    /// `▀`
    UpperHalf,
    /// `▄`
    LowerHalf,
    /// `■`
    Square,
    /// `▌`
    LeftHalf,
    /// `▐`
    RightHalf,
}

impl Marker {
    pub const ALL: [Marker; 6] = [
        Marker::FullBlock,
        Marker::UpperHalf,
        Marker::LowerHalf,
        Marker::Square,
        Marker::LeftHalf,
        Marker::RightHalf,
    ];

    pub fn glyph(self) -> char {
        match self {
            Marker::FullBlock => '█',
            Marker::UpperHalf => '▀',
            Marker::LowerHalf => '▄',
            Marker::Square => '■',
            Marker::LeftHalf => '▌',
            Marker::RightHalf => '▐',
        }
    }

    pub fn from_glyph(c: char) -> Option<Marker> {
        Marker::ALL.into_iter().find(|m| m.glyph() == c)
    }
}

impl From<Marker> for char {
    fn from(marker: Marker) -> char {
        marker.glyph()
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// One plotted cell: column `x`, glyph, row `y`. Both axes are single digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coordinate {
    pub x: u8,
    pub marker: Marker,
    pub y: u8,
}

impl Coordinate {
    pub fn new(x: u8, marker: Marker, y: u8) -> Self {
        Self { x, marker, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, '{}', {})", self.x, self.marker, self.y)
    }
}

/// Where to look for coordinates in normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Literal, case-sensitive phrase; the window starts right after it.
    pub anchor: String,
    /// Window length in characters, clipped to the end of the text.
    pub window_chars: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            anchor: DEFAULT_ANCHOR.to_string(),
            window_chars: DEFAULT_WINDOW_CHARS,
        }
    }
}

/// Return the window following the first occurrence of the anchor, or `None`
/// when the anchor does not appear in `text`.
pub fn locate_window<'a>(text: &'a str, config: &ScanConfig) -> Option<&'a str> {
    let start = text.find(config.anchor.as_str())? + config.anchor.len();
    let rest = &text[start..];
    let end = rest
        .char_indices()
        .nth(config.window_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

fn triplet_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let glyphs: String = Marker::ALL.iter().map(|m| m.glyph()).collect();
        Regex::new(&format!(r"([0-9])([{}])([0-9])", glyphs)).unwrap()
    })
}

/// Find every digit-glyph-digit triplet in `window`, left to right.
///
/// Matches never share characters: after a match the scan resumes at the
/// character following it, so `1█2█3` yields only `(1, '█', 2)`. Only ASCII
/// `0`-`9` count as digits, so other scripts' digits never consume a glyph.
pub fn scan_window(window: &str) -> Vec<Coordinate> {
    triplet_pattern()
        .captures_iter(window)
        .filter_map(|caps| {
            let x = single_char(caps.get(1)?.as_str())?.to_digit(10)?;
            let marker = Marker::from_glyph(single_char(caps.get(2)?.as_str())?)?;
            let y = single_char(caps.get(3)?.as_str())?.to_digit(10)?;
            Some(Coordinate::new(x as u8, marker, y as u8))
        })
        .collect()
}

/// Locate the window and scan it. An absent anchor yields an empty collection.
pub fn parse_coordinates(text: &str, config: &ScanConfig) -> Vec<Coordinate> {
    locate_window(text, config)
        .map(scan_window)
        .unwrap_or_default()
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}
