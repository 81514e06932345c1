//! Load → normalize → scan → render, with progress routed through a [`Reporter`].

use crate::coords::{self, Coordinate, ScanConfig};
use crate::grid::{Orientation, Rendering};
use crate::text::{self, Extractor};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Characters of extracted text included in the debug preview.
const PREVIEW_CHARS: usize = 500;

/// Everything that can end a run early. Each variant names its stage.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[cfg(feature = "fetch")]
    #[error("fetch failed: {0}")]
    Fetch(#[from] crate::fetch::FetchError),
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse stopped: anchor {anchor:?} not found in extracted text")]
    AnchorNotFound { anchor: String },
    #[error("parse stopped: no coordinates found after anchor {anchor:?}")]
    NoCoordinates { anchor: String },
}

/// Where the raw document comes from.
pub trait Source {
    /// Label for progress output (URL, path, ...).
    fn origin(&self) -> &str;
    fn load(&self) -> Result<String, DecodeError>;
}

/// An in-memory document.
#[derive(Debug, Clone)]
pub struct TextSource {
    origin: String,
    body: String,
}

impl TextSource {
    pub fn new(origin: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            body: body.into(),
        }
    }
}

impl Source for TextSource {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn load(&self) -> Result<String, DecodeError> {
        Ok(self.body.clone())
    }
}

/// A document read from disk, or from stdin when the path is `-`.
#[derive(Debug, Clone)]
pub struct FileSource {
    origin: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            origin: path.display().to_string(),
            path,
        }
    }
}

impl FileSource {
    /// Whether this source is stdin (`-`) rather than a file on disk.
    pub fn reads_stdin(&self) -> bool {
        self.path == Path::new("-")
    }
}

impl Source for FileSource {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn load(&self) -> Result<String, DecodeError> {
        if self.reads_stdin() {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        } else {
            Ok(std::fs::read_to_string(&self.path)?)
        }
    }
}

/// Progress hooks. Every method defaults to doing nothing.
#[allow(unused_variables)]
pub trait Reporter {
    fn loaded(&mut self, origin: &str, raw_chars: usize) {}
    fn extracted(&mut self, text: &str) {}
    fn window(&mut self, window: &str) {}
    fn coordinate(&mut self, coord: &Coordinate) {}
    fn scanned(&mut self, count: usize) {}
    fn rendered(&mut self, rendering: &Rendering, coords: &[Coordinate]) {}
    fn stopped(&mut self, error: &DecodeError) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Emits every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn loaded(&mut self, origin: &str, raw_chars: usize) {
        tracing::info!(origin, chars = raw_chars, "document loaded");
    }

    fn extracted(&mut self, text: &str) {
        tracing::info!(chars = text.chars().count(), "text extracted");
        tracing::debug!(preview = crate::text::preview(text, PREVIEW_CHARS), "text preview");
    }

    fn window(&mut self, window: &str) {
        tracing::info!(window, "coordinate section located");
    }

    fn coordinate(&mut self, coord: &Coordinate) {
        tracing::info!("found coordinate {}", coord);
    }

    fn scanned(&mut self, count: usize) {
        tracing::info!(count, "coordinate scan complete");
    }

    fn rendered(&mut self, rendering: &Rendering, coords: &[Coordinate]) {
        let b = &rendering.bounds;
        tracing::info!(
            width = b.width(),
            height = b.height(),
            "grid size {} x {} (x {}..={}, y {}..={})",
            b.width(),
            b.height(),
            b.min_x,
            b.max_x,
            b.min_y,
            b.max_y
        );
        for c in coords {
            let placed = (
                c.x.checked_sub(b.min_x),
                Orientation::Normal.row(c.y, b),
                Orientation::Flipped.row(c.y, b),
            );
            if let (Some(col), Some(row), Some(flipped)) = placed {
                tracing::debug!(
                    "placed '{}' at col {}, row {} (flipped row {}) from {}",
                    c.marker,
                    col,
                    row,
                    flipped,
                    c
                );
            }
        }
    }

    fn stopped(&mut self, error: &DecodeError) {
        tracing::warn!("{}", error);
    }
}

/// Settings for one decode run.
#[derive(Debug, Clone, Default)]
pub struct DecodeConfig {
    pub scan: ScanConfig,
    pub extractor: Extractor,
}

/// The outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoded {
    pub origin: String,
    pub raw_chars: usize,
    pub text_chars: usize,
    pub window: String,
    pub coordinates: Vec<Coordinate>,
    pub rendering: Rendering,
}

/// Run the whole pipeline against `source`.
pub fn run(
    source: &dyn Source,
    config: &DecodeConfig,
    reporter: &mut dyn Reporter,
) -> Result<Decoded, DecodeError> {
    let result = load_and_decode(source, config, reporter);
    if let Err(e) = &result {
        reporter.stopped(e);
    }
    result
}

/// Run the scan and render stages over already-normalized text.
pub fn decode_text(
    text: &str,
    config: &ScanConfig,
    reporter: &mut dyn Reporter,
) -> Result<Decoded, DecodeError> {
    let chars = text.chars().count();
    let result = decode_stages("<text>", chars, text, config, reporter);
    if let Err(e) = &result {
        reporter.stopped(e);
    }
    result
}

fn load_and_decode(
    source: &dyn Source,
    config: &DecodeConfig,
    reporter: &mut dyn Reporter,
) -> Result<Decoded, DecodeError> {
    let raw = source.load()?;
    let raw_chars = raw.chars().count();
    reporter.loaded(source.origin(), raw_chars);

    let extracted = text::extract(&raw, config.extractor);
    reporter.extracted(&extracted);

    decode_stages(source.origin(), raw_chars, &extracted, &config.scan, reporter)
}

fn decode_stages(
    origin: &str,
    raw_chars: usize,
    text: &str,
    config: &ScanConfig,
    reporter: &mut dyn Reporter,
) -> Result<Decoded, DecodeError> {
    let window = coords::locate_window(text, config).ok_or_else(|| DecodeError::AnchorNotFound {
        anchor: config.anchor.clone(),
    })?;
    reporter.window(window);

    let coordinates = coords::scan_window(window);
    for coord in &coordinates {
        reporter.coordinate(coord);
    }
    reporter.scanned(coordinates.len());

    let rendering = Rendering::new(&coordinates).ok_or_else(|| DecodeError::NoCoordinates {
        anchor: config.anchor.clone(),
    })?;
    reporter.rendered(&rendering, &coordinates);

    Ok(Decoded {
        origin: origin.to_string(),
        raw_chars,
        text_chars: text.chars().count(),
        window: window.to_string(),
        coordinates,
        rendering,
    })
}
