//! End-to-end decoding through the pipeline driver.

use glyphgrid_core::coords::{Coordinate, Marker, ScanConfig};
use glyphgrid_core::grid::Rendering;
use glyphgrid_core::pipeline::{
    self, DecodeConfig, DecodeError, NullReporter, Reporter, Source, TextSource,
};
use glyphgrid_core::text::Extractor;
use pretty_assertions::assert_eq;

/// Records the order of reporter events.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl Reporter for Recorder {
    fn loaded(&mut self, origin: &str, raw_chars: usize) {
        self.events.push(format!("loaded {} {}", origin, raw_chars));
    }
    fn extracted(&mut self, text: &str) {
        self.events.push(format!("extracted {}", text.chars().count()));
    }
    fn window(&mut self, window: &str) {
        self.events.push(format!("window {}", window));
    }
    fn coordinate(&mut self, coord: &Coordinate) {
        self.events.push(format!("coordinate {}", coord));
    }
    fn scanned(&mut self, count: usize) {
        self.events.push(format!("scanned {}", count));
    }
    fn rendered(&mut self, rendering: &Rendering, _coords: &[Coordinate]) {
        self.events.push(format!(
            "rendered {}x{}",
            rendering.bounds.width(),
            rendering.bounds.height()
        ));
    }
    fn stopped(&mut self, error: &DecodeError) {
        self.events.push(format!("stopped {}", error));
    }
}

struct FailingSource;

impl Source for FailingSource {
    fn origin(&self) -> &str {
        "broken"
    }

    fn load(&self) -> Result<String, DecodeError> {
        Err(DecodeError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        )))
    }
}

const PUBLISHED_DOC: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Secret</title>
    <style>.c1 { font-family: Arial; }</style>
    <script>window.DOCS_timing = {"y-coordinate": "0█0"};</script>
</head>
<body>
    <p>This table lists the characters of a grid.</p>
    <table>
        <tr><td><p>x-coordinate</p></td><td><p>Character</p></td><td><p>y-coordinate</p></td></tr>
        <tr><td><p>0</p></td><td><p>█</p></td><td><p>0</p></td></tr>
        <tr><td><p>0</p></td><td><p>█</p></td><td><p>1</p></td></tr>
        <tr><td><p>0</p></td><td><p>█</p></td><td><p>2</p></td></tr>
        <tr><td><p>1</p></td><td><p>▀</p></td><td><p>1</p></td></tr>
        <tr><td><p>1</p></td><td><p>▀</p></td><td><p>2</p></td></tr>
        <tr><td><p>2</p></td><td><p>▀</p></td><td><p>1</p></td></tr>
        <tr><td><p>2</p></td><td><p>▀</p></td><td><p>2</p></td></tr>
        <tr><td><p>3</p></td><td><p>▀</p></td><td><p>2</p></td></tr>
    </table>
</body>
</html>
"#;

#[test]
fn test_anchor_phrase_scenario() {
    let text = "intro y-coordinate stuff 1█1 2▀2 more text";
    let decoded = pipeline::decode_text(text, &ScanConfig::default(), &mut NullReporter).unwrap();

    assert_eq!(
        decoded.coordinates,
        vec![
            Coordinate::new(1, Marker::FullBlock, 1),
            Coordinate::new(2, Marker::UpperHalf, 2),
        ]
    );
    let r = &decoded.rendering;
    assert_eq!((r.bounds.width(), r.bounds.height()), (2, 2));
    assert_eq!(r.normal.get(0, 0), Some('█'));
    assert_eq!(r.flipped.get(1, 0), Some('█'));
    assert_eq!(r.normal.get(1, 1), Some('▀'));
    assert_eq!(r.flipped.get(0, 1), Some('▀'));
}

#[test]
fn test_published_document_decodes_to_letter() {
    for extractor in [Extractor::Strip, Extractor::Dom] {
        let config = DecodeConfig {
            extractor,
            ..Default::default()
        };
        let decoded = glyphgrid_core::decode(PUBLISHED_DOC, &config).unwrap();

        assert_eq!(decoded.coordinates.len(), 8, "extractor {:?}", extractor);
        assert!(decoded.window.trim_start().starts_with("0█0"), "window {:?}", decoded.window);
        assert_eq!(decoded.rendering.normal.rows(), vec!["█   ", "█▀▀ ", "█▀▀▀"]);
        assert_eq!(decoded.rendering.flipped.rows(), vec!["█▀▀▀", "█▀▀ ", "█   "]);
    }
}

#[test]
fn test_reporter_sees_stages_in_order() {
    let source = TextSource::new("doc", "<p>y-coordinate</p><p>3█7</p>");
    let mut recorder = Recorder::default();
    let decoded = pipeline::run(&source, &DecodeConfig::default(), &mut recorder).unwrap();

    assert_eq!(decoded.origin, "doc");
    assert_eq!(
        recorder.events,
        vec![
            "loaded doc 29",
            "extracted 15",
            "window 3█7",
            "coordinate (3, '█', 7)",
            "scanned 1",
            "rendered 1x1",
        ]
    );
}

#[test]
fn test_missing_anchor_is_distinct_outcome() {
    let source = TextSource::new("doc", "<p>no coordinates here 1█1</p>");
    let mut recorder = Recorder::default();
    let err = pipeline::run(&source, &DecodeConfig::default(), &mut recorder).unwrap_err();

    assert!(matches!(err, DecodeError::AnchorNotFound { .. }), "got {:?}", err);
    assert!(err.to_string().contains("y-coordinate"));
    assert_eq!(recorder.events.last().map(String::as_str), Some(&*format!("stopped {}", err)));
}

#[test]
fn test_anchor_without_triplets_is_distinct_outcome() {
    let err = glyphgrid_core::decode("y-coordinate 1 2 3 █", &DecodeConfig::default()).unwrap_err();
    assert!(matches!(err, DecodeError::NoCoordinates { .. }), "got {:?}", err);
    assert!(err.to_string().starts_with("parse stopped: no coordinates"));
}

#[test]
fn test_source_failure_stops_before_extraction() {
    let mut recorder = Recorder::default();
    let err = pipeline::run(&FailingSource, &DecodeConfig::default(), &mut recorder).unwrap_err();

    assert!(matches!(err, DecodeError::Io(_)));
    assert!(err.to_string().starts_with("read failed"));
    assert_eq!(recorder.events, vec![format!("stopped {}", err)]);
}

#[test]
fn test_file_source_reads_from_disk() {
    let path = std::env::temp_dir().join(format!("glyphgrid-{}.html", std::process::id()));
    std::fs::write(&path, "<td>y-coordinate</td><td>4</td><td>▌</td><td>4</td>").unwrap();

    let source = pipeline::FileSource::new(&path);
    let result = pipeline::run(&source, &DecodeConfig::default(), &mut NullReporter);
    std::fs::remove_file(&path).unwrap();

    let decoded = result.unwrap();
    assert_eq!(decoded.coordinates, vec![Coordinate::new(4, Marker::LeftHalf, 4)]);
}

#[test]
fn test_missing_file_is_read_failure() {
    let source = pipeline::FileSource::new("/nonexistent/glyphgrid/input.html");
    let err = pipeline::run(&source, &DecodeConfig::default(), &mut NullReporter).unwrap_err();
    assert!(matches!(err, DecodeError::Io(_)));
}

#[test]
fn test_identical_input_gives_identical_output() {
    let a = glyphgrid_core::decode(PUBLISHED_DOC, &DecodeConfig::default()).unwrap();
    let b = glyphgrid_core::decode(PUBLISHED_DOC, &DecodeConfig::default()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.rendering.normal.to_string(), b.rendering.normal.to_string());
}

#[test]
fn test_json_shape() {
    let decoded = glyphgrid_core::decode("y-coordinate2■1 1█2", &DecodeConfig::default()).unwrap();
    let json = serde_json::to_value(&decoded).unwrap();

    assert_eq!(json["coordinates"][0]["marker"], "■");
    assert_eq!(json["coordinates"][0]["x"], 2);
    assert_eq!(json["rendering"]["bounds"]["max_y"], 2);
    assert_eq!(json["rendering"]["normal"], serde_json::json!([" ■", "█ "]));
    assert_eq!(json["rendering"]["flipped"], serde_json::json!(["█ ", " ■"]));
}

#[test]
fn test_only_bare_dash_reads_stdin() {
    assert!(pipeline::FileSource::new("-").reads_stdin());
    assert!(!pipeline::FileSource::new("./-").reads_stdin());

    let dir = std::env::temp_dir().join(format!("glyphgrid-dash-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("-");
    std::fs::write(&path, "y-coordinate 2▄2").unwrap();

    let source = pipeline::FileSource::new(&path);
    assert!(!source.reads_stdin());
    let result = pipeline::run(&source, &DecodeConfig::default(), &mut NullReporter);
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(
        result.unwrap().coordinates,
        vec![Coordinate::new(2, Marker::LowerHalf, 2)]
    );
}
