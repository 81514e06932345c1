pub mod text;
pub mod dom;
pub mod coords;
pub mod grid;
pub mod pipeline;
#[cfg(feature = "fetch")]
pub mod fetch;

use pipeline::{DecodeConfig, DecodeError, Decoded, NullReporter, TextSource};

/// Decode a markup (or text) string held in memory.
/// This is the primary entry point for glyphgrid-core.
pub fn decode(raw: &str, config: &DecodeConfig) -> Result<Decoded, DecodeError> {
    pipeline::run(&TextSource::new("<memory>", raw), config, &mut NullReporter)
}
