use std::path::Path;

use flowpitch_protocol::{Deck, LayoutTag};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch deck content: {0}")]
    Fetch(#[from] std::io::Error),
    #[error("deck content is not a valid deck: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read and parse the content document from disk.
///
/// Runs once at startup. A failure aborts startup — there is no retry and
/// no partial render.
pub fn load_deck(path: &Path) -> Result<Deck, LoadError> {
    let data = std::fs::read(path)?;
    parse_deck(&data)
}

/// Parse deck content from raw bytes.
///
/// Slides with an unrecognized layout tag are tolerated (they render
/// headline/subheadline only); each one is logged so malformed content
/// doesn't go unnoticed.
pub fn parse_deck(data: &[u8]) -> Result<Deck, LoadError> {
    let deck: Deck = serde_json::from_slice(data)?;

    for (index, slide) in deck.slides.iter().enumerate() {
        if slide.layout() == LayoutTag::Unknown {
            log::warn!("slide {index}: unrecognized layout tag, rendering headline only");
        }
    }

    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_deck() {
        let data = br#"{"meta":{"title":"Demo"},"slides":[{"type":"plain","headline":"Hi"}]}"#;
        let deck = parse_deck(data).expect("parse");
        assert_eq!(deck.meta.title, "Demo");
        assert_eq!(deck.slide_count(), 1);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let result = parse_deck(b"{not json");
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn wrong_shape_is_parse_error() {
        // Valid JSON, but not a Deck: slides must be a sequence.
        let result = parse_deck(br#"{"meta":{"title":"x"},"slides":{}}"#);
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn missing_file_is_fetch_error() {
        let result = load_deck(Path::new("/nonexistent/deck/content.json"));
        assert!(matches!(result, Err(LoadError::Fetch(_))));
    }

    #[test]
    fn unknown_layout_survives_parse() {
        let data = br#"{"meta":{"title":"x"},"slides":[{"type":"marquee","headline":"??"}]}"#;
        let deck = parse_deck(data).expect("parse");
        assert_eq!(deck.slides[0].layout(), LayoutTag::Unknown);
    }
}
