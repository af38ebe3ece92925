//! # Card Deck
//!
//! The immutable, ordered, cyclic set of showcase cards. A deck is loaded once
//! (either the built-in grain deck or a TOML file named in the configuration)
//! and then shared read-only between the carousel actor and the UI.
//!
//! The carousel controller only ever looks at [`CardDeck::len`]; everything
//! else on a [`Card`] is payload for the announcer and the render layer.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

const BUILTIN_DECK: &str = include_str!("../../assets/grains.toml");

/// Errors raised while building a deck
#[derive(Debug, Error)]
pub enum DeckError {
    /// A deck needs at least one card
    #[error("Deck contains no cards")]
    Empty,

    /// The deck file is not valid TOML or does not match the card layout
    #[error("Failed to parse deck: {0}")]
    Parse(#[from] toml::de::Error),

    /// The deck file could not be read
    #[error("Failed to read deck file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An agent that consumes a grain, shown in the "Read by" column
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reader {
    pub agent: String,
    #[serde(rename = "use")]
    pub purpose: String,
}

/// A single showcase card.
///
/// `index` is assigned when the deck is built and is stable for the lifetime
/// of the deck.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Card {
    #[serde(skip)]
    pub index: usize,
    /// Grain type name, e.g. `Fact`
    pub kind: String,
    /// Wire tag of the grain type, e.g. `0x01`
    pub type_hex: String,
    /// Agent that wrote the grain
    pub agent: String,
    pub company: String,
    pub description: String,
    /// Abbreviated content hash shown in the envelope line
    pub hash: String,
    /// Sample grain body, rendered as highlighted JSON
    pub payload: serde_json::Value,
    #[serde(default)]
    pub readers: Vec<Reader>,
}

#[derive(Debug, Deserialize)]
struct DeckFile {
    #[serde(rename = "card", default)]
    cards: Vec<Card>,
}

/// Read-only table of cards, cheap to clone.
#[derive(Debug, Clone)]
pub struct CardDeck {
    cards: Arc<[Card]>,
}

impl CardDeck {
    /// The seven grain cards bundled with the application
    pub fn builtin() -> Result<Self, DeckError> {
        Self::from_toml_str(BUILTIN_DECK)
    }

    /// Parses a deck from TOML text made of `[[card]]` entries
    pub fn from_toml_str(source: &str) -> Result<Self, DeckError> {
        let file: DeckFile = toml::from_str(source)?;
        Self::from_cards(file.cards)
    }

    /// Loads a deck file from disk
    pub async fn load(path: &Path) -> Result<Self, DeckError> {
        info!("Loading card deck from {:?}", path);
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DeckError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&source)
    }

    /// Builds a deck from cards in display order, renumbering their indices
    pub fn from_cards(mut cards: Vec<Card>) -> Result<Self, DeckError> {
        if cards.is_empty() {
            return Err(DeckError::Empty);
        }
        for (index, card) in cards.iter_mut().enumerate() {
            card.index = index;
        }
        debug!("Built card deck with {} cards", cards.len());
        Ok(Self {
            cards: cards.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always false; construction rejects empty decks
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_CARDS: &str = r#"
        [[card]]
        kind = "Fact"
        type_hex = "0x01"
        agent = "A"
        company = "ACo"
        description = "first"
        hash = "00"
        readers = [{ agent = "R", use = "reading" }]

        [card.payload]
        type = "fact"

        [[card]]
        kind = "Goal"
        type_hex = "0x07"
        agent = "B"
        company = "BCo"
        description = "second"
        hash = "11"
        payload = { type = "goal", priority = 2 }
    "#;

    #[test]
    fn builtin_deck_has_seven_grains_in_order() {
        let deck = CardDeck::builtin().unwrap();
        assert_eq!(deck.len(), 7);

        let kinds: Vec<&str> = deck.iter().map(|c| c.kind.as_str()).collect();
        assert_eq!(
            kinds,
            [
                "Fact",
                "Episode",
                "Observation",
                "Goal",
                "ToolCall",
                "Workflow",
                "Checkpoint"
            ]
        );
        for (i, card) in deck.iter().enumerate() {
            assert_eq!(card.index, i);
        }
        assert_eq!(deck.get(0).unwrap().agent, "HealthPulse");
        assert_eq!(deck.get(0).unwrap().readers[0].purpose, "meal planning");
    }

    #[test]
    fn parses_inline_and_table_payloads() {
        let deck = CardDeck::from_toml_str(TWO_CARDS).unwrap();
        assert_eq!(deck.len(), 2);

        let goal = deck.get(1).unwrap();
        assert_eq!(goal.index, 1);
        assert_eq!(goal.payload["priority"], serde_json::json!(2));
        assert!(goal.readers.is_empty());
        assert_eq!(deck.get(0).unwrap().payload["type"], "fact");
    }

    #[test]
    fn empty_deck_is_rejected() {
        assert!(matches!(
            CardDeck::from_toml_str(""),
            Err(DeckError::Empty)
        ));
        assert!(matches!(CardDeck::from_cards(Vec::new()), Err(DeckError::Empty)));
    }

    #[test]
    fn malformed_deck_reports_parse_error() {
        let result = CardDeck::from_toml_str("[[card]]\nkind = 3\n");
        assert!(matches!(result, Err(DeckError::Parse(_))));
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let err = CardDeck::load(Path::new("/nonexistent/deck.toml"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/deck.toml"));
    }
}
