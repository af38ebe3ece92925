//! Accessibility text for the carousel live region and controls.
//!
//! The carousel actor calls [`announcement`] every time it publishes a
//! snapshot, so the live-region text and the state it describes always travel
//! together.

use crate::deck::CardDeck;

/// Live-region sentence for the active card, e.g.
/// `Slide 2 of 7: Episode grain by AutoPilot`
pub fn announcement(deck: &CardDeck, active: usize) -> String {
    let position = format!("Slide {} of {}", active + 1, deck.len());
    match deck.get(active) {
        Some(card) => format!("{}: {} grain by {}", position, card.kind, card.agent),
        None => position,
    }
}

/// Label of the selection dot for `index`
pub fn dot_label(deck: &CardDeck, index: usize) -> String {
    match deck.get(index) {
        Some(card) => format!(
            "{} grain by {} ({} of {})",
            card.kind,
            card.agent,
            index + 1,
            deck.len()
        ),
        None => format!("{} of {}", index + 1, deck.len()),
    }
}

/// Label of the slide group for the active card
pub fn slide_label(deck: &CardDeck, active: usize) -> String {
    match deck.get(active) {
        Some(card) => format!(
            "{} of {}: {} grain - {}",
            active + 1,
            deck.len(),
            card.kind,
            card.description
        ),
        None => format!("{} of {}", active + 1, deck.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announces_active_card() {
        let deck = CardDeck::builtin().unwrap();
        assert_eq!(announcement(&deck, 0), "Slide 1 of 7: Fact grain by HealthPulse");
        assert_eq!(
            announcement(&deck, 6),
            "Slide 7 of 7: Checkpoint grain by EduMentor"
        );
    }

    #[test]
    fn labels_dots_and_slide() {
        let deck = CardDeck::builtin().unwrap();
        assert_eq!(dot_label(&deck, 1), "Episode grain by AutoPilot (2 of 7)");
        assert!(slide_label(&deck, 3).starts_with("4 of 7: Goal grain - Active objective"));
    }

    #[test]
    fn out_of_range_index_degrades_to_position() {
        let deck = CardDeck::builtin().unwrap();
        assert_eq!(announcement(&deck, 9), "Slide 10 of 7");
    }
}
