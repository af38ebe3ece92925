//! Pause tracking for the auto-advance scheduler
//!
//! The carousel is paused while the pointer is over the region or keyboard
//! focus is anywhere inside it. Focus moving between two controls of the
//! region (prev arrow to next arrow) is reported with `to_inside: true` and
//! does not resume.

use tracing::debug;

/// Interaction signals emitted by the render layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionSignal {
    PointerEntered,
    PointerLeft,
    FocusEntered,
    /// Focus left a control of the region; `to_inside` tells whether the new
    /// focus target is still within the region
    FocusLeft { to_inside: bool },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseTracker {
    pointer_inside: bool,
    focus_inside: bool,
}

impl PauseTracker {
    pub fn is_paused(&self) -> bool {
        self.pointer_inside || self.focus_inside
    }

    /// Applies a signal, returning the new paused flag if it changed
    pub fn apply(&mut self, signal: InteractionSignal) -> Option<bool> {
        let was_paused = self.is_paused();
        match signal {
            InteractionSignal::PointerEntered => self.pointer_inside = true,
            InteractionSignal::PointerLeft => self.pointer_inside = false,
            InteractionSignal::FocusEntered => self.focus_inside = true,
            InteractionSignal::FocusLeft { to_inside: true } => {
                debug!("Focus moved within the carousel, staying paused");
            }
            InteractionSignal::FocusLeft { to_inside: false } => self.focus_inside = false,
        }

        let paused = self.is_paused();
        (paused != was_paused).then_some(paused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InteractionSignal::*;

    #[test]
    fn hover_pauses_and_resumes() {
        let mut tracker = PauseTracker::default();
        assert_eq!(tracker.apply(PointerEntered), Some(true));
        assert_eq!(tracker.apply(PointerEntered), None);
        assert_eq!(tracker.apply(PointerLeft), Some(false));
    }

    #[test]
    fn focus_moving_between_children_keeps_pause() {
        let mut tracker = PauseTracker::default();
        assert_eq!(tracker.apply(FocusEntered), Some(true));
        assert_eq!(tracker.apply(FocusLeft { to_inside: true }), None);
        assert!(tracker.is_paused());
        assert_eq!(tracker.apply(FocusLeft { to_inside: false }), Some(false));
    }

    #[test]
    fn pointer_leaving_does_not_resume_while_focused() {
        let mut tracker = PauseTracker::default();
        tracker.apply(PointerEntered);
        tracker.apply(FocusEntered);
        assert_eq!(tracker.apply(PointerLeft), None);
        assert!(tracker.is_paused());
        assert_eq!(tracker.apply(FocusLeft { to_inside: false }), Some(false));
    }
}
