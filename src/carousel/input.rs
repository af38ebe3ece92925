//! Input routing: discrete UI events to navigation requests
//!
//! Nothing is queued here. Whether a request is honoured while a transition
//! is in flight is decided by the transition controller.

use tracing::debug;

/// Keys the carousel cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKey {
    ArrowLeft,
    ArrowRight,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Key press; `region_focused` is true when focus is inside the carousel
    KeyPressed {
        key: NavigationKey,
        region_focused: bool,
    },
    PreviousClicked,
    NextClicked,
    /// Click on the selection dot for a card index
    DotClicked(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationRequest {
    Next,
    Previous,
    GoTo(usize),
}

/// A routed input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutedInput {
    pub request: NavigationRequest,
    /// The host should swallow the event (no scrolling, no focus movement)
    pub suppress_default: bool,
}

/// Maps an input event to a navigation request, if it is one
pub fn route(event: InputEvent) -> Option<RoutedInput> {
    let routed = match event {
        InputEvent::KeyPressed {
            region_focused: false,
            ..
        } => None,
        InputEvent::KeyPressed {
            key: NavigationKey::ArrowLeft,
            ..
        } => Some(RoutedInput {
            request: NavigationRequest::Previous,
            suppress_default: true,
        }),
        InputEvent::KeyPressed {
            key: NavigationKey::ArrowRight,
            ..
        } => Some(RoutedInput {
            request: NavigationRequest::Next,
            suppress_default: true,
        }),
        InputEvent::KeyPressed { .. } => None,
        InputEvent::PreviousClicked => Some(RoutedInput {
            request: NavigationRequest::Previous,
            suppress_default: false,
        }),
        InputEvent::NextClicked => Some(RoutedInput {
            request: NavigationRequest::Next,
            suppress_default: false,
        }),
        InputEvent::DotClicked(index) => Some(RoutedInput {
            request: NavigationRequest::GoTo(index),
            suppress_default: false,
        }),
    };

    if let Some(routed) = &routed {
        debug!("Routed {:?} to {:?}", event, routed.request);
    }
    routed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: NavigationKey, region_focused: bool) -> InputEvent {
        InputEvent::KeyPressed {
            key,
            region_focused,
        }
    }

    #[test]
    fn arrow_keys_navigate_only_with_focus() {
        let right = route(key(NavigationKey::ArrowRight, true)).unwrap();
        assert_eq!(right.request, NavigationRequest::Next);
        assert!(right.suppress_default);

        let left = route(key(NavigationKey::ArrowLeft, true)).unwrap();
        assert_eq!(left.request, NavigationRequest::Previous);
        assert!(left.suppress_default);

        assert_eq!(route(key(NavigationKey::ArrowRight, false)), None);
        assert_eq!(route(key(NavigationKey::Other, true)), None);
    }

    #[test]
    fn clicks_map_to_requests() {
        assert_eq!(
            route(InputEvent::PreviousClicked).map(|r| r.request),
            Some(NavigationRequest::Previous)
        );
        assert_eq!(
            route(InputEvent::NextClicked).map(|r| r.request),
            Some(NavigationRequest::Next)
        );
        let dot = route(InputEvent::DotClicked(4)).unwrap();
        assert_eq!(dot.request, NavigationRequest::GoTo(4));
        assert!(!dot.suppress_default);
    }
}
