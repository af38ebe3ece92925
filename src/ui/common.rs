//! # UI Common Components and Utilities
//!
//! Shared palette and frame helpers for the showcase view.
//!
//! ## Key Abstractions
//!
//! ### Theme and Styling System
//! [`UiColors`] holds the dark palette as compile-time constants. Grain types
//! and JSON token kinds each map to one accent colour via [`kind_color`] and
//! [`token_color`], so the card view never hard-codes colours.

use eframe::egui::{Color32, Frame, Stroke};

use super::payload::TokenKind;

/// Centralized color palette for the showcase dark theme.
///
/// Colors are organized from darkest to lightest background, followed by
/// text tones and the accent used for the active selection.
pub struct UiColors;

impl UiColors {
    /// Page background behind the carousel (RGB: 20, 20, 20)
    pub const EXTREME_BG: Color32 = Color32::from_rgb(20, 20, 20);

    /// Card body background (RGB: 30, 30, 30)
    pub const CARD_BG: Color32 = Color32::from_rgb(30, 30, 30);

    /// Payload column background (RGB: 24, 24, 28)
    pub const CODE_BG: Color32 = Color32::from_rgb(24, 24, 28);

    /// Border color for component separation (RGB: 60, 60, 60)
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);

    pub const TEXT: Color32 = Color32::from_rgb(230, 230, 230);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(180, 180, 180);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(130, 130, 130);

    /// Accent for the selected dot, key names and the signature badge
    pub const ACCENT: Color32 = Color32::from_rgb(90, 160, 250);

    pub const FACT: Color32 = Color32::from_rgb(80, 170, 255);
    pub const EPISODE: Color32 = Color32::from_rgb(240, 160, 60);
    pub const CHECKPOINT: Color32 = Color32::from_rgb(170, 120, 250);
    pub const WORKFLOW: Color32 = Color32::from_rgb(80, 200, 120);
    pub const TOOLCALL: Color32 = Color32::from_rgb(240, 100, 120);
    pub const OBSERVATION: Color32 = Color32::from_rgb(250, 210, 80);
    pub const GOAL: Color32 = Color32::from_rgb(60, 200, 200);
}

/// Accent colour of a grain type; unknown kinds use the generic accent
pub fn kind_color(kind: &str) -> Color32 {
    match kind {
        "Fact" => UiColors::FACT,
        "Episode" => UiColors::EPISODE,
        "Checkpoint" => UiColors::CHECKPOINT,
        "Workflow" => UiColors::WORKFLOW,
        "ToolCall" => UiColors::TOOLCALL,
        "Observation" => UiColors::OBSERVATION,
        "Goal" => UiColors::GOAL,
        _ => UiColors::ACCENT,
    }
}

pub fn token_color(kind: TokenKind) -> Color32 {
    match kind {
        TokenKind::Key => UiColors::ACCENT,
        TokenKind::Str => UiColors::WORKFLOW,
        TokenKind::Num => UiColors::OBSERVATION,
        TokenKind::Bool => UiColors::CHECKPOINT,
        TokenKind::Punct => UiColors::TEXT_MUTED,
    }
}

/// Frame with the standard border and margins
pub fn create_frame(bg_color: Color32, border_color: Color32) -> Frame {
    Frame::new()
        .stroke(Stroke::new(1.0, border_color))
        .fill(bg_color)
        .inner_margin(12)
        .outer_margin(2)
}
