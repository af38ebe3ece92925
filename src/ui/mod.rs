//! # Grain Showcase User Interface
//!
//! egui view over a mounted carousel. The view is a pure observer: every frame
//! it reads the latest committed [`CarouselSnapshot`], draws the displayed
//! card, and turns clicks, arrow keys, hover and focus changes into
//! [`CarouselCommand`]s for the carousel actor.
//!
//! ## Layout
//!
//! ```text
//!            IN PRACTICE / heading
//!        Slide K of N: <Kind> grain by <Agent>     (live region)
//!   [◀]  ┌ writer │ sample grain │ readers ┐  [▶]
//!        └────────────────────────────────┘
//!                 ● ● ━━ ● ● ● ●                  (selection dots)
//! ```
//!
//! ## Focus and Pause
//!
//! The card area is the focusable container; together with the arrows and
//! the dots it forms the carousel region. Focus moving between two controls
//! of the region is reported as staying inside, so the carousel does not
//! resume for a single frame when tabbing from one arrow to the other.
//!
//! Requests a repaint every 33ms so transitions published by the actor show
//! up without user input.

pub mod card_view;
pub mod common;
pub mod payload;

use eframe::egui::{
    self, vec2, Button, EventFilter, Frame, Id, Key, Modifiers, Rect, RichText, Sense, Ui,
};
use std::time::Duration;
use tracing::{debug, warn};

use crate::carousel::{
    announcer, route, CarouselCommand, CarouselHandle, CarouselSnapshot, Direction, InputEvent,
    InteractionSignal, NavigationKey, NavigationRequest, SlideAnimation,
};
use crate::deck::CardDeck;

use self::common::UiColors;

const REGION_ID: &str = "grain_showcase_region";
const VISIBILITY_ID: &str = "grain_showcase_card_visibility";
const ARROW_SIZE: f32 = 36.0;
/// Horizontal travel of the slide animation
const CARD_SHIFT: f32 = 24.0;
const SLIDE_SECONDS: f32 = 0.25;

/// Geometry and focus targets of the region drawn this frame
struct RegionLayout {
    rect: Rect,
    focusable: Vec<Id>,
}

pub struct ShowcaseUI {
    deck: CardDeck,
    carousel: CarouselHandle,
    pointer_inside: bool,
    /// Focused widget of the region, if focus is inside it
    focused: Option<Id>,
}

impl ShowcaseUI {
    pub fn new(cc: &eframe::CreationContext<'_>, deck: CardDeck, carousel: CarouselHandle) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);
        Self {
            deck,
            carousel,
            pointer_inside: false,
            focused: None,
        }
    }

    fn dispatch(&self, command: CarouselCommand) {
        if let Err(e) = self.carousel.try_send(command) {
            warn!("Failed to send {:?} to carousel: {}", command, e);
        }
    }

    /// Routes an input event; returns true if the host should swallow it
    fn handle_input(&self, event: InputEvent) -> bool {
        match route(event) {
            Some(routed) => {
                self.dispatch(CarouselCommand::Navigate(routed.request));
                routed.suppress_default
            }
            None => false,
        }
    }

    fn handle_keys(&self, ctx: &egui::Context) {
        for request in take_navigation_keys(ctx, self.focused.is_some()) {
            self.dispatch(CarouselCommand::Navigate(request));
        }
    }

    fn render_heading(&self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("IN PRACTICE")
                    .monospace()
                    .strong()
                    .color(UiColors::ACCENT),
            );
            ui.heading(
                RichText::new("Any AI agent. One memory. Portable everywhere.")
                    .strong()
                    .color(UiColors::TEXT),
            );
            ui.label(
                RichText::new(
                    "Imagine grains written by different AI systems, and read by others \
                     across industries, without any prior arrangement.",
                )
                .color(UiColors::TEXT_SECONDARY),
            );
        });
        ui.add_space(24.0);
    }

    fn render_carousel(&self, ui: &mut Ui, snapshot: &CarouselSnapshot) -> RegionLayout {
        let mut focusable = Vec::with_capacity(self.deck.len() + 3);
        let (opacity, shift) = slide_offset(ui.ctx(), snapshot.animation());

        let inner = ui.vertical_centered(|ui| {
            // Live region: always the text of the snapshot being drawn
            ui.label(
                RichText::new(&snapshot.announcement)
                    .small()
                    .color(UiColors::TEXT_MUTED),
            );
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let prev = ui
                    .add_sized(vec2(ARROW_SIZE, ARROW_SIZE), Button::new("◀"))
                    .on_hover_text("Previous grain");
                focusable.push(prev.id);
                if prev.clicked() {
                    self.handle_input(InputEvent::PreviousClicked);
                }

                let card_width = (ui.available_width() - 2.0 * (ARROW_SIZE + CARD_SHIFT) - 16.0)
                    .clamp(240.0, 960.0);
                ui.add_space(CARD_SHIFT + shift);
                let card_rect = ui
                    .scope(|ui| {
                        ui.set_width(card_width);
                        ui.style_mut().interaction.selectable_labels = false;
                        ui.multiply_opacity(opacity);
                        match self.deck.get(snapshot.display_index) {
                            Some(card) => card_view::render_card(ui, card),
                            None => {
                                warn!("No card at display index {}", snapshot.display_index);
                            }
                        }
                    })
                    .response
                    .rect;
                ui.add_space(CARD_SHIFT - shift);

                let region = ui
                    .interact(card_rect, Id::new(REGION_ID), Sense::click())
                    .on_hover_text(announcer::slide_label(&self.deck, snapshot.active_index));
                if region.clicked() {
                    region.request_focus();
                }
                focusable.push(region.id);

                let next = ui
                    .add_sized(vec2(ARROW_SIZE, ARROW_SIZE), Button::new("▶"))
                    .on_hover_text("Next grain");
                focusable.push(next.id);
                if next.clicked() {
                    self.handle_input(InputEvent::NextClicked);
                }
            });

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                for index in 0..self.deck.len() {
                    let selected = index == snapshot.active_index;
                    let (width, fill) = if selected {
                        (24.0, UiColors::ACCENT)
                    } else {
                        (8.0, UiColors::BORDER)
                    };
                    let dot = ui
                        .add(Button::new("").fill(fill).min_size(vec2(width, 8.0)))
                        .on_hover_text(announcer::dot_label(&self.deck, index));
                    focusable.push(dot.id);
                    if dot.clicked() {
                        self.handle_input(InputEvent::DotClicked(index));
                    }
                }
            });
        });

        RegionLayout {
            rect: inner.response.rect,
            focusable,
        }
    }

    /// Emits hover and focus edges as interaction signals
    fn track_interaction(&mut self, ui: &Ui, region: &RegionLayout) {
        let pointer_inside = ui.rect_contains_pointer(region.rect);
        if pointer_inside != self.pointer_inside {
            self.pointer_inside = pointer_inside;
            self.dispatch(CarouselCommand::Interaction(if pointer_inside {
                InteractionSignal::PointerEntered
            } else {
                InteractionSignal::PointerLeft
            }));
        }

        let focused = ui
            .memory(|m| m.focused())
            .filter(|id| region.focusable.contains(id));
        let signal = match (self.focused, focused) {
            (None, Some(_)) => Some(InteractionSignal::FocusEntered),
            (Some(_), None) => Some(InteractionSignal::FocusLeft { to_inside: false }),
            (Some(old), Some(new)) if old != new => {
                Some(InteractionSignal::FocusLeft { to_inside: true })
            }
            _ => None,
        };
        self.focused = focused;

        // Horizontal arrows navigate cards instead of moving focus
        if let Some(id) = focused {
            ui.memory_mut(|m| {
                m.set_focus_lock_filter(
                    id,
                    EventFilter {
                        horizontal_arrows: true,
                        ..Default::default()
                    },
                )
            });
        }

        if let Some(signal) = signal {
            debug!("Region focus signal: {:?}", signal);
            self.dispatch(CarouselCommand::Interaction(signal));
        }
    }
}

/// Takes routed arrow keys out of this frame's input before any widget sees
/// them and returns the navigation requests they map to
fn take_navigation_keys(ctx: &egui::Context, region_focused: bool) -> Vec<NavigationRequest> {
    let keys = [
        (Key::ArrowLeft, NavigationKey::ArrowLeft),
        (Key::ArrowRight, NavigationKey::ArrowRight),
    ];
    let mut requests = Vec::new();
    for (key, navigation_key) in keys {
        if !ctx.input(|i| i.key_pressed(key)) {
            continue;
        }
        let event = InputEvent::KeyPressed {
            key: navigation_key,
            region_focused,
        };
        if let Some(routed) = route(event) {
            if routed.suppress_default {
                ctx.input_mut(|i| i.consume_key(Modifiers::NONE, key));
            }
            requests.push(routed.request);
        }
    }
    requests
}

/// Opacity and horizontal offset of the card for the current animation
fn slide_offset(ctx: &egui::Context, animation: SlideAnimation) -> (f32, f32) {
    let (visible, direction) = match animation {
        SlideAnimation::SlideIn(direction) => (true, direction),
        SlideAnimation::SlideOut(direction) | SlideAnimation::Hidden(direction) => {
            (false, direction)
        }
    };
    let t = ctx.animate_bool_with_time(Id::new(VISIBILITY_ID), visible, SLIDE_SECONDS);
    let sign = match direction {
        Direction::Forward => 1.0,
        Direction::Backward => -1.0,
    };

    // Incoming cards arrive from the direction of travel, outgoing ones leave against it
    let shift = if visible {
        (1.0 - t) * CARD_SHIFT * sign
    } else {
        -(1.0 - t) * CARD_SHIFT * sign
    };
    (t, shift)
}

impl eframe::App for ShowcaseUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint_after(Duration::from_millis(33));
        self.handle_keys(ctx);
        let snapshot = self.carousel.snapshot();

        egui::CentralPanel::default()
            .frame(Frame::new().fill(UiColors::EXTREME_BG).inner_margin(24))
            .show(ctx, |ui| {
                self.render_heading(ui);
                let region = self.render_carousel(ui, &snapshot);
                self.track_interaction(ui, &region);
            });
    }
}
