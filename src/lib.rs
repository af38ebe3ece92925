//! Grain Showcase
//!
//! A carousel that presents sample memory grains one card at a time. The
//! carousel state lives in a tokio task ([`carousel::CarouselHandle`]); the
//! egui view in [`ui`] only renders committed snapshots and forwards input.

pub mod carousel;
pub mod config;
pub mod deck;
pub mod ui;
