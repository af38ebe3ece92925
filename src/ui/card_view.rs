//! Card rendering: writer column, highlighted sample grain, readers column.

use eframe::egui::{self, text::LayoutJob, vec2, FontId, Frame, RichText, Sense, TextFormat, Ui};

use super::common::{create_frame, kind_color, token_color, UiColors};
use super::payload::{format_payload, highlight};
use crate::deck::Card;

const CODE_FONT_SIZE: f32 = 12.0;

pub fn render_card(ui: &mut Ui, card: &Card) {
    let accent = kind_color(&card.kind);

    create_frame(UiColors::CARD_BG, UiColors::BORDER).show(ui, |ui| {
        let (bar, _) = ui.allocate_exact_size(vec2(ui.available_width(), 4.0), Sense::hover());
        ui.painter().rect_filled(bar, 0.0, accent);
        ui.add_space(8.0);

        ui.columns(3, |columns| {
            render_writer(&mut columns[0], card);
            render_payload(&mut columns[1], card);
            render_readers(&mut columns[2], card);
        });
    });
}

fn section_title(ui: &mut Ui, title: &str) {
    ui.label(
        RichText::new(title)
            .small()
            .monospace()
            .color(UiColors::TEXT_MUTED),
    );
    ui.add_space(6.0);
}

fn render_writer(ui: &mut Ui, card: &Card) {
    section_title(ui, "WRITTEN BY");
    ui.label(
        RichText::new(&card.agent)
            .strong()
            .size(16.0)
            .color(UiColors::TEXT),
    );
    ui.label(
        RichText::new(&card.company)
            .monospace()
            .color(UiColors::TEXT_MUTED),
    );
    ui.separator();
    ui.label(RichText::new(&card.description).color(UiColors::TEXT_SECONDARY));
}

fn render_payload(ui: &mut Ui, card: &Card) {
    let accent = kind_color(&card.kind);

    Frame::new()
        .fill(UiColors::CODE_BG)
        .inner_margin(8)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("SAMPLE GRAIN")
                        .small()
                        .strong()
                        .color(UiColors::TEXT_MUTED),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(format!("{} · {}", card.kind.to_uppercase(), card.type_hex))
                            .monospace()
                            .strong()
                            .color(accent),
                    );
                });
            });
            ui.label(
                RichText::new(format!("sha256:{} · v1 · COSE Signed", card.hash))
                    .small()
                    .monospace()
                    .color(UiColors::TEXT_MUTED),
            );
            ui.add_space(4.0);
            ui.label(payload_job(&card.payload));
        });
}

fn render_readers(ui: &mut Ui, card: &Card) {
    section_title(ui, "READ BY");
    for reader in &card.readers {
        ui.label(
            RichText::new(format!("• {}", reader.agent))
                .strong()
                .color(UiColors::TEXT),
        );
        ui.label(RichText::new(&reader.purpose).color(UiColors::TEXT_MUTED));
        ui.add_space(6.0);
    }
}

/// Highlighted payload as a single text layout
pub fn payload_job(payload: &serde_json::Value) -> LayoutJob {
    let mut job = LayoutJob::default();
    let lines = highlight(&format_payload(payload));
    let last = lines.len().saturating_sub(1);

    for (i, tokens) in lines.iter().enumerate() {
        for token in tokens {
            job.append(
                &token.text,
                0.0,
                TextFormat::simple(FontId::monospace(CODE_FONT_SIZE), token_color(token.kind)),
            );
        }
        if i < last {
            job.append(
                "\n",
                0.0,
                TextFormat::simple(FontId::monospace(CODE_FONT_SIZE), UiColors::TEXT_MUTED),
            );
        }
    }
    job
}
