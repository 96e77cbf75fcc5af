/// Chat transcript rendering
use eframe::egui;

use super::cards::{self, ProductCard};
use crate::assistant::catalog::ResolvedProduct;
use crate::assistant::transcript::{Message, Role};
use crate::services::CartStore;

pub const BUBBLE_MAX_WIDTH_RATIO: f32 = 0.8;

/// Цвета пузыря по роли
fn bubble_colors(role: Role) -> (egui::Color32, egui::Stroke) {
    match role {
        Role::User => (egui::Color32::from_rgb(220, 252, 231), egui::Stroke::NONE),
        Role::System => (egui::Color32::from_rgb(243, 244, 246), egui::Stroke::NONE),
        Role::Assistant => (
            egui::Color32::WHITE,
            egui::Stroke::new(1.0, egui::Color32::from_rgb(229, 231, 235)),
        ),
    }
}

/// Renders all messages in insertion order.
///
/// Returns the product whose "Add to Cart" button was clicked this frame, if any.
/// Button state is read from `cart` on every call.
pub fn draw_messages(
    ui: &mut egui::Ui,
    messages: &[Message],
    cart: &dyn CartStore,
    is_thinking: bool,
) -> Option<ResolvedProduct> {
    let mut to_add = None;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in messages {
                ui.push_id(message.id, |ui| {
                    if let Some(product) = draw_message(ui, message, cart) {
                        to_add = Some(product);
                    }
                });
                ui.add_space(8.0);
            }

            // Индикатор ожидания ответа
            if is_thinking {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(egui::RichText::new("Thinking...").italics().weak());
                });
            }
        });

    to_add
}

fn draw_message(ui: &mut egui::Ui, message: &Message, cart: &dyn CartStore) -> Option<ResolvedProduct> {
    let mut to_add = None;
    let (fill, stroke) = bubble_colors(message.role);
    let max_width = ui.available_width() * BUBBLE_MAX_WIDTH_RATIO;

    // Пользователь справа, ассистент и система слева
    let layout = if message.role == Role::User {
        egui::Layout::right_to_left(egui::Align::Min)
    } else {
        egui::Layout::left_to_right(egui::Align::Min)
    };

    ui.with_layout(layout, |ui| {
        egui::Frame::new()
            .fill(fill)
            .stroke(stroke)
            .corner_radius(egui::CornerRadius::same(8))
            .inner_margin(egui::Margin::same(12))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(&message.content).color(egui::Color32::from_rgb(31, 41, 55)));
                    ui.label(egui::RichText::new(message.time_label()).small().weak());

                    if message.role == Role::Assistant && !message.products.is_empty() {
                        ui.add_space(10.0);
                        ui.label(egui::RichText::new("Recommended Products:").strong());
                        ui.add_space(4.0);

                        for (index, product) in message.products.iter().enumerate() {
                            ui.push_id(index, |ui| {
                                let card = ProductCard::new(product, cart);
                                if cards::draw_card(ui, &card) {
                                    to_add = Some(product.clone());
                                }
                            });
                            ui.add_space(4.0);
                        }
                    }
                });
            });
    });

    to_add
}
