/// Disclaimer banner and cart panel
use eframe::egui;

use super::cards::format_price;
use crate::services::CartStore;

pub const DISCLAIMER_BANNER: &str = "This AI health assistant provides general information only. Always consult a healthcare professional for medical advice.";

pub const CART_PANEL_WIDTH: f32 = 220.0;

/// Желтая плашка с предупреждением над чатом
pub fn draw_disclaimer(ui: &mut egui::Ui) {
    egui::Frame::new()
        .fill(egui::Color32::from_rgb(254, 252, 232))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(250, 204, 21)))
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new("⚠").color(egui::Color32::from_rgb(202, 138, 4)));
                ui.label(egui::RichText::new(DISCLAIMER_BANNER).small().color(egui::Color32::from_rgb(161, 98, 7)));
            });
        });
}

/// Содержимое корзины и сумма
pub fn draw_cart_panel(ui: &mut egui::Ui, cart: &dyn CartStore) {
    ui.heading(format!("Cart ({})", cart.len()));
    ui.separator();

    if cart.items().is_empty() {
        ui.label(egui::RichText::new("Your cart is empty").weak());
        return;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for item in cart.items() {
            ui.horizontal(|ui| {
                ui.label(&item.product.name);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format_price(item.product.price));
                });
            });
        }
    });

    ui.separator();
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Total").strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new(format_price(cart.total())).strong());
        });
    });
}
