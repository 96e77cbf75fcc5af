/// Карточки рекомендованных товаров
use eframe::egui;

use crate::assistant::catalog::ResolvedProduct;
use crate::services::CartStore;

/// Состояние кнопки карточки. Не хранится, каждый кадр вычисляется из корзины.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    AddToCart,
    Added,
}

impl CardAction {
    pub fn for_product(cart: &dyn CartStore, product_id: &str) -> Self {
        if cart.contains(product_id) {
            CardAction::Added
        } else {
            CardAction::AddToCart
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CardAction::AddToCart => "Add to Cart",
            CardAction::Added => "Added",
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self == CardAction::AddToCart
    }
}

/// Все, что показывает одна карточка
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard<'a> {
    pub product: &'a ResolvedProduct,
    pub action: CardAction,
}

impl<'a> ProductCard<'a> {
    pub fn new(product: &'a ResolvedProduct, cart: &dyn CartStore) -> Self {
        Self {
            product,
            action: CardAction::for_product(cart, product.id()),
        }
    }

    pub fn price_label(&self) -> String {
        format_price(self.product.product.price)
    }

    pub fn dosage_label(&self) -> String {
        format!("Dosage: {}", self.product.product.dosage)
    }

    pub fn side_effects_label(&self) -> String {
        format!("Side Effects: {}", self.product.product.side_effects.join(", "))
    }
}

/// `$6.49`, `$10`, `$2.5`: без лишних нулей
pub fn format_price(price: f64) -> String {
    let fixed = format!("{:.2}", price);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("${}", trimmed)
}

/// Рисует карточку и возвращает true, если нажали "Add to Cart"
pub fn draw_card(ui: &mut egui::Ui, card: &ProductCard<'_>) -> bool {
    let mut clicked = false;

    egui::Frame::new()
        .fill(egui::Color32::WHITE)
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(220, 220, 220)))
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(&card.product.product.name).strong());
                    ui.label(
                        egui::RichText::new(card.price_label())
                            .small()
                            .color(egui::Color32::from_rgb(90, 90, 90)),
                    );
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    let button = match card.action {
                        CardAction::AddToCart => egui::Button::new(
                            egui::RichText::new(card.action.label()).color(egui::Color32::WHITE),
                        )
                        .fill(egui::Color32::from_rgb(22, 163, 74)),
                        CardAction::Added => egui::Button::new(card.action.label()),
                    };

                    if ui.add_enabled(card.action.is_enabled(), button).clicked() {
                        clicked = true;
                    }
                });
            });

            ui.add_space(4.0);
            ui.label(egui::RichText::new(card.dosage_label()).small());
            ui.label(egui::RichText::new(card.side_effects_label()).small());
        });

    clicked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::catalog::Catalog;
    use crate::services::InMemoryCart;

    #[test]
    fn product_in_cart_gets_disabled_added_button() {
        let catalog = Catalog::builtin();
        let med2 = catalog.find("med2").unwrap();
        let vit1 = catalog.find("vit1").unwrap();

        let mut cart = InMemoryCart::new();
        cart.add(med2.clone()).unwrap();

        let med2_card = ProductCard::new(&med2, &cart);
        assert_eq!(med2_card.action, CardAction::Added);
        assert!(!med2_card.action.is_enabled());
        assert_eq!(med2_card.action.label(), "Added");

        let vit1_card = ProductCard::new(&vit1, &cart);
        assert_eq!(vit1_card.action, CardAction::AddToCart);
        assert!(vit1_card.action.is_enabled());
        assert_eq!(vit1_card.action.label(), "Add to Cart");
    }

    #[test]
    fn action_follows_cart_changes() {
        let catalog = Catalog::builtin();
        let vit1 = catalog.find("vit1").unwrap();
        let mut cart = InMemoryCart::new();

        assert_eq!(ProductCard::new(&vit1, &cart).action, CardAction::AddToCart);
        cart.add(vit1.clone()).unwrap();
        assert_eq!(ProductCard::new(&vit1, &cart).action, CardAction::Added);
    }

    #[test]
    fn labels_copy_catalog_fields() {
        let catalog = Catalog::builtin();
        let med3 = catalog.find("med3").unwrap();
        let card = ProductCard::new(&med3, &InMemoryCart::new());

        assert_eq!(card.price_label(), "$11.99");
        assert_eq!(card.dosage_label(), "Dosage: 1 tablet every 6 hours, max 4 tablets daily");
        assert_eq!(card.side_effects_label(), "Side Effects: Drowsiness, Dry mouth");
    }

    #[test]
    fn prices_drop_trailing_zeros() {
        assert_eq!(format_price(6.49), "$6.49");
        assert_eq!(format_price(10.0), "$10");
        assert_eq!(format_price(2.5), "$2.5");
        assert_eq!(format_price(0.0), "$0");
    }
}
