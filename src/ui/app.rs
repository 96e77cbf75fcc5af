/// Main application structure and lifecycle management
use anyhow::Result;
use eframe::egui;
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;

use super::{chat, widgets};
use crate::ai::{ChatProvider, GeminiClient};
use crate::assistant::catalog::{Catalog, ResolvedProduct};
use crate::assistant::session::{PendingTurn, Session, TurnOutcome};
use crate::config::Config;
use crate::services::{CartStore, InMemoryCart, SqliteCart};

pub const INPUT_PLACEHOLDER: &str = "Describe your symptoms or ask health-related questions...";

pub struct HealthBotApp {
    pub config: Config,
    pub session: Session,
    pub cart: Box<dyn CartStore>,
    pub input_text: String,
    pub outcome_receiver: std_mpsc::Receiver<TurnOutcome>,
    pub outcome_sender: std_mpsc::Sender<TurnOutcome>,
    pub style_initialized: bool,
    /// Вернуть фокус в поле ввода, когда ответ придет
    pub refocus_input: bool,
}

impl HealthBotApp {
    pub fn new(config: Config) -> Result<Self> {
        let catalog = Arc::new(load_catalog(&config));

        let gemini = GeminiClient::new(&config)?;
        if !gemini.is_configured() {
            log::warn!("⚠️ GEMINI_API_KEY не задан, все ответы будут сообщением об ошибке");
        }
        let provider: Arc<dyn ChatProvider> = Arc::new(gemini);

        let session = Session::new(provider, catalog, config.duplicate_policy);
        let cart = open_cart(&config);
        let (sender, receiver) = std_mpsc::channel();

        Ok(Self {
            config,
            session,
            cart,
            input_text: String::new(),
            outcome_receiver: receiver,
            outcome_sender: sender,
            style_initialized: false,
            refocus_input: false,
        })
    }

    /// Отправляет вопрос. Сетевой вызов уходит в tokio, результат вернется через канал.
    pub fn send_message(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.submit_input() else {
            return;
        };

        let sender = self.outcome_sender.clone();
        let ctx_clone = ctx.clone();

        tokio::spawn(async move {
            let outcome = pending.run().await;

            if let Err(e) = sender.send(outcome) {
                log::error!("Ошибка отправки ответа в UI: {}", e);
            }

            ctx_clone.request_repaint();
        });
    }

    /// Передает текст поля ввода в сессию и очищает поле
    fn submit_input(&mut self) -> Option<PendingTurn> {
        match self.session.submit(&self.input_text) {
            Ok(pending) => {
                self.input_text.clear();
                self.refocus_input = true;
                Some(pending)
            }
            Err(rejected) => {
                log::debug!("Вопрос не отправлен: {}", rejected);
                None
            }
        }
    }

    /// true один раз после того, как сессия снова свободна
    fn take_refocus(&mut self) -> bool {
        if self.refocus_input && !self.session.is_busy() {
            self.refocus_input = false;
            return true;
        }
        false
    }

    /// Забирает готовые ответы из канала (вызывается из UI потока)
    pub fn process_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_receiver.try_recv() {
            log::debug!("Ответ получен (успех: {})", outcome.is_success());
            self.session.complete(outcome);
        }
    }

    pub fn add_to_cart(&mut self, product: ResolvedProduct) {
        if let Err(e) = self.cart.add(product) {
            log::error!("❌ Не удалось добавить товар в корзину: {:#}", e);
        }
    }

    fn init_style(&mut self, ctx: &egui::Context) {
        if self.style_initialized {
            return;
        }
        ctx.set_visuals(egui::Visuals::light());
        self.style_initialized = true;
    }

    fn draw_input(&mut self, ctx: &egui::Context) {
        let busy = self.session.is_busy();
        let refocus = self.take_refocus();
        let mut submit = false;

        egui::TopBottomPanel::bottom("input_panel")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(12)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let can_send = !busy && !self.input_text.trim().is_empty();

                    let edit = ui.add_enabled(
                        !busy,
                        egui::TextEdit::singleline(&mut self.input_text)
                            .hint_text(INPUT_PLACEHOLDER)
                            .desired_width(ui.available_width() - 80.0),
                    );
                    if refocus {
                        edit.request_focus();
                    }

                    // Отправка по Enter
                    let enter_pressed = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                    let send_clicked = ui
                        .add_enabled(can_send, egui::Button::new("Send").min_size(egui::vec2(70.0, 0.0)))
                        .clicked();

                    if (enter_pressed || send_clicked) && can_send {
                        submit = true;
                    }
                });
            });

        if submit {
            self.send_message(ctx);
        }
    }
}

impl eframe::App for HealthBotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.init_style(ctx);

        // Проверяем наличие новых ответов
        self.process_outcomes();

        egui::TopBottomPanel::top("header_panel").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading(
                egui::RichText::new(&self.config.bot_name).color(egui::Color32::from_rgb(22, 163, 74)),
            );
            ui.add_space(4.0);
            widgets::draw_disclaimer(ui);
            ui.add_space(6.0);
        });

        egui::SidePanel::right("cart_panel")
            .resizable(false)
            .exact_width(widgets::CART_PANEL_WIDTH)
            .show(ctx, |ui| {
                widgets::draw_cart_panel(ui, self.cart.as_ref());
            });

        self.draw_input(ctx);

        let mut to_add = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            to_add = chat::draw_messages(
                ui,
                self.session.transcript().messages(),
                self.cart.as_ref(),
                self.session.is_busy(),
            );
        });

        if let Some(product) = to_add {
            self.add_to_cart(product);
        }
    }
}

/// Каталог из файла, если он задан и читается, иначе встроенный
fn load_catalog(config: &Config) -> Catalog {
    match &config.catalog_path {
        Some(path) => match Catalog::from_json_file(path) {
            Ok(catalog) => {
                log::info!("📁 Каталог загружен из {}", path.display());
                catalog
            }
            Err(e) => {
                log::warn!("⚠️ {:#}. Используется встроенный каталог", e);
                Catalog::builtin()
            }
        },
        None => Catalog::builtin(),
    }
}

/// SQLite корзина, при ошибке открытия - корзина в памяти
fn open_cart(config: &Config) -> Box<dyn CartStore> {
    match SqliteCart::open(&config.cart_db_path) {
        Ok(cart) => Box::new(cart),
        Err(e) => {
            log::warn!("⚠️ Ошибка открытия корзины: {:#}. Корзина не будет сохранена", e);
            Box::new(InMemoryCart::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn config_with(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn broken_catalog_file_falls_back_to_builtin() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let config = config_with(&[("HEALTHBOT_CATALOG", file.path().to_str().unwrap())]);
        assert_eq!(load_catalog(&config), Catalog::builtin());
    }

    #[test]
    fn catalog_file_overrides_builtin() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"medicines": [{{"id": "med7", "name": "Custom", "price": 3, "dosage": "daily", "sideEffects": ["None"]}}]}}"#
        )
        .unwrap();

        let config = config_with(&[("HEALTHBOT_CATALOG", file.path().to_str().unwrap())]);
        let catalog = load_catalog(&config);
        assert_eq!(catalog.product_count(), 1);
        assert_eq!(catalog.find("med7").unwrap().product.price, 3.0);
    }

    #[test]
    fn catalog_file_with_negative_price_falls_back_to_builtin() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"medicines": [{{"id": "med7", "name": "Custom", "price": -3, "dosage": "daily"}}]}}"#
        )
        .unwrap();

        let config = config_with(&[("HEALTHBOT_CATALOG", file.path().to_str().unwrap())]);
        assert_eq!(load_catalog(&config), Catalog::builtin());
    }

    #[tokio::test]
    async fn unconfigured_app_answers_with_apology_and_cart_stays_separate() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("cart.db");
        let config = config_with(&[("HEALTHBOT_CART_DB", db.to_str().unwrap())]);
        let mut app = HealthBotApp::new(config).unwrap();

        let message = app.session.ask("I have a fever").await.unwrap();
        assert_eq!(message.content, crate::assistant::session::APOLOGY);
        assert_eq!(app.cart.len(), 0);

        let med2 = app.session.catalog().find("med2").unwrap();
        app.add_to_cart(med2);
        assert!(app.cart.contains("med2"));
        assert_eq!(app.session.transcript().len(), 3);
    }

    #[tokio::test]
    async fn input_regains_focus_once_the_answer_arrives() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("cart.db");
        let mut app = HealthBotApp::new(config_with(&[("HEALTHBOT_CART_DB", db.to_str().unwrap())])).unwrap();
        assert!(!app.take_refocus());

        app.input_text = "I have a cough".to_string();
        let pending = app.submit_input().unwrap();
        assert!(app.input_text.is_empty());
        // Пока ждем ответ, поле выключено
        assert!(!app.take_refocus());

        app.outcome_sender.send(pending.run().await).unwrap();
        app.process_outcomes();
        assert!(!app.session.is_busy());
        assert!(app.take_refocus());
        assert!(!app.take_refocus());
    }

    #[test]
    fn blank_input_is_not_submitted_and_keeps_focus_state() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("cart.db");
        let mut app = HealthBotApp::new(config_with(&[("HEALTHBOT_CART_DB", db.to_str().unwrap())])).unwrap();

        app.input_text = "   ".to_string();
        assert!(app.submit_input().is_none());
        assert_eq!(app.input_text, "   ");
        assert!(!app.refocus_input);
        assert_eq!(app.session.transcript().len(), 1);
    }
}
