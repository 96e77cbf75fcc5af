// Модули приложения
mod ai;
mod assistant;
mod config;
mod logger;
mod services;
mod ui;

use anyhow::{anyhow, Context, Result};
use config::Config;
use eframe::NativeOptions;
use ui::HealthBotApp;

fn main() -> Result<()> {
    // Инициализируем логирование
    logger::init();
    log::info!("🚀 HealthBot запущен");

    // Создаем tokio runtime для async операций
    let rt = tokio::runtime::Runtime::new().context("не удалось создать tokio runtime")?;
    let _guard = rt.enter();

    let config = Config::from_env();
    log::info!("📁 Конфигурация загружена (модель {})", config.gemini_model);

    let title = config.bot_name.clone();
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&title)
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    let app = HealthBotApp::new(config)?;

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| -> Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow!("ошибка окна приложения: {}", e))
}
