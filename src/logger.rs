/// Модуль для инициализации логирования
/// Пишет в файл logs/healthbot.log, при ошибке открытия файла - в stderr

use std::io::Write;
use log::LevelFilter;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "logs/healthbot.log";

pub fn init() {
    let mut builder = env_logger::Builder::new();

    // Читаем RUST_LOG переменную если она установлена
    if let Ok(log_level) = std::env::var("RUST_LOG") {
        builder.parse_filters(&log_level);
    } else {
        builder.filter_level(LevelFilter::Info);
        // Зависимости слишком многословны
        for noisy in ["eframe", "egui", "wgpu", "reqwest", "hyper"] {
            builder.filter_module(noisy, LevelFilter::Warn);
        }
    }

    // Формат логов: [HH:MM:SS LEVEL] модуль - сообщение
    builder.format(|buf, record| {
        let now = chrono::Local::now().format("%H:%M:%S");
        writeln!(
            buf,
            "[{} {}] {} - {}",
            now,
            record.level(),
            record.target(),
            record.args()
        )
    });

    if !std::path::Path::new(LOG_DIR).exists() {
        let _ = std::fs::create_dir(LOG_DIR);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE);

    match log_file {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("Не удалось открыть файл логов {}: {}", LOG_FILE, e);
            builder.target(env_logger::Target::Stderr);
        }
    }

    builder.init();

    log::info!("Логирование инициализировано ✓");
}
