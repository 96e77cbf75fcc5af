use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::assistant::recommend::DuplicatePolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub gemini_temperature: f32,
    pub gemini_max_tokens: u32,
    pub request_timeout: Duration,
    pub catalog_path: Option<PathBuf>,
    pub cart_db_path: PathBuf,
    pub duplicate_policy: DuplicatePolicy,
    pub window_width: f32,
    pub window_height: f32,
    pub bot_name: String,
}

impl Config {
    /// Загружает конфигурацию из `.env` и переменных окружения
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Собирает конфигурацию через произвольный источник значений.
    /// Тесты подставляют сюда HashMap, не трогая окружение процесса.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .map(|v| v.trim().to_string())
            .unwrap_or_default();

        let gemini_base_url = lookup("GEMINI_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string());

        let gemini_model = lookup("GEMINI_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "gemini-pro".to_string());

        let gemini_temperature = lookup("GEMINI_TEMPERATURE")
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap_or(0.7)
            .clamp(0.0, 2.0);

        let gemini_max_tokens = lookup("GEMINI_MAX_TOKENS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1024)
            .max(1);

        let timeout_secs = lookup("GEMINI_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60)
            .max(1);

        let catalog_path = lookup("HEALTHBOT_CATALOG")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let cart_db_path = lookup("HEALTHBOT_CART_DB")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_cart_db_path);

        let keep_duplicates = lookup("HEALTHBOT_KEEP_DUPLICATES")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        Self {
            gemini_api_key,
            gemini_base_url,
            gemini_model,
            gemini_temperature,
            gemini_max_tokens,
            request_timeout: Duration::from_secs(timeout_secs),
            catalog_path,
            cart_db_path,
            duplicate_policy: if keep_duplicates {
                DuplicatePolicy::Keep
            } else {
                DuplicatePolicy::Collapse
            },
            window_width: 900.0,
            window_height: 680.0,
            bot_name: "Health Assistant".to_string(),
        }
    }

    pub fn is_provider_configured(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }
}

fn default_cart_db_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".config/healthbot/cart.db")
}
