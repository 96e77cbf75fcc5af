pub mod gemini;

pub use gemini::GeminiClient;

use anyhow::Result;
use async_trait::async_trait;

/// Кто автор реплики в запросе к модели
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// Провайдер генеративной модели: получает все реплики разговора, возвращает текст ответа.
/// Состояния между вызовами не хранит.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn send(&self, turns: &[ChatTurn]) -> Result<String>;

    /// Имя для логов
    fn name(&self) -> &str;
}
