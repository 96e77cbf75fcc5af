use anyhow::Result;
use std::sync::Arc;
use thiserror::Error;

use super::catalog::Catalog;
use super::prompt;
use super::recommend::{recommend, DuplicatePolicy};
use super::transcript::{Message, Role, Transcript};
use crate::ai::{ChatProvider, ChatTurn};

/// Единственный текст, который видит пользователь при любой ошибке провайдера
pub const APOLOGY: &str = "I apologize, but I encountered an error. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResponse,
}

/// Почему вопрос не был отправлен. UI молча игнорирует оба случая.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    #[error("question is empty")]
    EmptyInput,
    #[error("previous question is still awaiting a response")]
    Busy,
}

/// Сетевой вызов одного хода. Владеет всем нужным, поэтому его можно отдать в tokio::spawn.
pub struct PendingTurn {
    provider: Arc<dyn ChatProvider>,
    turns: Vec<ChatTurn>,
}

impl PendingTurn {
    pub async fn run(self) -> TurnOutcome {
        let result = self.provider.send(&self.turns).await;
        TurnOutcome {
            provider: self.provider.name().to_string(),
            result,
        }
    }
}

/// Результат хода, возвращается в сессию через `Session::complete`
pub struct TurnOutcome {
    provider: String,
    result: Result<String>,
}

impl TurnOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Разговор с ассистентом: Idle -> AwaitingResponse -> Idle
pub struct Session {
    provider: Arc<dyn ChatProvider>,
    catalog: Arc<Catalog>,
    policy: DuplicatePolicy,
    transcript: Transcript,
    state: SessionState,
}

impl Session {
    pub fn new(provider: Arc<dyn ChatProvider>, catalog: Arc<Catalog>, policy: DuplicatePolicy) -> Self {
        log::info!(
            "🩺 Новая сессия: провайдер {}, товаров в каталоге {}",
            provider.name(),
            catalog.product_count()
        );

        Self {
            provider,
            catalog,
            policy,
            transcript: Transcript::with_greeting(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == SessionState::AwaitingResponse
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Принимает вопрос: сразу добавляет сообщение пользователя и переходит в AwaitingResponse
    pub fn submit(&mut self, text: &str) -> Result<PendingTurn, Rejected> {
        if self.is_busy() {
            return Err(Rejected::Busy);
        }
        if text.trim().is_empty() {
            return Err(Rejected::EmptyInput);
        }

        self.transcript.push(Role::User, text.to_string(), Vec::new());
        self.state = SessionState::AwaitingResponse;
        log::info!("💬 Вопрос принят ({} символов)", text.chars().count());

        Ok(PendingTurn {
            provider: Arc::clone(&self.provider),
            turns: prompt::turns_for(&self.catalog, text),
        })
    }

    /// Завершает ход. Без ожидающего вопроса результат отбрасывается.
    pub fn complete(&mut self, outcome: TurnOutcome) -> Option<&Message> {
        if !self.is_busy() {
            log::warn!("⚠️ Получен ответ без ожидающего вопроса, пропускаем");
            return None;
        }
        Some(self.finish(outcome))
    }

    /// submit + вызов провайдера + complete одним await
    pub async fn ask(&mut self, text: &str) -> Result<&Message, Rejected> {
        let pending = self.submit(text)?;
        let outcome = pending.run().await;
        Ok(self.finish(outcome))
    }

    fn finish(&mut self, outcome: TurnOutcome) -> &Message {
        self.state = SessionState::Idle;

        match outcome.result {
            Ok(text) => {
                let products = recommend(&self.catalog, &text, self.policy);
                log::info!(
                    "✓ Ответ от {} ({} символов), рекомендаций: {}",
                    outcome.provider,
                    text.chars().count(),
                    products.len()
                );
                self.transcript.push(Role::Assistant, text, products)
            }
            Err(e) => {
                log::error!("❌ Ошибка провайдера {}: {:#}", outcome.provider, e);
                self.transcript.push(Role::Assistant, APOLOGY.to_string(), Vec::new())
            }
        }
    }
}
