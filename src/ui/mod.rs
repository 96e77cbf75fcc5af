pub mod app;
pub mod cards;
pub mod chat;
pub mod widgets;

pub use app::HealthBotApp;
