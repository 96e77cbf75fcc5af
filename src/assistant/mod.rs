pub mod catalog;
pub mod prompt;
pub mod recommend;
pub mod session;
pub mod transcript;
