use chrono::{DateTime, Local};

use super::catalog::ResolvedProduct;

pub const GREETING: &str = "Hello! I'm your health assistant. I can help you with medical advice and product recommendations. How can I assist you today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    System,
}

/// Одно сообщение чата. После добавления в историю не меняется.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Local>,
    /// Рекомендованные товары, только у ответов ассистента
    pub products: Vec<ResolvedProduct>,
}

impl Message {
    /// Время под пузырем, `HH:MM`
    pub fn time_label(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }
}

/// История сообщений: только добавление, id растут монотонно
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
        }
    }

    /// История с приветствием от системы
    pub fn with_greeting() -> Self {
        let mut transcript = Self::new();
        transcript.push(Role::System, GREETING.to_string(), Vec::new());
        transcript
    }

    pub fn push(&mut self, role: Role, content: String, products: Vec<ResolvedProduct>) -> &Message {
        let id = self.next_id;
        self.next_id += 1;
        let index = self.messages.len();
        self.messages.push(Message {
            id,
            role,
            content,
            created_at: Local::now(),
            products,
        });
        &self.messages[index]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_single_system_greeting() {
        let transcript = Transcript::with_greeting();
        assert_eq!(transcript.len(), 1);
        let greeting = &transcript.messages()[0];
        assert_eq!(greeting.role, Role::System);
        assert_eq!(greeting.content, GREETING);
        assert!(greeting.products.is_empty());
    }

    #[test]
    fn ids_increase_in_insertion_order() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());
        let first = transcript.push(Role::User, "one".into(), Vec::new()).id;
        let second = transcript.push(Role::Assistant, "two".into(), Vec::new()).id;
        let third = transcript.push(Role::User, "three".into(), Vec::new()).id;

        assert!(first < second && second < third);
        let contents: Vec<&str> = transcript.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
        assert_eq!(transcript.last().map(|m| m.id), Some(third));
    }

    #[test]
    fn messages_are_stamped_in_order_and_labelled_with_time() {
        let before = Local::now();
        let mut transcript = Transcript::with_greeting();
        transcript.push(Role::User, "fever".into(), Vec::new());
        let after = Local::now();

        let stamps: Vec<DateTime<Local>> = transcript.messages().iter().map(|m| m.created_at).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
        assert!(stamps[0] >= before && stamps[1] <= after);

        let message = &transcript.messages()[1];
        let label = message.time_label();
        assert_eq!(label, message.created_at.format("%H:%M").to_string());
        assert_eq!(label.len(), 5);
        assert_eq!(label.as_bytes()[2], b':');
    }
}
