use std::collections::VecDeque;

use crate::domain::llm::Message;

pub const DEFAULT_MEMORY_SIZE: usize = 10;

/// Bounded conversation history. The oldest message is dropped first.
#[derive(Debug, Clone)]
pub struct Memory {
    messages: VecDeque<Message>,
    max_messages: usize,
}

impl Memory {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            max_messages: max_messages.max(1),
        }
    }

    pub fn add(&mut self, message: Message) {
        if self.messages.len() == self.max_messages {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_user())
            .map(|m| m.content.as_str())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_drops_oldest() {
        let mut memory = Memory::new(2);
        memory.add(Message::user("one"));
        memory.add(Message::assistant("two"));
        memory.add(Message::user("three"));

        let contents: Vec<_> = memory.messages().into_iter().map(|m| m.content).collect();
        assert_eq!(contents, vec!["two", "three"]);
        assert_eq!(memory.last_user_message(), Some("three"));
    }

    #[test]
    fn test_memory_clear() {
        let mut memory = Memory::default();
        memory.add(Message::user("hi"));
        assert_eq!(memory.len(), 1);

        memory.clear();
        assert!(memory.is_empty());
        assert_eq!(memory.last_user_message(), None);
    }
}
