// src/session/history.rs

/// Append-only interaction history. Insertion order is kept internally; display order is newest first.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn append(&mut self, entry: T) {
        self.entries.push(entry);
    }

    /// Remove every entry. Irreversible.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn list_most_recent_first(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}
