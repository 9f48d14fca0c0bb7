// ── Log slice ──
//
// Append-only buffer of operational log lines from the core process.
// Bounded by an optional capacity; the oldest lines go first.

use std::collections::VecDeque;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogState {
    lines: VecDeque<String>,
    capacity: Option<usize>,
}

impl LogState {
    /// `None` keeps every line for the lifetime of the process.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn lines(&self) -> &VecDeque<String> {
        &self.lines
    }

    /// Direct access for generic draft mutations. Call
    /// [`enforce_capacity`](Self::enforce_capacity) afterwards.
    pub fn lines_mut(&mut self) -> &mut VecDeque<String> {
        &mut self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn append(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
        self.enforce_capacity();
    }

    /// Drop the oldest lines until the buffer fits its capacity.
    pub fn enforce_capacity(&mut self) {
        if let Some(cap) = self.capacity {
            let excess = self.lines.len().saturating_sub(cap);
            self.lines.drain(..excess);
        }
    }

    /// The last `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &str> {
        let skip = self.lines.len().saturating_sub(n);
        self.lines.iter().skip(skip).map(String::as_str)
    }
}
