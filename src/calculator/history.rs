//! Append-only record of successful calculations. Only the display is windowed;
//! every entry stays in the ledger for the whole session.
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub const DEFAULT_HISTORY_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct HistoryEntry {
    #[tabled(rename = "Operation")]
    pub operation: String,
    #[tabled(rename = "Problem")]
    pub problem: String,
    #[tabled(rename = "Solution")]
    pub solution: String,
}

impl HistoryEntry {
    pub fn new(operation: &str, problem: &str, solution: &str) -> Self {
        HistoryEntry {
            operation: operation.to_string(),
            problem: problem.to_string(),
            solution: solution.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        HistoryLedger::default()
    }

    pub fn add(&mut self, operation: &str, problem: &str, solution: &str) {
        self.push(HistoryEntry::new(operation, problem, solution));
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry, oldest first.
    pub fn all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The most recent `k` entries, newest first.
    pub fn recent(&self, k: usize) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().take(k).collect()
    }

    /// Numbered view of the most recent `window` entries, newest first.
    /// Empty until the first calculation is recorded.
    pub fn sidebar(&self, window: usize) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let mut lines = vec!["Calculation History".to_string()];
        for (i, entry) in self.recent(window).into_iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, entry.operation));
            lines.push(format!("   Problem: {}", entry.problem));
            lines.push(format!("   Solution: {}", entry.solution));
        }
        lines.join("\n")
    }

    /// The whole ledger, oldest first, as a table.
    pub fn table(&self) -> String {
        let mut table = Table::new(&self.entries);
        table.with(Style::modern_rounded());
        table.to_string()
    }
}
