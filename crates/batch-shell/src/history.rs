//! Bounded command history, reintroduced from `original_source/scheduler.c`
//! (`command_history`/`add_to_history`/`display_history`) per
//! SPEC_FULL.md's supplemented features — the distilled spec treats history
//! display as an out-of-scope external collaborator, not a Non-goal, so it
//! is kept here, shell-local, with no accounting implications for the
//! scheduler.

use std::collections::VecDeque;

/// Matches the original source's `MAX_HISTORY`.
const MAX_HISTORY: usize = 100;

pub struct History {
    lines: VecDeque<String>,
}

impl History {
    pub fn new() -> Self {
        Self {
            lines: VecDeque::with_capacity(MAX_HISTORY),
        }
    }

    pub fn record(&mut self, input: &str) {
        if self.lines.len() == MAX_HISTORY {
            self.lines.pop_front();
        }
        self.lines.push_back(input.to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_lines_in_order() {
        let mut history = History::new();
        history.record("submit /bin/true");
        history.record("exit");
        assert_eq!(
            history.iter().collect::<Vec<_>>(),
            vec!["submit /bin/true", "exit"]
        );
    }

    #[test]
    fn drops_oldest_line_past_capacity() {
        let mut history = History::new();
        for i in 0..MAX_HISTORY + 5 {
            history.record(&format!("cmd{i}"));
        }
        assert_eq!(history.iter().count(), MAX_HISTORY);
        assert_eq!(history.iter().next(), Some("cmd5"));
    }
}
