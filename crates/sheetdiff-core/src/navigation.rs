//! Cursor over the changed rows of a set of diff results

use crate::diff::{DiffResult, RowDiff};

/// A resolved cursor position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffLocation<'a> {
    /// The result containing the row
    pub result: &'a DiffResult,
    /// The changed row itself
    pub row: &'a RowDiff,
}

/// Steps through every non-unchanged row across a list of [`DiffResult`]s
///
/// The cursor is an ordinal over changed rows only, counted across results in
/// order. It never wraps around.
#[derive(Debug, Clone, Default)]
pub struct DiffNavigator {
    results: Vec<DiffResult>,
    cursor: Option<usize>,
}

impl DiffNavigator {
    /// Create an empty navigator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a navigator over `results`
    pub fn with_results(results: Vec<DiffResult>) -> Self {
        let mut nav = Self::new();
        nav.set_results(results);
        nav
    }

    /// Replace the result set. The cursor moves to the first change, if any.
    pub fn set_results(&mut self, results: Vec<DiffResult>) {
        self.results = results;
        self.cursor = if self.total_diffs() > 0 { Some(0) } else { None };
    }

    /// Drop all results
    pub fn clear(&mut self) {
        self.results.clear();
        self.cursor = None;
    }

    /// The current result set
    pub fn results(&self) -> &[DiffResult] {
        &self.results
    }

    /// Number of changed rows across all results
    pub fn total_diffs(&self) -> usize {
        self.results.iter().map(DiffResult::diff_count).sum()
    }

    /// Cursor position, `-1` when nothing is selected
    pub fn cursor(&self) -> isize {
        self.cursor.map_or(-1, |c| c as isize)
    }

    /// Cursor position as an option
    pub fn position(&self) -> Option<usize> {
        self.cursor
    }

    /// Step forward. Returns false at the last change or with no selection.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        match self.cursor {
            Some(c) if c + 1 < self.total_diffs() => {
                self.cursor = Some(c + 1);
                true
            }
            _ => false,
        }
    }

    /// Step back. Returns false at the first change or with no selection.
    pub fn previous(&mut self) -> bool {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                true
            }
            _ => false,
        }
    }

    /// Move to `index` if it names an existing change
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.total_diffs() {
            self.cursor = Some(index);
            true
        } else {
            false
        }
    }

    /// Find the result and row for the `index`-th change
    pub fn resolve(&self, index: usize) -> Option<DiffLocation<'_>> {
        let mut remaining = index;
        for result in &self.results {
            let count = result.diff_count();
            if remaining < count {
                let row = result.changes().nth(remaining)?;
                return Some(DiffLocation { result, row });
            }
            remaining -= count;
        }
        None
    }

    /// Resolve the current cursor
    pub fn current(&self) -> Option<DiffLocation<'_>> {
        self.cursor.and_then(|c| self.resolve(c))
    }
}
