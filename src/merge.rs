//! # Adjacent Cell Merging
//!
//! Collapses runs of identical cells in a rendered table into a single cell with
//! a row-span. The merge is driven only by cell content: a column group is a set
//! of columns that merge together, and a run of consecutive rows is merged when
//! every column of the group holds the same content on all of them.
//!
//! Cells removed by a merge stay in the grid as `None`, so column indices never
//! shift and merging an already merged grid is a no-op.

use serde::Serialize;

/// Rows `start..end` of `column` render as one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MergeSpan {
    pub column: usize,
    pub start: usize,
    pub end: usize,
}

impl MergeSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell<T> {
    pub content: T,
    pub rowspan: usize,
}

/// A table of cells. Rows may have different lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: Vec<Vec<Option<Cell<T>>>>,
}

impl<T> Grid<T> {
    pub fn new(rows: Vec<Vec<T>>) -> Self {
        Grid {
            rows: rows
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|content| Some(Cell { content, rowspan: 1 }))
                        .collect()
                })
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<Option<Cell<T>>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The cell at `(row, column)`; `None` if it was merged away or the row is shorter.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell<T>> {
        self.rows.get(row)?.get(column)?.as_ref()
    }

    /// Finds the spans for `column_groups`, comparing cells by `key`.
    ///
    /// Each group is scanned independently from the top. A maximal run of two or
    /// more rows that agree on every column of the group produces one span per
    /// column of the group.
    pub fn find_spans_by<K, F>(&self, column_groups: &[Vec<usize>], key: F) -> Vec<MergeSpan>
    where
        K: PartialEq + ?Sized,
        F: Fn(&T) -> &K,
    {
        let same = |i: usize, j: usize, column: usize| {
            match (self.cell(i, column), self.cell(j, column)) {
                (Some(a), Some(b)) => key(&a.content) == key(&b.content),
                _ => false,
            }
        };

        let n = self.rows.len();
        let mut spans = vec![];
        for group in column_groups.iter().filter(|g| !g.is_empty()) {
            let mut i = 0;
            while i < n {
                let mut j = i + 1;
                while j < n && group.iter().all(|&c| same(i, j, c)) {
                    j += 1;
                }
                if j - i >= 2 {
                    spans.extend(group.iter().map(|&column| MergeSpan {
                        column,
                        start: i,
                        end: j,
                    }));
                }
                i = j;
            }
        }
        spans
    }

    /// Removes the cells covered by `spans` below their first row and updates row-spans.
    ///
    /// The result does not depend on the order of `spans`: every surviving cell
    /// spans all consecutive removed cells below it.
    pub fn apply(&mut self, spans: &[MergeSpan]) {
        for span in spans {
            for r in span.start + 1..span.end.min(self.rows.len()) {
                if let Some(slot) = self.rows[r].get_mut(span.column) {
                    *slot = None;
                }
            }
        }

        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        for column in 0..width {
            let mut r = 0;
            while r < self.rows.len() {
                if self.cell(r, column).is_none() {
                    r += 1;
                    continue;
                }
                let mut k = r + 1;
                while k < self.rows.len() && matches!(self.rows[k].get(column), Some(None)) {
                    k += 1;
                }
                if let Some(Some(cell)) = self.rows[r].get_mut(column) {
                    cell.rowspan = k - r;
                }
                r = k;
            }
        }
    }

    pub fn into_rows(self) -> Vec<Vec<Option<Cell<T>>>> {
        self.rows
    }
}

impl<T: PartialEq> Grid<T> {
    /// Finds the spans for `column_groups`, comparing whole cell contents.
    pub fn find_spans(&self, column_groups: &[Vec<usize>]) -> Vec<MergeSpan> {
        self.find_spans_by(column_groups, |c| c)
    }

    /// Finds and applies the spans for `column_groups`.
    pub fn merge(&mut self, column_groups: &[Vec<usize>]) -> Vec<MergeSpan> {
        let spans = self.find_spans(column_groups);
        self.apply(&spans);
        spans
    }
}
