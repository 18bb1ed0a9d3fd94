//! Dense similarity score matrix shared across worker tasks.

use std::sync::atomic::{AtomicU64, Ordering};

/// `rows x cols` matrix of f64 scores, default-initialized to 0.
///
/// Cells hold f64 bit patterns in relaxed atomics. The row phase writes each
/// cell exactly once from a single task; the column phase only reads, and the
/// pool barrier between the phases orders all writes before any read. No
/// per-cell locking is needed under that discipline.
pub struct ScoresContainer {
    rows: usize,
    cols: usize,
    cells: Vec<AtomicU64>,
}

impl ScoresContainer {
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        cells.resize_with(rows * cols, || AtomicU64::new(0));
        Self { rows, cols, cells }
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "score index ({}, {}) out of range ({} x {})",
            row,
            col,
            self.rows,
            self.cols
        );
        row * self.cols + col
    }

    pub fn set(&self, row: usize, col: usize, score: f64) {
        self.cells[self.index(row, col)].store(score.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        f64::from_bits(self.cells[self.index(row, col)].load(Ordering::Relaxed))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}
