//! Per-row best-hit candidate tracking and the column inversion.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Best score seen for one row gene plus every column attaining it.
///
/// A zero score never becomes a candidate, so the inversion only ever carries
/// columns backed by a strictly positive best score.
#[derive(Debug, Default)]
pub struct BbhCandidate {
    best_score: f64,
    best_cols: Vec<usize>,
}

impl BbhCandidate {
    fn add(&mut self, score: f64, col: usize) {
        if score > self.best_score {
            self.best_score = score;
            self.best_cols.clear();
            self.best_cols.push(col);
        } else if score == self.best_score && score > 0.0 {
            self.best_cols.push(col);
        }
    }

    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    pub fn best_cols(&self) -> &[usize] {
        &self.best_cols
    }
}

/// One [`BbhCandidate`] per row, capacity fixed at construction.
///
/// The row phase partitions rows across tasks, so a row is only ever updated
/// from one thread at a time and the per-row mutexes stay uncontended.
pub struct BbhCandidatesContainer {
    rows: Vec<Mutex<BbhCandidate>>,
}

impl BbhCandidatesContainer {
    pub fn new(rows: usize) -> Self {
        let mut slots = Vec::with_capacity(rows);
        slots.resize_with(rows, || Mutex::new(BbhCandidate::default()));
        Self { rows: slots }
    }

    pub fn add_candidate(&self, row: usize, score: f64, col: usize) {
        self.rows[row].lock().unwrap().add(score, col);
    }

    pub fn best_score(&self, row: usize) -> f64 {
        self.rows[row].lock().unwrap().best_score()
    }

    pub fn capacity(&self) -> usize {
        self.rows.len()
    }

    /// Invert the candidates: column index -> rows holding that column among
    /// their best. The returned map is the caller's property.
    pub fn possible_matches(&self) -> HashMap<usize, HashSet<usize>> {
        let mut matches: HashMap<usize, HashSet<usize>> = HashMap::new();
        for (row, slot) in self.rows.iter().enumerate() {
            let candidate = slot.lock().unwrap();
            for &col in candidate.best_cols() {
                matches.entry(col).or_default().insert(row);
            }
        }
        matches
    }
}
