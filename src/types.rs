//! Core types shared across the panbbh library.

/// Dense integer id assigned to a distinct k-mer by [`crate::KmerMapper`].
///
/// Ids start at 0, grow monotonically with first sightings, and are never
/// reused within a mapper's lifetime.
pub type KmerId = u64;

/// One emitted BBH edge: the two genes' original file positions and the
/// similarity score that made them each other's best hit.
#[derive(Debug, Clone, PartialEq)]
pub struct BbhEdge {
    pub row_file_position: u64,
    pub col_file_position: u64,
    pub score: f64,
}
