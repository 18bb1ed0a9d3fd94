//! K-mer interning and per-gene k-mer multisets.
//!
//! Every distinct length-k substring seen across the genes of a comparison
//! window is assigned a dense integer id by [`KmerMapper`]. A gene's k-mer
//! content is then an id-sorted multiset ([`KmersContainer`]) that the
//! similarity kernel can intersect with a linear merge.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::types::KmerId;

/// Bidirectional interner mapping distinct k-mer strings to dense ids.
///
/// Insertion is thread-safe: concurrent interns of the same substring yield
/// the same id, distinct substrings get distinct ids, and ids are never
/// reused. Reads by the similarity kernel only happen after the build of the
/// gene in question has completed.
pub struct KmerMapper {
    map: Mutex<HashMap<Vec<u8>, KmerId>>,
}

impl KmerMapper {
    pub fn new() -> Self {
        Self {
            map: Mutex::new(HashMap::new()),
        }
    }

    /// Return the id for `kmer`, allocating the next dense id on first
    /// sighting.
    pub fn intern(&self, kmer: &[u8]) -> KmerId {
        let mut map = self.map.lock().unwrap();
        if let Some(&id) = map.get(kmer) {
            return id;
        }
        let id = map.len() as KmerId;
        map.insert(kmer.to_vec(), id);
        id
    }

    /// Number of distinct k-mers interned so far.
    pub fn size(&self) -> usize {
        self.map.lock().unwrap().len()
    }
}

impl Default for KmerMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered multiset of (k-mer id, multiplicity) pairs for one gene.
///
/// Pairs are strictly ascending by id with every multiplicity >= 1, which
/// lets the kernel intersect two containers with a single sorted merge.
/// `total_multiplicity` equals the number of k-mer occurrences in the gene:
/// `n - k + 1` for an alphabet of length `n >= k`, 0 otherwise.
#[derive(Debug, Clone)]
pub struct KmersContainer {
    pairs: Vec<(KmerId, u32)>,
    min_key: KmerId,
    max_key: KmerId,
    total_multiplicity: u64,
}

impl KmersContainer {
    /// Slide a k-window over `alphabet`, intern each substring, and collect
    /// the id-sorted multiset. Counts are accumulated locally first so each
    /// distinct substring hits the mapper exactly once per gene.
    pub fn build(alphabet: &[u8], k: usize, mapper: &KmerMapper) -> Self {
        assert!(k > 0, "k-mer length must be positive");

        if alphabet.len() < k {
            return Self::empty();
        }

        let mut counts: HashMap<&[u8], u32> = HashMap::new();
        for window in alphabet.windows(k) {
            *counts.entry(window).or_insert(0) += 1;
        }

        let mut pairs: Vec<(KmerId, u32)> = counts
            .into_iter()
            .map(|(substring, multiplicity)| (mapper.intern(substring), multiplicity))
            .collect();
        pairs.sort_unstable_by_key(|&(id, _)| id);

        let min_key = pairs.first().map(|&(id, _)| id).unwrap_or(0);
        let max_key = pairs.last().map(|&(id, _)| id).unwrap_or(0);
        let total_multiplicity = (alphabet.len() - k + 1) as u64;

        Self {
            pairs,
            min_key,
            max_key,
            total_multiplicity,
        }
    }

    fn empty() -> Self {
        Self {
            pairs: Vec::new(),
            min_key: 0,
            max_key: 0,
            total_multiplicity: 0,
        }
    }

    /// Id-ascending (id, multiplicity) pairs.
    pub fn pairs(&self) -> &[(KmerId, u32)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of distinct k-mers.
    pub fn distinct_kmers(&self) -> usize {
        self.pairs.len()
    }

    /// Smallest id present. Meaningful only when non-empty.
    pub fn min_key(&self) -> KmerId {
        self.min_key
    }

    /// Largest id present. Meaningful only when non-empty.
    pub fn max_key(&self) -> KmerId {
        self.max_key
    }

    /// Total number of k-mer occurrences (sum of multiplicities).
    pub fn total_multiplicity(&self) -> u64 {
        self.total_multiplicity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_intern_is_stable() {
        let mapper = KmerMapper::new();
        let a = mapper.intern(b"AAA");
        let b = mapper.intern(b"AAC");
        let a2 = mapper.intern(b"AAA");
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(mapper.size(), 2);
    }

    #[test]
    fn test_intern_ids_are_dense() {
        let mapper = KmerMapper::new();
        let ids: Vec<_> = [b"AB", b"BC", b"CD", b"AB"]
            .iter()
            .map(|s| mapper.intern(*s))
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_concurrent_intern_consistency() {
        let mapper = Arc::new(KmerMapper::new());
        let kmers: Vec<Vec<u8>> = (0..64u8).map(|i| vec![b'A', i]).collect();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let mapper = Arc::clone(&mapper);
                let kmers = kmers.clone();
                std::thread::spawn(move || {
                    kmers.iter().map(|k| mapper.intern(k)).collect::<Vec<_>>()
                })
            })
            .collect();

        let results: Vec<Vec<KmerId>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Same substring resolves to the same id in every thread.
        for ids in &results[1..] {
            assert_eq!(ids, &results[0]);
        }
        // Distinct substrings got distinct ids, none reused.
        let mut sorted = results[0].clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), kmers.len());
        assert_eq!(mapper.size(), kmers.len());
    }

    #[test]
    fn test_build_counts_multiplicities() {
        let mapper = KmerMapper::new();
        let container = KmersContainer::build(b"AAAA", 3, &mapper);
        assert_eq!(container.pairs(), &[(mapper.intern(b"AAA"), 2)]);
        assert_eq!(container.total_multiplicity(), 2);
        assert_eq!(container.distinct_kmers(), 1);
    }

    #[test]
    fn test_build_is_sorted_ascending() {
        let mapper = KmerMapper::new();
        // Force interning order to differ from sorted order.
        mapper.intern(b"CGT");
        mapper.intern(b"ACG");
        let container = KmersContainer::build(b"ACGT", 3, &mapper);
        let ids: Vec<_> = container.pairs().iter().map(|&(id, _)| id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert_eq!(container.min_key(), ids[0]);
        assert_eq!(container.max_key(), *ids.last().unwrap());
    }

    #[test]
    fn test_build_total_matches_window_count() {
        let mapper = KmerMapper::new();
        let alphabet = b"MKVLAAGMKVLA";
        let container = KmersContainer::build(alphabet, 4, &mapper);
        assert_eq!(container.total_multiplicity(), (alphabet.len() - 4 + 1) as u64);
        let sum: u64 = container.pairs().iter().map(|&(_, m)| m as u64).sum();
        assert_eq!(sum, container.total_multiplicity());
    }

    #[test]
    fn test_short_alphabet_yields_empty() {
        let mapper = KmerMapper::new();
        let container = KmersContainer::build(b"A", 3, &mapper);
        assert!(container.is_empty());
        assert_eq!(container.total_multiplicity(), 0);
        assert_eq!(mapper.size(), 0);
    }
}
