//! Generalized Jaccard similarity over gene k-mer multisets.

use crate::genome::IndexedGene;

/// Similarity of two genes in `[0, 1]`.
///
/// Generalized Jaccard over the k-mer multisets: intersected ids contribute
/// `min(multiplicities)` to the numerator and `max(multiplicities)` to the
/// denominator, and the unmatched occurrences of both sides join the
/// denominator only. Genes whose alphabet lengths differ by more than a
/// factor of two score 0 without touching the containers.
pub fn similarity(a: &IndexedGene, b: &IndexedGene) -> f64 {
    if 2 * a.alphabet_length() < b.alphabet_length()
        || 2 * b.alphabet_length() < a.alphabet_length()
    {
        return 0.0;
    }

    let (shorter, longer) = if a.kmers_num() < b.kmers_num() {
        (a.kmer_container(), b.kmer_container())
    } else {
        (b.kmer_container(), a.kmer_container())
    };

    let longer_max_key = longer.max_key();
    let s = shorter.pairs();
    let l = longer.pairs();

    let mut num: u64 = 0;
    let mut den: u64 = 0;
    let mut matched_shorter: u64 = 0;
    let mut matched_longer: u64 = 0;

    let mut si = 0;
    let mut li = 0;
    while si < s.len() && li < l.len() {
        let (s_key, s_mult) = s[si];
        let (l_key, l_mult) = l[li];

        // Every remaining shorter id is beyond the longer container.
        if s_key > longer_max_key {
            break;
        }

        if s_key < l_key {
            si += 1;
        } else if s_key > l_key {
            li += 1;
        } else {
            num += s_mult.min(l_mult) as u64;
            den += s_mult.max(l_mult) as u64;
            matched_shorter += s_mult as u64;
            matched_longer += l_mult as u64;
            si += 1;
            li += 1;
        }
    }

    let tail = (shorter.total_multiplicity() - matched_shorter)
        + (longer.total_multiplicity() - matched_longer);
    let denominator = den + tail;
    if denominator == 0 {
        return 0.0;
    }
    num as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Gene;
    use crate::kmers::KmerMapper;

    fn indexed(seq: &str, k: usize, mapper: &KmerMapper) -> IndexedGene {
        IndexedGene::from_gene(&Gene::new(seq.to_string(), 0, 0), k, mapper)
    }

    #[test]
    fn test_identical_genes_score_one() {
        let mapper = KmerMapper::new();
        let a = indexed("AAAA", 3, &mapper);
        let b = indexed("AAAA", 3, &mapper);
        assert_eq!(similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_self_similarity_is_one() {
        let mapper = KmerMapper::new();
        let a = indexed("MKVLAAGMKVLA", 4, &mapper);
        assert_eq!(similarity(&a, &a), 1.0);
    }

    #[test]
    fn test_symmetry() {
        let mapper = KmerMapper::new();
        let pairs = [("AAAA", "AAAC"), ("ACGTACGT", "ACGTTGCA"), ("MKVL", "MKVA")];
        for (x, y) in pairs {
            let a = indexed(x, 3, &mapper);
            let b = indexed(y, 3, &mapper);
            assert_eq!(similarity(&a, &b), similarity(&b, &a), "{} vs {}", x, y);
        }
    }

    #[test]
    fn test_range_zero_to_one() {
        let mapper = KmerMapper::new();
        let seqs = ["AAAA", "AAAC", "ACGT", "A", "ACGTACGTACGT"];
        for x in seqs {
            for y in seqs {
                let a = indexed(x, 3, &mapper);
                let b = indexed(y, 3, &mapper);
                let s = similarity(&a, &b);
                assert!((0.0..=1.0).contains(&s), "{} vs {} -> {}", x, y, s);
            }
        }
    }

    #[test]
    fn test_disjoint_kmer_sets_score_zero() {
        let mapper = KmerMapper::new();
        let a = indexed("AAAA", 3, &mapper);
        let b = indexed("CCCC", 3, &mapper);
        assert_eq!(similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_partial_overlap_value() {
        // AAAA -> {AAA:2}, AAAC -> {AAA:1, AAC:1}; shared mass 1 over 2,
        // unmatched tail 1, so 1 / (2 + 1).
        let mapper = KmerMapper::new();
        let a = indexed("AAAA", 3, &mapper);
        let b = indexed("AAAC", 3, &mapper);
        let s = similarity(&a, &b);
        assert!((s - 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_length_gate_rejects_double_length() {
        // len 2 against len 5: 2 < 5/2, so the gate fires even though the
        // containers share their only k-mer.
        let mapper = KmerMapper::new();
        let a = indexed("AAAAA", 2, &mapper);
        let b = indexed("AA", 2, &mapper);
        assert_eq!(similarity(&a, &b), 0.0);
        assert_eq!(similarity(&b, &a), 0.0);
    }

    #[test]
    fn test_length_gate_allows_exact_double() {
        // len 4 against len 2 with k=2: 2*2 == 4, the gate does not fire.
        let mapper = KmerMapper::new();
        let a = indexed("AAAA", 2, &mapper);
        let b = indexed("AA", 2, &mapper);
        assert!(similarity(&a, &b) > 0.0);
    }

    #[test]
    fn test_gene_shorter_than_k_scores_zero() {
        let mapper = KmerMapper::new();
        let a = indexed("A", 3, &mapper);
        let b = indexed("AA", 3, &mapper);
        assert_eq!(similarity(&a, &b), 0.0);
        assert_eq!(similarity(&a, &a), 0.0);
    }
}
