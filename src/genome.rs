//! Gene and genome descriptors, plus the per-genome k-mer index view.
//!
//! Parsed [`Gene`]s carry only what the input collaborator supplies: the
//! alphabet, the 1-based file position, and the owning genome id. K-mer
//! content lives in a separate [`IndexedGenome`] built on demand and dropped
//! when the driver is done with a genome, so the build-once and
//! build-on-demand modes differ only in how long the index view is held.

use rayon::prelude::*;

use crate::kmers::{KmerMapper, KmersContainer};

/// Immutable gene descriptor as supplied by the gene source.
#[derive(Debug, Clone)]
pub struct Gene {
    alphabet: String,
    file_position: u64,
    genome_id: u32,
}

impl Gene {
    pub fn new(alphabet: String, file_position: u64, genome_id: u32) -> Self {
        Self {
            alphabet,
            file_position,
            genome_id,
        }
    }

    pub fn alphabet(&self) -> &str {
        &self.alphabet
    }

    pub fn alphabet_length(&self) -> usize {
        self.alphabet.len()
    }

    /// Original line ordinal in the input; a stable external identifier.
    pub fn file_position(&self) -> u64 {
        self.file_position
    }

    pub fn genome_id(&self) -> u32 {
        self.genome_id
    }
}

/// Ordered collection of genes belonging to one genome.
#[derive(Debug)]
pub struct Genome {
    genome_id: u32,
    name: String,
    genes: Vec<Gene>,
}

impl Genome {
    pub fn new(genome_id: u32, name: String) -> Self {
        Self {
            genome_id,
            name,
            genes: Vec::new(),
        }
    }

    pub fn push_gene(&mut self, gene: Gene) {
        self.genes.push(gene);
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genome_id(&self) -> u32 {
        self.genome_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered collection of genomes, numbered densely by first appearance.
#[derive(Debug, Default)]
pub struct GenomesContainer {
    genomes: Vec<Genome>,
}

impl GenomesContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_genomes(genomes: Vec<Genome>) -> Self {
        Self { genomes }
    }

    pub fn add_genome(&mut self, genome: Genome) {
        self.genomes.push(genome);
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    pub fn total_genes(&self) -> usize {
        self.genomes.iter().map(|g| g.len()).sum()
    }
}

// ============================================================================
// Indexed view
// ============================================================================

/// A gene together with its built k-mer container.
#[derive(Debug)]
pub struct IndexedGene {
    file_position: u64,
    alphabet_len: usize,
    kmers: KmersContainer,
}

impl IndexedGene {
    pub fn from_gene(gene: &Gene, k: usize, mapper: &KmerMapper) -> Self {
        Self {
            file_position: gene.file_position(),
            alphabet_len: gene.alphabet_length(),
            kmers: KmersContainer::build(gene.alphabet().as_bytes(), k, mapper),
        }
    }

    /// Total count of k-mer occurrences in the gene.
    pub fn kmers_num(&self) -> u64 {
        self.kmers.total_multiplicity()
    }

    pub fn alphabet_length(&self) -> usize {
        self.alphabet_len
    }

    pub fn kmer_container(&self) -> &KmersContainer {
        &self.kmers
    }

    pub fn file_position(&self) -> u64 {
        self.file_position
    }
}

/// All genes of one genome with their k-mer containers built.
///
/// Dropping the value (or the last `Arc` holding it) releases the genome's
/// k-mer memory. The driver owns the lifecycle and shares the view with
/// worker tasks.
#[derive(Debug)]
pub struct IndexedGenome {
    genome_id: u32,
    genes: Vec<IndexedGene>,
}

impl IndexedGenome {
    /// Build the k-mer container of every gene, fanning out over genes.
    /// The mapper serializes interning, so concurrent builds stay consistent.
    pub fn build(genome: &Genome, k: usize, mapper: &KmerMapper) -> Self {
        let genes = genome
            .genes()
            .par_iter()
            .map(|gene| IndexedGene::from_gene(gene, k, mapper))
            .collect();
        Self {
            genome_id: genome.genome_id(),
            genes,
        }
    }

    pub fn genes(&self) -> &[IndexedGene] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genome_id(&self) -> u32 {
        self.genome_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genome_of(id: u32, seqs: &[(&str, u64)]) -> Genome {
        let mut genome = Genome::new(id, format!("g{}", id));
        for &(seq, pos) in seqs {
            genome.push_gene(Gene::new(seq.to_string(), pos, id));
        }
        genome
    }

    #[test]
    fn test_indexed_genome_preserves_order_and_positions() {
        let genome = genome_of(0, &[("AAAA", 3), ("AAAC", 7)]);
        let mapper = KmerMapper::new();
        let indexed = IndexedGenome::build(&genome, 3, &mapper);

        assert_eq!(indexed.len(), 2);
        assert_eq!(indexed.genes()[0].file_position(), 3);
        assert_eq!(indexed.genes()[1].file_position(), 7);
        assert_eq!(indexed.genes()[0].kmers_num(), 2);
        assert_eq!(indexed.genes()[1].kmers_num(), 2);
    }

    #[test]
    fn test_shared_kmers_share_ids_across_genes() {
        let genome = genome_of(0, &[("AAAT", 1), ("CAAA", 2)]);
        let mapper = KmerMapper::new();
        let indexed = IndexedGenome::build(&genome, 3, &mapper);

        // Both genes contain AAA; it must resolve to one id.
        let id = mapper.intern(b"AAA");
        for gene in indexed.genes() {
            assert!(gene.kmer_container().pairs().iter().any(|&(k, _)| k == id));
        }
    }

    #[test]
    fn test_short_gene_gets_empty_container() {
        let genome = genome_of(1, &[("AB", 5)]);
        let mapper = KmerMapper::new();
        let indexed = IndexedGenome::build(&genome, 3, &mapper);
        assert!(indexed.genes()[0].kmer_container().is_empty());
        assert_eq!(indexed.genes()[0].kmers_num(), 0);
        assert_eq!(indexed.genes()[0].alphabet_length(), 2);
    }
}
