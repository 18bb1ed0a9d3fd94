//! panbbh: parallel Bidirectional Best Hits over gene k-mer multisets.
//!
//! A BBH is a pair of genes, one from each of two genomes (possibly the same
//! genome), that are each other's highest-scoring match. Similarity is a
//! generalized Jaccard index over the genes' k-mer multisets, computed with a
//! sorted-merge intersection after interning every distinct k-mer to a dense
//! integer id.
//!
//! Pipeline: genes are parsed into [`GenomesContainer`], each genome's k-mer
//! index ([`IndexedGenome`]) is built either up front or on demand, every
//! genome pair fills a score matrix row-wise on the worker pool, per-row best
//! hits are inverted into columns, and the column-wise cross-check emits one
//! CSV edge per BBH:
//!
//! ```text
//! <row_file_position>,<col_file_position>,<score>
//! ```
//!
//! Typical use:
//!
//! ```no_run
//! use panbbh::{read_gene_list, Homology, HomologyConfig};
//!
//! # fn main() -> panbbh::Result<()> {
//! let genomes = read_gene_list("genes.tsv".as_ref())?;
//! let homology = Homology::new(HomologyConfig {
//!     k: 6,
//!     threads: None,
//!     output_path: "edges.net".into(),
//!     on_demand: false,
//! })?;
//! homology.compute_all_bbh(&genomes)?;
//! # Ok(())
//! # }
//! ```

pub mod candidates;
pub mod error;
pub mod genome;
pub mod homology;
pub mod input;
pub mod kmers;
pub mod logging;
pub mod output;
pub mod pool;
pub mod scores;
pub mod similarity;
pub mod types;

pub use candidates::{BbhCandidate, BbhCandidatesContainer};
pub use error::{BbhError, FirstError, Result};
pub use genome::{Gene, Genome, GenomesContainer, IndexedGene, IndexedGenome};
pub use homology::{Homology, HomologyConfig};
pub use input::read_gene_list;
pub use kmers::{KmerMapper, KmersContainer};
pub use output::OutputSink;
pub use pool::WorkerPool;
pub use scores::ScoresContainer;
pub use similarity::similarity;
pub use types::{BbhEdge, KmerId};
