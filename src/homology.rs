//! BBH driver: k-mer lifecycle, row/column phases, edge emission.
//!
//! For every ordered genome pair (including each genome against itself) the
//! driver fills a fresh score matrix row by row on the worker pool, tracks
//! per-row best hits, inverts the candidates into columns, and emits an edge
//! wherever a column's best row and the row's best column agree on the same
//! score. Equality comparisons on scores are exact; candidate selection
//! already guarantees every inspected column carries a positive best.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use log::info;

use crate::candidates::BbhCandidatesContainer;
use crate::error::{BbhError, FirstError, Result};
use crate::genome::{GenomesContainer, IndexedGenome};
use crate::kmers::KmerMapper;
use crate::output::OutputSink;
use crate::pool::WorkerPool;
use crate::scores::ScoresContainer;
use crate::similarity::similarity;
use crate::types::BbhEdge;

/// Driver construction options.
#[derive(Debug, Clone)]
pub struct HomologyConfig {
    /// K-mer length; must be positive.
    pub k: usize,
    /// Worker thread count; `None` uses the host parallelism.
    pub threads: Option<usize>,
    /// Edge output path, opened append (`-` for stdout).
    pub output_path: PathBuf,
    /// Build each genome's k-mers just-in-time instead of all up front,
    /// holding at most two genome indices in memory at a time.
    pub on_demand: bool,
}

/// Row range a column task scans for the column's best rows.
#[derive(Clone, Copy)]
enum ColumnScan {
    /// Cross-genome pair: every row.
    AllRows,
    /// Same-genome pair: only rows above the diagonal.
    BelowDiagonal,
}

pub struct Homology {
    k: usize,
    on_demand: bool,
    pool: WorkerPool,
    sink: Arc<OutputSink>,
}

impl Homology {
    pub fn new(config: HomologyConfig) -> Result<Self> {
        if config.k == 0 {
            return Err(BbhError::config("k must be positive"));
        }
        let threads = match config.threads {
            Some(0) => return Err(BbhError::config("thread count must be positive")),
            Some(n) => n,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        };

        Ok(Self {
            k: config.k,
            on_demand: config.on_demand,
            pool: WorkerPool::new(threads)?,
            sink: Arc::new(OutputSink::open(&config.output_path)?),
        })
    }

    /// Compute every BBH edge across all genome pairs and flush the sink.
    pub fn compute_all_bbh(&self, genomes: &GenomesContainer) -> Result<()> {
        if self.on_demand {
            self.run_on_demand(genomes)?;
        } else {
            self.run_build_once(genomes)?;
        }
        self.sink.finish()
    }

    /// Edges emitted so far.
    pub fn edges_written(&self) -> u64 {
        self.sink.edges_written()
    }

    /// Build-on-demand: index the outer genome, then each later genome
    /// just-in-time, dropping indices as soon as their pairs are done. The
    /// mapper is scoped to the outer genome, so ids stay comparable within
    /// every computed pair while the dictionary tracks the working set.
    fn run_on_demand(&self, genomes: &GenomesContainer) -> Result<()> {
        let list = genomes.genomes();
        for (r, row_genome) in list.iter().enumerate() {
            let mapper = KmerMapper::new();
            let row = Arc::new(IndexedGenome::build(row_genome, self.k, &mapper));
            self.same_genome_pair(&row)?;

            for col_genome in &list[r + 1..] {
                let col = Arc::new(IndexedGenome::build(col_genome, self.k, &mapper));
                self.cross_genome_pair(col, Arc::clone(&row))?;
            }
        }
        Ok(())
    }

    /// Build-once: index every genome up front with a single shared mapper,
    /// then run the same pair loop, releasing each row genome's index after
    /// its sweep.
    fn run_build_once(&self, genomes: &GenomesContainer) -> Result<()> {
        let mapper = KmerMapper::new();
        let build_start = Instant::now();
        let mut indexed: Vec<Option<Arc<IndexedGenome>>> = genomes
            .genomes()
            .iter()
            .map(|g| Some(Arc::new(IndexedGenome::build(g, self.k, &mapper))))
            .collect();
        info!(
            "indexed {} genomes ({} distinct k-mers) in {:.2?}",
            indexed.len(),
            mapper.size(),
            build_start.elapsed()
        );

        for r in 0..indexed.len() {
            let row = indexed[r].clone().expect("row index still held");
            self.same_genome_pair(&row)?;

            for col in indexed[r + 1..].iter().flatten() {
                self.cross_genome_pair(Arc::clone(col), Arc::clone(&row))?;
            }

            indexed[r] = None;
        }
        Ok(())
    }

    /// Row phase + column phase for a cross-genome pair. Rows come from
    /// `row_genome`, columns from `col_genome`.
    fn cross_genome_pair(
        &self,
        col_genome: Arc<IndexedGenome>,
        row_genome: Arc<IndexedGenome>,
    ) -> Result<()> {
        let start = Instant::now();
        let rows = row_genome.len();
        let cols = col_genome.len();
        let scores = Arc::new(ScoresContainer::new(rows, cols));
        let candidates = Arc::new(BbhCandidatesContainer::new(rows));

        for row in 0..rows {
            let row_view = Arc::clone(&row_genome);
            let col_view = Arc::clone(&col_genome);
            let scores = Arc::clone(&scores);
            let candidates = Arc::clone(&candidates);
            self.pool.execute(move || {
                let row_gene = &row_view.genes()[row];
                for (col, col_gene) in col_view.genes().iter().enumerate() {
                    let score = similarity(row_gene, col_gene);
                    scores.set(row, col, score);
                    candidates.add_candidate(row, score, col);
                }
            });
        }
        self.pool.wait_idle();

        self.emit_edges(&col_genome, &row_genome, &candidates, &scores, ColumnScan::AllRows)?;

        info!(
            "pair {}x{}: {} x {} genes in {:.2?}",
            row_genome.genome_id(),
            col_genome.genome_id(),
            rows,
            cols,
            start.elapsed()
        );
        Ok(())
    }

    /// Same-genome pair: each row task starts past the diagonal, so the
    /// matrix is upper-triangular and self-comparisons never score.
    fn same_genome_pair(&self, genome: &Arc<IndexedGenome>) -> Result<()> {
        let start = Instant::now();
        let n = genome.len();
        let scores = Arc::new(ScoresContainer::new(n, n));
        let candidates = Arc::new(BbhCandidatesContainer::new(n));

        for row in 0..n {
            let view = Arc::clone(genome);
            let scores = Arc::clone(&scores);
            let candidates = Arc::clone(&candidates);
            self.pool.execute(move || {
                let row_gene = &view.genes()[row];
                for col in row + 1..view.len() {
                    let score = similarity(row_gene, &view.genes()[col]);
                    scores.set(row, col, score);
                    candidates.add_candidate(row, score, col);
                }
            });
        }
        self.pool.wait_idle();

        self.emit_edges(genome, genome, &candidates, &scores, ColumnScan::BelowDiagonal)?;

        info!(
            "pair {}x{}: {} genes in {:.2?}",
            genome.genome_id(),
            genome.genome_id(),
            n,
            start.elapsed()
        );
        Ok(())
    }

    /// Column phase: for every candidate column, find the rows attaining the
    /// column's best score and emit an edge for each whose own best agrees.
    fn emit_edges(
        &self,
        col_genome: &Arc<IndexedGenome>,
        row_genome: &Arc<IndexedGenome>,
        candidates: &Arc<BbhCandidatesContainer>,
        scores: &Arc<ScoresContainer>,
        scan: ColumnScan,
    ) -> Result<()> {
        let matches = candidates.possible_matches();
        let errors = Arc::new(FirstError::new());

        for col in matches.into_keys() {
            let row_limit = match scan {
                ColumnScan::AllRows => row_genome.len(),
                ColumnScan::BelowDiagonal => col,
            };
            let row_view = Arc::clone(row_genome);
            let col_view = Arc::clone(col_genome);
            let scores = Arc::clone(scores);
            let candidates = Arc::clone(candidates);
            let sink = Arc::clone(&self.sink);
            let errors = Arc::clone(&errors);

            self.pool.execute(move || {
                let mut best_score = -1.0_f64;
                let mut best_rows: Vec<usize> = Vec::new();
                for row in 0..row_limit {
                    let score = scores.get(row, col);
                    if score > best_score {
                        best_score = score;
                        best_rows.clear();
                        best_rows.push(row);
                    } else if score == best_score {
                        best_rows.push(row);
                    }
                }

                let col_position = col_view.genes()[col].file_position();
                for &row in &best_rows {
                    if candidates.best_score(row) == best_score {
                        let edge = BbhEdge {
                            row_file_position: row_view.genes()[row].file_position(),
                            col_file_position: col_position,
                            score: best_score,
                        };
                        if let Err(err) = sink.write_edge(&edge) {
                            errors.store(err);
                        }
                    }
                }
            });
        }
        self.pool.wait_idle();

        if let Some(err) = errors.get() {
            return Err(err);
        }
        Ok(())
    }
}
