use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use panbbh::{read_gene_list, Homology, HomologyConfig};

#[derive(Parser)]
#[command(name = "panbbh")]
#[command(about = "Bidirectional Best Hits between gene sets via generalized Jaccard over k-mers")]
#[command(
    long_about = "Computes Bidirectional Best Hits (BBH) between the genes of one or more \
genomes. Each gene's k-mer multiset is compared with a generalized Jaccard index; a gene pair \
is reported when each member is the other's highest-scoring match.

INPUT FORMAT:
  One gene per line: <genome name><TAB><sequence>. The 1-based line number
  becomes the gene's stable identifier in the output. Gzip-compressed input
  is detected automatically.

OUTPUT FORMAT:
  One CSV line per edge: <row line>,<col line>,<score>. No header. The file
  is opened in append mode; pass `-` to write to stdout."
)]
struct Args {
    /// Gene list file (optionally gzipped)
    input: PathBuf,

    /// Output edge file, opened append (`-` for stdout)
    #[arg(short, long)]
    output: PathBuf,

    /// K-mer length
    #[arg(short, long, default_value_t = 6)]
    k: usize,

    /// Worker threads (0 = all cores)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Index genomes on demand instead of holding every index in memory.
    /// Slower (k-mers are recomputed per genome pair) but peaks at two
    /// indexed genomes.
    #[arg(long)]
    low_memory: bool,

    /// Verbose progress output with timestamps
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    panbbh::logging::init_logger(args.verbose);

    let genomes = read_gene_list(&args.input)
        .with_context(|| format!("failed to read gene list {}", args.input.display()))?;
    info!(
        "loaded {} genomes, {} genes from {}",
        genomes.len(),
        genomes.total_genes(),
        args.input.display()
    );

    let homology = Homology::new(HomologyConfig {
        k: args.k,
        threads: if args.threads == 0 {
            None
        } else {
            Some(args.threads)
        },
        output_path: args.output.clone(),
        on_demand: args.low_memory,
    })
    .context("failed to start the BBH driver")?;

    homology
        .compute_all_bbh(&genomes)
        .context("BBH computation failed")?;

    info!(
        "wrote {} edges to {}",
        homology.edges_written(),
        args.output.display()
    );
    Ok(())
}
