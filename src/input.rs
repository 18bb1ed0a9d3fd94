//! Gene-list input.
//!
//! One gene per line: `<genome name>\t<sequence>`. The 1-based line ordinal
//! becomes the gene's file position, and genomes are numbered densely in
//! order of first appearance. Gzip-compressed files are detected by magic
//! bytes and decompressed transparently.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::{BbhError, Result};
use crate::genome::{Gene, Genome, GenomesContainer};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Read a gene list from `path`, grouping genes into genomes.
pub fn read_gene_list(path: &Path) -> Result<GenomesContainer> {
    let mut file = File::open(path).map_err(|e| BbhError::io(path, "open", e))?;

    let mut magic = [0u8; 2];
    let sniffed = file.read(&mut magic).map_err(|e| BbhError::io(path, "read", e))?;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| BbhError::io(path, "seek", e))?;

    if sniffed == 2 && magic == GZIP_MAGIC {
        parse_gene_list(BufReader::new(MultiGzDecoder::new(file)), path)
    } else {
        parse_gene_list(BufReader::new(file), path)
    }
}

fn parse_gene_list<R: BufRead>(reader: R, path: &Path) -> Result<GenomesContainer> {
    let mut genomes: Vec<Genome> = Vec::new();
    let mut ids_by_name: HashMap<String, u32> = HashMap::new();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index as u64 + 1;
        let line = line.map_err(|e| BbhError::io(path, "read", e))?;

        // Blank lines are skipped but still occupy their line ordinal.
        if line.trim().is_empty() {
            continue;
        }

        let (name, sequence) = line
            .split_once('\t')
            .ok_or_else(|| BbhError::input(path, line_number, "expected `<genome>\\t<sequence>`"))?;
        let name = name.trim();
        let sequence = sequence.trim();
        if name.is_empty() {
            return Err(BbhError::input(path, line_number, "empty genome name"));
        }
        if sequence.is_empty() {
            return Err(BbhError::input(path, line_number, "empty sequence"));
        }

        let genome_id = match ids_by_name.get(name) {
            Some(&id) => id,
            None => {
                let id = genomes.len() as u32;
                ids_by_name.insert(name.to_string(), id);
                genomes.push(Genome::new(id, name.to_string()));
                id
            }
        };
        genomes[genome_id as usize].push_gene(Gene::new(sequence.to_string(), line_number, genome_id));
    }

    Ok(GenomesContainer::from_genomes(genomes))
}
