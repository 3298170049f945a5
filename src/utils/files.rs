//! This file contains genome directory exploration and pair generation

use std::fs;
use std::path::{Path, PathBuf};

use crate::dna::dnafiles::{display_name, Genome};
use crate::errors::{HybridError, Result};

/// lists regular files of a genome directory, sorted by file name so that
/// all workers and successive runs see the same order.
/// The directory is not explored recursively. Symbolic links are followed.
pub fn list_genome_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut nb_entries = 0;
    let mut files = Vec::<PathBuf>::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        nb_entries += 1;
        // DirEntry::file_type does not traverse links, Path::is_file does
        if entry.path().is_file() {
            files.push(entry.path());
        } else {
            log::debug!("skipping non regular entry {:?}", entry.path());
        }
    }
    if nb_entries == 0 || files.is_empty() {
        log::error!("no genome file in directory {:?}", dir);
        return Err(HybridError::EmptyInput(dir.to_path_buf()));
    }
    files.sort_by_key(|p| display_name(p));
    log::info!("found {} genome files in {:?}", files.len(), dir);
    Ok(files)
} // end of list_genome_files

//==================================================================================

/// A pair of distinct genomes to compare, with the nucmer minimum cluster size.
/// The first genome is used as reference, the second as query.
#[derive(Clone, Debug)]
pub struct GenomePair {
    reference: Genome,
    query: Genome,
    min_cluster: usize,
}

impl GenomePair {
    pub fn new(reference: Genome, query: Genome, min_cluster: usize) -> Self {
        GenomePair {
            reference,
            query,
            min_cluster,
        }
    }

    pub fn get_reference(&self) -> &Genome {
        &self.reference
    }

    pub fn get_query(&self) -> &Genome {
        &self.query
    }

    pub fn get_min_cluster(&self) -> usize {
        self.min_cluster
    }
} // end of impl GenomePair

/// all 2-combinations of genomes, (i,j) with i < j in slice order.
pub fn make_pairs(genomes: &[Genome], min_cluster: usize) -> Vec<GenomePair> {
    let nb_genomes = genomes.len();
    let mut pairs = Vec::<GenomePair>::with_capacity(nb_genomes * nb_genomes.saturating_sub(1) / 2);
    for i in 0..nb_genomes {
        for j in (i + 1)..nb_genomes {
            pairs.push(GenomePair::new(genomes[i].clone(), genomes[j].clone(), min_cluster));
        }
    }
    log::info!("nb genomes : {}, nb pairs : {}", nb_genomes, pairs.len());
    pairs
} // end of make_pairs

//==================================================================================

// end of mod tests
