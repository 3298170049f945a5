//! fasta sizing and genome description.
//!
//! A genome is a file in the input directory, we need its name (the basename) and its
//! total number of bases, computed once before any pair is scheduled.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{HybridError, Result};

/// returns the number of bases in a fasta file, i.e the sum of length of non header lines.
/// Lines are stripped of surrounding whitespace, blank lines are skipped.
/// A file without any header line or without any base is an error.
pub fn fasta_size(path: &Path) -> Result<usize> {
    log::trace!("sizing fasta file {:?}", path);
    let reader = BufReader::new(File::open(path)?);
    let mut nb_header = 0;
    let mut nb_bases = 0;
    for line in reader.lines() {
        // binary or non utf-8 content is a garbled fasta, not an io failure
        let line = line.map_err(|e| match e.kind() {
            ErrorKind::InvalidData => HybridError::Format {
                path: path.to_path_buf(),
                msg: e.to_string(),
            },
            _ => HybridError::Io(e),
        })?;
        let stripped = line.trim();
        if stripped.is_empty() {
            continue;
        }
        if stripped.starts_with('>') {
            nb_header += 1;
        } else {
            nb_bases += stripped.len();
        }
    }
    //
    if nb_header == 0 {
        return Err(HybridError::Format {
            path: path.to_path_buf(),
            msg: String::from("no header line"),
        });
    }
    if nb_bases == 0 {
        return Err(HybridError::Format {
            path: path.to_path_buf(),
            msg: String::from("no sequence"),
        });
    }
    log::debug!("fasta file {:?}, nb header : {}, nb bases : {}", path, nb_header, nb_bases);
    Ok(nb_bases)
} // end of fasta_size

//================================================================================

/// A sized genome. Cloned into each work item, it is never modified after sizing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genome {
    path: PathBuf,
    /// basename of path, used as matrix key
    name: String,
    /// total number of bases
    size: usize,
}

impl Genome {
    /// reads the file and computes its size
    pub fn new(path: &Path) -> Result<Self> {
        let size = fasta_size(path)?;
        Ok(Genome {
            path: path.to_path_buf(),
            name: display_name(path),
            size,
        })
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_size(&self) -> usize {
        self.size
    }
} // end of impl Genome

/// basename of a genome path
pub fn display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => path.to_string_lossy().to_string(),
    }
}

/// sizes all genomes, stopping at first bad file
pub fn size_genomes(paths: &[PathBuf]) -> Result<Vec<Genome>> {
    let genomes = paths
        .iter()
        .map(|p| Genome::new(p))
        .collect::<Result<Vec<Genome>>>()?;
    log::info!("sized {} genomes", genomes.len());
    Ok(genomes)
} // end of size_genomes

//================================================================================

// end of mod tests
