//! the all pairs comparison pipeline.
//!
//! list genomes -> size them (once, before scheduling) -> make pairs -> scatter pairs over workers
//! -> align and score each pair -> gather -> assemble and dump the matrix.

use std::path::Path;
use std::time::SystemTime;

use cpu_time::ProcessTime;

use crate::distribute::scatter_gather;
use crate::dna::dnafiles::size_genomes;
use crate::errors::Result;
use crate::matrix::{SimilarityMatrix, SimilarityResult};
use crate::nucmer::aligner::Aligner;
use crate::nucmer::coords::score_report;
use crate::utils::files::{list_genome_files, make_pairs, GenomePair};
use crate::utils::parameters::HybridParams;

/// aligns a pair and scores its report. The first genome of the pair is the reference.
pub fn process_pair<A>(aligner: &A, pair: &GenomePair) -> Result<SimilarityResult>
where
    A: Aligner + ?Sized,
{
    let reference = pair.get_reference();
    let query = pair.get_query();
    log::debug!("processing pair {} {}", reference.get_name(), query.get_name());
    let report = aligner.align(pair)?;
    let score = score_report(&report, reference.get_size(), query.get_size());
    log::debug!("pair {} {} score : {}", reference.get_name(), query.get_name(), score);
    Ok(SimilarityResult::new(
        reference.get_name().to_string(),
        query.get_name().to_string(),
        score,
    ))
} // end of process_pair

/// computes all pairwise similarities of genomes in genome_dir with nb_workers workers.
/// Any bad fasta file aborts before any alignment is run, any failed alignment aborts the run.
pub fn compute_matrix<A>(genome_dir: &Path, min_cluster: usize, nb_workers: usize, aligner: &A) -> Result<SimilarityMatrix>
where
    A: Aligner + ?Sized,
{
    let files = list_genome_files(genome_dir)?;
    let genomes = size_genomes(&files)?;
    let pairs = make_pairs(&genomes, min_cluster);
    //
    let results = scatter_gather(pairs, nb_workers, |rank, pair: &GenomePair| {
        log::trace!("worker {} takes pair {} {}", rank, pair.get_reference().get_name(), pair.get_query().get_name());
        process_pair(aligner, pair)
    })?;
    log::info!("gathered {} results", results.len());
    //
    Ok(SimilarityMatrix::from_results(&results))
} // end of compute_matrix

/// full run: computes the matrix and writes it where params ask for
pub fn run<A>(params: &HybridParams, aligner: &A) -> Result<SimilarityMatrix>
where
    A: Aligner + ?Sized,
{
    let start_t = SystemTime::now();
    let cpu_start = ProcessTime::now();
    let nb_workers = params.get_computing_params().get_nb_workers();
    log::info!("Starting analysis. Number of workers: {}", nb_workers);
    //
    let matrix = compute_matrix(
        params.get_genome_dir(),
        params.get_align_params().get_min_cluster(),
        nb_workers,
        aligner,
    )?;
    matrix.dump(params.get_matrix_path())?;
    //
    let elapsed = start_t.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    log::info!(
        "Analysis complete, similarity matrix written to {:?}, system time(s) : {}, cpu time(s) : {}",
        params.get_matrix_path(),
        elapsed,
        cpu_start.elapsed().as_secs()
    );
    Ok(matrix)
} // end of run
