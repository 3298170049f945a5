//! dnahybrid computes an all pairs similarity matrix of genomes by in silico dna hybridisation.
//!
//! Each pair of genomes in a directory is aligned with MUMmer (nucmer -maxmatch then show-coords),
//! the aligned ranges on the reference are merged contig by contig and the similarity of the pair is
//! the product of the covered fraction of each genome.
//! Pairs are distributed round-robin over a fixed number of workers and the scores gathered
//! in a symmetric matrix with unit diagonal.
//!
//! The crate also provides the download of genomes from NCBI by accession id (module [fetch]).

pub mod distribute;
pub mod dna;
pub mod errors;
pub mod fetch;
pub mod hybridise;
pub mod matrix;
pub mod nucmer;
pub mod utils;
