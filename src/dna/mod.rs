//! dna file processing

pub mod dnafiles;
