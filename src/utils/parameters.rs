//! structures related to processing parameters


use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::to_writer;

use crate::errors::Result;

/// default nucmer minimum cluster size (option -c)
pub const DEFAULT_MIN_CLUSTER: usize = 100;

/// default name of matrix file
pub const DEFAULT_MATRIX_FILE: &str = "matrix.txt";

/// Parameters of an aligner invocation.
/// Tool paths and the directory where scratch workspaces are created are passed
/// explicitly, nothing is taken from the current directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignParams {
    /// path to nucmer executable
    nucmer: PathBuf,
    /// path to show-coords executable
    showcoords: PathBuf,
    /// nucmer -c value
    min_cluster: usize,
    /// directory where scratch workspaces are created
    scratch_dir: PathBuf,
}

impl AlignParams {
    pub fn new(nucmer: PathBuf, showcoords: PathBuf, min_cluster: usize, scratch_dir: PathBuf) -> Self {
        AlignParams {
            nucmer,
            showcoords,
            min_cluster,
            scratch_dir,
        }
    }

    pub fn get_nucmer(&self) -> &Path {
        &self.nucmer
    }

    pub fn get_showcoords(&self) -> &Path {
        &self.showcoords
    }

    pub fn get_min_cluster(&self) -> usize {
        self.min_cluster
    }

    pub fn get_scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }
} // end of impl AlignParams

//======================================================================================

/// parameters driving the distribution of work
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComputingParams {
    /// number of workers, fixed for the run
    nb_workers: usize,
}

impl Default for ComputingParams {
    fn default() -> Self {
        ComputingParams {
            nb_workers: num_cpus::get(),
        }
    }
}

impl ComputingParams {
    pub fn new(nb_workers: usize) -> Self {
        if nb_workers == 0 {
            log::warn!("ComputingParams : asked for 0 worker, using 1");
        }
        ComputingParams {
            nb_workers: nb_workers.max(1),
        }
    }

    pub fn get_nb_workers(&self) -> usize {
        self.nb_workers
    }
} // end of impl ComputingParams

//=========================================================================================

/// Gathers all parameters of a run. Can be dumped in json to keep track of how a matrix was obtained.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HybridParams {
    /// directory containing genomes
    genome_dir: PathBuf,
    /// where the matrix is written
    matrix_path: PathBuf,
    align: AlignParams,
    computing: ComputingParams,
}

impl HybridParams {
    pub fn new(genome_dir: PathBuf, matrix_path: PathBuf, align: AlignParams, computing: ComputingParams) -> Self {
        HybridParams {
            genome_dir,
            matrix_path,
            align,
            computing,
        }
    }

    pub fn get_genome_dir(&self) -> &Path {
        &self.genome_dir
    }

    pub fn get_matrix_path(&self) -> &Path {
        &self.matrix_path
    }

    pub fn get_align_params(&self) -> &AlignParams {
        &self.align
    }

    pub fn get_computing_params(&self) -> &ComputingParams {
        &self.computing
    }

    /// json dump path associated to the matrix file: matrix.txt gives matrix.txt.params.json
    pub fn default_dump_path(&self) -> PathBuf {
        let mut name = self.matrix_path.as_os_str().to_os_string();
        name.push(".params.json");
        PathBuf::from(name)
    }

    pub fn dump_json(&self, filepath: &Path) -> Result<()> {
        log::info!("dumping HybridParams in json file : {:?}", filepath);
        //
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(filepath)
            .map_err(|e| {
                log::error!("HybridParams dump : could not open file {:?}", filepath.as_os_str());
                e
            })?;
        let mut writer = BufWriter::new(file);
        to_writer(&mut writer, &self)?;
        //
        Ok(())
    } // end of dump_json

    pub fn reload_json(filepath: &Path) -> Result<Self> {
        log::info!("in reload_json {:?}", filepath);
        //
        let file = OpenOptions::new().read(true).open(filepath).map_err(|e| {
            log::error!("HybridParams reload_json : could not open file {:?}", filepath.as_os_str());
            e
        })?;
        let reader = BufReader::new(file);
        let params: Self = serde_json::from_reader(reader)?;
        //
        Ok(params)
    } // end of reload_json
} // end of impl HybridParams

//=====================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn some_params() -> HybridParams {
        let align = AlignParams::new(
            PathBuf::from("/usr/bin/nucmer"),
            PathBuf::from("/usr/bin/show-coords"),
            65,
            PathBuf::from("/tmp"),
        );
        HybridParams::new(PathBuf::from("genomes"), PathBuf::from("out/matrix.txt"), align, ComputingParams::new(4))
    }

    #[test]
    fn dump_reload() {
        let dir = tempdir().unwrap();
        let params = some_params();
        let path = dir.path().join("params.json");
        params.dump_json(&path).unwrap();
        let reloaded = HybridParams::reload_json(&path).unwrap();
        assert_eq!(params, reloaded);
        assert_eq!(reloaded.get_align_params().get_min_cluster(), 65);
        assert_eq!(reloaded.get_computing_params().get_nb_workers(), 4);
    }

    #[test]
    fn reload_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(HybridParams::reload_json(&dir.path().join("nothing.json")).is_err());
    }

    #[test]
    fn dump_path_follows_matrix() {
        assert_eq!(some_params().default_dump_path(), PathBuf::from("out/matrix.txt.params.json"));
    }

    #[test]
    fn zero_worker_is_one() {
        assert_eq!(ComputingParams::new(0).get_nb_workers(), 1);
        assert!(ComputingParams::default().get_nb_workers() >= 1);
    }
} // end of mod tests
