//! running nucmer and show-coords on a genome pair.
//!
//! The aligner is behind the trait [Aligner] so the rest of the pipeline can be driven
//! by anything producing a `show-coords -rclT` like report.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::errors::{HybridError, Result};
use crate::nucmer::workspace::ScratchWorkspace;
use crate::utils::files::GenomePair;
use crate::utils::parameters::AlignParams;

pub const NUCMER: &str = "nucmer";
pub const SHOW_COORDS: &str = "show-coords";

/// nucmer default output prefix gives this delta file
const DELTA_FILE: &str = "out.delta";
const NUCMER_LOG: &str = "nucmer.log";

/// produces the coordinate report of a pair.
/// Must be Sync as one aligner is shared by all workers.
pub trait Aligner: Sync {
    fn align(&self, pair: &GenomePair) -> Result<String>;
}

/// get full path of a program, either given explicitly or searched in PATH
pub fn resolve_program(name: &str, explicit: Option<&Path>) -> Result<PathBuf> {
    let target = match explicit {
        Some(path) => path.as_os_str().to_os_string(),
        None => name.into(),
    };
    which::which(&target).map_err(|e| {
        log::error!("cannot find program {} ({:?})", name, target);
        HybridError::MissingDependency {
            program: name.to_string(),
            msg: e.to_string(),
        }
    })
} // end of resolve_program

//=====================================================================================

pub struct NucmerAligner {
    params: AlignParams,
}

impl NucmerAligner {
    pub fn new(params: AlignParams) -> Self {
        NucmerAligner { params }
    }

    /// checks nucmer and show-coords are runnable before any work is scheduled
    pub fn check_dependencies(&self) -> Result<()> {
        let nucmer = resolve_program(NUCMER, Some(self.params.get_nucmer()))?;
        let showcoords = resolve_program(SHOW_COORDS, Some(self.params.get_showcoords()))?;
        log::info!("using {:?} and {:?}", nucmer, showcoords);
        Ok(())
    }

    pub fn get_params(&self) -> &AlignParams {
        &self.params
    }

    fn failure(pair: &GenomePair, msg: String) -> HybridError {
        HybridError::Alignment {
            reference: pair.get_reference().get_name().to_string(),
            query: pair.get_query().get_name().to_string(),
            msg,
        }
    }

    // runs the two tools in workspace, returns show-coords output
    fn run_in(&self, workspace: &ScratchWorkspace, pair: &GenomePair) -> Result<String> {
        let wdir = workspace.get_path();
        let ref_local = workspace.stage(pair.get_reference().get_path())?;
        let query_local = workspace.stage(pair.get_query().get_path())?;
        if ref_local == query_local {
            return Err(Self::failure(pair, String::from("reference and query have the same file name")));
        }
        //
        let log_file = File::create(wdir.join(NUCMER_LOG))?;
        log::debug!(
            "running {:?} -maxmatch -c {} {:?} {:?} in {:?}",
            self.params.get_nucmer(),
            pair.get_min_cluster(),
            ref_local,
            query_local,
            wdir
        );
        let status = Command::new(self.params.get_nucmer())
            .current_dir(wdir)
            .arg("-maxmatch")
            .arg("-c")
            .arg(pair.get_min_cluster().to_string())
            .arg(&ref_local)
            .arg(&query_local)
            .stdout(Stdio::null())
            .stderr(Stdio::from(log_file))
            .status()?;
        if !status.success() {
            let log_content = fs::read_to_string(wdir.join(NUCMER_LOG)).unwrap_or_default();
            return Err(Self::failure(pair, format!("nucmer exited with {} : {}", status, log_content.trim())));
        }
        if !wdir.join(DELTA_FILE).is_file() {
            return Err(Self::failure(pair, format!("nucmer did not produce {}", DELTA_FILE)));
        }
        //
        let output = Command::new(self.params.get_showcoords())
            .current_dir(wdir)
            .arg("-rclT")
            .arg(DELTA_FILE)
            .output()?;
        if !output.status.success() {
            return Err(Self::failure(
                pair,
                format!(
                    "show-coords exited with {} : {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }
        let report = String::from_utf8_lossy(&output.stdout).to_string();
        if report.trim().is_empty() {
            return Err(Self::failure(pair, String::from("show-coords produced an empty report")));
        }
        Ok(report)
    } // end of run_in
} // end of impl NucmerAligner

impl Aligner for NucmerAligner {
    fn align(&self, pair: &GenomePair) -> Result<String> {
        let tag = std::process::id().to_string();
        let workspace = ScratchWorkspace::new(self.params.get_scratch_dir(), &tag)?;
        // workspace is dropped, hence removed, on all paths out of here
        self.run_in(&workspace, pair)
    }
} // end of impl Aligner for NucmerAligner

//=====================================================================================

// end of mod tests
