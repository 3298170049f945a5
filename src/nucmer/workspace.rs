//! scratch directory in which one aligner run takes place.
//!
//! nucmer writes its delta and log files in its current directory, so each invocation gets
//! its own directory, with a random name so that concurrent workers never share one.
//! The directory and everything in it is removed when the guard is dropped, whatever
//! the outcome of the alignment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// prefix of scratch directory names
const SCRATCH_PREFIX: &str = "temp_";

/// number of random characters in scratch directory names
const SCRATCH_RAND_LEN: usize = 10;

pub struct ScratchWorkspace {
    path: PathBuf,
    // Option so that drop can take it and report removal errors
    dir: Option<TempDir>,
}

impl ScratchWorkspace {
    /// creates a uniquely named directory under root.
    /// tag is added to the name to ease debugging, uniqueness comes from the random part.
    pub fn new(root: &Path, tag: &str) -> io::Result<Self> {
        let prefix = if tag.is_empty() {
            String::from(SCRATCH_PREFIX)
        } else {
            format!("{}{}_", SCRATCH_PREFIX, tag)
        };
        let dir = tempfile::Builder::new()
            .prefix(&prefix)
            .rand_bytes(SCRATCH_RAND_LEN)
            .tempdir_in(root)?;
        let path = dir.path().to_path_buf();
        log::debug!("created scratch workspace {:?}", path);
        Ok(ScratchWorkspace { path, dir: Some(dir) })
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    /// copies file into workspace, returns the name of the copy relative to the workspace
    pub fn stage(&self, file: &Path) -> io::Result<PathBuf> {
        let name = match file.file_name() {
            Some(name) => PathBuf::from(name),
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("cannot stage {:?}, no file name", file),
                ))
            }
        };
        fs::copy(file, self.path.join(&name))?;
        log::trace!("staged {:?} in {:?}", file, self.path);
        Ok(name)
    }
} // end of impl ScratchWorkspace

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => log::debug!("removed scratch workspace {:?}", self.path),
                Err(e) => log::warn!("could not remove scratch workspace {:?} : {}", self.path, e),
            }
        }
    }
} // end of impl Drop for ScratchWorkspace

//=============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn workspace_is_removed_on_drop() {
        let root = tempdir().unwrap();
        let ws_path;
        {
            let ws = ScratchWorkspace::new(root.path(), "w0").unwrap();
            ws_path = ws.get_path().to_path_buf();
            assert!(ws_path.is_dir());
            fs::write(ws_path.join("out.delta"), "data").unwrap();
        }
        assert!(!ws_path.exists());
    }

    #[test]
    fn workspace_removed_on_error_path() {
        fn failing(root: &Path) -> io::Result<PathBuf> {
            let ws = ScratchWorkspace::new(root, "")?;
            let p = ws.get_path().to_path_buf();
            ws.stage(&root.join("does_not_exist.fa")).map(|_| p)
        }
        let root = tempdir().unwrap();
        assert!(failing(root.path()).is_err());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn names_do_not_collide() {
        let root = tempdir().unwrap();
        let w1 = ScratchWorkspace::new(root.path(), "same").unwrap();
        let w2 = ScratchWorkspace::new(root.path(), "same").unwrap();
        assert_ne!(w1.get_path(), w2.get_path());
        let name = w1.get_path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("temp_same_"));
    }

    #[test]
    fn stage_copies_file() {
        let root = tempdir().unwrap();
        let src = root.path().join("g1.fa");
        fs::write(&src, ">c\nACGT\n").unwrap();
        let ws = ScratchWorkspace::new(root.path(), "").unwrap();
        let local = ws.stage(&src).unwrap();
        assert_eq!(local, PathBuf::from("g1.fa"));
        assert_eq!(fs::read_to_string(ws.get_path().join(local)).unwrap(), ">c\nACGT\n");
    }
} // end of mod tests
