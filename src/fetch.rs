//! download of fasta sequences from NCBI by accession id, through the Entrez efetch service.
//!
//! The contact email NCBI asks for is passed explicitly.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{HybridError, Result};

pub const EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

/// default timeout of a request in seconds
pub const DEFAULT_TIMEOUT: u64 = 600;

/// splits a list of ids on commas and whitespace. Empty tokens are dropped,
/// duplicates are reported and kept once.
pub fn split_ids(id_list: &str) -> Vec<String> {
    let mut seen = HashSet::<&str>::new();
    let mut ids = Vec::<String>::new();
    for id in id_list.split(|c: char| c == ',' || c.is_whitespace()) {
        if id.is_empty() {
            continue;
        }
        if !seen.insert(id) {
            log::warn!("accession id {} given more than once, downloading it once", id);
            continue;
        }
        ids.push(id.to_string());
    }
    ids
} // end of split_ids

/// removes output dir if it exists and creates it empty
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        log::info!("removing existing directory {:?}", dir);
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

pub struct EntrezFetcher {
    base_url: String,
    email: String,
    timeout: Duration,
}

impl EntrezFetcher {
    pub fn new(email: &str, timeout_secs: u64) -> Self {
        EntrezFetcher {
            base_url: String::from(EFETCH_URL),
            email: email.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// to query another service (a mirror or a local test server)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    // query values are form encoded by ureq
    fn request(&self, id: &str) -> ureq::Request {
        ureq::get(&self.base_url)
            .timeout(self.timeout)
            .query("db", "nucleotide")
            .query("id", id)
            .query("rettype", "fasta")
            .query("retmode", "text")
            .query("email", &self.email)
    }

    pub fn request_url(&self, id: &str) -> String {
        self.request(id).url().to_string()
    }

    /// returns the fasta text of an accession
    pub fn fetch(&self, id: &str) -> Result<String> {
        let request = self.request(id);
        log::debug!("requesting {}", request.url());
        let response = request
            .call()
            .map_err(|e| HybridError::Download {
                id: id.to_string(),
                msg: e.to_string(),
            })?;
        let text = response.into_string()?;
        if text.trim().is_empty() {
            return Err(HybridError::Download {
                id: id.to_string(),
                msg: String::from("empty answer"),
            });
        }
        Ok(text)
    } // end of fetch

    /// downloads id into output_dir/id
    pub fn download(&self, id: &str, output_dir: &Path) -> Result<PathBuf> {
        log::info!("downloading {}", id);
        let text = self.fetch(id)?;
        let path = output_dir.join(id);
        let mut file = fs::File::create(&path)?;
        file.write_all(text.as_bytes())?;
        Ok(path)
    }

    /// recreates output_dir and downloads all ids in it, stops at first failure
    pub fn download_all(&self, ids: &[String], output_dir: &Path) -> Result<Vec<PathBuf>> {
        prepare_output_dir(output_dir)?;
        let mut paths = Vec::with_capacity(ids.len());
        for id in ids {
            paths.push(self.download(id, output_dir)?);
        }
        log::info!("downloaded {} sequences in {:?}", paths.len(), output_dir);
        Ok(paths)
    }
} // end of impl EntrezFetcher

//=================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn split_on_commas_and_whitespace() {
        let ids = split_ids("NC_000913, NC_002695\tNC_004431\n\nAE005174,,");
        assert_eq!(ids, vec!["NC_000913", "NC_002695", "NC_004431", "AE005174"]);
    }

    #[test]
    fn duplicates_kept_once() {
        assert_eq!(split_ids("A1 B2 A1"), vec!["A1", "B2"]);
        assert!(split_ids(" , ").is_empty());
    }

    #[test]
    fn output_dir_is_recreated() {
        let root = tempdir().unwrap();
        let out = root.path().join("genomes");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("old.fa"), ">x\nA\n").unwrap();
        prepare_output_dir(&out).unwrap();
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
        // also works when absent
        let other = root.path().join("new");
        prepare_output_dir(&other).unwrap();
        assert!(other.is_dir());
    }

    #[test]
    fn url_carries_id_and_email() {
        let fetcher = EntrezFetcher::new("me@lab.org", 10).with_base_url("http://localhost/efetch");
        assert_eq!(
            fetcher.request_url("NC_000913"),
            "http://localhost/efetch?db=nucleotide&id=NC_000913&rettype=fasta&retmode=text&email=me%40lab.org"
        );
    }

    #[test]
    fn url_values_are_encoded() {
        let fetcher = EntrezFetcher::new("me+lab@x.org&db=protein", 10).with_base_url("http://localhost/efetch");
        let url = fetcher.request_url("NC 1");
        assert_eq!(
            url,
            "http://localhost/efetch?db=nucleotide&id=NC+1&rettype=fasta&retmode=text&email=me%2Blab%40x.org%26db%3Dprotein"
        );
        assert_eq!(url.matches("db=").count(), 1);
    }

    #[test]
    fn unreachable_server_is_download_error() {
        // nothing listens on port 9 of localhost in a test environment
        let fetcher = EntrezFetcher::new("me@lab.org", 2).with_base_url("http://127.0.0.1:9/efetch");
        assert!(matches!(fetcher.fetch("X"), Err(HybridError::Download { .. })));
    }
} // end of mod tests
