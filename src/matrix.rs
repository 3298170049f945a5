//! similarity matrix assembly.
//!
//! Results come back from workers in no useful order and each unordered pair is computed once,
//! with one of its genomes as reference. The matrix is keyed by the sorted genome names so it can be
//! queried in both orientations. The diagonal is always 1.

use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// score of one pair
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    ref_name: String,
    query_name: String,
    score: f64,
}

impl SimilarityResult {
    pub fn new(ref_name: String, query_name: String, score: f64) -> Self {
        SimilarityResult {
            ref_name,
            query_name,
            score,
        }
    }

    pub fn get_ref_name(&self) -> &str {
        &self.ref_name
    }

    pub fn get_query_name(&self) -> &str {
        &self.query_name
    }

    pub fn get_score(&self) -> f64 {
        self.score
    }
} // end of impl SimilarityResult

//=================================================================================

// key with names in lexicographic order
fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

pub struct SimilarityMatrix {
    /// sorted names, gives row and column order
    names: Vec<String>,
    scores: HashMap<(String, String), f64>,
}

impl SimilarityMatrix {
    /// collects names and scores. Order of results does not matter.
    /// If a pair appears more than once the last score is kept.
    pub fn from_results(results: &[SimilarityResult]) -> Self {
        let mut names = BTreeSet::<String>::new();
        let mut scores = HashMap::<(String, String), f64>::with_capacity(results.len());
        for res in results {
            names.insert(res.get_ref_name().to_string());
            names.insert(res.get_query_name().to_string());
            if res.get_ref_name() == res.get_query_name() {
                log::warn!("ignoring self score for {}", res.get_ref_name());
                continue;
            }
            let key = pair_key(res.get_ref_name(), res.get_query_name());
            if let Some(old) = scores.insert(key, res.get_score()) {
                log::warn!(
                    "pair {} {} seen twice, score {} replaced by {}",
                    res.get_ref_name(),
                    res.get_query_name(),
                    old,
                    res.get_score()
                );
            }
        }
        SimilarityMatrix {
            names: names.into_iter().collect(),
            scores,
        }
    } // end of from_results

    pub fn get_names(&self) -> &[String] {
        &self.names
    }

    pub fn get_dim(&self) -> usize {
        self.names.len()
    }

    /// score of a pair in any orientation, 1. on the diagonal, None if not computed
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        if a == b {
            if self.names.binary_search_by(|n| n.as_str().cmp(a)).is_ok() {
                return Some(1.);
            }
            return None;
        }
        self.scores.get(&pair_key(a, b)).copied()
    }

    // text of a cell
    fn cell(&self, row: usize, col: usize) -> String {
        if row == col {
            return String::from("1");
        }
        match self.get(&self.names[row], &self.names[col]) {
            Some(score) => format!("{}", score),
            None => String::new(),
        }
    }

    /// header line of names, then for each row its name and cells, comma separated
    pub fn write_csv<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);
        if self.names.is_empty() {
            log::warn!("no result, writing an empty matrix");
            writer.flush()?;
            return Ok(());
        }
        writer.write_record(&self.names)?;
        for row in 0..self.names.len() {
            let mut record = Vec::<String>::with_capacity(self.names.len() + 1);
            record.push(self.names[row].clone());
            for col in 0..self.names.len() {
                record.push(self.cell(row, col));
            }
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    } // end of write_csv

    pub fn dump(&self, path: &Path) -> Result<()> {
        log::info!("dumping similarity matrix of dim {} in {:?}", self.get_dim(), path);
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))
    }
} // end of impl SimilarityMatrix

//=================================================================================

// end of mod tests
