//! whole pipeline driven by a fake aligner returning canned show-coords reports

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use dnahybrid::errors::{HybridError, Result};
use dnahybrid::hybridise::{compute_matrix, run};
use dnahybrid::nucmer::aligner::Aligner;
use dnahybrid::utils::files::GenomePair;
use dnahybrid::utils::parameters::{AlignParams, ComputingParams, HybridParams};

const REPORT_HEAD: &str = "/tmp/ref.fa\t/tmp/query.fa\nNUCMER\n\n[S1]\t[E1]\t[S2]\t[E2]\t[LEN 1]\t[LEN 2]\t[% IDY]\t[LEN R]\t[LEN Q]\t[COV R]\t[COV Q]\t[TAGS]\n";

fn coords_line(start: u64, end: u64, contig: &str) -> String {
    let len = end - start + 1;
    format!(
        "{}\t{}\t1\t{}\t{}\t{}\t100.00\t10000\t10000\t10.00\t10.00\t{}\tqcontig\n",
        start, end, len, len, len, contig
    )
}

/// aligns only pairs listed in shared, other pairs get a report without data line
struct FakeAligner {
    shared: Vec<(String, String, String)>,
    nb_calls: AtomicUsize,
}

impl FakeAligner {
    fn new(shared: Vec<(&str, &str, String)>) -> Self {
        FakeAligner {
            shared: shared
                .into_iter()
                .map(|(a, b, r)| (a.to_string(), b.to_string(), r))
                .collect(),
            nb_calls: AtomicUsize::new(0),
        }
    }
}

impl Aligner for FakeAligner {
    fn align(&self, pair: &GenomePair) -> Result<String> {
        self.nb_calls.fetch_add(1, Ordering::SeqCst);
        let r = pair.get_reference().get_name();
        let q = pair.get_query().get_name();
        for (a, b, report) in &self.shared {
            if (a == r && b == q) || (a == q && b == r) {
                return Ok(format!("{}{}", REPORT_HEAD, report));
            }
        }
        Ok(String::from(REPORT_HEAD))
    }
}

/// fails on one pair
struct FailingAligner;

impl Aligner for FailingAligner {
    fn align(&self, pair: &GenomePair) -> Result<String> {
        if pair.get_query().get_name() == "C" {
            return Err(HybridError::Alignment {
                reference: pair.get_reference().get_name().to_string(),
                query: pair.get_query().get_name().to_string(),
                msg: String::from("nucmer exited with 1"),
            });
        }
        Ok(String::from(REPORT_HEAD))
    }
}

fn write_genome(dir: &Path, name: &str, nb_bases: usize) {
    let mut content = String::from(">contig1\n");
    let line = "ACGTACGTAC".repeat(10);
    for _ in 0..(nb_bases / 100) {
        content.push_str(&line);
        content.push('\n');
    }
    fs::write(dir.join(name), content).unwrap();
}

fn three_genomes() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    for name in ["C", "A", "B"] {
        write_genome(dir.path(), name, 10_000);
    }
    dir
}

fn params(genome_dir: &Path, matrix: PathBuf, nb_workers: usize) -> HybridParams {
    let align = AlignParams::new(
        PathBuf::from("nucmer"),
        PathBuf::from("show-coords"),
        100,
        std::env::temp_dir(),
    );
    HybridParams::new(genome_dir.to_path_buf(), matrix, align, ComputingParams::new(nb_workers))
}

// rows of a matrix file, cells parsed as floats (None for empty cells)
fn read_matrix(path: &Path) -> (Vec<String>, Vec<(String, Vec<Option<f64>>)>) {
    let text = fs::read_to_string(path).unwrap();
    let mut lines = text.lines();
    let header: Vec<String> = lines.next().unwrap().split(',').map(|s| s.to_string()).collect();
    let rows = lines
        .map(|l| {
            let mut fields = l.split(',');
            let name = fields.next().unwrap().to_string();
            let cells = fields
                .map(|c| if c.is_empty() { None } else { Some(c.parse::<f64>().unwrap()) })
                .collect();
            (name, cells)
        })
        .collect();
    (header, rows)
}

#[test]
fn one_shared_region_among_three_genomes() {
    let genomes = three_genomes();
    let out = tempdir().unwrap();
    let matrix_path = out.path().join("matrix.txt");
    let aligner = FakeAligner::new(vec![("A", "B", coords_line(1, 1000, "contig1"))]);
    //
    let matrix = run(&params(genomes.path(), matrix_path.clone(), 2), &aligner).unwrap();
    assert_eq!(aligner.nb_calls.load(Ordering::SeqCst), 3);
    assert!((matrix.get("A", "B").unwrap() - 0.01).abs() < 1.0e-12);
    assert!((matrix.get("B", "A").unwrap() - 0.01).abs() < 1.0e-12);
    assert_eq!(matrix.get("A", "C"), Some(0.));
    //
    let (header, rows) = read_matrix(&matrix_path);
    assert_eq!(header, vec!["A", "B", "C"]);
    assert_eq!(rows.len(), 3);
    for (i, (name, cells)) in rows.iter().enumerate() {
        assert_eq!(name, &header[i]);
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[i], Some(1.));
        for j in 0..3 {
            assert_eq!(cells[j], rows[j].1[i]);
        }
    }
    assert!((rows[0].1[1].unwrap() - 0.01).abs() < 1.0e-12);
    assert_eq!(rows[0].1[2], Some(0.));
    assert_eq!(rows[1].1[2], Some(0.));
}

#[test]
fn overlapping_records_are_counted_once() {
    let genomes = three_genomes();
    let report = format!("{}{}", coords_line(1, 500, "contig1"), coords_line(300, 800, "contig1"));
    let aligner = FakeAligner::new(vec![("B", "C", report)]);
    let matrix = compute_matrix(genomes.path(), 100, 3, &aligner).unwrap();
    let expected = (800. / 10000.) * (800. / 10000.);
    assert!((matrix.get("C", "B").unwrap() - expected).abs() < 1.0e-12);
}

#[test]
fn matrix_does_not_depend_on_worker_count() {
    let dir = tempdir().unwrap();
    for (i, name) in ["g1", "g2", "g3", "g4", "g5", "g6"].iter().enumerate() {
        write_genome(dir.path(), name, 1000 * (i + 1));
    }
    let aligner = FakeAligner::new(vec![
        ("g1", "g2", coords_line(1, 300, "x")),
        ("g2", "g5", coords_line(10, 900, "y")),
        ("g6", "g3", coords_line(1, 200, "z") + &coords_line(150, 250, "z")),
    ]);
    let reference = compute_matrix(dir.path(), 100, 1, &aligner).unwrap();
    for nb_workers in [2, 3, 7, 32] {
        let matrix = compute_matrix(dir.path(), 100, nb_workers, &aligner).unwrap();
        assert_eq!(matrix.get_names(), reference.get_names());
        for a in reference.get_names() {
            for b in reference.get_names() {
                assert_eq!(matrix.get(a, b), reference.get(a, b));
            }
        }
    }
}

#[test]
fn bad_fasta_aborts_before_alignment() {
    let genomes = three_genomes();
    fs::write(genomes.path().join("D"), ">only_header\n").unwrap();
    let aligner = FakeAligner::new(vec![]);
    let res = compute_matrix(genomes.path(), 100, 2, &aligner);
    assert!(matches!(res, Err(HybridError::Format { .. })));
    assert_eq!(aligner.nb_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn empty_directory_is_an_error() {
    let dir = tempdir().unwrap();
    let aligner = FakeAligner::new(vec![]);
    let res = compute_matrix(dir.path(), 100, 2, &aligner);
    assert!(matches!(res, Err(HybridError::EmptyInput(_))));
}

#[test]
fn failed_alignment_writes_no_matrix() {
    let genomes = three_genomes();
    let out = tempdir().unwrap();
    let matrix_path = out.path().join("matrix.txt");
    let res = run(&params(genomes.path(), matrix_path.clone(), 2), &FailingAligner);
    assert!(matches!(res, Err(HybridError::Alignment { .. })));
    assert!(!matrix_path.exists());
}
