//! dnahybridise --genomes [-g] dir [--output [-o] matrix.txt] [--mincluster [-c] 100] [--workers [-w] n]
//!
//! --genomes : directory containing one fasta file per genome. Mandatory.
//!
//! --output : file where the similarity matrix is written, default matrix.txt
//!
//! --mincluster : minimum cluster size passed to nucmer (option -c), default 100
//!
//! --workers : number of workers processing pairs, default to number of cpus
//!
//! --nucmer, --showcoords : path to the MUMmer programs if they are not in PATH
//!
//! --scratch : directory where each alignment gets its temporary directory, default system temp dir
//!
//! --dump : also writes the run parameters in json next to the matrix (matrix.txt.params.json)
//!
//! The matrix is a comma separated file: a header line of sorted genome names,
//! then one line per genome with its name and its similarity to each genome.

use clap::builder::RangedU64ValueParser;
use clap::{Arg, ArgAction, ArgMatches, Command};

use std::path::{Path, PathBuf};

// for logging (debug mostly, switched at compile time in cargo.toml)
use env_logger::Builder;

use dnahybrid::hybridise;
use dnahybrid::nucmer::aligner::{NucmerAligner, NUCMER, SHOW_COORDS};
use dnahybrid::utils::parameters::*;

// install a logger facility
pub fn init_log() -> u64 {
    Builder::from_default_env().init();
    log::debug!("logger initialized");
    1
}

#[doc(hidden)]
fn parse_hybridise(matches: &ArgMatches) -> Result<HybridParams, anyhow::Error> {
    log::debug!("in parse_hybridise");
    //
    let genome_dir = matches
        .get_one::<PathBuf>("genomes")
        .ok_or_else(|| anyhow::anyhow!("--genomes is mandatory"))?;
    if !genome_dir.is_dir() {
        anyhow::bail!("error not a directory : {:?}", genome_dir);
    }
    let matrix_path = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MATRIX_FILE));
    let min_cluster = *matches.get_one::<usize>("mincluster").unwrap_or(&DEFAULT_MIN_CLUSTER);
    log::info!("nucmer minimum cluster size : {}", min_cluster);
    //
    let computing = match matches.get_one::<usize>("workers") {
        Some(nb_workers) => ComputingParams::new(*nb_workers),
        None => ComputingParams::default(),
    };
    // bare names are searched in PATH by NucmerAligner::check_dependencies
    let nucmer = matches
        .get_one::<PathBuf>("nucmer")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(NUCMER));
    let showcoords = matches
        .get_one::<PathBuf>("showcoords")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(SHOW_COORDS));
    let scratch_dir = match matches.get_one::<PathBuf>("scratch") {
        Some(dir) => dir.clone(),
        None => std::env::temp_dir(),
    };
    if !scratch_dir.is_dir() {
        anyhow::bail!("scratch directory {:?} does not exist", scratch_dir);
    }
    //
    let align = AlignParams::new(nucmer, showcoords, min_cluster, scratch_dir);
    Ok(HybridParams::new(genome_dir.clone(), matrix_path, align, computing))
} // end of parse_hybridise

fn run(matches: &ArgMatches) -> Result<(), anyhow::Error> {
    let params = parse_hybridise(matches)?;
    if matches.get_flag("dump") {
        params.dump_json(&params.default_dump_path())?;
    }
    let aligner = NucmerAligner::new(params.get_align_params().clone());
    // programs are checked before anything is scheduled
    aligner.check_dependencies()?;
    hybridise::run(&params, &aligner)?;
    Ok(())
}

fn main() {
    let _ = init_log();
    let start_t = chrono::Local::now();
    log::info!("dnahybridise begins at time:{:#?}", start_t);
    //
    let matches = Command::new("dnahybridise")
        .about("All pairs genome similarity matrix from nucmer alignments")
        .version("0.1.0")
        .arg(
            Arg::new("genomes")
                .short('g')
                .long("genomes")
                .value_name("DIR")
                .help("A path to the directory of genomes for analysis")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("The similarity matrix file (default matrix.txt)")
                .default_value(DEFAULT_MATRIX_FILE)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("mincluster")
                .short('c')
                .long("mincluster")
                .value_name("INT")
                .help("Minimum cluster size for nucmer (default 100)")
                .default_value("100")
                .value_parser(RangedU64ValueParser::<usize>::new().range(1..)),
        )
        .arg(
            Arg::new("workers")
                .short('w')
                .long("workers")
                .value_name("INT")
                .help("Number of workers (default number of cpus)")
                .value_parser(RangedU64ValueParser::<usize>::new().range(1..)),
        )
        .arg(
            Arg::new("nucmer")
                .long("nucmer")
                .value_name("PATH")
                .help("Path to nucmer if not in PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("showcoords")
                .long("showcoords")
                .value_name("PATH")
                .help("Path to show-coords if not in PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("scratch")
                .long("scratch")
                .value_name("DIR")
                .help("Directory for temporary alignment directories (default system temp dir)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("dump")
                .long("dump")
                .help("Dump run parameters in json next to the matrix")
                .action(ArgAction::SetTrue),
        )
        .get_matches();
    //
    if let Err(e) = run(&matches) {
        log::error!("dnahybridise failed : {:#}", e);
        eprintln!("\nError!: {:#}\n", e);
        std::process::exit(1);
    }
    let matrix_path = matches.get_one::<PathBuf>("output").map(|p| p.as_path()).unwrap_or(Path::new(DEFAULT_MATRIX_FILE));
    eprintln!("\nAnalysis complete, similarity matrix written to {}\n", matrix_path.display());
} // end of main
