//! getgenome --ids [-i] "id1,id2 id3" --output [-o] dir --email [-e] address
//!
//! Downloads nucleotide fasta sequences from NCBI, one file per accession id, named after the id.
//! The output directory is removed and recreated. All options are mandatory.

use clap::{Arg, ArgMatches, Command};

use std::path::PathBuf;

use env_logger::Builder;

use dnahybrid::fetch::{split_ids, EntrezFetcher, DEFAULT_TIMEOUT};

pub fn init_log() -> u64 {
    Builder::from_default_env().init();
    log::debug!("logger initialized");
    1
}

fn run(matches: &ArgMatches) -> Result<(), anyhow::Error> {
    let id_list = matches
        .get_one::<String>("ids")
        .ok_or_else(|| anyhow::anyhow!("--ids is mandatory"))?;
    let output_dir = matches
        .get_one::<PathBuf>("output")
        .ok_or_else(|| anyhow::anyhow!("--output is mandatory"))?;
    let email = matches
        .get_one::<String>("email")
        .ok_or_else(|| anyhow::anyhow!("--email is mandatory"))?;
    let timeout = *matches.get_one::<u64>("timeout").unwrap_or(&DEFAULT_TIMEOUT);
    //
    let ids = split_ids(id_list);
    if ids.is_empty() {
        anyhow::bail!("no accession id in {:?}", id_list);
    }
    log::info!("nb ids to download : {}", ids.len());
    let fetcher = EntrezFetcher::new(email, timeout);
    fetcher.download_all(&ids, output_dir)?;
    Ok(())
}

fn main() {
    let _ = init_log();
    //
    let matches = Command::new("getgenome")
        .about("Download fasta formated dna sequences given their accession numbers")
        .version("0.1.0")
        .arg(
            Arg::new("ids")
                .short('i')
                .long("ids")
                .value_name("IDS")
                .help("A list of accession ids to download, comma or space separated")
                .required(true)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory for downloaded sequences")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("email")
                .short('e')
                .long("email")
                .value_name("EMAIL")
                .help("An email address that is needed by the NCBI")
                .required(true)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECS")
                .help("Timeout of each download in seconds (default 600)")
                .default_value("600")
                .value_parser(clap::value_parser!(u64)),
        )
        .get_matches();
    //
    if let Err(e) = run(&matches) {
        log::error!("getgenome failed : {:#}", e);
        eprintln!("\nError!: {:#}\n", e);
        std::process::exit(1);
    }
} // end of main
