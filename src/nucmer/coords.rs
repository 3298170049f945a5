//! parsing of show-coords -rclT reports and similarity score.
//!
//! A data line has 13 tab separated fields:
//! `S1 E1 S2 E2 LEN1 LEN2 %IDY LENR LENQ COVR COVQ TAGR TAGQ`.
//! We use the reference side: start, end, identity, contig length and contig tag.
//! Coverage of a contig is the number of distinct positions in the union of its aligned ranges,
//! and the score of a pair is the product of the covered fraction of each genome.

use std::collections::BTreeMap;

const NB_COORDS_FIELDS: usize = 13;

/// one aligned segment on the reference
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateRecord {
    contig: String,
    /// 1-based inclusive, start <= end
    start: u64,
    end: u64,
    contig_len: u64,
    identity: f64,
}

impl CoordinateRecord {
    pub fn new(contig: String, start: u64, end: u64, contig_len: u64, identity: f64) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        CoordinateRecord {
            contig,
            start,
            end,
            contig_len,
            identity,
        }
    }

    /// parses a report line, None if it is not a data line
    pub fn from_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.trim().split('\t').collect();
        if fields.len() != NB_COORDS_FIELDS {
            return None;
        }
        let start = fields[0].trim().parse::<u64>().ok()?;
        let end = fields[1].trim().parse::<u64>().ok()?;
        let identity = fields[6].trim().parse::<f64>().ok()?;
        let contig_len = fields[7].trim().parse::<u64>().ok()?;
        let contig = fields[11].trim().to_string();
        Some(CoordinateRecord::new(contig, start, end, contig_len, identity))
    }

    pub fn get_contig(&self) -> &str {
        &self.contig
    }

    pub fn get_start(&self) -> u64 {
        self.start
    }

    pub fn get_end(&self) -> u64 {
        self.end
    }

    pub fn get_contig_len(&self) -> u64 {
        self.contig_len
    }

    pub fn get_identity(&self) -> f64 {
        self.identity
    }
} // end of impl CoordinateRecord

/// extracts all data lines of a report. Other lines (file names, NUCMER tag, column header) are skipped.
pub fn parse_report(report: &str) -> Vec<CoordinateRecord> {
    let mut records = Vec::<CoordinateRecord>::new();
    let mut nb_skipped = 0;
    for line in report.lines() {
        match CoordinateRecord::from_line(line) {
            Some(record) => records.push(record),
            None => nb_skipped += 1,
        }
    }
    log::trace!("parse_report nb records : {}, nb lines skipped : {}", records.len(), nb_skipped);
    records
} // end of parse_report

//=================================================================================

/// number of distinct integer positions in the union of inclusive ranges.
/// Ranges are sorted by start and swept, overlapping or contiguous ones merged.
pub fn union_length(ranges: &mut [(u64, u64)]) -> u64 {
    if ranges.is_empty() {
        return 0;
    }
    ranges.sort_unstable();
    let mut total = 0;
    let (mut cur_start, mut cur_end) = ranges[0];
    for &(start, end) in ranges.iter().skip(1) {
        if start <= cur_end.saturating_add(1) {
            cur_end = cur_end.max(end);
        } else {
            total += cur_end - cur_start + 1;
            cur_start = start;
            cur_end = end;
        }
    }
    total += cur_end - cur_start + 1;
    total
} // end of union_length

/// total covered positions, contig by contig
pub fn covered_length(records: &[CoordinateRecord]) -> u64 {
    let mut by_contig = BTreeMap::<&str, Vec<(u64, u64)>>::new();
    for record in records {
        by_contig
            .entry(record.get_contig())
            .or_default()
            .push((record.get_start(), record.get_end()));
    }
    let mut covered = 0;
    for (contig, ranges) in by_contig.iter_mut() {
        let contig_covered = union_length(ranges);
        log::trace!("contig {} nb ranges : {}, covered : {}", contig, ranges.len(), contig_covered);
        covered += contig_covered;
    }
    covered
} // end of covered_length

/// (covered / ref_size) * (covered / query_size).
/// sizes are positive, enforced by fasta sizing.
pub fn similarity(covered: u64, ref_size: usize, query_size: usize) -> f64 {
    let ref_fraction = covered as f64 / ref_size as f64;
    let query_fraction = covered as f64 / query_size as f64;
    ref_fraction * query_fraction
}

/// score of a report, 0. if the report has no data line
pub fn score_report(report: &str, ref_size: usize, query_size: usize) -> f64 {
    let records = parse_report(report);
    if records.is_empty() {
        log::debug!("no alignment record in report");
        return 0.;
    }
    let covered = covered_length(&records);
    let score = similarity(covered, ref_size, query_size);
    log::debug!(
        "nb records : {}, covered : {}, ref size : {}, query size : {}, score : {:.3e}",
        records.len(),
        covered,
        ref_size,
        query_size,
        score
    );
    score
} // end of score_report

//=================================================================================

// end of mod tests
