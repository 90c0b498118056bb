//! Readers for the reference, interval and cytoband files.

use crate::cytoband::CytobandRecord;
use crate::error::{IdeogramError, Result};
use crate::genome::ChromosomeCatalog;
use crate::interval::{Interval, RawInterval};
use log::{info, warn};
use noodles::fasta::{self, fai};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| IdeogramError::io(path, e))?;
    Ok(BufReader::new(file))
}

/// Calls `f` with the 1-based line number and content of each line.
fn for_each_line(path: &Path, mut f: impl FnMut(usize, &str)) -> Result<()> {
    let reader = open(path)?;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| IdeogramError::io(path, e))?;
        f(idx + 1, line.trim_end_matches(['\r', '\n']));
    }
    Ok(())
}

/// `ref.fa` -> `ref.fa.fai`
fn fai_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".fai");
    PathBuf::from(s)
}

/// Load sequence lengths for a FASTA reference, from its `.fai` index when
/// one sits next to it, otherwise by scanning the sequences.
pub fn read_chrom_lengths(path: &Path) -> Result<ChromosomeCatalog> {
    let fai = fai_path(path);
    let catalog = if fai.is_file() {
        info!("Loading sequence lengths from {:?}...", fai);
        read_fai(&fai)?
    } else {
        info!("Scanning reference {:?}...", path);
        scan_fasta(path)?
    };
    if catalog.is_empty() {
        warn!("No sequences found in {:?}", path);
    } else {
        info!("Found {} reference sequences", catalog.len());
    }
    Ok(catalog)
}

fn read_fai(path: &Path) -> Result<ChromosomeCatalog> {
    let index = fai::io::Reader::new(open(path)?)
        .read_index()
        .map_err(|e| IdeogramError::io(path, e))?;
    let records: Vec<fai::Record> = index.into();

    let mut catalog = ChromosomeCatalog::new();
    for rec in records {
        catalog.insert(String::from_utf8_lossy(rec.name()), rec.length());
    }
    Ok(catalog)
}

fn scan_fasta(path: &Path) -> Result<ChromosomeCatalog> {
    let mut reader = fasta::io::Reader::new(open(path)?);
    let mut catalog = ChromosomeCatalog::new();

    for result in reader.records() {
        let rec = result.map_err(|e| IdeogramError::io(path, e))?;
        catalog.insert(String::from_utf8_lossy(rec.name()), rec.sequence().len() as u64);
    }
    Ok(catalog)
}

fn is_bed_header(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with("track") || line.starts_with("browser")
}

/// Parse `(chrom, start, end)` from the first three tab-separated fields.
fn parse_coords(line: &str) -> Option<(&str, u64, u64, std::str::Split<'_, char>)> {
    let mut fields = line.split('\t');
    let chrom = fields.next()?;
    let start = fields.next()?.trim().parse().ok()?;
    let end = fields.next()?.trim().parse().ok()?;
    Some((chrom, start, end, fields))
}

/// Read BED records. Coordinates are kept as written; validation happens at merge time.
pub fn read_bed(path: &Path) -> Result<Vec<RawInterval>> {
    info!("Loading intervals from {:?}...", path);
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for_each_line(path, |lineno, line| {
        if is_bed_header(line) {
            return;
        }
        match parse_coords(line) {
            Some((chrom, start, end, _)) => records.push(RawInterval { chrom: chrom.to_string(), start, end }),
            None => {
                warn!("Skipping unparseable BED line {}: {}", lineno, line);
                skipped += 1;
            }
        }
    })?;

    info!("Read {} intervals ({} unparseable lines skipped)", records.len(), skipped);
    Ok(records)
}

/// Read a cytoband table (`chrom start end name stain`), keeping row order.
pub fn read_cytobands(path: &Path) -> Result<Vec<CytobandRecord>> {
    info!("Loading cytobands from {:?}...", path);
    let mut records = Vec::new();

    for_each_line(path, |lineno, line| {
        if line.is_empty() || line.starts_with('#') {
            return;
        }
        let Some((chrom, start, end, mut rest)) = parse_coords(line) else {
            warn!("Skipping unparseable cytoband line {}: {}", lineno, line);
            return;
        };
        match Interval::new(chrom, start, end) {
            Ok(interval) => records.push(CytobandRecord {
                interval,
                name: rest.next().unwrap_or_default().to_string(),
                stain: rest.next().unwrap_or_default().trim().to_string(),
            }),
            Err(e) => warn!("Skipping cytoband line {}: {}", lineno, e),
        }
    })?;

    info!("Read {} cytoband records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_scan_fasta_lengths() {
        let fasta = temp_file(">chr1 description\nACGTACGT\nACG\n>chr2\nNNNN\n>empty\n");
        let catalog = read_chrom_lengths(fasta.path()).unwrap();
        assert_eq!(catalog.length("chr1"), Some(11));
        assert_eq!(catalog.length("chr2"), Some(4));
        assert!(!catalog.contains("empty"));
    }

    #[test]
    fn test_fai_is_preferred() {
        let dir = TempDir::new().unwrap();
        let fasta = dir.path().join("ref.fa");
        std::fs::write(&fasta, ">chr1\nACGT\n").unwrap();
        std::fs::write(dir.path().join("ref.fa.fai"), "chr1\t248956422\t6\t60\t61\nchr2\t242193529\t253105752\t60\t61\n").unwrap();

        let catalog = read_chrom_lengths(&fasta).unwrap();
        assert_eq!(catalog.length("chr1"), Some(248_956_422));
        assert_eq!(catalog.length("chr2"), Some(242_193_529));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_malformed_fai_is_io_error() {
        let dir = TempDir::new().unwrap();
        let fasta = dir.path().join("ref.fa");
        std::fs::write(&fasta, ">chr1\nACGT\n").unwrap();
        std::fs::write(dir.path().join("ref.fa.fai"), "chr1\tnot-a-length\n").unwrap();

        let err = read_chrom_lengths(&fasta).unwrap_err();
        assert!(matches!(err, IdeogramError::Io { .. }));
    }

    #[test]
    fn test_scan_fasta_multiline_records() {
        let fasta = temp_file(">chrY\nACGTA\n>chrX\nAC\nGT\nA\n");
        let catalog = read_chrom_lengths(fasta.path()).unwrap();
        assert_eq!(catalog.length("chrX"), Some(5));
        assert_eq!(catalog.length("chrY"), Some(5));
    }

    #[test]
    fn test_missing_reference_is_io_error() {
        let err = read_chrom_lengths(Path::new("/nonexistent/ref.fa")).unwrap_err();
        assert!(matches!(err, IdeogramError::Io { .. }));
    }

    #[test]
    fn test_read_bed_skips_headers_and_garbage() {
        let bed = temp_file("track name=x\n# comment\nchr1\t100\t200\tfoo\nchr1\t150\t300\n\nchr2\tabc\t5\nchr3\t10\n");
        let records = read_bed(bed.path()).unwrap();
        assert_eq!(
            records,
            vec![
                RawInterval { chrom: "chr1".to_string(), start: 100, end: 200 },
                RawInterval { chrom: "chr1".to_string(), start: 150, end: 300 },
            ]
        );
    }

    #[test]
    fn test_read_bed_keeps_inverted_records_for_merge_to_reject() {
        let bed = temp_file("chr1\t300\t200\n");
        let records = read_bed(bed.path()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_read_cytobands() {
        let table = temp_file(
            "chr1\t0\t2300000\tp36.33\tgneg\nchr1\t121700000\t125100000\tp11.1\tacen\nchrM\t0\t16569\t\t\nchr2\t5\t5\tbad\tgneg\nchr3\t0\t100\tp1\n",
        );
        let records = read_cytobands(table.path()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].name, "p36.33");
        assert!(records[1].is_centromeric());
        assert_eq!(records[2].chrom(), "chrM");
        assert_eq!(records[2].stain, "");
        assert_eq!(records[3].chrom(), "chr3");
        assert_eq!(records[3].stain, "");
    }
}
