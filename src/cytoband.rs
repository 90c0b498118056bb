//! Centromere and telomere landmarks derived from a cytoband table.

use crate::genome::ChromosomeCatalog;
use crate::interval::Interval;
use log::debug;
use rustc_hash::FxHashMap;

/// Giemsa stain class marking centromeric bands.
pub const CENTROMERE_STAIN: &str = "acen";

/// One row of a cytoband table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CytobandRecord {
    pub interval: Interval,
    /// Band name such as `p36.33`; only reported in logs.
    pub name: String,
    pub stain: String,
}

impl CytobandRecord {
    pub fn chrom(&self) -> &str {
        self.interval.chrom()
    }

    pub fn is_centromeric(&self) -> bool {
        self.stain == CENTROMERE_STAIN
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telomeres {
    /// First band of the chromosome in table order.
    pub start: Interval,
    /// Last band of the chromosome in table order.
    pub end: Interval,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Landmarks {
    pub centromere: Option<Interval>,
    pub telomeres: Option<Telomeres>,
}

/// Landmarks of a single chromosome from its bands, given in table order.
///
/// The centromere spans every `acen` band (usually a p/q pair around the
/// constriction). A chromosome with one band has identical start and end
/// telomeres; one with no bands has no landmarks at all.
pub fn landmarks_for<'r>(records: impl IntoIterator<Item = &'r CytobandRecord>) -> Landmarks {
    let mut first: Option<&CytobandRecord> = None;
    let mut last: Option<&CytobandRecord> = None;
    let mut acen: Option<(&str, u64, u64)> = None;

    for rec in records {
        if first.is_none() {
            first = Some(rec);
        }
        last = Some(rec);

        if rec.is_centromeric() {
            let iv = &rec.interval;
            acen = Some(match acen {
                Some((chrom, s, e)) => (chrom, s.min(iv.start()), e.max(iv.end())),
                None => (iv.chrom(), iv.start(), iv.end()),
            });
        }
    }

    // min start < max end holds because every band has start < end.
    let centromere = acen.and_then(|(chrom, s, e)| Interval::new(chrom, s, e).ok());
    let telomeres = first.zip(last).map(|(f, l)| Telomeres {
        start: f.interval.clone(),
        end: l.interval.clone(),
    });

    Landmarks { centromere, telomeres }
}

/// `p36.33..q44` style summary of a chromosome's bands, by name.
fn band_span(recs: &[&CytobandRecord]) -> String {
    match (recs.first(), recs.last()) {
        (Some(first), Some(last)) => format!("{}..{}", first.name, last.name),
        _ => String::from("none"),
    }
}

/// Landmarks for every reference chromosome named in the table.
/// Bands on chromosomes outside the reference are ignored.
pub fn extract_landmarks(
    records: &[CytobandRecord],
    catalog: &ChromosomeCatalog,
) -> FxHashMap<String, Landmarks> {
    let mut by_chrom: FxHashMap<&str, Vec<&CytobandRecord>> = FxHashMap::default();
    let mut ignored = 0usize;

    for rec in records {
        if catalog.contains(rec.chrom()) {
            by_chrom.entry(rec.chrom()).or_default().push(rec);
        } else {
            ignored += 1;
        }
    }

    if ignored > 0 {
        debug!("Ignored {} cytoband records on chromosomes absent from the reference", ignored);
    }

    by_chrom
        .into_iter()
        .map(|(chrom, recs)| {
            let bands = band_span(&recs);
            let landmarks = landmarks_for(recs);
            debug!(
                "{}: bands {}, centromere {:?}, telomeres {:?}",
                chrom, bands, landmarks.centromere, landmarks.telomeres
            );
            (chrom.to_string(), landmarks)
        })
        .collect()
}
