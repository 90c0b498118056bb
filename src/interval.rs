//! Genomic intervals, per-chromosome merging and overlap queries.

use crate::error::{self, IdeogramError};
use log::{debug, warn};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// A 0-based, half-open genomic interval `[start, end)` with `start < end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    chrom: String,
    start: u64,
    end: u64,
}

impl Interval {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> error::Result<Self> {
        let chrom = chrom.into();
        if start >= end {
            return Err(IdeogramError::MalformedInterval { chrom, start, end });
        }
        Ok(Interval { chrom, start, end })
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }
}

/// An unvalidated `(chrom, start, end)` record as read from an interval file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInterval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

/// Sorted, non-overlapping, non-touching intervals per chromosome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedCoverage {
    by_chrom: FxHashMap<String, Vec<Interval>>,
}

/// Outcome of merging raw records: the coverage plus how many records were rejected.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub coverage: MergedCoverage,
    pub rejected: usize,
}

/// Sort and sweep one chromosome's spans; touching spans are merged.
fn merge_spans(mut spans: Vec<(u64, u64)>) -> Vec<(u64, u64)> {
    spans.sort_unstable();

    let mut merged = Vec::with_capacity(spans.len());
    let mut iter = spans.into_iter();
    let Some((mut cs, mut ce)) = iter.next() else {
        return merged;
    };

    for (s, e) in iter {
        if s <= ce {
            ce = ce.max(e);
        } else {
            merged.push((cs, ce));
            cs = s;
            ce = e;
        }
    }
    merged.push((cs, ce));
    merged
}

impl MergedCoverage {
    /// Merge a multiset of intervals, possibly unsorted and spanning several chromosomes.
    pub fn from_intervals(intervals: impl IntoIterator<Item = Interval>) -> Self {
        let mut groups: FxHashMap<String, Vec<(u64, u64)>> = FxHashMap::default();
        for iv in intervals {
            groups.entry(iv.chrom).or_default().push((iv.start, iv.end));
        }

        // Chromosomes are independent, so each group is merged on its own.
        let by_chrom: FxHashMap<String, Vec<Interval>> = groups
            .into_par_iter()
            .map(|(chrom, spans)| {
                let merged: Vec<Interval> = merge_spans(spans)
                    .into_iter()
                    .map(|(start, end)| Interval { chrom: chrom.clone(), start, end })
                    .collect();
                (chrom, merged)
            })
            .collect();

        MergedCoverage { by_chrom }
    }

    /// Validate raw records, drop the malformed ones and merge the rest.
    pub fn from_records(records: impl IntoIterator<Item = RawInterval>) -> MergeReport {
        let mut rejected = 0usize;
        let mut intervals = Vec::new();

        for rec in records {
            match Interval::new(rec.chrom, rec.start, rec.end) {
                Ok(iv) => intervals.push(iv),
                Err(e) => {
                    debug!("Rejected record: {}", e);
                    rejected += 1;
                }
            }
        }

        if rejected > 0 {
            warn!("Rejected {} malformed intervals (start >= end)", rejected);
        }

        let coverage = MergedCoverage::from_intervals(intervals);
        debug!(
            "Merged coverage: {} intervals on {} chromosomes",
            coverage.len(),
            coverage.by_chrom.len()
        );

        MergeReport { coverage, rejected }
    }

    /// Merged intervals of one chromosome, empty when the chromosome has none.
    pub fn intervals(&self, chrom: &str) -> &[Interval] {
        self.by_chrom.get(chrom).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of merged intervals across all chromosomes.
    pub fn len(&self) -> usize {
        self.by_chrom.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_chrom.values().all(Vec::is_empty)
    }
}

/// Answers overlap queries against an already merged coverage set.
pub struct CoverageOracle<'a> {
    coverage: &'a MergedCoverage,
}

impl<'a> CoverageOracle<'a> {
    pub fn new(coverage: &'a MergedCoverage) -> Self {
        CoverageOracle { coverage }
    }

    /// True iff `query` shares at least one base with a covered region on its chromosome.
    /// Touching at a boundary is not overlap.
    pub fn is_covered(&self, query: &Interval) -> bool {
        let merged = self.coverage.intervals(query.chrom());
        // Ends are strictly increasing in a merged set, so the first interval
        // ending after query.start is the only candidate.
        let idx = merged.partition_point(|m| m.end <= query.start);
        merged.get(idx).is_some_and(|m| m.start < query.end)
    }
}
