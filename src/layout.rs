//! Ideogram layout: chromosomes, coverage and landmarks to draw primitives.
//!
//! Primitives live in data space. `x` counts chromosome slots (one slot per
//! canonical chromosome), `y` is the genomic coordinate in bp with 0 at the
//! top. Mapping to pixels is the renderer's job.

use crate::cytoband::Landmarks;
use crate::error::{IdeogramError, Result};
use crate::genome::ChromosomeCatalog;
use crate::interval::{CoverageOracle, Interval, MergedCoverage};
use log::debug;
use rustc_hash::FxHashMap;

pub type Rgb = (u8, u8, u8);

/// Display order. A chromosome missing from the reference keeps its slot empty.
pub const CANONICAL_CHROMOSOMES: [&str; 24] = [
    "chr1", "chr2", "chr3", "chr4", "chr5", "chr6", "chr7", "chr8", "chr9", "chr10", "chr11",
    "chr12", "chr13", "chr14", "chr15", "chr16", "chr17", "chr18", "chr19", "chr20", "chr21",
    "chr22", "chrX", "chrY",
];

pub const CHROM_WIDTH: f64 = 0.4;
pub const SLOT_SPACING: f64 = 1.0;
/// Head room below the longest chromosome, as a fraction of its length.
const Y_MARGIN_FRACTION: f64 = 0.1;
/// Gap between a chromosome's end and its label, as a fraction of the longest chromosome.
const LABEL_OFFSET_FRACTION: f64 = 0.04;

pub const DEFAULT_TITLE: &str = "BED Coverage Ideogram with Centromeres and Telomeres";
const Y_LABEL: &str = "Genomic Position (bp)";

/// Semantic classes that get their own colour and legend swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Body,
    Covered,
    CentromereCovered,
    CentromereUncovered,
    TelomereCovered,
    TelomereUncovered,
}

impl Feature {
    /// Legend order.
    pub const ALL: [Feature; 6] = [
        Feature::Body,
        Feature::Covered,
        Feature::CentromereCovered,
        Feature::CentromereUncovered,
        Feature::TelomereCovered,
        Feature::TelomereUncovered,
    ];

    pub fn color(self) -> Rgb {
        match self {
            Feature::Body => (211, 211, 211),              // lightgray
            Feature::Covered => (0, 0, 128),               // navy
            Feature::CentromereCovered => (255, 0, 0),     // red
            Feature::CentromereUncovered => (255, 204, 204),
            Feature::TelomereCovered => (0, 128, 0),       // green
            Feature::TelomereUncovered => (204, 255, 204),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Feature::Body => "Chromosome Body",
            Feature::Covered => "Covered Region",
            Feature::CentromereCovered => "Covered Centromere",
            Feature::CentromereUncovered => "Uncovered Centromere",
            Feature::TelomereCovered => "Covered Telomere",
            Feature::TelomereUncovered => "Uncovered Telomere",
        }
    }

    fn centromere(covered: bool) -> Self {
        if covered {
            Feature::CentromereCovered
        } else {
            Feature::CentromereUncovered
        }
    }

    fn telomere(covered: bool) -> Self {
        if covered {
            Feature::TelomereCovered
        } else {
            Feature::TelomereUncovered
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawPrimitive {
    FilledRect { x: f64, y: f64, width: f64, height: f64, color: Rgb },
    /// Text centred horizontally on `x`, hanging below `y`.
    Label { x: f64, y: f64, text: String },
    LegendEntry { color: Rgb, label: String },
}

/// Axis and scale parameters handed to the renderer with the primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub x_min: f64,
    pub x_max: f64,
    /// Genomic coordinate at the bottom of the plot; 0 is at the top.
    pub y_max: f64,
    pub major_tick: u64,
    pub minor_tick: u64,
    pub y_label: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub primitives: Vec<DrawPrimitive>,
    pub axes: Axes,
}

/// Major/minor tick steps for a y axis ending at `limit` bp.
fn tick_steps(limit: f64) -> (u64, u64) {
    if limit >= 100_000_000.0 {
        return (50_000_000, 10_000_000);
    }

    let raw = (limit / 8.0).max(1.0);
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let major = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10.0 * magnitude) as u64;
    let major = major.max(1);
    (major, (major / 5).max(1))
}

fn interval_rect(x: f64, iv: &Interval, feature: Feature) -> DrawPrimitive {
    DrawPrimitive::FilledRect {
        x,
        y: iv.start() as f64,
        width: CHROM_WIDTH,
        height: iv.len() as f64,
        color: feature.color(),
    }
}

/// Lay out the whole figure.
///
/// Each displayed chromosome gets, bottom layer first: its body, the merged
/// covered intervals, the centromere, the start and end telomeres, and its
/// name. The legend entries follow all chromosomes.
pub fn layout(
    catalog: &ChromosomeCatalog,
    coverage: &MergedCoverage,
    oracle: &CoverageOracle,
    landmarks: &FxHashMap<String, Landmarks>,
    title: &str,
) -> Result<Figure> {
    let displayed: Vec<(usize, &str, u64)> = CANONICAL_CHROMOSOMES
        .iter()
        .enumerate()
        .filter_map(|(idx, &chrom)| catalog.length(chrom).map(|len| (idx, chrom, len)))
        .collect();

    let longest = displayed
        .iter()
        .map(|&(_, _, len)| len)
        .max()
        .ok_or(IdeogramError::EmptyInput)? as f64;

    let label_offset = longest * LABEL_OFFSET_FRACTION;
    let mut primitives = Vec::new();

    for &(idx, chrom, chr_len) in &displayed {
        let x = idx as f64 * SLOT_SPACING;

        primitives.push(DrawPrimitive::FilledRect {
            x,
            y: 0.0,
            width: CHROM_WIDTH,
            height: chr_len as f64,
            color: Feature::Body.color(),
        });

        let covered = coverage.intervals(chrom);
        for iv in covered {
            primitives.push(interval_rect(x, iv, Feature::Covered));
        }

        let lm = landmarks.get(chrom);
        if let Some(cen) = lm.and_then(|lm| lm.centromere.as_ref()) {
            let feature = Feature::centromere(oracle.is_covered(cen));
            primitives.push(interval_rect(x, cen, feature));
        }
        if let Some(tel) = lm.and_then(|lm| lm.telomeres.as_ref()) {
            for end in [&tel.start, &tel.end] {
                let feature = Feature::telomere(oracle.is_covered(end));
                primitives.push(interval_rect(x, end, feature));
            }
        }

        primitives.push(DrawPrimitive::Label {
            x: x + CHROM_WIDTH / 2.0,
            y: chr_len as f64 + label_offset,
            text: chrom.to_string(),
        });

        debug!("{}: slot {}, {} bp, {} covered intervals", chrom, idx, chr_len, covered.len());
    }

    primitives.extend(Feature::ALL.iter().map(|f| DrawPrimitive::LegendEntry {
        color: f.color(),
        label: f.label().to_string(),
    }));

    let y_max = longest * (1.0 + Y_MARGIN_FRACTION);
    let (major_tick, minor_tick) = tick_steps(y_max);

    Ok(Figure {
        primitives,
        axes: Axes {
            x_min: -0.5,
            x_max: CANONICAL_CHROMOSOMES.len() as f64 * SLOT_SPACING,
            y_max,
            major_tick,
            minor_tick,
            y_label: Y_LABEL.to_string(),
            title: title.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cytoband::{landmarks_for, CytobandRecord};

    fn iv(chrom: &str, start: u64, end: u64) -> Interval {
        Interval::new(chrom, start, end).unwrap()
    }

    fn band(chrom: &str, start: u64, end: u64, stain: &str) -> CytobandRecord {
        CytobandRecord { interval: iv(chrom, start, end), name: String::new(), stain: stain.to_string() }
    }

    fn rect(x: f64, start: u64, end: u64, feature: Feature) -> DrawPrimitive {
        DrawPrimitive::FilledRect {
            x,
            y: start as f64,
            width: CHROM_WIDTH,
            height: (end - start) as f64,
            color: feature.color(),
        }
    }

    fn rects_at(figure: &Figure, slot_x: f64) -> Vec<&DrawPrimitive> {
        figure
            .primitives
            .iter()
            .filter(|p| matches!(p, DrawPrimitive::FilledRect { x, .. } if *x == slot_x))
            .collect()
    }

    fn chr1_scenario() -> (ChromosomeCatalog, MergedCoverage, FxHashMap<String, Landmarks>) {
        let catalog: ChromosomeCatalog = vec![("chr1", 1000u64)].into_iter().collect();
        let coverage = MergedCoverage::from_intervals(vec![iv("chr1", 100, 200), iv("chr1", 150, 300)]);
        let bands = vec![
            band("chr1", 0, 50, "gneg"),
            band("chr1", 400, 450, "acen"),
            band("chr1", 950, 1000, "gneg"),
        ];
        let mut landmarks = FxHashMap::default();
        landmarks.insert("chr1".to_string(), landmarks_for(&bands));
        (catalog, coverage, landmarks)
    }

    #[test]
    fn test_end_to_end_primitives() {
        let (catalog, coverage, landmarks) = chr1_scenario();
        let oracle = CoverageOracle::new(&coverage);
        let figure = layout(&catalog, &coverage, &oracle, &landmarks, DEFAULT_TITLE).unwrap();

        let mut expected = vec![
            rect(0.0, 0, 1000, Feature::Body),
            rect(0.0, 100, 300, Feature::Covered),
            rect(0.0, 400, 450, Feature::CentromereUncovered),
            rect(0.0, 0, 50, Feature::TelomereUncovered),
            rect(0.0, 950, 1000, Feature::TelomereUncovered),
            DrawPrimitive::Label { x: 0.2, y: 1040.0, text: "chr1".to_string() },
        ];
        expected.extend(Feature::ALL.iter().map(|f| DrawPrimitive::LegendEntry {
            color: f.color(),
            label: f.label().to_string(),
        }));

        assert_eq!(figure.primitives, expected);
        assert!((figure.axes.y_max - 1100.0).abs() < 1e-9);
        assert_eq!(figure.axes.x_max, 24.0);
    }

    #[test]
    fn test_covered_landmarks_use_covered_colors() {
        let (catalog, _, landmarks) = chr1_scenario();
        let coverage = MergedCoverage::from_intervals(vec![iv("chr1", 40, 420)]);
        let oracle = CoverageOracle::new(&coverage);
        let figure = layout(&catalog, &coverage, &oracle, &landmarks, DEFAULT_TITLE).unwrap();

        let rects = rects_at(&figure, 0.0);
        assert_eq!(rects[2], &rect(0.0, 400, 450, Feature::CentromereCovered));
        assert_eq!(rects[3], &rect(0.0, 0, 50, Feature::TelomereCovered));
        assert_eq!(rects[4], &rect(0.0, 950, 1000, Feature::TelomereUncovered));
    }

    #[test]
    fn test_chromosome_without_intervals_is_uncovered() {
        let (mut catalog, coverage, mut landmarks) = chr1_scenario();
        catalog.insert("chr2", 800);
        let bands = vec![band("chr2", 0, 40, "gneg"), band("chr2", 300, 350, "acen"), band("chr2", 700, 800, "gneg")];
        landmarks.insert("chr2".to_string(), landmarks_for(&bands));
        let oracle = CoverageOracle::new(&coverage);
        let figure = layout(&catalog, &coverage, &oracle, &landmarks, DEFAULT_TITLE).unwrap();

        assert!(coverage.intervals("chr2").is_empty());
        let rects = rects_at(&figure, 1.0);
        assert_eq!(
            rects,
            vec![
                &rect(1.0, 0, 800, Feature::Body),
                &rect(1.0, 300, 350, Feature::CentromereUncovered),
                &rect(1.0, 0, 40, Feature::TelomereUncovered),
                &rect(1.0, 700, 800, Feature::TelomereUncovered),
            ]
        );
    }

    #[test]
    fn test_missing_chromosome_leaves_gap() {
        let catalog: ChromosomeCatalog =
            vec![("chr1", 1000u64), ("chr3", 900), ("chrY", 500)].into_iter().collect();
        let coverage = MergedCoverage::default();
        let oracle = CoverageOracle::new(&coverage);
        let figure = layout(&catalog, &coverage, &oracle, &FxHashMap::default(), DEFAULT_TITLE).unwrap();

        let labels: Vec<(f64, &str)> = figure
            .primitives
            .iter()
            .filter_map(|p| match p {
                DrawPrimitive::Label { x, text, .. } => Some((*x, text.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec![(0.2, "chr1"), (2.2, "chr3"), (23.2, "chrY")]);
        assert!(rects_at(&figure, 1.0).is_empty());
    }

    #[test]
    fn test_empty_cytoband_emits_no_landmarks() {
        let catalog: ChromosomeCatalog = vec![("chr1", 1000u64)].into_iter().collect();
        let coverage = MergedCoverage::from_intervals(vec![iv("chr1", 10, 20)]);
        let oracle = CoverageOracle::new(&coverage);
        let figure = layout(&catalog, &coverage, &oracle, &FxHashMap::default(), DEFAULT_TITLE).unwrap();

        assert_eq!(
            rects_at(&figure, 0.0),
            vec![&rect(0.0, 0, 1000, Feature::Body), &rect(0.0, 10, 20, Feature::Covered)]
        );
    }

    #[test]
    fn test_non_canonical_only_reference_is_empty_input() {
        let catalog: ChromosomeCatalog = vec![("1", 1000u64), ("chrM", 16569)].into_iter().collect();
        let coverage = MergedCoverage::default();
        let oracle = CoverageOracle::new(&coverage);
        let result = layout(&catalog, &coverage, &oracle, &FxHashMap::default(), DEFAULT_TITLE);
        assert!(matches!(result, Err(IdeogramError::EmptyInput)));
    }

    #[test]
    fn test_legend_is_fixed() {
        let catalog: ChromosomeCatalog = vec![("chrX", 100u64)].into_iter().collect();
        let coverage = MergedCoverage::default();
        let oracle = CoverageOracle::new(&coverage);
        let figure = layout(&catalog, &coverage, &oracle, &FxHashMap::default(), DEFAULT_TITLE).unwrap();
        let legend: Vec<&str> = figure
            .primitives
            .iter()
            .filter_map(|p| match p {
                DrawPrimitive::LegendEntry { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(legend, Feature::ALL.iter().map(|f| f.label()).collect::<Vec<_>>());
    }

    #[test]
    fn test_tick_steps() {
        assert_eq!(tick_steps(273_000_000.0), (50_000_000, 10_000_000));
        assert_eq!(tick_steps(1100.0), (200, 40));
        assert_eq!(tick_steps(5.0), (1, 1));
    }
}
