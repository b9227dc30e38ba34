use std::io::Write;

use crate::split::error::SplitError;
use crate::split::marker::MarkerPair;
use crate::split::segments::{Segment, Segments};

/// Which of the two single-language outputs to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Everything outside the regions.
    Primary,
    /// Region interiors only, concatenated with no separator.
    Secondary,
}

impl Mode {
    fn keeps(
        self,
        segment: &Segment<'_>,
    ) -> bool {
        matches!(
            (self, segment),
            (Mode::Primary, Segment::Outside(_)) | (Mode::Secondary, Segment::Inside(_))
        )
    }
}

/// Both outputs of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOutput {
    pub primary: String,
    pub secondary: String,
    pub stats: RegionStats,
}

/// Marker balance summary of a well-formed document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionStats {
    pub regions: usize,
    /// End markers outside any region, kept as primary text.
    pub stray_ends: usize,
}

/// Splits bilingual documents on a fixed marker pair.
#[derive(Debug, Clone, Default)]
pub struct Splitter {
    markers: MarkerPair,
}

impl Splitter {
    pub fn new(markers: MarkerPair) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &MarkerPair {
        &self.markers
    }

    /// Lazily scan `content` for regions.
    pub fn segments<'a>(
        &'a self,
        content: &'a str,
    ) -> Segments<'a> {
        Segments::new(content, &self.markers)
    }

    /// Spans that make up the output for `mode`, validated over the whole document.
    fn spans<'a>(
        &'a self,
        content: &'a str,
        mode: Mode,
    ) -> Result<Vec<&'a str>, SplitError> {
        let mut spans = Vec::new();
        for segment in self.segments(content) {
            let segment = segment?;
            if mode.keeps(&segment) {
                match segment {
                    Segment::Outside(s) | Segment::Inside(s) => spans.push(s),
                }
            }
        }
        Ok(spans)
    }

    pub fn split(
        &self,
        content: &str,
        mode: Mode,
    ) -> Result<String, SplitError> {
        Ok(self.spans(content, mode)?.concat())
    }

    /// Write the `mode` output to `sink`.
    ///
    /// Nothing is written unless the whole document is well-formed.
    pub fn split_into<W: Write>(
        &self,
        content: &str,
        mode: Mode,
        sink: &mut W,
    ) -> Result<(), SplitError> {
        for span in self.spans(content, mode)? {
            sink.write_all(span.as_bytes())?;
        }
        sink.flush()?;
        Ok(())
    }

    /// Produce both outputs and their region stats in a single scan.
    pub fn split_both(
        &self,
        content: &str,
    ) -> Result<SplitOutput, SplitError> {
        let mut out = SplitOutput::default();
        let mut segments = self.segments(content).counting_stray_ends();
        for segment in segments.by_ref() {
            match segment? {
                Segment::Outside(s) => out.primary.push_str(s),
                Segment::Inside(s) => {
                    out.secondary.push_str(s);
                    out.stats.regions += 1;
                }
            }
        }
        out.stats.stray_ends = segments.stray_ends();
        Ok(out)
    }

    /// Check marker balance without building any output.
    pub fn validate(
        &self,
        content: &str,
    ) -> Result<RegionStats, SplitError> {
        let mut stats = RegionStats::default();
        let mut segments = self.segments(content).counting_stray_ends();
        for segment in segments.by_ref() {
            if let Segment::Inside(_) = segment? {
                stats.regions += 1;
            }
        }
        stats.stray_ends = segments.stray_ends();
        Ok(stats)
    }
}
