use std::iter::FusedIterator;
use std::ops::Range;

use crate::split::error::SplitError;
use crate::split::marker::MarkerPair;

/// A borrowed span of the document, classified by which side of the markers it is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text outside every region.
    Outside(&'a str),
    /// Interior of one region, markers excluded.
    Inside(&'a str),
}

/// Lazy left-to-right scan of a document's regions.
///
/// Walks a cursor over the immutable content; no span is copied. After the
/// first error the iterator is exhausted, so both output modes observe the
/// same failure at the same point.
pub struct Segments<'a> {
    content: &'a str,
    markers: &'a MarkerPair,
    cursor: usize,
    pending: Option<&'a str>,
    done: bool,
    count_stray_ends: bool,
    stray_ends: usize,
}

impl<'a> Segments<'a> {
    pub fn new(
        content: &'a str,
        markers: &'a MarkerPair,
    ) -> Self {
        Self {
            content,
            markers,
            cursor: 0,
            pending: None,
            done: false,
            count_stray_ends: false,
            stray_ends: 0,
        }
    }

    /// Also count end markers that fall outside every region.
    pub fn counting_stray_ends(mut self) -> Self {
        self.count_stray_ends = true;
        self
    }

    /// Stray end markers seen so far; always 0 unless counting was enabled.
    pub fn stray_ends(&self) -> usize {
        self.stray_ends
    }

    fn outside(
        &mut self,
        span: Range<usize>,
    ) -> &'a str {
        let content = self.content;
        if self.count_stray_ends {
            self.stray_ends += self.markers.end().count_within(content, span.clone());
        }
        &content[span]
    }

    fn fail(
        &mut self,
        err: SplitError,
    ) -> Option<Result<Segment<'a>, SplitError>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Result<Segment<'a>, SplitError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(inside) = self.pending.take() {
            return Some(Ok(Segment::Inside(inside)));
        }
        if self.done {
            return None;
        }

        let (content, markers) = (self.content, self.markers);
        let (start, end) = (markers.start(), markers.end());

        let Some(open) = start.find_at(content, self.cursor) else {
            self.done = true;
            let rest = self.outside(self.cursor..content.len());
            self.cursor = content.len();
            return (!rest.is_empty()).then_some(Ok(Segment::Outside(rest)));
        };

        let Some(close) = end.find_at(content, open.end) else {
            return self.fail(SplitError::UnterminatedRegion {
                start: start.as_str().to_string(),
                end: end.as_str().to_string(),
                offset: open.start,
                line: line_at(content, open.start),
            });
        };

        // Only hits wholly inside the interior count; context past it still applies.
        if let Some(nested) = start.find_within(content, open.end..close.start) {
            return self.fail(SplitError::NestedStart {
                start: start.as_str().to_string(),
                offset: nested.start,
                line: line_at(content, nested.start),
                region_line: line_at(content, open.start),
            });
        }

        let outside = self.outside(self.cursor..open.start);
        let inside = &content[open.end..close.start];
        self.cursor = close.end;

        if outside.is_empty() {
            Some(Ok(Segment::Inside(inside)))
        } else {
            self.pending = Some(inside);
            Some(Ok(Segment::Outside(outside)))
        }
    }
}

impl FusedIterator for Segments<'_> {}

/// 1-based line number of a byte offset.
pub fn line_at(
    content: &str,
    offset: usize,
) -> usize {
    content.as_bytes()[..offset.min(content.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}
