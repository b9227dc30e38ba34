use std::fmt;
use std::ops::Range;

use regex::Regex;

use crate::split::error::MarkerError;

/// Which side of a region a marker closes off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRole {
    Start,
    End,
}

impl fmt::Display for MarkerRole {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            MarkerRole::Start => f.write_str("start"),
            MarkerRole::End => f.write_str("end"),
        }
    }
}

/// One region delimiter, matched either as a literal token or as a regex.
#[derive(Debug, Clone)]
pub enum Marker {
    Literal(String),
    Pattern(Regex),
}

impl Marker {
    /// Text of the marker as the user wrote it.
    pub fn as_str(&self) -> &str {
        match self {
            Marker::Literal(token) => token,
            Marker::Pattern(re) => re.as_str(),
        }
    }

    /// Byte range of the next non-empty occurrence at or after `from`.
    pub fn find_at(
        &self,
        haystack: &str,
        from: usize,
    ) -> Option<Range<usize>> {
        if from > haystack.len() {
            return None;
        }
        match self {
            Marker::Literal(token) => haystack[from..]
                .find(token.as_str())
                .map(|i| from + i..from + i + token.len()),
            Marker::Pattern(re) => {
                let mut pos = from;
                loop {
                    let m = re.find_at(haystack, pos)?;
                    if !m.is_empty() {
                        return Some(m.range());
                    }
                    // Skip zero-width hits such as `\b` one char at a time.
                    let step = haystack[m.start()..].chars().next()?.len_utf8();
                    pos = m.start() + step;
                }
            }
        }
    }

    /// First occurrence lying entirely inside `within`.
    ///
    /// The whole haystack stays visible to the matcher, so anchors and word
    /// boundaries see the real neighbours of the range edges.
    pub fn find_within(
        &self,
        haystack: &str,
        within: Range<usize>,
    ) -> Option<Range<usize>> {
        if within.start > within.end || within.end > haystack.len() {
            return None;
        }
        if let Marker::Literal(token) = self {
            // Literal hits do not depend on their surroundings.
            return haystack[within.clone()]
                .find(token.as_str())
                .map(|i| within.start + i..within.start + i + token.len());
        }
        let mut pos = within.start;
        while let Some(found) = self.find_at(haystack, pos) {
            if found.start >= within.end {
                return None;
            }
            if found.end <= within.end {
                return Some(found);
            }
            // Straddles the range end; a shorter hit may still start later.
            pos = found.start + haystack[found.start..].chars().next()?.len_utf8();
        }
        None
    }

    /// Number of non-overlapping occurrences lying entirely inside `within`.
    pub fn count_within(
        &self,
        haystack: &str,
        within: Range<usize>,
    ) -> usize {
        let mut count = 0;
        let mut pos = within.start;
        while let Some(found) = self.find_within(haystack, pos..within.end) {
            count += 1;
            pos = found.end;
        }
        count
    }
}

/// The `start`/`end` delimiters bounding secondary-language regions.
#[derive(Debug, Clone)]
pub struct MarkerPair {
    start: Marker,
    end: Marker,
}

impl MarkerPair {
    /// Markers matched as plain text.
    pub fn literal(
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Result<Self, MarkerError> {
        let start = start.into();
        let end = end.into();
        check_distinct(&start, &end)?;
        Ok(Self {
            start: Marker::Literal(start),
            end: Marker::Literal(end),
        })
    }

    /// Markers matched as regular expressions.
    pub fn regex(
        start: &str,
        end: &str,
    ) -> Result<Self, MarkerError> {
        check_distinct(start, end)?;
        Ok(Self {
            start: compile(MarkerRole::Start, start)?,
            end: compile(MarkerRole::End, end)?,
        })
    }

    pub fn start(&self) -> &Marker {
        &self.start
    }

    pub fn end(&self) -> &Marker {
        &self.end
    }
}

impl Default for MarkerPair {
    fn default() -> Self {
        Self {
            start: Marker::Literal(crate::constants::DEFAULT_START_MARKER.to_string()),
            end: Marker::Literal(crate::constants::DEFAULT_END_MARKER.to_string()),
        }
    }
}

fn check_distinct(
    start: &str,
    end: &str,
) -> Result<(), MarkerError> {
    if start.is_empty() {
        return Err(MarkerError::Empty {
            role: MarkerRole::Start,
        });
    }
    if end.is_empty() {
        return Err(MarkerError::Empty {
            role: MarkerRole::End,
        });
    }
    if start == end {
        return Err(MarkerError::Identical {
            pattern: start.to_string(),
        });
    }
    Ok(())
}

fn compile(
    role: MarkerRole,
    pattern: &str,
) -> Result<Marker, MarkerError> {
    let re = Regex::new(pattern).map_err(|source| MarkerError::InvalidPattern { role, source })?;
    if re.is_match("") {
        return Err(MarkerError::MatchesEmpty {
            role,
            pattern: pattern.to_string(),
        });
    }
    Ok(Marker::Pattern(re))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_find_at_respects_offset() {
        let m = Marker::Literal("<cn>".into());
        let text = "a<cn>b<cn>";
        assert_eq!(m.find_at(text, 0), Some(1..5));
        assert_eq!(m.find_at(text, 2), Some(6..10));
        assert_eq!(m.find_at(text, 10), None);
        assert_eq!(m.find_at(text, 11), None);
    }

    #[test]
    fn pattern_skips_zero_width_matches() {
        let m = Marker::Pattern(Regex::new(r"\bzh\b|\b").unwrap());
        assert_eq!(m.find_at("ab zh", 0), Some(3..5));
    }

    #[test]
    fn count_within_counts_non_overlapping() {
        let m = Marker::Literal("aa".into());
        assert_eq!(m.count_within("aaaaa", 0..5), 2);
        assert_eq!(m.count_within("aaaaa", 1..4), 1);
    }

    #[test]
    fn find_within_keeps_context_past_the_range() {
        let m = Marker::Pattern(Regex::new(r"@zh\b").unwrap());
        // Cut at 3 the text would end in a word boundary; in context it does not.
        assert_eq!(m.find_within("@zhend", 0..3), None);
        assert_eq!(m.find_within("@zh end", 0..3), Some(0..3));
    }

    #[test]
    fn find_within_skips_hits_straddling_the_end() {
        let m = Marker::Pattern(Regex::new(r"ab+|b").unwrap());
        assert_eq!(m.find_within("abbb", 0..3), Some(1..2));
    }

    #[test]
    fn rejects_empty_and_identical_markers() {
        assert!(matches!(
            MarkerPair::literal("", "</cn>"),
            Err(MarkerError::Empty {
                role: MarkerRole::Start
            })
        ));
        assert!(matches!(
            MarkerPair::literal("<cn>", ""),
            Err(MarkerError::Empty {
                role: MarkerRole::End
            })
        ));
        assert!(matches!(
            MarkerPair::literal("@@", "@@"),
            Err(MarkerError::Identical { .. })
        ));
    }

    #[test]
    fn rejects_bad_regexes() {
        assert!(matches!(
            MarkerPair::regex("(", "\\)"),
            Err(MarkerError::InvalidPattern {
                role: MarkerRole::Start,
                ..
            })
        ));
        assert!(matches!(
            MarkerPair::regex("<cn>", "x*"),
            Err(MarkerError::MatchesEmpty {
                role: MarkerRole::End,
                ..
            })
        ));
    }

    #[test]
    fn default_pair_uses_cn_tags() {
        let pair = MarkerPair::default();
        assert_eq!(pair.start().as_str(), "<cn>");
        assert_eq!(pair.end().as_str(), "</cn>");
    }
}
