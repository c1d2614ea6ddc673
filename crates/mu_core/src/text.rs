//! Text span types for source location tracking.
//!
//! Declarations and diagnostics carry byte spans into their document; the
//! line map turns those into human-facing line and character positions.

use memchr::memchr_iter;
use std::fmt;
use std::ops::Range;

/// A byte range in a document: where it starts and how long it is.
///
/// Spans order by start, then length, which is the order diagnostics are
/// printed in.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TextSpan {
    pub start: u32,
    pub length: u32,
}

impl TextSpan {
    #[inline]
    pub fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    /// A zero-length span, used where only a point is known.
    #[inline]
    pub fn empty(at: u32) -> Self {
        Self::new(at, 0)
    }

    /// Exclusive end offset.
    #[inline]
    pub fn end(&self) -> u32 {
        self.start + self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

/// Line and character information derived from source text.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineAndCharacter {
    /// 0-based line number.
    pub line: u32,
    /// 0-based byte column within the line.
    pub character: u32,
}

impl LineAndCharacter {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Displays 1-based, the way editors show positions.
impl fmt::Display for LineAndCharacter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.line + 1, self.character + 1)
    }
}

/// Byte offsets at which each line of `text` starts. The first line always
/// starts at 0.
pub fn compute_line_starts(text: &str) -> Vec<u32> {
    std::iter::once(0)
        .chain(memchr_iter(b'\n', text.as_bytes()).map(|i| (i + 1) as u32))
        .collect()
}

/// Position lookups over precomputed line starts.
///
/// The map only borrows the starts, so a document can compute them once and
/// keep them next to its text.
#[derive(Debug, Clone, Copy)]
pub struct LineMap<'a> {
    line_starts: &'a [u32],
}

impl<'a> LineMap<'a> {
    /// `line_starts` must come from [`compute_line_starts`].
    pub fn new(line_starts: &'a [u32]) -> Self {
        Self { line_starts }
    }

    /// 0-based line holding byte offset `pos`.
    pub fn line_of(&self, pos: u32) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(next) => next.saturating_sub(1) as u32,
        }
    }

    pub fn line_and_character_of(&self, pos: u32) -> LineAndCharacter {
        let line = self.line_of(pos);
        let start = self.line_starts.get(line as usize).copied().unwrap_or(0);
        LineAndCharacter::new(line, pos - start)
    }

    /// Byte offset of a 0-based line/character pair. Lines past the end
    /// clamp to the last line.
    pub fn position_of(&self, line: u32, character: u32) -> u32 {
        let index = (line as usize).min(self.line_starts.len().saturating_sub(1));
        self.line_starts.get(index).copied().unwrap_or(0) + character
    }
}
