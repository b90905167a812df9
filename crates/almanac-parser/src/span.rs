//! Byte ranges into parsed source text.

use std::ops::Range;

/// A byte range into the source text a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a byte range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Get the start offset of the span
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Move the span forward by `offset` bytes.
    ///
    /// Used to translate spans relative to an embedded string (a reference
    /// inside a YAML document) into spans relative to the whole file.
    pub fn shift(&self, offset: usize) -> Span {
        Span::new(self.start + offset..self.end + offset)
    }

    /// Create a union of two spans (encompassing both)
    pub fn union(&self, other: Span) -> Span {
        Span::new(self.start.min(other.start)..self.end.max(other.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basics() {
        let span = Span::new(3..7);
        assert_eq!(span.start(), 3);
        assert_eq!(span.end(), 7);
        assert_eq!(span.len(), 4);
        assert!(!span.is_empty());
        assert!(Span::new(5..5).is_empty());
    }

    #[test]
    fn test_span_shift_and_union() {
        assert_eq!(Span::new(1..3).shift(10), Span::new(11..13));
        assert_eq!(Span::new(1..3).union(Span::new(8..9)), Span::new(1..9));
    }
}
