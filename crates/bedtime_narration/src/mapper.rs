//! Word-boundary mapping from engine text to display text.
//!
//! The engine reports boundaries against the text it was given, which may be
//! the markup variant of the story. The listener sees the sanitized plain
//! text. The mapper aligns the two once per phase and then translates each
//! boundary with a table lookup.

use bedtime_core::{tag_spans, TextRange};
use tracing::trace;

/// Translates byte ranges in an engine input text to byte ranges in a display text.
///
/// Markup tags in the engine text are skipped during alignment, and so is
/// whitespace present in only one of the two texts. A position inside a tag
/// maps to the next character after it, so highlights only ever move forward.
///
/// # Examples
///
/// ```
/// use bedtime_core::TextRange;
/// use bedtime_narration::WordBoundaryMapper;
///
/// let engine = "<emphasis>Hi</emphasis> Sam";
/// let mapper = WordBoundaryMapper::new(engine, "Hi Sam");
///
/// let sam = TextRange::new(engine.find("Sam").unwrap(), 3);
/// assert_eq!(mapper.map(sam), TextRange::new(3, 3));
/// ```
#[derive(Debug, Clone)]
pub struct WordBoundaryMapper {
    engine_len: usize,
    display_len: usize,
    /// Display offset per engine byte offset, plus one entry for the end.
    /// Empty when both texts are equal.
    table: Vec<usize>,
}

impl WordBoundaryMapper {
    /// Build the correction table for one phase.
    pub fn new(engine_text: &str, display_text: &str) -> Self {
        if engine_text == display_text {
            return Self {
                engine_len: engine_text.len(),
                display_len: display_text.len(),
                table: Vec::new(),
            };
        }

        const UNSET: usize = usize::MAX;
        let mut table = vec![UNSET; engine_text.len() + 1];
        let tags = tag_spans(engine_text);
        let mut next_tag = tags.iter().peekable();
        let mut cursor = 0;

        for (offset, ch) in engine_text.char_indices() {
            while next_tag.peek().is_some_and(|tag| tag.range.end <= offset) {
                next_tag.next();
            }
            if next_tag.peek().is_some_and(|tag| tag.range.contains(&offset)) {
                continue;
            }

            // Display whitespace the engine text lacks is skipped.
            if !ch.is_whitespace() {
                while let Some(dc) = display_text[cursor..].chars().next() {
                    if !dc.is_whitespace() {
                        break;
                    }
                    cursor += dc.len_utf8();
                }
            }

            table[offset..offset + ch.len_utf8()].fill(cursor);
            match display_text[cursor..].chars().next() {
                Some(dc) if dc == ch || (dc.is_whitespace() && ch.is_whitespace()) => {
                    cursor += dc.len_utf8();
                }
                // Engine-only whitespace maps to the next display character.
                Some(_) if ch.is_whitespace() => {}
                // Substitution: keep both texts moving.
                Some(dc) => cursor += dc.len_utf8(),
                None => {}
            }
        }

        table[engine_text.len()] = display_text.len();
        for index in (0..engine_text.len()).rev() {
            if table[index] == UNSET {
                table[index] = table[index + 1];
            }
        }
        trace!(
            engine_len = engine_text.len(),
            display_len = display_text.len(),
            tags = tags.len(),
            "Built word boundary table"
        );

        Self {
            engine_len: engine_text.len(),
            display_len: display_text.len(),
            table,
        }
    }

    /// Whether the mapping is the identity.
    pub fn is_identity(&self) -> bool {
        self.table.is_empty()
    }

    /// Translate an engine range into the display text, clamped to its bounds.
    pub fn map(&self, range: TextRange) -> TextRange {
        if self.is_identity() {
            let start = range.start.min(self.display_len);
            let end = range.end().clamp(start, self.display_len);
            return TextRange::from_bounds(start, end);
        }
        let start = range.start.min(self.engine_len);
        let end = range.end().clamp(start, self.engine_len);
        let display_start = self.table[start].min(self.display_len);
        let display_end = self.table[end].clamp(display_start, self.display_len);
        TextRange::from_bounds(display_start, display_end)
    }
}

/// One-shot form of [`WordBoundaryMapper::map`].
///
/// Builds the table on every call; keep a [`WordBoundaryMapper`] per phase instead.
pub fn map_range(range: TextRange, engine_text: &str, display_text: &str) -> TextRange {
    WordBoundaryMapper::new(engine_text, display_text).map(range)
}
