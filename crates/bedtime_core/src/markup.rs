//! Narration markup vocabulary and the plain-text sanitizer.
//!
//! Story models emit an SSML-like markup variant of the story text carrying
//! pauses, emphasis and prosody hints for the narration engine. Displayed text
//! must never show those tags, so every text field headed for the screen passes
//! through [`sanitize`].

use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;
use std::time::Duration;

/// Tag names treated as narration markup.
pub const RESERVED_TAGS: &[&str] = &[
    "break", "emphasis", "prosody", "voice", "speak", "say-as", "phoneme", "sub", "mark", "lang",
    "audio", "p", "s", "w",
];

static COMPLETE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)<(/?)({})\b([^<>]*)>",
        alternation()
    ))
    .expect("Valid markup tag regex")
});

static TRAILING_PARTIAL_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?:</?(?:{})\b[^<>]*|</?[a-z-]*\s*)$",
        alternation()
    ))
    .expect("Valid partial tag regex")
});

static BREAK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)time\s*=\s*["']?\s*(\d+(?:\.\d+)?)\s*(ms|s)"#).expect("Valid break time regex")
});

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("Valid whitespace regex"));
static SPACE_AROUND_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ?\n ?").expect("Valid newline regex"));
static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Valid newline run regex"));

fn alternation() -> String {
    // Longest names first so `say-as` wins over `s`.
    let mut names: Vec<&str> = RESERVED_TAGS.to_vec();
    names.sort_by_key(|name| std::cmp::Reverse(name.len()));
    names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|")
}

/// A complete markup tag found in a narration text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupTag {
    /// Byte range of the tag, angle brackets included.
    pub range: Range<usize>,
    /// Lowercased tag name.
    pub name: String,
    /// Whether this is a closing tag (`</name>`).
    pub closing: bool,
    /// Raw attribute text between the name and the closing bracket.
    pub attributes: String,
}

impl MarkupTag {
    /// Pause length carried by a `<break time="...">` tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedtime_core::tag_spans;
    /// use std::time::Duration;
    ///
    /// let tags = tag_spans(r#"Wait <break time="750ms"/> now"#);
    /// assert_eq!(tags[0].break_time(), Some(Duration::from_millis(750)));
    /// ```
    pub fn break_time(&self) -> Option<Duration> {
        if self.name != "break" {
            return None;
        }
        let caps = BREAK_TIME.captures(&self.attributes)?;
        let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
        let millis = match caps.get(2)?.as_str().to_ascii_lowercase().as_str() {
            "s" => amount * 1000.0,
            _ => amount,
        };
        Some(Duration::from_millis(millis.round() as u64))
    }
}

/// Locate every complete markup tag in `text`, in order.
///
/// Only a single scan is made: the spans are those a narration engine would
/// skip when vocalizing exactly this text.
pub fn tag_spans(text: &str) -> Vec<MarkupTag> {
    COMPLETE_TAG
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(MarkupTag {
                range: whole.range(),
                name: caps.get(2)?.as_str().to_ascii_lowercase(),
                closing: !caps.get(1)?.as_str().is_empty(),
                attributes: caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default(),
            })
        })
        .collect()
}

/// Whether `text` contains any reserved markup tag.
pub fn contains_markup(text: &str) -> bool {
    COMPLETE_TAG.is_match(text)
}

/// Strip narration markup from `text` and normalize the surrounding whitespace.
///
/// Pause tags and sentence wrappers become a single space, paragraph wrappers
/// become a paragraph break, everything else in [`RESERVED_TAGS`] disappears.
/// A tag cut off at the end of the text (common mid-stream) is dropped too.
/// Runs of spaces collapse, paragraphs are kept, and the result is trimmed.
///
/// Malformed input never fails; it degrades to best-effort plain text.
///
/// # Examples
///
/// ```
/// use bedtime_core::sanitize;
///
/// let plain = sanitize("Hello <break time=\"500ms\"/> world");
/// assert_eq!(plain, "Hello world");
/// assert_eq!(sanitize(&plain), plain);
/// ```
pub fn sanitize(text: &str) -> String {
    let mut current = text.to_string();
    // Every pass that changes the text shortens it, so this terminates at a
    // fixpoint; nested tags like `<emph<mark/>asis>` need more than one pass.
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn sanitize_pass(text: &str) -> String {
    let stripped = COMPLETE_TAG.replace_all(text, |caps: &Captures<'_>| {
        let name = caps
            .get(2)
            .map(|m| m.as_str().to_ascii_lowercase())
            .unwrap_or_default();
        match name.as_str() {
            "break" | "s" => " ",
            "p" => "\n\n",
            _ => "",
        }
    });
    let stripped = TRAILING_PARTIAL_TAG.replace(&stripped, "");
    let spaced = HORIZONTAL_SPACE.replace_all(&stripped, " ");
    let lines = SPACE_AROUND_NEWLINE.replace_all(&spaced, "\n");
    let paragraphs = EXCESS_NEWLINES.replace_all(&lines, "\n\n");
    paragraphs.trim().to_string()
}

/// Serde helper applying [`sanitize`] while decoding a text field.
pub(crate) fn deserialize_sanitized<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
    Ok(sanitize(&raw))
}

/// Serde helper applying [`sanitize`] to an optional text field.
pub(crate) fn deserialize_sanitized_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = <Option<String> as serde::Deserialize>::deserialize(deserializer)?;
    Ok(raw.map(|text| sanitize(&text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_pause_marker() {
        assert_eq!(sanitize("Hello <break time=\"500ms\"/> world"), "Hello world");
    }

    #[test]
    fn test_strips_wrappers_and_keeps_paragraphs() {
        let text = "<speak><p><s>Once upon a time.</s></p><p>The <emphasis level=\"strong\">end</emphasis>.</p></speak>";
        assert_eq!(sanitize(text), "Once upon a time.\n\nThe end.");
    }

    #[test]
    fn test_nested_tag_fragments() {
        let text = "A <emph<mark name=\"m1\"/>asis>brave</emphasis> fox";
        let clean = sanitize(text);
        assert!(!contains_markup(&clean));
        assert_eq!(clean, "A brave fox");
    }

    #[test]
    fn test_trailing_partial_tag_dropped() {
        assert_eq!(sanitize("The fox ran <prosody rate=\"sl"), "The fox ran");
        assert_eq!(sanitize("The fox ran <"), "The fox ran");
        assert_eq!(sanitize("The fox ran </emp"), "The fox ran");
    }

    #[test]
    fn test_non_markup_angle_brackets_survive() {
        assert_eq!(sanitize("I <3 my cat"), "I <3 my cat");
        assert_eq!(sanitize("<pause> is not ours"), "<pause> is not ours");
    }

    #[test]
    fn test_case_insensitive_tags() {
        assert_eq!(sanitize("<EMPHASIS>Loud</Emphasis> noise"), "Loud noise");
    }

    #[test]
    fn test_idempotent_on_tricky_inputs() {
        let inputs = [
            "",
            "   ",
            "plain text",
            "a  <break/>  b",
            "x <   ",
            "<p>\n\n\n<p>one</p>\n \n</p>",
            "<s><s><s>deep</s></s></s>",
            "<voice name=\"a\"><prosody pitch=\"+5%\">hi</prosody></voice>\t\tthere",
            "<br<break/>eak/>",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", input);
            assert!(!contains_markup(&once), "markup left in {:?}", once);
        }
    }

    #[test]
    fn test_tag_spans_report_ranges() {
        let text = "<emphasis>Hi</emphasis> Sam";
        let spans = tag_spans(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].range, 0..10);
        assert!(!spans[0].closing);
        assert_eq!(spans[1].range, 12..23);
        assert!(spans[1].closing);
        assert_eq!(spans[1].name, "emphasis");
    }

    #[test]
    fn test_break_time_in_seconds() {
        let spans = tag_spans("<break time=\"1.5s\"/>");
        assert_eq!(spans[0].break_time(), Some(Duration::from_millis(1500)));
        let spans = tag_spans("<break/>");
        assert_eq!(spans[0].break_time(), None);
    }
}
