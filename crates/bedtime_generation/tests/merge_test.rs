//! Property-style tests for the partial record merger.

use bedtime_core::{contains_markup, PartialStoryRecord, StoryField};
use bedtime_generation::merge;
use strum::IntoEnumIterator;

fn record(values: [Option<&str>; 5]) -> PartialStoryRecord {
    let mut record = PartialStoryRecord::default();
    for (field, value) in StoryField::iter().zip(values) {
        *record.field_mut(field) = value.map(str::to_string);
    }
    record
}

#[test]
fn test_population_is_monotonic() {
    let sequence = [
        record([Some("The"), None, None, None, None]),
        record([Some(""), Some("🦊"), Some("   "), None, None]),
        record([None, None, Some("Once"), None, Some("")]),
        record([Some("The Fox"), Some(""), None, Some("<speak>Once</speak>"), None]),
        record([None, None, Some("<break/>"), None, Some("A den")]),
        record([Some("  "), None, Some("Once upon a time"), Some(""), None]),
        PartialStoryRecord::default(),
    ];

    let mut snapshot = PartialStoryRecord::default();
    for incoming in &sequence {
        let next = merge(&snapshot, incoming);
        for field in StoryField::iter() {
            if snapshot.is_populated(field) {
                assert!(next.is_populated(field), "{} reverted after {:?}", field, incoming);
            }
        }
        snapshot = next;
    }
    assert_eq!(snapshot.populated_fields().len(), 5);
    assert_eq!(snapshot.title.as_deref(), Some("The Fox"));
}

#[test]
fn test_content_never_holds_markup() {
    let inputs = [
        "Hello <break time=\"500ms\"/> world",
        "<speak><p><s>One</s><s>Two</s></p></speak>",
        "<emphasis><prosody rate=\"slow\">slow</prosody></emphasis> and <voice name=\"x\">deep",
        "<emph<emphasis>asis>nested</emphasis>",
        "<pro<break/>sody>odd</prosody>",
        "Tail <prosody rate=\"sl",
        "<SPEAK>loud</SPEAK>",
    ];
    for input in inputs {
        let incoming = PartialStoryRecord {
            content: Some(input.to_string()),
            ..Default::default()
        };
        let merged = merge(&PartialStoryRecord::default(), &incoming);
        if let Some(content) = merged.content.as_deref() {
            assert!(!contains_markup(content), "markup left in {:?}", content);
        }
    }
}

#[test]
fn test_markup_content_is_kept_verbatim() {
    let incoming = PartialStoryRecord {
        markup_content: Some("<emphasis>Hi</emphasis> Sam".to_string()),
        ..Default::default()
    };
    let merged = merge(&PartialStoryRecord::default(), &incoming);
    assert_eq!(merged.markup_content.as_deref(), Some("<emphasis>Hi</emphasis> Sam"));
}
