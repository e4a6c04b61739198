//! Partial and finalized story records.

use crate::markup::{deserialize_sanitized, deserialize_sanitized_opt};
use bedtime_error::GenerationError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// The fields a story record carries, in schema order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum StoryField {
    /// Story title
    #[display("title")]
    Title,
    /// Single-glyph emoji
    #[display("emoji")]
    Emoji,
    /// Plain story text
    #[display("content")]
    Content,
    /// Markup-enhanced narration text
    #[display("markupContent")]
    MarkupContent,
    /// Illustration description
    #[display("illustrationDescription")]
    IllustrationDescription,
}

impl StoryField {
    /// Field name as it appears on the wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            StoryField::Title => "title",
            StoryField::Emoji => "emoji",
            StoryField::Content => "content",
            StoryField::MarkupContent => "markupContent",
            StoryField::IllustrationDescription => "illustrationDescription",
        }
    }

    /// Look a field up by its wire name.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        StoryField::iter().find(|field| field.wire_name() == name)
    }
}

/// A generation-in-progress snapshot: any field may still be missing.
///
/// `content` is plain text; decoding one from JSON sanitizes it.
///
/// # Examples
///
/// ```
/// use bedtime_core::{PartialStoryRecord, StoryField};
///
/// let record: PartialStoryRecord =
///     serde_json::from_str(r#"{"title": "The Fox", "content": "Hi <break/> there"}"#).unwrap();
///
/// assert_eq!(record.content.as_deref(), Some("Hi there"));
/// assert_eq!(record.populated_fields(), vec![StoryField::Title, StoryField::Content]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialStoryRecord {
    /// Story title, never containing markup
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_sanitized_opt"
    )]
    pub title: Option<String>,
    /// Single-glyph emoji
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Plain story text, never containing markup
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_sanitized_opt"
    )]
    pub content: Option<String>,
    /// Markup-enhanced narration text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup_content: Option<String>,
    /// Illustration description, free of human figures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub illustration_description: Option<String>,
}

impl PartialStoryRecord {
    /// Value of a field, if present.
    pub fn field(&self, field: StoryField) -> Option<&str> {
        match field {
            StoryField::Title => self.title.as_deref(),
            StoryField::Emoji => self.emoji.as_deref(),
            StoryField::Content => self.content.as_deref(),
            StoryField::MarkupContent => self.markup_content.as_deref(),
            StoryField::IllustrationDescription => self.illustration_description.as_deref(),
        }
    }

    /// Mutable slot for a field.
    pub fn field_mut(&mut self, field: StoryField) -> &mut Option<String> {
        match field {
            StoryField::Title => &mut self.title,
            StoryField::Emoji => &mut self.emoji,
            StoryField::Content => &mut self.content,
            StoryField::MarkupContent => &mut self.markup_content,
            StoryField::IllustrationDescription => &mut self.illustration_description,
        }
    }

    /// A field counts as populated when it holds non-blank text.
    pub fn is_populated(&self, field: StoryField) -> bool {
        self.field(field).is_some_and(|value| !value.trim().is_empty())
    }

    /// Populated fields in schema order.
    pub fn populated_fields(&self) -> Vec<StoryField> {
        StoryField::iter().filter(|f| self.is_populated(*f)).collect()
    }

    /// Fields populated here but not in `previous`.
    pub fn newly_populated(&self, previous: &PartialStoryRecord) -> Vec<StoryField> {
        StoryField::iter()
            .filter(|f| self.is_populated(*f) && !previous.is_populated(*f))
            .collect()
    }

    /// Whether no field is populated.
    pub fn is_empty(&self) -> bool {
        self.populated_fields().is_empty()
    }
}

/// A completed story; the sole input to narration and persistence.
///
/// # Examples
///
/// ```
/// use bedtime_core::{FinalizedStory, PartialStoryRecord};
///
/// let partial = PartialStoryRecord {
///     title: Some("The Fox".to_string()),
///     emoji: Some("🦊".to_string()),
///     content: Some("Once upon a time...".to_string()),
///     ..Default::default()
/// };
///
/// let story = FinalizedStory::try_from(&partial).unwrap();
/// assert_eq!(story.title(), "The Fox");
/// assert_eq!(story.narration_text(), "Once upon a time...");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedStory {
    /// Story title
    #[serde(deserialize_with = "deserialize_sanitized")]
    title: String,
    /// Single-glyph emoji
    emoji: String,
    /// Plain story text
    #[serde(deserialize_with = "deserialize_sanitized")]
    content: String,
    /// Markup-enhanced narration text, when the model supplied one
    #[serde(default)]
    markup_content: Option<String>,
    /// Illustration description, when the model supplied one
    #[serde(default)]
    illustration_description: Option<String>,
}

impl FinalizedStory {
    /// Text the narration engine should receive for the body: markup when present, else plain content.
    pub fn narration_text(&self) -> &str {
        self.markup_content
            .as_deref()
            .filter(|markup| !markup.trim().is_empty())
            .unwrap_or(&self.content)
    }
}

impl TryFrom<&PartialStoryRecord> for FinalizedStory {
    type Error = GenerationError;

    fn try_from(partial: &PartialStoryRecord) -> Result<Self, Self::Error> {
        let required = [StoryField::Title, StoryField::Emoji, StoryField::Content];
        let missing: Vec<String> = required
            .iter()
            .filter(|f| !partial.is_populated(**f))
            .map(|f| f.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(GenerationError::schema(format!(
                "stream ended without required fields: {}",
                missing.join(", ")
            )));
        }

        let text = |field: StoryField| partial.field(field).unwrap_or_default().trim().to_string();
        let optional = |field: StoryField| {
            partial
                .is_populated(field)
                .then(|| partial.field(field).unwrap_or_default().to_string())
        };

        Ok(Self {
            title: crate::sanitize(&text(StoryField::Title)),
            emoji: text(StoryField::Emoji),
            content: crate::sanitize(&text(StoryField::Content)),
            markup_content: optional(StoryField::MarkupContent),
            illustration_description: optional(StoryField::IllustrationDescription),
        })
    }
}

impl From<&FinalizedStory> for PartialStoryRecord {
    fn from(story: &FinalizedStory) -> Self {
        Self {
            title: Some(story.title.clone()),
            emoji: Some(story.emoji.clone()),
            content: Some(story.content.clone()),
            markup_content: story.markup_content.clone(),
            illustration_description: story.illustration_description.clone(),
        }
    }
}
