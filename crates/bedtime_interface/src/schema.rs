//! Explicit story schema passed to schema-constrained models.
//!
//! The schema is a plain value: an ordered list of field specs, each with a
//! wire name, a kind, a required flag and an optional validator. Streamed
//! items are checked against it one at a time.

use bedtime_core::{FinalizedStory, PartialStoryRecord, StoryField};
use bedtime_error::{GenerationError, GenerationResult};
use derive_getters::Getters;
use serde_json::{json, Map, Value};
use unicode_segmentation::UnicodeSegmentation;

/// Value type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum FieldKind {
    /// Free text
    #[display("string")]
    Text,
    /// Exactly one user-perceived character
    #[display("glyph")]
    Glyph,
}

/// Extra check run on a non-empty field value; returns a reason on failure.
pub type FieldValidator = fn(&str) -> Result<(), String>;

/// One field of the story schema.
#[derive(Debug, Clone, Getters)]
pub struct FieldSpec {
    /// Which record field this describes
    field: StoryField,
    /// Value type
    kind: FieldKind,
    /// Whether a finalized story must carry it
    required: bool,
    /// Guidance given to the model
    description: &'static str,
    /// Optional additional check
    validator: Option<FieldValidator>,
}

impl FieldSpec {
    /// Describe a field.
    pub fn new(
        field: StoryField,
        kind: FieldKind,
        required: bool,
        description: &'static str,
        validator: Option<FieldValidator>,
    ) -> Self {
        Self {
            field,
            kind,
            required,
            description,
            validator,
        }
    }

    fn check(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            return Ok(());
        }
        if self.kind == FieldKind::Glyph && value.graphemes(true).count() != 1 {
            return Err(format!("`{}` must be a single glyph, got {:?}", self.field, value));
        }
        match self.validator {
            Some(validator) => validator(value),
            None => Ok(()),
        }
    }
}

/// The declared structure of a generated story.
///
/// # Examples
///
/// ```
/// use bedtime_interface::StorySchema;
/// use serde_json::json;
///
/// let schema = StorySchema::story();
/// let record = schema.validate(&json!({"title": "The Fox", "emoji": "🦊"})).unwrap();
/// assert_eq!(record.emoji.as_deref(), Some("🦊"));
///
/// assert!(schema.validate(&json!({"emoji": "🦊🐻"})).is_err());
/// assert!(schema.validate(&json!(["not", "an", "object"])).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct StorySchema {
    name: &'static str,
    fields: Vec<FieldSpec>,
}

impl StorySchema {
    /// The story schema: title, emoji and content required; markup and illustration optional.
    pub fn story() -> Self {
        Self {
            name: "Story",
            fields: vec![
                FieldSpec::new(
                    StoryField::Title,
                    FieldKind::Text,
                    true,
                    "A short, warm title for the story",
                    None,
                ),
                FieldSpec::new(
                    StoryField::Emoji,
                    FieldKind::Glyph,
                    true,
                    "One emoji that captures the story",
                    None,
                ),
                FieldSpec::new(
                    StoryField::Content,
                    FieldKind::Text,
                    true,
                    "The full story as plain text with paragraphs, no markup",
                    None,
                ),
                FieldSpec::new(
                    StoryField::MarkupContent,
                    FieldKind::Text,
                    false,
                    "The same story with SSML pauses and emphasis for narration",
                    None,
                ),
                FieldSpec::new(
                    StoryField::IllustrationDescription,
                    FieldKind::Text,
                    false,
                    "A scene for an illustration: animals, objects and places only, no people",
                    None,
                ),
            ],
        }
    }

    /// Schema name.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Field specs in order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Fields a finalized story must carry.
    pub fn required_fields(&self) -> Vec<StoryField> {
        self.fields
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.field)
            .collect()
    }

    /// Check one streamed item and convert it to a partial record.
    ///
    /// Keys outside the schema are ignored. `null` counts as absent.
    ///
    /// # Errors
    ///
    /// Returns a schema violation if the item is not an object, a known field
    /// is not a string, or a field fails its kind or validator check.
    pub fn validate(&self, item: &Value) -> GenerationResult<PartialStoryRecord> {
        let object = item
            .as_object()
            .ok_or_else(|| GenerationError::schema(format!("item is not an object: {}", item)))?;

        let mut record = PartialStoryRecord::default();
        for spec in &self.fields {
            let value = match object.get(spec.field.wire_name()) {
                None | Some(Value::Null) => continue,
                Some(Value::String(text)) => text,
                Some(other) => {
                    return Err(GenerationError::schema(format!(
                        "`{}` must be a {}, got {}",
                        spec.field, spec.kind, other
                    )));
                }
            };
            spec.check(value).map_err(|reason| GenerationError::schema(reason))?;
            *record.field_mut(spec.field) = Some(value.clone());
        }
        Ok(record)
    }

    /// Freeze a partial record, enforcing the required fields.
    ///
    /// # Errors
    ///
    /// Returns a schema violation naming any required field still missing.
    pub fn finalize(&self, partial: &PartialStoryRecord) -> GenerationResult<FinalizedStory> {
        let missing: Vec<String> = self
            .required_fields()
            .into_iter()
            .filter(|field| !partial.is_populated(*field))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(GenerationError::schema(format!(
                "stream ended without required fields: {}",
                missing.join(", ")
            )));
        }
        FinalizedStory::try_from(partial)
    }

    /// Render as a JSON Schema document for transports that need one.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for spec in &self.fields {
            let mut property = json!({
                "type": "string",
                "description": spec.description,
            });
            if spec.kind == FieldKind::Glyph {
                property["maxLength"] = json!(16);
            }
            properties.insert(spec.field.wire_name().to_string(), property);
        }
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.field.wire_name())
            .collect();

        json!({
            "title": self.name,
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

impl Default for StorySchema {
    fn default() -> Self {
        Self::story()
    }
}
