//! Story request parameters.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Reading-age bracket of the listener.
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
#[serde(rename_all = "snake_case")]
pub enum AgeBracket {
    /// Ages 2 to 4
    #[display("2-4")]
    Toddler,
    /// Ages 5 to 7
    #[display("5-7")]
    EarlyReader,
    /// Ages 8 to 10
    #[display("8-10")]
    MiddleGrade,
    /// Ages 11 to 13
    #[display("11-13")]
    Preteen,
}

impl AgeBracket {
    /// Bracket containing a given age in years; ages past 13 use the oldest bracket.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedtime_core::AgeBracket;
    ///
    /// assert_eq!(AgeBracket::from_age(6), AgeBracket::EarlyReader);
    /// assert_eq!(AgeBracket::from_age(1), AgeBracket::Toddler);
    /// ```
    pub fn from_age(age: u8) -> Self {
        match age {
            0..=4 => AgeBracket::Toddler,
            5..=7 => AgeBracket::EarlyReader,
            8..=10 => AgeBracket::MiddleGrade,
            _ => AgeBracket::Preteen,
        }
    }
}

/// How the story should refer to the child.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Pronouns {
    /// he/him/his
    #[display("he/him")]
    He,
    /// she/her/her
    #[display("she/her")]
    She,
    /// they/them/their
    #[display("they/them")]
    They,
    /// No preference given
    #[default]
    #[display("unspecified")]
    Unspecified,
}

impl Pronouns {
    /// Subject, object and possessive forms; unspecified falls back to they/them/their.
    pub fn forms(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            Pronouns::He => ("he", "him", "his"),
            Pronouns::She => ("she", "her", "her"),
            Pronouns::They | Pronouns::Unspecified => ("they", "them", "their"),
        }
    }
}

/// Emotional register of the story.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Soft and reassuring
    #[default]
    #[display("gentle")]
    Gentle,
    /// Playful and funny
    #[display("silly")]
    Silly,
    /// Exciting but never scary
    #[display("adventurous")]
    Adventurous,
    /// Slow and drowsy, for winding down
    #[display("sleepy")]
    Sleepy,
    /// Wondering and exploratory
    #[display("curious")]
    Curious,
}

/// Requested story length.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum StoryLength {
    /// A few paragraphs
    #[display("short")]
    Short,
    /// The usual bedtime length
    #[default]
    #[display("medium")]
    Medium,
    /// A longer tale
    #[display("long")]
    Long,
}

/// Everything the caller specifies about the story to generate.
///
/// Immutable once built; the builder is the only way to assemble one.
///
/// # Examples
///
/// ```
/// use bedtime_core::{AgeBracket, Pronouns, StoryRequestParameters, Tone};
///
/// let params = StoryRequestParameters::builder()
///     .child_name("Sam")
///     .age(AgeBracket::EarlyReader)
///     .pronouns(Pronouns::They)
///     .tone(Tone::Silly)
///     .setting("a treehouse")
///     .build()
///     .unwrap();
///
/// assert_eq!(params.child_name(), "Sam");
/// assert!(params.notes().is_none());
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct StoryRequestParameters {
    /// Child's name as it should appear in the story
    child_name: String,
    /// Age bracket driving vocabulary and voice
    age: AgeBracket,
    /// Pronoun preference
    #[builder(default)]
    pronouns: Pronouns,
    /// Story tone
    #[builder(default)]
    tone: Tone,
    /// Where the story takes place
    setting: String,
    /// Target length
    #[builder(default)]
    length: StoryLength,
    /// Free-text customization notes
    #[builder(default, setter(into, strip_option))]
    notes: Option<String>,
}

impl StoryRequestParameters {
    /// Creates a new parameters builder.
    pub fn builder() -> StoryRequestParametersBuilder {
        StoryRequestParametersBuilder::default()
    }
}
