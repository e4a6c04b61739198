//! Prompt construction from story request parameters.

use bedtime_config::{BedtimeConfig, WordTargets};
use bedtime_core::{AgeBracket, FinalizedStory, Pronouns, StoryRequestParameters, Tone};
use bedtime_interface::StoryPrompt;
use derive_getters::Getters;
use tracing::debug;

const INSTRUCTIONS: &str = "You are a warm, imaginative storyteller writing bedtime stories for children. \
Every story must be safe and comforting: no violence, no real danger, nothing frightening at the end. \
Write `content` as plain text in paragraphs with no markup of any kind. \
Write `markupContent` as the same story with SSML tags such as <break time=\"500ms\"/>, \
<emphasis> and <prosody> to guide a narrator. \
Choose exactly one emoji for `emoji`. \
Write `illustrationDescription` as a single scene showing only animals, objects and places: \
never describe people, human figures, faces or body parts.";

/// Builds deterministic prompts: the same parameters always give the same prompt.
///
/// # Examples
///
/// ```
/// use bedtime_core::{AgeBracket, StoryLength, StoryRequestParameters};
/// use bedtime_generation::PromptBuilder;
///
/// let params = StoryRequestParameters::builder()
///     .child_name("Sam")
///     .age(AgeBracket::Toddler)
///     .setting("a forest")
///     .length(StoryLength::Short)
///     .build()
///     .unwrap();
///
/// let prompt = PromptBuilder::default().story_prompt(&params);
/// assert!(prompt.prompt.contains("about 300 words"));
/// assert!(prompt.prompt.contains("they/them/their"));
/// ```
#[derive(Debug, Clone, Default, Getters)]
pub struct PromptBuilder {
    /// Word counts asked for per length
    word_targets: WordTargets,
    /// Sampling temperature forwarded with every prompt
    temperature: Option<f32>,
}

impl PromptBuilder {
    /// Create a builder with the given word targets.
    pub fn new(word_targets: WordTargets) -> Self {
        Self {
            word_targets,
            temperature: None,
        }
    }

    /// Builder using the configured word targets and temperature.
    pub fn from_config(config: &BedtimeConfig) -> Self {
        Self::new(*config.story().word_targets())
            .with_temperature(*config.generation().temperature())
    }

    /// Forward a sampling temperature with every prompt.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Prompt for a fresh story.
    pub fn story_prompt(&self, params: &StoryRequestParameters) -> StoryPrompt {
        let prompt = self.request_lines(params).join("\n");
        debug!(chars = prompt.len(), "Built story prompt");
        StoryPrompt {
            instructions: INSTRUCTIONS.to_string(),
            prompt,
            temperature: self.temperature,
        }
    }

    /// Prompt for a modified version of `prior`.
    ///
    /// The request lines are the same as for a fresh story, followed by the
    /// previous story and the requested change.
    pub fn regeneration_prompt(
        &self,
        params: &StoryRequestParameters,
        prior: &FinalizedStory,
        instruction: &str,
    ) -> StoryPrompt {
        let mut lines = self.request_lines(params);
        lines.push(String::new());
        lines.push(format!("Here is the previous story, titled \"{}\":", prior.title()));
        lines.push(prior.content().clone());
        lines.push(String::new());
        lines.push(format!(
            "Rewrite the whole story with this change: {}",
            instruction.trim()
        ));
        lines.push("Keep everything the change does not touch, and give it a fresh title and emoji if they no longer fit.".to_string());

        let prompt = lines.join("\n");
        debug!(chars = prompt.len(), "Built regeneration prompt");
        StoryPrompt {
            instructions: INSTRUCTIONS.to_string(),
            prompt,
            temperature: self.temperature,
        }
    }

    fn request_lines(&self, params: &StoryRequestParameters) -> Vec<String> {
        let name = params.child_name().trim();
        let mut lines = vec![
            format!(
                "Write a {} bedtime story for {}, who is {} years old.",
                params.tone(),
                name,
                params.age()
            ),
            format!("{} is the hero of the story.", name),
            pronoun_instruction(name, *params.pronouns()),
            format!("The story takes place in {}.", params.setting().trim()),
            format!("Mood: {}", tone_guidance(*params.tone())),
            format!("Language: {}", vocabulary_guidance(*params.age())),
            format!(
                "Length: about {} words.",
                self.word_targets.for_length(*params.length())
            ),
        ];
        if let Some(notes) = params.notes().as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            lines.push(format!("Also include: {}", notes));
        }
        lines
    }
}

fn pronoun_instruction(name: &str, pronouns: Pronouns) -> String {
    let (subject, object, possessive) = pronouns.forms();
    match pronouns {
        Pronouns::Unspecified => format!(
            "Do not assume a gender for {}: use their name or {}/{}/{} pronouns.",
            name, subject, object, possessive
        ),
        _ => format!(
            "Refer to {} with {}/{}/{} pronouns.",
            name, subject, object, possessive
        ),
    }
}

fn vocabulary_guidance(age: AgeBracket) -> &'static str {
    match age {
        AgeBracket::Toddler => {
            "very simple words, short sentences, lots of repetition and fun sounds."
        }
        AgeBracket::EarlyReader => {
            "simple everyday words and short sentences, with one or two new words explained by context."
        }
        AgeBracket::MiddleGrade => {
            "a rich but clear vocabulary, varied sentences and a little gentle humor."
        }
        AgeBracket::Preteen => {
            "an engaging, mature vocabulary with vivid description and real emotional depth."
        }
    }
}

fn tone_guidance(tone: Tone) -> &'static str {
    match tone {
        Tone::Gentle => "soft, warm and reassuring.",
        Tone::Silly => "playful and funny, with harmless mix-ups and giggles.",
        Tone::Adventurous => "exciting and brave, but never scary.",
        Tone::Sleepy => "slow and drowsy, winding down toward sleep.",
        Tone::Curious => "full of wonder, questions and discoveries.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bedtime_core::{PartialStoryRecord, StoryLength};

    fn params(pronouns: Pronouns) -> StoryRequestParameters {
        StoryRequestParameters::builder()
            .child_name("Maya")
            .age(AgeBracket::MiddleGrade)
            .pronouns(pronouns)
            .tone(Tone::Adventurous)
            .setting("an underwater city")
            .length(StoryLength::Long)
            .notes("a pet octopus named Inky")
            .build()
            .unwrap()
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let builder = PromptBuilder::default();
        assert_eq!(
            builder.story_prompt(&params(Pronouns::She)),
            builder.story_prompt(&params(Pronouns::She))
        );
    }

    #[test]
    fn test_prompt_carries_every_parameter() {
        let prompt = PromptBuilder::new(WordTargets::new(100, 200, 400))
            .story_prompt(&params(Pronouns::She))
            .prompt;
        assert!(prompt.contains("adventurous"));
        assert!(prompt.contains("Maya"));
        assert!(prompt.contains("8-10"));
        assert!(prompt.contains("she/her/her"));
        assert!(prompt.contains("an underwater city"));
        assert!(prompt.contains("about 400 words"));
        assert!(prompt.contains("Inky"));
    }

    #[test]
    fn test_unspecified_pronouns_fall_back_to_neutral() {
        let prompt = PromptBuilder::default()
            .story_prompt(&params(Pronouns::Unspecified))
            .prompt;
        assert!(prompt.contains("Do not assume a gender"));
        assert!(prompt.contains("they/them/their"));
    }

    #[test]
    fn test_configured_temperature_is_forwarded() {
        let config = BedtimeConfig::bundled().unwrap();
        let prompt = PromptBuilder::from_config(&config).story_prompt(&params(Pronouns::He));
        assert_eq!(prompt.temperature, Some(0.8));
        assert!(prompt.prompt.contains("about 1000 words"));
    }

    #[test]
    fn test_instructions_forbid_human_figures() {
        let prompt = PromptBuilder::default().story_prompt(&params(Pronouns::They));
        assert!(prompt.instructions.contains("never describe people"));
    }

    #[test]
    fn test_regeneration_includes_prior_story() {
        let prior = FinalizedStory::try_from(&PartialStoryRecord {
            title: Some("Inky's Secret".to_string()),
            emoji: Some("🐙".to_string()),
            content: Some("Deep below the waves...".to_string()),
            ..Default::default()
        })
        .unwrap();
        let prompt = PromptBuilder::default()
            .regeneration_prompt(&params(Pronouns::She), &prior, " make it sillier ")
            .prompt;
        assert!(prompt.contains("Inky's Secret"));
        assert!(prompt.contains("Deep below the waves..."));
        assert!(prompt.contains("with this change: make it sillier"));
    }
}
