//! CLI command definitions.

use bedtime::{
    AgeBracket, BedtimeConfig, Pronouns, StoryLength, StoryRequestParameters, Tone,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Bedtime - personalized children's stories, generated and read aloud
#[derive(Parser, Debug)]
#[command(name = "bedtime")]
#[command(about = "Personalized children's stories, generated and read aloud", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a story from a recorded model stream
    Tell(TellArgs),

    /// Print the prompt a story request would send
    Prompt {
        #[command(flatten)]
        story: StoryArgs,

        /// Show the regeneration prompt for this change instead
        #[arg(long)]
        revise: Option<String>,
    },

    /// Print the effective configuration
    Config,
}

/// Arguments for `bedtime tell`
#[derive(Args, Debug)]
pub struct TellArgs {
    #[command(flatten)]
    pub story: StoryArgs,

    /// JSON Lines file of partial story items
    #[arg(long)]
    pub script: PathBuf,

    /// Delay between streamed items, in milliseconds
    #[arg(long, default_value = "0")]
    pub item_delay_ms: u64,

    /// Read the story aloud with word highlighting
    #[arg(long)]
    pub narrate: bool,

    /// Override the narration pace
    #[arg(long)]
    pub wpm: Option<u32>,
}

/// Story request fields shared by commands
#[derive(Args, Debug, Clone)]
pub struct StoryArgs {
    /// Child's name
    #[arg(long)]
    pub name: String,

    /// Child's age in years
    #[arg(long)]
    pub age: u8,

    /// Pronouns to use for the child
    #[arg(long, value_enum, default_value = "unspecified")]
    pub pronouns: PronounsArg,

    /// Story tone (configured default when omitted)
    #[arg(long, value_enum)]
    pub tone: Option<ToneArg>,

    /// Where the story takes place
    #[arg(long)]
    pub setting: String,

    /// Story length
    #[arg(long, value_enum, default_value = "medium")]
    pub length: LengthArg,

    /// Extra things to include
    #[arg(long)]
    pub notes: Option<String>,
}

impl StoryArgs {
    /// Build request parameters, filling the tone from configuration.
    pub fn parameters(
        &self,
        config: &BedtimeConfig,
    ) -> Result<StoryRequestParameters, Box<dyn std::error::Error>> {
        let tone = self
            .tone
            .map(Tone::from)
            .unwrap_or(*config.story().default_tone());
        let mut builder = StoryRequestParameters::builder();
        builder
            .child_name(self.name.trim())
            .age(AgeBracket::from_age(self.age))
            .pronouns(Pronouns::from(self.pronouns))
            .tone(tone)
            .setting(self.setting.trim())
            .length(StoryLength::from(self.length));
        if let Some(notes) = &self.notes {
            builder.notes(notes.as_str());
        }
        Ok(builder.build()?)
    }
}

/// Pronoun choices
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum PronounsArg {
    /// he/him
    He,
    /// she/her
    She,
    /// they/them
    They,
    /// No preference
    Unspecified,
}

impl From<PronounsArg> for Pronouns {
    fn from(arg: PronounsArg) -> Self {
        match arg {
            PronounsArg::He => Pronouns::He,
            PronounsArg::She => Pronouns::She,
            PronounsArg::They => Pronouns::They,
            PronounsArg::Unspecified => Pronouns::Unspecified,
        }
    }
}

/// Tone choices
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ToneArg {
    /// Soft and reassuring
    Gentle,
    /// Playful and funny
    Silly,
    /// Exciting but never scary
    Adventurous,
    /// Slow and drowsy
    Sleepy,
    /// Full of wonder
    Curious,
}

impl From<ToneArg> for Tone {
    fn from(arg: ToneArg) -> Self {
        match arg {
            ToneArg::Gentle => Tone::Gentle,
            ToneArg::Silly => Tone::Silly,
            ToneArg::Adventurous => Tone::Adventurous,
            ToneArg::Sleepy => Tone::Sleepy,
            ToneArg::Curious => Tone::Curious,
        }
    }
}

/// Length choices
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LengthArg {
    /// A few paragraphs
    Short,
    /// The usual length
    Medium,
    /// A longer tale
    Long,
}

impl From<LengthArg> for StoryLength {
    fn from(arg: LengthArg) -> Self {
        match arg {
            LengthArg::Short => StoryLength::Short,
            LengthArg::Medium => StoryLength::Medium,
            LengthArg::Long => StoryLength::Long,
        }
    }
}
