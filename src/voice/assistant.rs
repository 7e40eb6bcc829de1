use crate::transcript::Role;
use serde::{Deserialize, Serialize};

const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly and engaging interactive storyteller AI. \
Your job is to welcome the user warmly, explain that you have a vast collection of exciting, \
mysterious, funny, and adventurous stories, and ask them what kind of story they would like to \
hear today. Use a fun and imaginative tone to spark their curiosity.";

const DEFAULT_FIRST_MESSAGE: &str = "Hi there, adventurer! I'm your AI storyteller with tales \
from every corner of imagination: mysteries, fantasies, comedies, and more! So, what kind of \
story are you in the mood for today? Something magical, spooky, heroic, or maybe downright silly? \
I'm all ears!";

/// A selectable text-to-speech voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    pub provider: String,
    #[serde(alias = "voiceid", alias = "voice_id")]
    pub voice_id: String,
}

impl Voice {
    pub fn new(provider: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            voice_id: voice_id.into(),
        }
    }
}

/// Message seeding the language model's conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub messages: Vec<SeedMessage>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4-turbo".to_string(),
            messages: vec![SeedMessage {
                role: Role::System,
                content: DEFAULT_SYSTEM_PROMPT.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriberConfig {
    pub provider: String,
    pub model: String,
    pub language: String,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            provider: "deepgram".to_string(),
            model: "nova-2".to_string(),
            language: "en-US".to_string(),
        }
    }
}

/// Everything the voice client needs to start a call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    pub model: ModelConfig,
    pub voice: Voice,
    pub transcriber: TranscriberConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_message: Option<String>,
}

/// Assistant persona, fixed for the lifetime of the process
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    pub model: ModelConfig,
    pub transcriber: TranscriberConfig,
    pub first_message: Option<String>,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            transcriber: TranscriberConfig::default(),
            first_message: Some(DEFAULT_FIRST_MESSAGE.to_string()),
        }
    }
}

impl AssistantSettings {
    /// Start configuration speaking with `voice`
    pub fn for_voice(&self, voice: &Voice) -> AssistantConfig {
        AssistantConfig {
            model: self.model.clone(),
            voice: voice.clone(),
            transcriber: self.transcriber.clone(),
            first_message: self.first_message.clone(),
        }
    }
}
