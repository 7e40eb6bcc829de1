use crate::voice::{AssistantSettings, Voice};
use std::time::Duration;

/// Configuration for the session controller
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Pause between entering `connecting` and calling the voice client
    /// Default: 1 second
    pub start_delay: Duration,

    /// Voices the user may pick from
    pub voices: Vec<Voice>,

    /// Voice selected at startup (should be one of `voices`)
    pub default_voice: Voice,

    /// Persona handed to the voice client on every start
    pub assistant: AssistantSettings,
}

impl SessionConfig {
    /// Built-in voice catalogue
    pub fn default_voices() -> Vec<Voice> {
        ["jennifer", "melissa", "will", "chris"]
            .into_iter()
            .map(|id| Voice::new("playht", id))
            .collect()
    }

    pub fn find_voice(&self, voice_id: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.voice_id == voice_id)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        let voices = Self::default_voices();
        Self {
            start_delay: Duration::from_millis(1000),
            default_voice: voices[0].clone(),
            voices,
            assistant: AssistantSettings::default(),
        }
    }
}
