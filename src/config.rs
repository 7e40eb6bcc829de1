use crate::session::SessionConfig;
use crate::voice::{AssistantSettings, Voice};
use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub voice: VoiceConfig,
    pub assistant: AssistantSettings,
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "sona".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Public API key of the voice service
    pub public_key: String,
    pub nats_url: String,
    pub start_delay_ms: u64,
    pub voices: Vec<Voice>,
    /// Voice id selected at startup; first catalogue entry when unset
    pub default_voice: Option<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            public_key: String::new(),
            nats_url: "nats://localhost:4222".to_string(),
            start_delay_ms: 1000,
            voices: SessionConfig::default_voices(),
            default_voice: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory for saved conversations; `~` is expanded
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "~/.sona".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn resolved_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.path).into_owned())
    }
}

impl Config {
    /// Load from an optional config file, overlaid with `SONA__*` environment variables
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("SONA").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn session_config(&self) -> Result<SessionConfig> {
        if self.voice.voices.is_empty() {
            anyhow::bail!("No voices configured");
        }

        let default_voice = match &self.voice.default_voice {
            Some(id) => self
                .voice
                .voices
                .iter()
                .find(|v| &v.voice_id == id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Default voice {} is not in the voice list", id))?,
            None => self.voice.voices[0].clone(),
        };

        Ok(SessionConfig {
            start_delay: Duration::from_millis(self.voice.start_delay_ms),
            voices: self.voice.voices.clone(),
            default_voice,
            assistant: self.assistant.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let cfg = Config::load("/nonexistent/sona-config").unwrap();

        assert_eq!(cfg.service.http.port, 8787);
        assert_eq!(cfg.voice.start_delay_ms, 1000);
        assert_eq!(cfg.assistant.model.model, "gpt-4-turbo");
        assert!(!cfg.voice.voices.is_empty());
    }

    #[test]
    fn test_session_config_picks_default_voice() {
        let mut cfg = Config::default();
        cfg.voice.default_voice = Some("will".to_string());

        let session = cfg.session_config().unwrap();
        assert_eq!(session.default_voice.voice_id, "will");
        assert_eq!(session.start_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_session_config_rejects_unknown_default_voice() {
        let mut cfg = Config::default();
        cfg.voice.default_voice = Some("nobody".to_string());

        assert!(cfg.session_config().is_err());
    }
}
