//! Beat metadata and the title format used for uploads and exports
use crate::error::{Result, TitleError};
use serde::{Deserialize, Serialize};

/// Musical keys a beat can be tagged with
pub const KEYS: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Scales a beat can be tagged with
pub const SCALES: [&str; 2] = ["Maj", "Min"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeatMetadata {
    pub key: String,
    pub scale: String,
    pub bpm: u32,
    pub collaborator: String,
}

impl Default for BeatMetadata {
    fn default() -> Self {
        Self {
            key: "D".to_string(),
            scale: "Min".to_string(),
            bpm: 130,
            collaborator: "@fgybeats".to_string(),
        }
    }
}

impl BeatMetadata {
    pub fn validate(&self) -> Result<()> {
        if !KEYS.contains(&self.key.as_str()) {
            return Err(TitleError::InvalidMetadata(format!("unknown key '{}'", self.key)));
        }
        if !SCALES.contains(&self.scale.as_str()) {
            return Err(TitleError::InvalidMetadata(format!("unknown scale '{}'", self.scale)));
        }
        if self.bpm == 0 {
            return Err(TitleError::InvalidMetadata("bpm must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// `{title}_{key}{scale}_{bpm}bpm {collaborator}` with the key lowercased,
/// e.g. `coole beats_dMin_130bpm @fgybeats`
pub fn format_title(title: &str, metadata: &BeatMetadata, lowercase: bool) -> String {
    let title = if lowercase {
        title.to_lowercase()
    } else {
        title.to_string()
    };

    format!(
        "{}_{}{}_{}bpm {}",
        title,
        metadata.key.to_lowercase(),
        metadata.scale,
        metadata.bpm,
        metadata.collaborator
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_title_defaults() {
        let formatted = format_title("Coole Beats", &BeatMetadata::default(), true);
        assert_eq!(formatted, "coole beats_dMin_130bpm @fgybeats");
    }

    #[test]
    fn test_format_title_keeps_case() {
        let metadata = BeatMetadata {
            key: "F#".to_string(),
            scale: "Maj".to_string(),
            bpm: 94,
            collaborator: "@someone".to_string(),
        };
        assert_eq!(
            format_title("Velvet Mood", &metadata, false),
            "Velvet Mood_f#Maj_94bpm @someone"
        );
    }

    #[test]
    fn test_validate() {
        assert!(BeatMetadata::default().validate().is_ok());

        let bad_key = BeatMetadata {
            key: "H".to_string(),
            ..BeatMetadata::default()
        };
        assert!(bad_key.validate().is_err());

        let bad_scale = BeatMetadata {
            scale: "Dorian".to_string(),
            ..BeatMetadata::default()
        };
        assert!(bad_scale.validate().is_err());

        let zero_bpm = BeatMetadata {
            bpm: 0,
            ..BeatMetadata::default()
        };
        assert!(zero_bpm.validate().is_err());
    }
}
