use std::fs;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SoundFileError {
    #[error("failed to read sound file: {message}")]
    Io { message: String },
}

impl SoundFileError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Io { .. } => {
                "Could not read the sound file. Check the file path and permissions.".to_string()
            }
        }
    }
}

pub fn read_sound_file(path: &Path) -> Result<Vec<u8>, SoundFileError> {
    fs::read(path).map_err(|error| SoundFileError::Io {
        message: error.to_string(),
    })
}
