use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const ACCEPTED_SOUND_MIME_TYPES: [&str; 3] = ["audio/mp3", "audio/mpeg", "audio/x-mpeg"];

const MP3_DECLARED_MIME: &str = "audio/mpeg";

/// Payload for the `insertOrUpdateSound` server method. Built fresh per save
/// attempt; `new_file` is always true in the creation flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoundRecord {
    pub name: String,
    #[serde(rename = "newFile")]
    pub new_file: bool,
}

impl SoundRecord {
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            new_file: true,
        }
    }
}

/// The record handed to `uploadCustomSound`: the metadata record augmented
/// with the server-assigned identifier (when one was obtained) and a
/// client-side random cache-busting value in `[0, 1000]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoundUploadRecord {
    pub name: String,
    #[serde(rename = "newFile")]
    pub new_file: bool,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub sound_id: Option<String>,
    #[serde(rename = "random")]
    pub cache_key: u16,
}

impl SoundUploadRecord {
    pub fn from_record(record: SoundRecord, sound_id: Option<String>, cache_key: u16) -> Self {
        Self {
            name: record.name,
            new_file: record.new_file,
            sound_id,
            cache_key,
        }
    }

    /// The upload call is only attempted for records carrying a non-blank
    /// identifier.
    pub fn has_usable_id(&self) -> bool {
        self.sound_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }
}

/// A file handle produced by the picker flow. `mime_type` is the declared
/// type derived from the selection, not sniffed from content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedSoundFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
}

impl SelectedSoundFile {
    pub fn from_picked_path(path: PathBuf) -> Option<Self> {
        let mime_type = declared_mime_for_path(&path)?.to_string();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Some(Self {
            path,
            file_name,
            mime_type,
        })
    }
}

/// An entry returned by the `listCustomSounds` server method.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomSoundEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// Substring match, mirroring the unanchored patterns the upload form has
/// always gated files with.
pub fn is_accepted_sound_mime(mime_type: &str) -> bool {
    ACCEPTED_SOUND_MIME_TYPES
        .iter()
        .any(|accepted| mime_type.contains(accepted))
}

pub fn has_mp3_extension(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"))
}

pub fn declared_mime_for_path(path: impl AsRef<Path>) -> Option<&'static str> {
    has_mp3_extension(path).then_some(MP3_DECLARED_MIME)
}

#[cfg(test)]
mod tests {
    use super::{
        SelectedSoundFile, SoundRecord, SoundUploadRecord, declared_mime_for_path,
        has_mp3_extension, is_accepted_sound_mime,
    };
    use std::path::PathBuf;

    #[test]
    fn record_from_name_trims_outer_whitespace_only() {
        let record = SoundRecord::from_name("  Ding  Dong  ");

        assert_eq!(record.name, "Ding  Dong");
        assert!(record.new_file);
    }

    #[test]
    fn record_serializes_with_wire_field_names() {
        let json = serde_json::to_value(SoundRecord::from_name("Chime")).expect("record is json");

        assert_eq!(json["name"], "Chime");
        assert_eq!(json["newFile"], true);
    }

    #[test]
    fn upload_record_carries_id_and_cache_key_on_the_wire() {
        let record = SoundUploadRecord::from_record(
            SoundRecord::from_name("Chime"),
            Some("snd-1".to_string()),
            542,
        );
        let json = serde_json::to_value(&record).expect("upload record is json");

        assert_eq!(json["name"], "Chime");
        assert_eq!(json["newFile"], true);
        assert_eq!(json["_id"], "snd-1");
        assert_eq!(json["random"], 542);
    }

    #[test]
    fn upload_record_omits_missing_id_on_the_wire() {
        let record = SoundUploadRecord::from_record(SoundRecord::from_name("Chime"), None, 7);
        let json = serde_json::to_value(&record).expect("upload record is json");

        assert!(json.get("_id").is_none());
        assert_eq!(json["random"], 7);
    }

    #[test]
    fn usable_id_requires_a_non_blank_identifier() {
        let with_id = SoundUploadRecord::from_record(
            SoundRecord::from_name("Chime"),
            Some("snd-1".to_string()),
            0,
        );
        let blank_id = SoundUploadRecord::from_record(
            SoundRecord::from_name("Chime"),
            Some("   ".to_string()),
            0,
        );
        let no_id = SoundUploadRecord::from_record(SoundRecord::from_name("Chime"), None, 0);

        assert!(with_id.has_usable_id());
        assert!(!blank_id.has_usable_id());
        assert!(!no_id.has_usable_id());
    }

    #[test]
    fn accepted_mime_types_cover_the_three_mp3_variants() {
        assert!(is_accepted_sound_mime("audio/mp3"));
        assert!(is_accepted_sound_mime("audio/mpeg"));
        assert!(is_accepted_sound_mime("audio/x-mpeg"));
        assert!(!is_accepted_sound_mime("text/plain"));
        assert!(!is_accepted_sound_mime("audio/ogg"));
    }

    #[test]
    fn accepted_mime_match_is_a_substring_match() {
        assert!(is_accepted_sound_mime("audio/mpeg; charset=binary"));
    }

    #[test]
    fn mp3_extension_is_case_insensitive() {
        assert!(has_mp3_extension("/tmp/ding.mp3"));
        assert!(has_mp3_extension("/tmp/ding.MP3"));
        assert!(!has_mp3_extension("/tmp/ding.wav"));
        assert!(!has_mp3_extension("/tmp/ding"));
    }

    #[test]
    fn declared_mime_maps_mp3_paths_only() {
        assert_eq!(declared_mime_for_path("/tmp/ding.mp3"), Some("audio/mpeg"));
        assert_eq!(declared_mime_for_path("/tmp/ding.txt"), None);
    }

    #[test]
    fn picked_path_becomes_a_declared_mp3_handle() {
        let file = SelectedSoundFile::from_picked_path(PathBuf::from("/tmp/sounds/ding.mp3"))
            .expect("mp3 path should produce a handle");

        assert_eq!(file.file_name, "ding.mp3");
        assert_eq!(file.mime_type, "audio/mpeg");

        assert!(SelectedSoundFile::from_picked_path(PathBuf::from("/tmp/notes.txt")).is_none());
    }
}
