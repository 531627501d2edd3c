mod errors;
mod sound;

pub use errors::{MethodCallError, MethodCallErrorCategory};
pub use sound::{
    CustomSoundEntry, SelectedSoundFile, SoundRecord, SoundUploadRecord, declared_mime_for_path,
    has_mp3_extension, is_accepted_sound_mime,
};
