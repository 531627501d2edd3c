use std::path::PathBuf;

use gpui::ExternalPaths;

use chimeboard::domain::has_mp3_extension;

pub(super) fn log_save_submission(name: &str) {
    tracing::debug!(
        name_chars = name.chars().count(),
        "submitting custom sound save"
    );
}

pub(super) fn dropped_path_to_select(paths: &ExternalPaths) -> Option<PathBuf> {
    choose_dropped_sound_path(paths.paths())
}

pub(super) fn choose_dropped_sound_path(paths: &[PathBuf]) -> Option<PathBuf> {
    paths
        .iter()
        .find(|path| has_mp3_extension(path))
        .cloned()
        .or_else(|| paths.first().cloned())
}
