use std::path::Path;
use std::sync::Arc;

use rand::Rng;

use crate::domain::{
    CustomSoundEntry, MethodCallError, SelectedSoundFile, SoundRecord, SoundUploadRecord,
    is_accepted_sound_mime,
};
use crate::infra::sound_file::{SoundFileError, read_sound_file};

use super::notifications::{Notification, Notifier};
use super::task_runner::TaskRunner;

const CACHE_KEY_MAX: u16 = 1000;
const UPLOAD_TASK_NAME: &str = "chimeboard-sound-upload";

const UPLOADING_FILE_MESSAGE: &str = "Uploading file";
const FILE_UPLOADED_MESSAGE: &str = "File uploaded";
const SOUND_UPDATED_MESSAGE: &str = "Custom sound updated successfully";

/// The two server procedures the form drives, in call order.
pub trait SoundMethods: Send + Sync {
    fn insert_or_update_sound(&self, record: &SoundRecord) -> Result<String, MethodCallError>;

    fn upload_custom_sound(
        &self,
        contents: &[u8],
        mime_type: &str,
        record: &SoundUploadRecord,
    ) -> Result<(), MethodCallError>;
}

/// Read side of the custom-sound catalog, used by the sounds panel.
pub trait SoundDirectory: Send + Sync {
    fn list_custom_sounds(&self) -> Result<Vec<CustomSoundEntry>, MethodCallError>;
}

pub trait SoundFileReader: Send + Sync {
    fn read_binary(&self, file: &SelectedSoundFile) -> Result<Vec<u8>, SoundFileError>;
}

#[derive(Debug, Default)]
pub struct FsSoundFileReader;

impl SoundFileReader for FsSoundFileReader {
    fn read_binary(&self, file: &SelectedSoundFile) -> Result<Vec<u8>, SoundFileError> {
        read_sound_file(Path::new(&file.path))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    NameRequired,
    SoundFileRequired,
    InvalidFileType,
}

impl ValidationFailure {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NameRequired => "The field Name is required.",
            Self::SoundFileRequired => "The field Sound File (MP3) is required.",
            Self::InvalidFileType => "Invalid file type. Only MP3 audio files are accepted.",
        }
    }
}

/// View-model for the new-sound form: the two editable fields plus the
/// collaborators the save pipeline talks to. Owned exclusively by the window
/// that renders it; cloning takes a snapshot of the fields and shares the
/// collaborators, which is how saves run off the UI thread.
#[derive(Clone)]
pub struct NewSoundForm {
    name: String,
    selected_file: Option<SelectedSoundFile>,
    methods: Arc<dyn SoundMethods>,
    file_reader: Arc<dyn SoundFileReader>,
    notifier: Arc<dyn Notifier>,
    task_runner: Arc<dyn TaskRunner>,
}

impl NewSoundForm {
    pub fn new(
        methods: Arc<dyn SoundMethods>,
        file_reader: Arc<dyn SoundFileReader>,
        notifier: Arc<dyn Notifier>,
        task_runner: Arc<dyn TaskRunner>,
    ) -> Self {
        Self {
            name: String::new(),
            selected_file: None,
            methods,
            file_reader,
            notifier,
            task_runner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selected_file(&self) -> Option<&SelectedSoundFile> {
        self.selected_file.as_ref()
    }

    /// Stores the latest text verbatim; trimming happens at save time.
    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
    }

    /// Stores the handle chosen by the picker flow. Callers gate candidates
    /// on the declared MP3 type before calling this.
    pub fn select_file(&mut self, file: SelectedSoundFile) {
        self.selected_file = Some(file);
    }

    /// The Save button stays disabled while the untrimmed name is empty.
    pub fn can_save(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn create_sound_record(name: &str) -> SoundRecord {
        SoundRecord::from_name(name)
    }

    /// Reports every failure individually, in field order, and returns true
    /// only when none accumulated. A wrong-typed file is reported in addition
    /// to whatever else failed.
    pub fn validate(&self, record: &SoundRecord, file: Option<&SelectedSoundFile>) -> bool {
        let mut failures = Vec::new();

        if record.name.is_empty() {
            failures.push(ValidationFailure::NameRequired);
        }
        if file.is_none() {
            failures.push(ValidationFailure::SoundFileRequired);
        }
        if let Some(file) = file
            && !is_accepted_sound_mime(&file.mime_type)
        {
            failures.push(ValidationFailure::InvalidFileType);
        }

        for failure in &failures {
            self.notifier
                .notify(Notification::error(failure.user_message()));
        }

        failures.is_empty()
    }

    /// Runs the submission pipeline: validate, register metadata, then hand
    /// the byte read + upload to a background task. Returns the identifier
    /// assigned by the server, `None` when validation failed or no usable
    /// identifier was obtained. The upload is fire-and-forget: this returns
    /// without waiting for it, and nothing prevents a second save from
    /// overlapping the first.
    pub fn save(
        &self,
        name: &str,
        file: Option<&SelectedSoundFile>,
    ) -> Result<Option<String>, MethodCallError> {
        let record = Self::create_sound_record(name);
        if !self.validate(&record, file) {
            return Ok(None);
        }

        let sound_id = match self.methods.insert_or_update_sound(&record) {
            Ok(id) => Some(id),
            Err(error) => {
                self.notifier
                    .notify(Notification::error(error.user_message()));
                None
            }
        };

        let cache_key = rand::thread_rng().gen_range(0..=CACHE_KEY_MAX);
        let upload_record = SoundUploadRecord::from_record(record, sound_id.clone(), cache_key);

        if upload_record.has_usable_id() {
            self.notifier
                .notify(Notification::success(UPLOADING_FILE_MESSAGE));

            let file = file
                .cloned()
                .expect("validation accepted the attempt, so a file is selected");
            self.spawn_upload(file, upload_record)?;
        }

        Ok(sound_id)
    }

    fn spawn_upload(
        &self,
        file: SelectedSoundFile,
        record: SoundUploadRecord,
    ) -> Result<(), MethodCallError> {
        let methods = Arc::clone(&self.methods);
        let file_reader = Arc::clone(&self.file_reader);
        let notifier = Arc::clone(&self.notifier);

        self.task_runner.run(
            UPLOAD_TASK_NAME,
            Box::new(move || {
                let contents = match file_reader.read_binary(&file) {
                    Ok(contents) => contents,
                    Err(error) => {
                        notifier.notify(Notification::error(error.user_message()));
                        return;
                    }
                };

                match methods.upload_custom_sound(&contents, &file.mime_type, &record) {
                    Ok(()) => notifier.notify(Notification::success(FILE_UPLOADED_MESSAGE)),
                    Err(error) => notifier.notify(Notification::error(error.user_message())),
                }
            }),
        )
    }

    /// Save-button entry point: runs `save` on the current field values, then
    /// reports the generic success toast and signals the parent view. Errors
    /// from the orchestration itself are reported instead of propagated.
    pub fn handle_save(&self, on_created: impl FnOnce(Option<&str>), on_changed: impl FnOnce()) {
        match self.save(&self.name, self.selected_file.as_ref()) {
            Ok(sound_id) => {
                self.notifier
                    .notify(Notification::success(SOUND_UPDATED_MESSAGE));
                on_created(sound_id.as_deref());
                on_changed();
            }
            Err(error) => {
                self.notifier
                    .notify(Notification::error(error.user_message()));
            }
        }
    }

    /// Discards in-progress edits and signals the parent to close the form.
    pub fn cancel(&mut self, on_close: impl FnOnce()) {
        self.name.clear();
        self.selected_file = None;
        on_close();
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CACHE_KEY_MAX, NewSoundForm, SoundFileReader, SoundMethods, TaskRunner, ValidationFailure,
    };
    use crate::app::notifications::{Notification, NotificationKind, Notifier};
    use crate::domain::{MethodCallError, SelectedSoundFile, SoundRecord, SoundUploadRecord};
    use crate::infra::sound_file::SoundFileError;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    struct StubMethods {
        insert_responses: Mutex<VecDeque<Result<String, MethodCallError>>>,
        insert_calls: Mutex<Vec<SoundRecord>>,
        upload_response: Result<(), MethodCallError>,
        upload_calls: Mutex<Vec<(Vec<u8>, String, SoundUploadRecord)>>,
    }

    impl StubMethods {
        fn new(insert_responses: Vec<Result<String, MethodCallError>>) -> Self {
            Self {
                insert_responses: Mutex::new(insert_responses.into()),
                insert_calls: Mutex::new(Vec::new()),
                upload_response: Ok(()),
                upload_calls: Mutex::new(Vec::new()),
            }
        }

        fn with_upload_response(mut self, response: Result<(), MethodCallError>) -> Self {
            self.upload_response = response;
            self
        }

        fn insert_calls(&self) -> Vec<SoundRecord> {
            self.insert_calls.lock().expect("lock poisoned").clone()
        }

        fn upload_calls(&self) -> Vec<(Vec<u8>, String, SoundUploadRecord)> {
            self.upload_calls.lock().expect("lock poisoned").clone()
        }
    }

    impl SoundMethods for StubMethods {
        fn insert_or_update_sound(&self, record: &SoundRecord) -> Result<String, MethodCallError> {
            self.insert_calls
                .lock()
                .expect("lock poisoned")
                .push(record.clone());
            self.insert_responses
                .lock()
                .expect("lock poisoned")
                .pop_front()
                .expect("stub methods must have a prepared insert response")
        }

        fn upload_custom_sound(
            &self,
            contents: &[u8],
            mime_type: &str,
            record: &SoundUploadRecord,
        ) -> Result<(), MethodCallError> {
            self.upload_calls.lock().expect("lock poisoned").push((
                contents.to_vec(),
                mime_type.to_string(),
                record.clone(),
            ));
            self.upload_response.clone()
        }
    }

    struct StubReader {
        response: Result<Vec<u8>, SoundFileError>,
        seen_files: Mutex<Vec<SelectedSoundFile>>,
    }

    impl StubReader {
        fn returning(response: Result<Vec<u8>, SoundFileError>) -> Self {
            Self {
                response,
                seen_files: Mutex::new(Vec::new()),
            }
        }
    }

    impl SoundFileReader for StubReader {
        fn read_binary(&self, file: &SelectedSoundFile) -> Result<Vec<u8>, SoundFileError> {
            self.seen_files
                .lock()
                .expect("lock poisoned")
                .push(file.clone());
            self.response.clone()
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notifications: Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        fn notifications(&self) -> Vec<Notification> {
            self.notifications.lock().expect("lock poisoned").clone()
        }

        fn errors(&self) -> Vec<String> {
            self.notifications()
                .into_iter()
                .filter(|notification| notification.kind == NotificationKind::Error)
                .map(|notification| notification.message)
                .collect()
        }

        fn successes(&self) -> Vec<String> {
            self.notifications()
                .into_iter()
                .filter(|notification| notification.kind == NotificationKind::Success)
                .map(|notification| notification.message)
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.notifications
                .lock()
                .expect("lock poisoned")
                .push(notification);
        }
    }

    /// Executes tasks synchronously so tests observe upload effects without
    /// waiting on a thread.
    struct InlineTaskRunner;

    impl TaskRunner for InlineTaskRunner {
        fn run(&self, _name: &str, task: Box<dyn FnOnce() + Send>) -> Result<(), MethodCallError> {
            task();
            Ok(())
        }
    }

    struct FailingTaskRunner;

    impl TaskRunner for FailingTaskRunner {
        fn run(
            &self,
            name: &str,
            _task: Box<dyn FnOnce() + Send>,
        ) -> Result<(), MethodCallError> {
            Err(MethodCallError::internal(format!(
                "failed to start background task '{name}': no threads left"
            )))
        }
    }

    struct Harness {
        methods: Arc<StubMethods>,
        reader: Arc<StubReader>,
        notifier: Arc<RecordingNotifier>,
        form: NewSoundForm,
    }

    fn harness(methods: StubMethods) -> Harness {
        harness_with(methods, StubReader::returning(Ok(b"ID3-bytes".to_vec())))
    }

    fn harness_with(methods: StubMethods, reader: StubReader) -> Harness {
        let methods = Arc::new(methods);
        let reader = Arc::new(reader);
        let notifier = Arc::new(RecordingNotifier::default());
        let form = NewSoundForm::new(
            Arc::clone(&methods) as Arc<dyn SoundMethods>,
            Arc::clone(&reader) as Arc<dyn SoundFileReader>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Arc::new(InlineTaskRunner),
        );

        Harness {
            methods,
            reader,
            notifier,
            form,
        }
    }

    fn mp3_file() -> SelectedSoundFile {
        SelectedSoundFile {
            path: PathBuf::from("/tmp/chime.mp3"),
            file_name: "chime.mp3".to_string(),
            mime_type: "audio/mpeg".to_string(),
        }
    }

    fn text_file() -> SelectedSoundFile {
        SelectedSoundFile {
            path: PathBuf::from("/tmp/notes.txt"),
            file_name: "notes.txt".to_string(),
            mime_type: "text/plain".to_string(),
        }
    }

    #[test]
    fn set_name_stores_the_value_verbatim() {
        let mut harness = harness(StubMethods::new(Vec::new()));

        harness.form.set_name(" Ding ");

        assert_eq!(harness.form.name(), " Ding ");
    }

    #[test]
    fn validate_reports_name_and_file_requirements_in_field_order() {
        let harness = harness(StubMethods::new(Vec::new()));
        let record = NewSoundForm::create_sound_record("");

        assert!(!harness.form.validate(&record, None));
        assert_eq!(
            harness.notifier.errors(),
            vec![
                ValidationFailure::NameRequired.user_message().to_string(),
                ValidationFailure::SoundFileRequired
                    .user_message()
                    .to_string(),
            ]
        );
    }

    #[test]
    fn validate_accepts_a_named_mp3_file_without_reporting() {
        let harness = harness(StubMethods::new(Vec::new()));
        let record = NewSoundForm::create_sound_record("Ding");

        assert!(harness.form.validate(&record, Some(&mp3_file())));
        assert!(harness.notifier.notifications().is_empty());
    }

    #[test]
    fn validate_reports_an_unaccepted_declared_type() {
        let harness = harness(StubMethods::new(Vec::new()));
        let record = NewSoundForm::create_sound_record("Ding");

        assert!(!harness.form.validate(&record, Some(&text_file())));
        assert_eq!(
            harness.notifier.errors(),
            vec![ValidationFailure::InvalidFileType.user_message().to_string()]
        );
    }

    #[test]
    fn validate_reports_file_type_in_addition_to_a_missing_name() {
        let harness = harness(StubMethods::new(Vec::new()));
        let record = NewSoundForm::create_sound_record("   ");

        assert!(!harness.form.validate(&record, Some(&text_file())));
        assert_eq!(
            harness.notifier.errors(),
            vec![
                ValidationFailure::NameRequired.user_message().to_string(),
                ValidationFailure::InvalidFileType.user_message().to_string(),
            ]
        );
    }

    #[test]
    fn create_sound_record_trims_outer_whitespace_and_marks_new_file() {
        let record = NewSoundForm::create_sound_record(" Ding ");

        assert_eq!(record.name, "Ding");
        assert!(record.new_file);
    }

    #[test]
    fn save_without_a_file_never_invokes_a_remote_procedure() {
        let harness = harness(StubMethods::new(Vec::new()));

        let saved = harness
            .form
            .save("Ding", None)
            .expect("save should resolve");

        assert_eq!(saved, None);
        assert!(harness.methods.insert_calls().is_empty());
        assert!(harness.methods.upload_calls().is_empty());
        assert_eq!(
            harness.notifier.errors(),
            vec![
                ValidationFailure::SoundFileRequired
                    .user_message()
                    .to_string()
            ]
        );
    }

    #[test]
    fn saving_whitespace_only_name_reports_name_error_despite_enabled_button() {
        let mut harness = harness(StubMethods::new(Vec::new()));
        harness.form.set_name("   ");
        harness.form.select_file(mp3_file());

        // The button gate sees the untrimmed value, validation the trimmed one.
        assert!(harness.form.can_save());

        let saved = harness
            .form
            .save(harness.form.name(), harness.form.selected_file())
            .expect("save should resolve");

        assert_eq!(saved, None);
        assert!(harness.methods.insert_calls().is_empty());
        assert_eq!(
            harness.notifier.errors(),
            vec![ValidationFailure::NameRequired.user_message().to_string()]
        );
    }

    #[test]
    fn save_reports_a_metadata_failure_once_and_never_uploads() {
        let harness = harness(StubMethods::new(vec![Err(MethodCallError::Timeout)]));

        let saved = harness
            .form
            .save("Chime", Some(&mp3_file()))
            .expect("save should resolve");

        assert_eq!(saved, None);
        assert_eq!(harness.methods.insert_calls().len(), 1);
        assert!(harness.methods.upload_calls().is_empty());
        assert_eq!(
            harness.notifier.errors(),
            vec![MethodCallError::Timeout.user_message()]
        );
        assert!(harness.notifier.successes().is_empty());
    }

    #[test]
    fn save_passes_the_augmented_record_and_bytes_to_the_upload_call() {
        let harness = harness(StubMethods::new(vec![Ok("snd-1".to_string())]));

        let saved = harness
            .form
            .save("  Chime  ", Some(&mp3_file()))
            .expect("save should resolve");

        assert_eq!(saved.as_deref(), Some("snd-1"));
        assert_eq!(
            harness.methods.insert_calls(),
            vec![SoundRecord {
                name: "Chime".to_string(),
                new_file: true,
            }]
        );

        let uploads = harness.methods.upload_calls();
        assert_eq!(uploads.len(), 1);
        let (contents, mime_type, record) = &uploads[0];
        assert_eq!(contents, b"ID3-bytes");
        assert_eq!(mime_type, "audio/mpeg");
        assert_eq!(record.name, "Chime");
        assert!(record.new_file);
        assert_eq!(record.sound_id.as_deref(), Some("snd-1"));
        assert!(record.cache_key <= CACHE_KEY_MAX);

        assert_eq!(
            harness.notifier.successes(),
            vec!["Uploading file".to_string(), "File uploaded".to_string()]
        );
        assert_eq!(
            harness.reader.seen_files.lock().expect("lock poisoned")[0],
            mp3_file()
        );
    }

    #[test]
    fn save_skips_the_upload_when_the_identifier_is_blank() {
        let harness = harness(StubMethods::new(vec![Ok(String::new())]));

        let saved = harness
            .form
            .save("Chime", Some(&mp3_file()))
            .expect("save should resolve");

        assert_eq!(saved.as_deref(), Some(""));
        assert!(harness.methods.upload_calls().is_empty());
        assert!(harness.notifier.successes().is_empty());
    }

    #[test]
    fn a_read_failure_is_reported_and_the_upload_is_skipped() {
        let harness = harness_with(
            StubMethods::new(vec![Ok("snd-1".to_string())]),
            StubReader::returning(Err(SoundFileError::Io {
                message: "permission denied".to_string(),
            })),
        );

        let saved = harness
            .form
            .save("Chime", Some(&mp3_file()))
            .expect("save should resolve");

        assert_eq!(saved.as_deref(), Some("snd-1"));
        assert!(harness.methods.upload_calls().is_empty());
        assert_eq!(harness.notifier.errors().len(), 1);
        assert!(harness.notifier.errors()[0].contains("Could not read the sound file"));
    }

    #[test]
    fn an_upload_failure_is_reported_once() {
        let harness = harness(
            StubMethods::new(vec![Ok("snd-1".to_string())]).with_upload_response(Err(
                MethodCallError::Transport {
                    message: "connection reset".to_string(),
                },
            )),
        );

        harness
            .form
            .save("Chime", Some(&mp3_file()))
            .expect("save should resolve");

        assert_eq!(harness.methods.upload_calls().len(), 1);
        assert_eq!(
            harness.notifier.errors(),
            vec![
                MethodCallError::Transport {
                    message: "connection reset".to_string()
                }
                .user_message()
            ]
        );
        assert_eq!(
            harness.notifier.successes(),
            vec!["Uploading file".to_string()]
        );
    }

    #[test]
    fn handle_save_emits_one_generic_success_and_signals_the_parent_once() {
        let mut harness = harness(StubMethods::new(vec![Ok("snd-1".to_string())]));
        harness.form.set_name("Chime");
        harness.form.select_file(mp3_file());

        let created = Mutex::new(Vec::new());
        let changed = Mutex::new(0usize);
        harness.form.handle_save(
            |sound_id| {
                created
                    .lock()
                    .expect("lock poisoned")
                    .push(sound_id.map(str::to_string));
            },
            || *changed.lock().expect("lock poisoned") += 1,
        );

        assert_eq!(
            *created.lock().expect("lock poisoned"),
            vec![Some("snd-1".to_string())]
        );
        assert_eq!(*changed.lock().expect("lock poisoned"), 1);

        let generic_successes = harness
            .notifier
            .successes()
            .into_iter()
            .filter(|message| message == "Custom sound updated successfully")
            .count();
        assert_eq!(generic_successes, 1);
    }

    #[test]
    fn handle_save_reports_an_orchestration_failure_instead_of_navigating() {
        let methods = Arc::new(StubMethods::new(vec![Ok("snd-1".to_string())]));
        let notifier = Arc::new(RecordingNotifier::default());
        let mut form = NewSoundForm::new(
            Arc::clone(&methods) as Arc<dyn SoundMethods>,
            Arc::new(StubReader::returning(Ok(Vec::new()))) as Arc<dyn SoundFileReader>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Arc::new(FailingTaskRunner),
        );
        form.set_name("Chime");
        form.select_file(mp3_file());

        let mut navigated = false;
        let mut changed = false;
        form.handle_save(|_| navigated = true, || changed = true);

        assert!(!navigated);
        assert!(!changed);
        assert_eq!(notifier.errors().len(), 1);
        assert!(notifier.errors()[0].contains("internal error"));
    }

    #[test]
    fn cancel_discards_edits_and_invokes_the_close_callback() {
        let mut harness = harness(StubMethods::new(Vec::new()));
        harness.form.set_name("Chime");
        harness.form.select_file(mp3_file());

        let mut closed = false;
        harness.form.cancel(|| closed = true);

        assert!(closed);
        assert_eq!(harness.form.name(), "");
        assert!(harness.form.selected_file().is_none());
        assert!(!harness.form.can_save());
    }
}
