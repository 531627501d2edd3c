mod new_sound_form;
mod notifications;
mod task_runner;

pub use new_sound_form::{
    FsSoundFileReader, NewSoundForm, SoundDirectory, SoundFileReader, SoundMethods,
    ValidationFailure,
};
pub use notifications::{Notification, NotificationKind, NotificationQueue, Notifier};
pub use task_runner::{ActivityTracker, TaskRunner, ThreadTaskRunner};
