use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chimeboard::{
    app::{
        ActivityTracker, FsSoundFileReader, NewSoundForm, Notification, NotificationKind,
        NotificationQueue, Notifier, SoundDirectory, TaskRunner, ThreadTaskRunner,
        ValidationFailure,
    },
    domain::{SelectedSoundFile, has_mp3_extension},
};
use gpui::{
    Context, Entity, ExternalPaths, IntoElement, PathPromptOptions, Render, Subscription, Task,
    Timer, Window, div, prelude::*,
};
use gpui_component::{
    Disableable,
    button::{Button, ButtonVariants as _},
    input::{Input, InputEvent, InputState},
    label::Label,
    scroll::ScrollableElement,
};

use super::backend::build_admin_backend;
use super::state::{ParentViewSignals, SoundsPanelSnapshot, SoundsPanelState, ToastMessage};
use super::theme::ChimeboardTheme;
use super::utils::{dropped_path_to_select, log_save_submission};
use super::{
    NAME_FIELD_LABEL, NAME_PLACEHOLDER, SOUND_FILE_DROP_ERROR_MESSAGE, SOUND_FILE_DROP_HINT,
    SOUND_FILE_EMPTY_LABEL, SOUND_FILE_FIELD_LABEL, SOUND_FILE_PICKER_PROMPT, SOUNDS_EMPTY_LABEL,
    SOUNDS_LOADING_LABEL, SOUNDS_PANEL_LABEL, UPDATE_POLL_INTERVAL_MS, WINDOW_SUBTITLE,
    WINDOW_TITLE,
};

const SAVE_TASK_NAME: &str = "chimeboard-save-sound";
const REFRESH_TASK_NAME: &str = "chimeboard-sounds-refresh";

pub(super) struct SoundsAdminWindow {
    name_input: Entity<InputState>,
    _name_input_subscription: Subscription,
    form: NewSoundForm,
    directory: Arc<dyn SoundDirectory>,
    notifications: Arc<NotificationQueue>,
    task_runner: Arc<ThreadTaskRunner>,
    tracker: Arc<ActivityTracker>,
    signals: Arc<ParentViewSignals>,
    sounds_panel: Arc<SoundsPanelState>,
    panel_snapshot: SoundsPanelSnapshot,
    toasts: Vec<ToastMessage>,
    next_toast_id: u64,
    selected_sound_id: Option<String>,
    startup_notice: Option<String>,
    _update_poll_task: Task<()>,
    _file_picker_task: Task<()>,
}

impl SoundsAdminWindow {
    pub(super) fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let name_input =
            cx.new(|cx| InputState::new(window, cx).placeholder(NAME_PLACEHOLDER));
        let name_input_subscription =
            cx.subscribe_in(&name_input, window, Self::on_name_input_event);

        let backend = build_admin_backend();
        let notifications = Arc::new(NotificationQueue::new());
        let task_runner = Arc::new(ThreadTaskRunner::new());
        let tracker = task_runner.tracker();
        let form = NewSoundForm::new(
            backend.methods,
            Arc::new(FsSoundFileReader),
            Arc::clone(&notifications) as Arc<dyn Notifier>,
            Arc::clone(&task_runner) as Arc<dyn TaskRunner>,
        );

        let mut this = Self {
            name_input,
            _name_input_subscription: name_input_subscription,
            form,
            directory: backend.directory,
            notifications,
            task_runner,
            tracker,
            signals: Arc::new(ParentViewSignals::default()),
            sounds_panel: Arc::new(SoundsPanelState::default()),
            panel_snapshot: SoundsPanelSnapshot::default(),
            toasts: Vec::new(),
            next_toast_id: 1,
            selected_sound_id: None,
            startup_notice: backend.startup_notice,
            _update_poll_task: Task::ready(()),
            _file_picker_task: Task::ready(()),
        };
        this.request_sounds_refresh(window, cx);
        this
    }

    fn on_name_input_event(
        &mut self,
        state: &Entity<InputState>,
        event: &InputEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if matches!(event, InputEvent::Change) {
            let value = state.read(cx).value().to_string();
            self.form.set_name(value);
            cx.notify();
        }
    }

    fn enqueue_toast(&mut self, notification: Notification) {
        let id = self.next_toast_id;
        self.next_toast_id = self.next_toast_id.saturating_add(1);
        self.toasts.push(ToastMessage::from_notification(id, notification));
    }

    fn push_toast(&mut self, notification: Notification, cx: &mut Context<Self>) {
        self.enqueue_toast(notification);
        cx.notify();
    }

    fn on_dismiss_toast(&mut self, toast_id: u64, cx: &mut Context<Self>) {
        self.toasts.retain(|toast| toast.id != toast_id);
        cx.notify();
    }

    fn on_select_sound_file_clicked(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        // NOTE: gpui::PathPromptOptions (v0.2.2) does not expose MIME or
        // extension filters, so candidates are checked after selection.
        let receiver = cx.prompt_for_paths(PathPromptOptions {
            files: true,
            directories: false,
            multiple: false,
            prompt: Some(SOUND_FILE_PICKER_PROMPT.into()),
        });

        self._file_picker_task = cx.spawn_in(window, async move |view, window| {
            let result = receiver.await;
            let Ok(result) = result else {
                return;
            };

            match result {
                Ok(Some(paths)) => {
                    if let Some(path) = paths.into_iter().next() {
                        let _ = view.update_in(window, |view, _window, cx| {
                            view.apply_picked_path(path, cx);
                        });
                    }
                }
                Ok(None) => {}
                Err(error) => {
                    let message = format!("Could not open the file dialog: {error}");
                    let _ = view.update_in(window, |view, _window, cx| {
                        view.push_toast(Notification::error(message), cx);
                    });
                }
            }
        });
    }

    fn on_sound_file_drop(&mut self, paths: &ExternalPaths, cx: &mut Context<Self>) {
        let Some(path) = dropped_path_to_select(paths) else {
            self.push_toast(Notification::error(SOUND_FILE_DROP_ERROR_MESSAGE), cx);
            return;
        };

        self.apply_picked_path(path, cx);
    }

    fn apply_picked_path(&mut self, path: PathBuf, cx: &mut Context<Self>) {
        match SelectedSoundFile::from_picked_path(path) {
            Some(file) => {
                self.form.select_file(file);
                cx.notify();
            }
            None => self.push_toast(
                Notification::error(ValidationFailure::InvalidFileType.user_message()),
                cx,
            ),
        }
    }

    fn on_save_clicked(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let name = self.name_input.read(cx).value().to_string();
        self.form.set_name(name);
        log_save_submission(self.form.name());

        let form = self.form.clone();
        let signals = Arc::clone(&self.signals);
        let spawned = self.task_runner.run(
            SAVE_TASK_NAME,
            Box::new(move || {
                let created_signals = Arc::clone(&signals);
                form.handle_save(
                    move |sound_id| created_signals.record_created(sound_id),
                    move || signals.mark_changed(),
                );
            }),
        );

        if let Err(error) = spawned {
            self.push_toast(Notification::error(error.user_message()), cx);
            return;
        }

        self.start_update_polling(window, cx);
    }

    fn on_cancel_clicked(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.form.cancel(|| {});
        self.name_input
            .update(cx, |input, cx| input.set_value("", window, cx));
        cx.notify();
    }

    fn on_refresh_clicked(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.request_sounds_refresh(window, cx);
    }

    fn request_sounds_refresh(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.spawn_sounds_refresh(cx);
        self.start_update_polling(window, cx);
    }

    fn spawn_sounds_refresh(&mut self, cx: &mut Context<Self>) {
        self.sounds_panel.begin_loading();
        let directory = Arc::clone(&self.directory);
        let panel = Arc::clone(&self.sounds_panel);

        let spawned = self.task_runner.run(
            REFRESH_TASK_NAME,
            Box::new(move || {
                panel.finish(directory.list_custom_sounds());
            }),
        );
        if let Err(error) = spawned {
            self.sounds_panel.finish(Err(error.clone()));
            self.enqueue_toast(Notification::error(error.user_message()));
        }

        self.panel_snapshot = self.sounds_panel.snapshot();
        cx.notify();
    }

    fn start_update_polling(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self._update_poll_task = cx.spawn_in(window, async move |view, window| {
            loop {
                Timer::after(Duration::from_millis(UPDATE_POLL_INTERVAL_MS)).await;
                let keep_polling = match view
                    .update_in(window, |view, _window, cx| view.poll_background_updates(cx))
                {
                    Ok(keep_polling) => keep_polling,
                    Err(_) => break,
                };

                if !keep_polling {
                    break;
                }
            }
        });
    }

    /// One poll tick: apply everything the background tasks produced. The
    /// idle check happens before the drain so a notification enqueued right
    /// as a task finishes is still picked up on the final tick.
    fn poll_background_updates(&mut self, cx: &mut Context<Self>) -> bool {
        let was_active = !self.tracker.is_idle();
        let mut dirty = false;

        for notification in self.notifications.drain() {
            self.enqueue_toast(notification);
            dirty = true;
        }

        if let Some(sound_id) = self.signals.take_created() {
            self.selected_sound_id = Some(sound_id);
            dirty = true;
        }

        if self.signals.take_changed() {
            self.spawn_sounds_refresh(cx);
            dirty = true;
        }

        let snapshot = self.sounds_panel.snapshot();
        if snapshot != self.panel_snapshot {
            self.panel_snapshot = snapshot;
            dirty = true;
        }

        if dirty {
            cx.notify();
        }

        was_active || !self.tracker.is_idle()
    }
}

impl Render for SoundsAdminWindow {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<ChimeboardTheme>().clone();
        let colors = theme.colors;
        let can_save = self.form.can_save();
        let selected_file_label = self
            .form
            .selected_file()
            .map(|file| file.file_name.clone())
            .unwrap_or_else(|| SOUND_FILE_EMPTY_LABEL.to_string());
        let selected_file_path = self
            .form
            .selected_file()
            .map(|file| file.path.to_string_lossy().to_string());
        let panel = self.panel_snapshot.clone();
        let selected_sound_id = self.selected_sound_id.clone();
        let panel_is_empty = !panel.loading && panel.sounds.is_empty() && panel.error.is_none();

        div()
            .size_full()
            .overflow_y_scrollbar()
            .overflow_x_hidden()
            .flex()
            .flex_col()
            .gap(theme.layout.section_gap)
            .p(theme.layout.window_padding)
            .bg(colors.window_background)
            .text_color(colors.window_foreground)
            .child(Label::new(WINDOW_TITLE))
            .child(
                div()
                    .text_color(colors.muted_foreground)
                    .child(WINDOW_SUBTITLE),
            )
            .children(self.startup_notice.iter().map(|notice| {
                div()
                    .text_color(colors.accent_foreground)
                    .child(format!("Backend: {notice}"))
            }))
            .child(Label::new(NAME_FIELD_LABEL))
            .child(Input::new(&self.name_input))
            .child(Label::new(SOUND_FILE_FIELD_LABEL))
            .child(
                div()
                    .id("sound-file-panel")
                    .flex()
                    .flex_col()
                    .gap_2()
                    .p(theme.layout.panel_padding)
                    .border_1()
                    .border_color(colors.panel_border)
                    .bg(colors.panel_background)
                    .can_drop(|value, _, _| {
                        value
                            .downcast_ref::<ExternalPaths>()
                            .is_some_and(|paths| !paths.paths().is_empty())
                    })
                    .drag_over::<ExternalPaths>(move |style, paths, _, _| {
                        if paths.paths().iter().any(has_mp3_extension) {
                            style
                                .border_color(colors.drop_active_border)
                                .bg(colors.drop_active_background)
                        } else {
                            style
                                .border_color(colors.drop_invalid_border)
                                .bg(colors.drop_invalid_background)
                        }
                    })
                    .on_drop(cx.listener(|this, paths: &ExternalPaths, _window, cx| {
                        this.on_sound_file_drop(paths, cx)
                    }))
                    .child(
                        div()
                            .text_color(colors.muted_foreground)
                            .child(SOUND_FILE_DROP_HINT),
                    )
                    .child(
                        div()
                            .flex()
                            .items_center()
                            .gap_2()
                            .child(
                                Button::new("sound-file-select-button")
                                    .label("Select Sound File")
                                    .on_click(cx.listener(|this, _, window, cx| {
                                        this.on_select_sound_file_clicked(window, cx)
                                    })),
                            )
                            .child(div().child(selected_file_label)),
                    )
                    .children(
                        selected_file_path.into_iter().map(|path| {
                            div().text_color(colors.muted_foreground).child(path)
                        }),
                    ),
            )
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_2()
                    .child(
                        Button::new("cancel-button").label("Cancel").on_click(
                            cx.listener(|this, _, window, cx| this.on_cancel_clicked(window, cx)),
                        ),
                    )
                    .child(
                        Button::new("save-button")
                            .primary()
                            .label("Save")
                            .disabled(!can_save)
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.on_save_clicked(window, cx)
                            })),
                    ),
            )
            .child(
                div()
                    .id("sounds-panel")
                    .flex()
                    .flex_col()
                    .gap_2()
                    .p(theme.layout.panel_padding)
                    .border_1()
                    .border_color(colors.panel_border)
                    .bg(colors.panel_background)
                    .child(
                        div()
                            .flex()
                            .items_center()
                            .justify_between()
                            .child(Label::new(SOUNDS_PANEL_LABEL))
                            .child(
                                Button::new("sounds-refresh-button").label("Refresh").on_click(
                                    cx.listener(|this, _, window, cx| {
                                        this.on_refresh_clicked(window, cx)
                                    }),
                                ),
                            ),
                    )
                    .children(
                        std::iter::once(panel.loading)
                            .filter(|loading| *loading)
                            .map(|_| {
                                div()
                                    .text_color(colors.muted_foreground)
                                    .child(SOUNDS_LOADING_LABEL)
                            }),
                    )
                    .children(panel.error.iter().map(|message| {
                        div()
                            .text_color(colors.error_foreground)
                            .child(message.clone())
                    }))
                    .children(
                        std::iter::once(panel_is_empty)
                            .filter(|empty| *empty)
                            .map(|_| {
                                div()
                                    .text_color(colors.muted_foreground)
                                    .child(SOUNDS_EMPTY_LABEL)
                            }),
                    )
                    .children(panel.sounds.iter().map(|sound| {
                        let selected = selected_sound_id.as_deref() == Some(sound.id.as_str());
                        div()
                            .flex()
                            .items_center()
                            .justify_between()
                            .p_2()
                            .border_1()
                            .border_color(colors.selectable_panel_border(selected))
                            .bg(colors.selectable_panel_background(selected))
                            .child(div().child(sound.name.clone()))
                            .child(
                                div()
                                    .text_color(colors.muted_foreground)
                                    .child(sound.id.clone()),
                            )
                    })),
            )
            .children(self.toasts.clone().into_iter().map(|toast| {
                let (foreground, background) = match toast.kind {
                    NotificationKind::Success => {
                        (colors.success_foreground, colors.success_background)
                    }
                    NotificationKind::Error => (colors.error_foreground, colors.error_background),
                };
                let toast_id = toast.id;
                div()
                    .flex()
                    .items_center()
                    .justify_between()
                    .gap_2()
                    .p_2()
                    .border_1()
                    .border_color(foreground)
                    .bg(background)
                    .child(div().text_color(foreground).child(toast.message))
                    .child(
                        Button::new(("toast-dismiss", toast_id as usize))
                            .label("Dismiss")
                            .on_click(cx.listener(move |this, _, _window, cx| {
                                this.on_dismiss_toast(toast_id, cx)
                            })),
                    )
            }))
    }
}
