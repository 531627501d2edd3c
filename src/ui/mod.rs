use gpui::{App, AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};
use gpui_component::Root;

mod backend;
mod state;
mod theme;
mod utils;
mod window;

const ADMIN_WINDOW_WIDTH: f32 = 560.0;
const ADMIN_WINDOW_HEIGHT: f32 = 680.0;
const UPDATE_POLL_INTERVAL_MS: u64 = 50;

const WINDOW_TITLE: &str = "Custom Sounds";
const WINDOW_SUBTITLE: &str = "Add a notification sound for the workspace.";
const NAME_FIELD_LABEL: &str = "Name";
const NAME_PLACEHOLDER: &str = "Name";
const SOUND_FILE_FIELD_LABEL: &str = "Sound File (MP3)";
const SOUND_FILE_EMPTY_LABEL: &str = "none";
const SOUND_FILE_PICKER_PROMPT: &str = "Select Sound File (.mp3)";
const SOUND_FILE_DROP_HINT: &str = "Drop an .mp3 file here or choose one from the dialog.";
const SOUND_FILE_DROP_ERROR_MESSAGE: &str = "Drop at least one file to choose the sound.";
const SOUNDS_PANEL_LABEL: &str = "Workspace sounds";
const SOUNDS_LOADING_LABEL: &str = "Loading sounds...";
const SOUNDS_EMPTY_LABEL: &str = "No custom sounds yet.";
const UNCONFIGURED_BACKEND_NOTICE: &str = "No workspace server is configured. Set CHIMEBOARD_SERVER_URL, CHIMEBOARD_AUTH_TOKEN and CHIMEBOARD_USER_ID to enable saving sounds.";

pub(crate) fn run_admin_app() {
    Application::new().run(|cx: &mut App| {
        gpui_component::init(cx);
        theme::apply_default_theme(cx);

        let bounds = Bounds::centered(
            None,
            size(px(ADMIN_WINDOW_WIDTH), px(ADMIN_WINDOW_HEIGHT)),
            cx,
        );
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            ..Default::default()
        };

        if cx
            .open_window(options, |window, cx| {
                let view = cx.new(|cx| window::SoundsAdminWindow::new(window, cx));
                cx.new(|cx| Root::new(view, window, cx))
            })
            .is_err()
        {
            cx.quit();
            return;
        }

        cx.on_window_closed(|cx| {
            if cx.windows().is_empty() {
                cx.quit();
            }
        })
        .detach();

        cx.activate(true);
    });
}
