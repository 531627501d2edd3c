use gpui::{App, Global, Hsla, Pixels, SharedString, px, rgb};
use gpui_component::Theme;

/// Palette for the admin window, registered as a gpui global so render code
/// reads one snapshot per frame.
#[derive(Debug, Clone, Copy)]
pub(super) struct ThemeColors {
    pub(super) window_background: Hsla,
    pub(super) window_foreground: Hsla,
    pub(super) panel_background: Hsla,
    pub(super) panel_border: Hsla,
    pub(super) panel_active_background: Hsla,
    pub(super) panel_active_border: Hsla,
    pub(super) primary: Hsla,
    pub(super) primary_dark: Hsla,
    pub(super) muted_foreground: Hsla,
    pub(super) accent_foreground: Hsla,
    pub(super) success_foreground: Hsla,
    pub(super) success_background: Hsla,
    pub(super) error_foreground: Hsla,
    pub(super) error_background: Hsla,
    pub(super) warning_foreground: Hsla,
    pub(super) drop_active_border: Hsla,
    pub(super) drop_active_background: Hsla,
    pub(super) drop_invalid_border: Hsla,
    pub(super) drop_invalid_background: Hsla,
}

impl ThemeColors {
    #[inline]
    pub(super) fn selectable_panel_border(self, selected: bool) -> Hsla {
        if selected {
            self.panel_active_border
        } else {
            self.panel_border
        }
    }

    #[inline]
    pub(super) fn selectable_panel_background(self, selected: bool) -> Hsla {
        if selected {
            self.panel_active_background
        } else {
            self.panel_background
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) struct ThemeLayout {
    pub(super) window_padding: Pixels,
    pub(super) section_gap: Pixels,
    pub(super) panel_padding: Pixels,
}

#[derive(Debug, Clone)]
pub(super) struct ChimeboardTheme {
    pub(super) colors: ThemeColors,
    pub(super) layout: ThemeLayout,
    font_family: SharedString,
    font_size: Pixels,
    control_radius: Pixels,
    panel_radius: Pixels,
}

impl Default for ChimeboardTheme {
    fn default() -> Self {
        Self {
            colors: ThemeColors {
                window_background: rgb(0x12141f).into(),
                window_foreground: rgb(0xf8fafc).into(),
                panel_background: rgb(0x191c2b).into(),
                panel_border: rgb(0x2c3150).into(),
                panel_active_background: rgb(0x202540).into(),
                panel_active_border: rgb(0x14b8a6).into(),
                primary: rgb(0x0d9488).into(),
                primary_dark: rgb(0x0f766e).into(),
                muted_foreground: rgb(0x94a3b8).into(),
                accent_foreground: rgb(0x7dd3fc).into(),
                success_foreground: rgb(0x86efac).into(),
                success_background: rgb(0x122c1e).into(),
                error_foreground: rgb(0xfca5a5).into(),
                error_background: rgb(0x331a1f).into(),
                warning_foreground: rgb(0xfcd34d).into(),
                drop_active_border: rgb(0x5eead4).into(),
                drop_active_background: rgb(0x0c2b2a).into(),
                drop_invalid_border: rgb(0xfda4af).into(),
                drop_invalid_background: rgb(0x3b1d29).into(),
            },
            layout: ThemeLayout {
                window_padding: px(16.0),
                section_gap: px(12.0),
                panel_padding: px(12.0),
            },
            font_family: ".SystemUIFont".into(),
            font_size: px(15.0),
            control_radius: px(6.0),
            panel_radius: px(10.0),
        }
    }
}

impl Global for ChimeboardTheme {}

pub(super) fn apply_default_theme(cx: &mut App) {
    let theme = ChimeboardTheme::default();
    paint_component_theme(&theme, cx);
    cx.set_global(theme);
}

/// Mirrors the palette into the gpui-component theme so its widgets pick up
/// the same colors as the hand-built layout.
fn paint_component_theme(theme: &ChimeboardTheme, cx: &mut App) {
    let colors = theme.colors;
    let component = Theme::global_mut(cx);

    component.font_family = theme.font_family.clone();
    component.font_size = theme.font_size;
    component.radius = theme.control_radius;
    component.radius_lg = theme.panel_radius;

    component.background = colors.window_background;
    component.foreground = colors.window_foreground;
    component.border = colors.panel_border;
    component.input = colors.panel_border;
    component.ring = colors.primary;
    component.muted_foreground = colors.muted_foreground;

    component.primary = colors.primary;
    component.primary_hover = colors.primary_dark;
    component.primary_active = colors.primary;
    component.primary_foreground = colors.window_foreground;

    component.secondary = colors.panel_background;
    component.secondary_hover = colors.panel_active_background;
    component.secondary_active = colors.panel_active_background;
    component.secondary_foreground = colors.window_foreground;

    component.danger = colors.error_foreground;
    component.danger_hover = colors.error_foreground;
    component.danger_active = colors.error_foreground;
    component.danger_foreground = colors.window_background;

    component.success = colors.success_foreground;
    component.success_hover = colors.success_foreground;
    component.success_active = colors.success_foreground;
    component.success_foreground = colors.window_background;

    component.warning = colors.warning_foreground;
    component.warning_hover = colors.warning_foreground;
    component.warning_active = colors.warning_foreground;
    component.warning_foreground = colors.window_background;

    component.list = colors.panel_background;
    component.list_hover = colors.panel_active_background;
    component.list_active = colors.panel_active_background;
    component.list_active_border = colors.panel_active_border;
}
