use leptos::prelude::*;
use leptos_icons::Icon;
use log::{debug, warn};
use web_sys::window;

pub const THEME_STORAGE_KEY: &str = "modernTheme";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Sky,
    Deep,
}

impl Theme {
    pub fn class_name(&self) -> &'static str {
        match self {
            Theme::Sky => "theme-sky",
            Theme::Deep => "theme-deep",
        }
    }

    pub fn from_class_name(name: &str) -> Option<Self> {
        match name {
            "theme-sky" => Some(Theme::Sky),
            "theme-deep" => Some(Theme::Deep),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Sky => Theme::Deep,
            Theme::Deep => Theme::Sky,
        }
    }

    pub fn aria_label(&self) -> &'static str {
        match self {
            Theme::Sky => "Switch to Deep Theme",
            Theme::Deep => "Switch to Sky Theme",
        }
    }

    /// A stored choice wins; without one the OS colour scheme decides.
    pub fn resolve(stored: Option<&str>, prefers_dark: bool) -> Self {
        match stored {
            Some(name) => Theme::from_class_name(name).unwrap_or_default(),
            None if prefers_dark => Theme::Deep,
            None => Theme::Sky,
        }
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok().flatten()
}

fn prefers_dark() -> bool {
    window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn load_theme() -> Theme {
    let stored = local_storage().and_then(|s| s.get_item(THEME_STORAGE_KEY).ok().flatten());
    Theme::resolve(stored.as_deref(), prefers_dark())
}

fn store_theme(theme: Theme) {
    if let Some(storage) = local_storage() {
        if let Err(e) = storage.set_item(THEME_STORAGE_KEY, theme.class_name()) {
            warn!("Failed to persist theme: {e:?}");
        }
    }
}

fn apply_theme(theme: Theme) {
    if let Some(window) = window() {
        if let Some(document) = window.document() {
            if let Some(body) = document.body() {
                body.set_class_name(theme.class_name());
            }
        }
    }
}

#[component]
pub fn ThemeToggle(theme: RwSignal<Theme>) -> impl IntoView {
    Effect::new(move |_| {
        let initial = load_theme();
        debug!("Initial theme: {}", initial.class_name());
        theme.set(initial);
    });

    Effect::new(move |_| apply_theme(theme.get()));

    let toggle_theme = move |_| {
        let next = theme.get_untracked().toggled();
        theme.set(next);
        store_theme(next);
    };

    let icon = Signal::derive(move || match theme.get() {
        Theme::Deep => icondata_bs::BsSun,
        Theme::Sky => icondata_bs::BsMoonStars,
    });

    view! {
        <button
            id="themeToggleBtn"
            class="theme-toggle"
            aria-label=move || theme.get().aria_label()
            on:click=toggle_theme
        >
            <Icon icon=icon width="18" height="18" />
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_theme_beats_color_scheme() {
        assert_eq!(Theme::resolve(Some("theme-sky"), true), Theme::Sky);
        assert_eq!(Theme::resolve(Some("theme-deep"), false), Theme::Deep);
    }

    #[test]
    fn test_color_scheme_used_without_stored_theme() {
        assert_eq!(Theme::resolve(None, true), Theme::Deep);
        assert_eq!(Theme::resolve(None, false), Theme::Sky);
    }

    #[test]
    fn test_unknown_stored_value_falls_back_to_sky() {
        assert_eq!(Theme::resolve(Some("theme-neon"), true), Theme::Sky);
    }

    #[test]
    fn test_toggle_and_labels() {
        assert_eq!(Theme::Sky.toggled(), Theme::Deep);
        assert_eq!(Theme::Deep.toggled().toggled(), Theme::Deep);
        assert_eq!(Theme::Deep.aria_label(), "Switch to Sky Theme");
        assert_eq!(Theme::Sky.aria_label(), "Switch to Deep Theme");
    }
}
