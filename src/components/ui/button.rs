use leptos::{ev::MouseEvent, prelude::*};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Ghost,
}

impl ButtonVariant {
    fn class_name(&self) -> &'static str {
        match self {
            ButtonVariant::Primary => "btn--primary",
            ButtonVariant::Ghost => "btn--ghost",
        }
    }
}

/// Builds the class list for a button in the given state.
pub fn button_classes(variant: ButtonVariant, disabled: bool, loading: bool) -> String {
    let mut classes = format!("btn {}", variant.class_name());
    if disabled {
        classes.push_str(" btn--disabled");
    }
    if loading {
        classes.push_str(" loading");
    }
    classes
}

#[component]
pub fn Button(
    #[prop(optional)] variant: ButtonVariant,
    #[prop(into)] disabled: Signal<bool>,
    #[prop(into)] loading: Signal<bool>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    on_click: Callback<MouseEvent>,
    children: Children,
) -> impl IntoView {
    view! {
        <button
            id=id
            aria-label=aria_label
            class=move || button_classes(variant, disabled.get(), loading.get())
            disabled=move || disabled.get()
            on:click=move |ev| {
                if !disabled.get_untracked() {
                    on_click.run(ev);
                }
            }
        >
            {children()}
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_primary_button() {
        assert_eq!(button_classes(ButtonVariant::default(), false, false), "btn btn--primary");
    }

    #[test]
    fn test_loading_button_is_marked() {
        assert_eq!(
            button_classes(ButtonVariant::Primary, true, true),
            "btn btn--primary btn--disabled loading"
        );
        assert_eq!(button_classes(ButtonVariant::Ghost, false, false), "btn btn--ghost");
    }
}
