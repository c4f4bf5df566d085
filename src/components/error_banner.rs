use leptos::prelude::*;
use leptos_icons::Icon;

use crate::components::ui::button::{Button, ButtonVariant};

#[component]
pub fn ErrorBanner(
    #[prop(into)] message: Signal<Option<String>>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    view! {
        <div
            id="errorDisplay"
            class="error-banner"
            role="alert"
            style:display=move || if message.with(Option::is_some) { "flex" } else { "none" }
        >
            <Icon icon=icondata_bs::BsExclamationOctagon width="18" height="18" />
            <span id="errorMessageText" class="error-banner__text">
                {move || message.get().unwrap_or_default()}
            </span>
            <Button
                variant=ButtonVariant::Ghost
                disabled=false
                loading=false
                aria_label="Dismiss error"
                on_click=Callback::new(move |_| on_close.run(()))
            >
                <Icon icon=icondata_bs::BsX width="16" height="16" />
            </Button>
        </div>
    }
}
