use leptos::{prelude::*, task::spawn_local};
use leptos_icons::Icon;
use log::error;
use std::time::Duration;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CopyState {
    Idle,
    Copied,
    Failed,
}

impl CopyState {
    pub fn label(&self) -> &'static str {
        match self {
            CopyState::Idle => "Copy",
            CopyState::Copied => "Copied!",
            CopyState::Failed => "Error!",
        }
    }

    /// How long the feedback stays up before the button goes back to idle.
    pub fn reset_after(&self) -> Option<Duration> {
        match self {
            CopyState::Idle => None,
            CopyState::Copied => Some(Duration::from_millis(1800)),
            CopyState::Failed => Some(Duration::from_millis(2000)),
        }
    }
}

async fn write_to_clipboard(text: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
    let promise = window.navigator().clipboard().write_text(text);
    JsFuture::from(promise).await.map(|_| ())
}

#[component]
pub fn CopyButton(#[prop(into)] text: Signal<String>) -> impl IntoView {
    let (state, set_state) = signal(CopyState::Idle);

    let copy = move |_| {
        let content = text.get_untracked();
        spawn_local(async move {
            let next = match write_to_clipboard(&content).await {
                Ok(()) => CopyState::Copied,
                Err(e) => {
                    error!("Clipboard write failed: {e:?}");
                    CopyState::Failed
                }
            };
            set_state.set(next);
            if let Some(delay) = next.reset_after() {
                set_timeout(move || set_state.set(CopyState::Idle), delay);
            }
        });
    };

    let icon = Signal::derive(move || match state.get() {
        CopyState::Copied => icondata_bs::BsCheck2,
        CopyState::Failed => icondata_bs::BsExclamationTriangle,
        CopyState::Idle => icondata_bs::BsClipboard,
    });

    view! {
        <button
            class="copy-btn"
            class=("copied", move || state.get() == CopyState::Copied)
            disabled=move || state.get() == CopyState::Copied
            on:click=copy
        >
            <Icon icon=icon width="14" height="14" />
            <span>{move || state.get().label()}</span>
        </button>
    }
}
