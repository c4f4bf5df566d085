use chrono::{Datelike, Local};
use leptos::prelude::*;

#[component]
pub fn Footer() -> impl IntoView {
    let year = Local::now().year();

    view! {
        <footer class="footer">
            <span>"©"</span>
            <span id="currentYear">{year}</span>
            <span>"•"</span>
            <span class="footer__brand">"PromptSmith"</span>
        </footer>
    }
}
