use leptos::{
    ev::MouseEvent,
    html::{Section, Textarea},
    prelude::*,
    task::spawn_local,
};
use leptos_icons::Icon;
use log::{error, info};
use web_sys::{ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::client;
use crate::components::{
    background::AnimatedBackground,
    error_banner::ErrorBanner,
    footer::Footer,
    objective::{validate, GenerationOptions, ObjectiveInput},
    results::ResultsSection,
    theme_toggle::{Theme, ThemeToggle},
    ui::button::Button,
};
use crate::types::{GenerationType, OptimizedPrompts, TargetModel};

fn scroll_to(section_ref: NodeRef<Section>) {
    if let Some(section) = section_ref.get_untracked() {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        section.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

/// What the page shows around a generation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    pub error: Option<String>,
    pub results: Option<(OptimizedPrompts, GenerationType)>,
    pub loading: bool,
}

impl PageState {
    /// Shows `message` in the banner; results never stay up next to an error.
    pub fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.results = None;
    }

    pub fn start(&mut self) {
        self.error = None;
        self.results = None;
        self.loading = true;
    }

    pub fn succeed(&mut self, prompts: OptimizedPrompts, focus: GenerationType) {
        self.error = None;
        self.results = Some((prompts, focus));
    }

    /// The request finished, whichever way it went.
    pub fn settle(&mut self) {
        self.loading = false;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let theme = RwSignal::new(Theme::default());
    let objective = RwSignal::new(String::new());
    let generation_type = RwSignal::new(None::<GenerationType>);
    let target_model = RwSignal::new(None::<TargetModel>);

    let page = RwSignal::new(PageState::default());
    let error_message = Memo::new(move |_| page.with(|p| p.error.clone()));
    let results = Memo::new(move |_| page.with(|p| p.results.clone()));
    let loading = Memo::new(move |_| page.with(|p| p.loading));

    let input_ref = NodeRef::<Textarea>::new();
    let section_ref = NodeRef::<Section>::new();

    let generate = move |_: MouseEvent| {
        let submission = match validate(
            &objective.get_untracked(),
            generation_type.get_untracked(),
            target_model.get_untracked(),
        ) {
            Ok(submission) => submission,
            Err(e) => {
                page.update(|p| p.fail(e.to_string()));
                if e.focuses_input() {
                    if let Some(input) = input_ref.get_untracked() {
                        let _ = input.focus();
                    }
                }
                return;
            }
        };

        info!("User Goal: {}", submission.goal);
        info!("Generation Type: {}", submission.generation_type);
        info!("Model Type: {}", submission.target_model);

        page.update(PageState::start);

        spawn_local(async move {
            match client::generate_prompts(&submission.goal).await {
                Ok(prompts) => {
                    page.update(|p| p.succeed(prompts, submission.generation_type));
                    request_animation_frame(move || scroll_to(section_ref));
                }
                Err(e) => {
                    error!("Fetch error: {e}");
                    page.update(|p| p.fail(e.to_string()));
                }
            }
            page.update(PageState::settle);
        });
    };

    view! {
        <AnimatedBackground theme=theme />
        <div class="page">
            <header class="page__header">
                <h1 class="page__title">
                    <Icon icon=icondata_bs::BsStars width="28" height="28" />
                    "PromptSmith"
                </h1>
                <ThemeToggle theme=theme />
            </header>

            <main class="page__main">
                <p class="page__intro">
                    "Describe your goal and get tuned prompts for text, image and code models."
                </p>
                <ObjectiveInput value=objective input_ref=input_ref />
                <GenerationOptions generation_type=generation_type target_model=target_model />

                <Button
                    id="generateButton"
                    disabled=loading
                    loading=loading
                    on_click=Callback::new(generate)
                >
                    <Icon icon=icondata_bs::BsMagic width="16" height="16" />
                    <span>"Generate Prompts"</span>
                </Button>

                <div
                    id="loadingIndicator"
                    class="loading-indicator"
                    class=("visible", move || loading.get())
                >
                    <span class="loading-indicator__spinner"></span>
                    <span>"Crafting your prompts..."</span>
                </div>

                <ErrorBanner message=error_message on_close=move || page.update(PageState::dismiss_error) />

                <ResultsSection results=results section_ref=section_ref />
            </main>

            <Footer />
        </div>
    }
}
