use leptos::prelude::*;

use crate::components::copy_button::CopyButton;
use crate::prompts::NOT_APPLICABLE_CODE;
use crate::types::{GenerationType, OptimizedPrompts, PromptSlot, Variant};

const MISSING: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub slot: PromptSlot,
    pub text: String,
    pub visible: bool,
}

fn is_usable_code(value: Option<&str>) -> bool {
    match value {
        Some(v) => !v.trim().is_empty() && !v.eq_ignore_ascii_case(NOT_APPLICABLE_CODE),
        None => false,
    }
}

/// Decides what every result card shows for the chosen generation focus.
///
/// `focus == None` shows everything the server returned.
pub fn render_cards(prompts: &OptimizedPrompts, focus: Option<GenerationType>) -> Vec<Card> {
    PromptSlot::all()
        .map(|slot| {
            let value = prompts.get(slot);
            let wanted = focus.map_or(true, |f| f == slot.kind);

            match slot.kind {
                GenerationType::Text | GenerationType::Image => Card {
                    slot,
                    text: value.filter(|v| !v.is_empty()).unwrap_or(MISSING).to_string(),
                    visible: wanted && value.is_some_and(|v| !v.is_empty()),
                },
                GenerationType::Code if is_usable_code(value) => Card {
                    slot,
                    text: value.unwrap_or_default().to_string(),
                    visible: wanted,
                },
                GenerationType::Code => Card {
                    slot,
                    text: NOT_APPLICABLE_CODE.to_string(),
                    visible: focus == Some(GenerationType::Code),
                },
            }
        })
        .collect()
}

#[component]
fn PromptCard(card: Card) -> impl IntoView {
    let Card { slot, text, .. } = card;
    let copy_text = text.clone();

    view! {
        <div class="prompt-card" data-kind=slot.kind.value()>
            <div class="prompt-card__header">
                <h4>{slot.title()}</h4>
                <CopyButton text=copy_text />
            </div>
            <pre class="prompt-card__body">{text}</pre>
        </div>
    }
}

#[component]
pub fn ResultsSection(
    #[prop(into)] results: Signal<Option<(OptimizedPrompts, GenerationType)>>,
    section_ref: NodeRef<leptos::html::Section>,
) -> impl IntoView {
    view! {
        <section
            id="resultsSection"
            node_ref=section_ref
            class="results"
            style:display=move || if results.with(Option::is_some) { "block" } else { "none" }
        >
            {move || {
                results
                    .get()
                    .map(|(prompts, focus)| {
                        let cards = render_cards(&prompts, Some(focus));
                        Variant::ALL
                            .into_iter()
                            .filter_map(|variant| {
                                let group: Vec<Card> = cards
                                    .iter()
                                    .filter(|c| c.slot.variant == variant && c.visible)
                                    .cloned()
                                    .collect();
                                (!group.is_empty())
                                    .then(|| {
                                        view! {
                                            <div class="results__group">
                                                <h3>{variant.heading()}</h3>
                                                {group
                                                    .into_iter()
                                                    .map(|card| view! { <PromptCard card=card /> })
                                                    .collect_view()}
                                            </div>
                                        }
                                    })
                            })
                            .collect_view()
                    })
            }}
        </section>
    }
}
