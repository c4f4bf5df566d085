use leptos::prelude::*;
use thiserror::Error;

use crate::types::{GenerationType, TargetModel};

pub const MAX_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please define your objective first.")]
    EmptyObjective,
    #[error("Objective is too long. Max 500 characters, please.")]
    TooLong,
    #[error("Select a generation focus (Text, Image, or Code).")]
    MissingGenerationType,
    #[error("Select a target model.")]
    MissingTargetModel,
}

impl ValidationError {
    /// Whether the objective textarea should take focus after this error.
    pub fn focuses_input(&self) -> bool {
        matches!(self, ValidationError::EmptyObjective | ValidationError::TooLong)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub goal: String,
    pub generation_type: GenerationType,
    pub target_model: TargetModel,
}

/// Length as the browser reports it for a textarea value (UTF-16 code units).
pub fn char_count(input: &str) -> usize {
    input.encode_utf16().count()
}

pub fn counter_label(input: &str) -> String {
    format!("{} / {}", char_count(input), MAX_CHARS)
}

pub fn is_over_limit(input: &str) -> bool {
    char_count(input) > MAX_CHARS
}

/// Checks the form in the order the user sees the fields.
///
/// The length limit applies to the raw input, the submitted goal is trimmed.
pub fn validate(
    input: &str,
    generation_type: Option<GenerationType>,
    target_model: Option<TargetModel>,
) -> Result<Submission, ValidationError> {
    let goal = input.trim();
    if goal.is_empty() {
        return Err(ValidationError::EmptyObjective);
    }
    if is_over_limit(input) {
        return Err(ValidationError::TooLong);
    }
    let generation_type = generation_type.ok_or(ValidationError::MissingGenerationType)?;
    let target_model = target_model.ok_or(ValidationError::MissingTargetModel)?;

    Ok(Submission {
        goal: goal.to_string(),
        generation_type,
        target_model,
    })
}

#[component]
pub fn ObjectiveInput(
    value: RwSignal<String>,
    input_ref: NodeRef<leptos::html::Textarea>,
) -> impl IntoView {
    let over_limit = Memo::new(move |_| value.with(|v| is_over_limit(v)));

    view! {
        <div class="objective">
            <label for="userGoal" class="objective__label">
                "What do you want to create?"
            </label>
            <textarea
                id="userGoal"
                node_ref=input_ref
                rows="4"
                placeholder="e.g. A children's story about a lighthouse keeper who befriends a whale"
                class="objective__input"
                class=("objective__input--over", move || over_limit.get())
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            ></textarea>
            <div
                id="charCounter"
                class="objective__counter"
                class=("objective__counter--over", move || over_limit.get())
            >
                {move || value.with(|v| counter_label(v))}
            </div>
        </div>
    }
}

#[component]
pub fn GenerationOptions(
    generation_type: RwSignal<Option<GenerationType>>,
    target_model: RwSignal<Option<TargetModel>>,
) -> impl IntoView {
    view! {
        <div class="options">
            <fieldset class="options__group">
                <legend>"Generation focus"</legend>
                {GenerationType::ALL
                    .into_iter()
                    .map(|kind| {
                        view! {
                            <label class="options__choice">
                                <input
                                    type="radio"
                                    name="generationType"
                                    value=kind.value()
                                    prop:checked=move || generation_type.get() == Some(kind)
                                    on:change=move |ev| {
                                        generation_type.set(GenerationType::from_value(&event_target_value(&ev)));
                                    }
                                />
                                <span>{kind.label()}</span>
                            </label>
                        }
                    })
                    .collect_view()}
            </fieldset>
            <fieldset class="options__group">
                <legend>"Target model"</legend>
                {TargetModel::ALL
                    .into_iter()
                    .map(|model| {
                        view! {
                            <label class="options__choice">
                                <input
                                    type="radio"
                                    name="modelType"
                                    value=model.value()
                                    prop:checked=move || target_model.get() == Some(model)
                                    on:change=move |ev| {
                                        target_model.set(TargetModel::from_value(&event_target_value(&ev)));
                                    }
                                />
                                <span>{model.label()}</span>
                            </label>
                        }
                    })
                    .collect_view()}
            </fieldset>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_tracks_length() {
        assert_eq!(counter_label(""), "0 / 500");
        assert_eq!(counter_label("hello"), "5 / 500");
        assert_eq!(counter_label("héllo wörld"), "11 / 500");
    }

    #[test]
    fn test_astral_characters_count_twice() {
        let emoji = "😀".repeat(300);
        assert_eq!(counter_label(&emoji), "600 / 500");
        assert!(is_over_limit(&emoji));
        assert_eq!(
            validate(&emoji, Some(GenerationType::Text), Some(TargetModel::Gemini)),
            Err(ValidationError::TooLong)
        );
        assert!(!is_over_limit(&"😀".repeat(250)));
    }

    #[test]
    fn test_over_limit_is_strict() {
        assert!(!is_over_limit(&"a".repeat(500)));
        assert!(is_over_limit(&"a".repeat(501)));
    }

    #[test]
    fn test_blank_objective_rejected_first() {
        let err = validate("   \n", None, None).unwrap_err();
        assert_eq!(err, ValidationError::EmptyObjective);
        assert!(err.focuses_input());
        assert_eq!(err.to_string(), "Please define your objective first.");
    }

    #[test]
    fn test_too_long_counts_untrimmed_input() {
        let input = format!("  {}  ", "a".repeat(498));
        let err = validate(&input, Some(GenerationType::Text), Some(TargetModel::Gemini)).unwrap_err();
        assert_eq!(err, ValidationError::TooLong);
        assert_eq!(
            err.to_string(),
            "Objective is too long. Max 500 characters, please."
        );
    }

    #[test]
    fn test_radio_selections_required_in_order() {
        assert_eq!(
            validate("a poem", None, None),
            Err(ValidationError::MissingGenerationType)
        );
        let err = validate("a poem", Some(GenerationType::Image), None).unwrap_err();
        assert_eq!(err, ValidationError::MissingTargetModel);
        assert!(!err.focuses_input());
    }

    #[test]
    fn test_valid_submission_is_trimmed() {
        let submission = validate(
            "  a poem about rust  ",
            Some(GenerationType::Code),
            Some(TargetModel::Claude),
        )
        .unwrap();
        assert_eq!(submission.goal, "a poem about rust");
        assert_eq!(submission.generation_type, GenerationType::Code);
        assert_eq!(submission.target_model, TargetModel::Claude);
    }
}
