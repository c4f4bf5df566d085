use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGoal {
    pub goal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}

/// Prompt set returned by `POST /generate-prompts/`.
///
/// The server always fills the text and image fields; the code fields are
/// `None` when the goal has nothing to do with software.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizedPrompts {
    #[serde(default)]
    pub text_prompt: Option<String>,
    #[serde(default)]
    pub image_prompt: Option<String>,
    #[serde(default)]
    pub code_prompt: Option<String>,
    #[serde(default)]
    pub variation1_text_prompt: Option<String>,
    #[serde(default)]
    pub variation1_image_prompt: Option<String>,
    #[serde(default)]
    pub variation1_code_prompt: Option<String>,
    #[serde(default)]
    pub variation2_text_prompt: Option<String>,
    #[serde(default)]
    pub variation2_image_prompt: Option<String>,
    #[serde(default)]
    pub variation2_code_prompt: Option<String>,
}

impl OptimizedPrompts {
    pub fn get(&self, slot: PromptSlot) -> Option<&str> {
        let value = match (slot.variant, slot.kind) {
            (Variant::Primary, GenerationType::Text) => &self.text_prompt,
            (Variant::Primary, GenerationType::Image) => &self.image_prompt,
            (Variant::Primary, GenerationType::Code) => &self.code_prompt,
            (Variant::Formal, GenerationType::Text) => &self.variation1_text_prompt,
            (Variant::Formal, GenerationType::Image) => &self.variation1_image_prompt,
            (Variant::Formal, GenerationType::Code) => &self.variation1_code_prompt,
            (Variant::Experimental, GenerationType::Text) => &self.variation2_text_prompt,
            (Variant::Experimental, GenerationType::Image) => &self.variation2_image_prompt,
            (Variant::Experimental, GenerationType::Code) => &self.variation2_code_prompt,
        };
        value.as_deref()
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationType {
    Text,
    Image,
    Code,
}

impl GenerationType {
    pub const ALL: [GenerationType; 3] = [
        GenerationType::Text,
        GenerationType::Image,
        GenerationType::Code,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            GenerationType::Text => "text",
            GenerationType::Image => "image",
            GenerationType::Code => "code",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GenerationType::Text => "Text",
            GenerationType::Image => "Image",
            GenerationType::Code => "Code",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.value() == value)
    }
}

impl fmt::Display for GenerationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

// Only used to shape the user's choice client-side; never sent to the API.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetModel {
    Gemini,
    ChatGpt,
    Claude,
    Midjourney,
    StableDiffusion,
}

impl TargetModel {
    pub const ALL: [TargetModel; 5] = [
        TargetModel::Gemini,
        TargetModel::ChatGpt,
        TargetModel::Claude,
        TargetModel::Midjourney,
        TargetModel::StableDiffusion,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            TargetModel::Gemini => "gemini",
            TargetModel::ChatGpt => "chatgpt",
            TargetModel::Claude => "claude",
            TargetModel::Midjourney => "midjourney",
            TargetModel::StableDiffusion => "stable_diffusion",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TargetModel::Gemini => "Gemini",
            TargetModel::ChatGpt => "ChatGPT",
            TargetModel::Claude => "Claude",
            TargetModel::Midjourney => "Midjourney",
            TargetModel::StableDiffusion => "Stable Diffusion",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.value() == value)
    }
}

impl fmt::Display for TargetModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Variant {
    Primary,
    Formal,
    Experimental,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Primary, Variant::Formal, Variant::Experimental];

    pub fn heading(&self) -> &'static str {
        match self {
            Variant::Primary => "Optimized Prompts",
            Variant::Formal => "Variation 1 · Formal & Academic",
            Variant::Experimental => "Variation 2 · Experimental & Abstract",
        }
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromptSlot {
    pub variant: Variant,
    pub kind: GenerationType,
}

impl PromptSlot {
    /// All nine slots, grouped by variant.
    pub fn all() -> impl Iterator<Item = PromptSlot> {
        Variant::ALL.into_iter().flat_map(|variant| {
            GenerationType::ALL
                .into_iter()
                .map(move |kind| PromptSlot { variant, kind })
        })
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            GenerationType::Text => "Text Generation",
            GenerationType::Image => "Image Generation",
            GenerationType::Code => "Code Generation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_deserialize_with_missing_and_null_fields() {
        let json = r#"{"text_prompt": "write", "code_prompt": null}"#;
        let prompts: OptimizedPrompts = serde_json::from_str(json).unwrap();
        assert_eq!(prompts.text_prompt.as_deref(), Some("write"));
        assert_eq!(prompts.code_prompt, None);
        assert_eq!(prompts.variation2_image_prompt, None);
    }

    #[test]
    fn test_slot_lookup_matches_wire_fields() {
        let prompts = OptimizedPrompts {
            variation1_image_prompt: Some("formal image".into()),
            ..Default::default()
        };
        let slot = PromptSlot {
            variant: Variant::Formal,
            kind: GenerationType::Image,
        };
        assert_eq!(prompts.get(slot), Some("formal image"));
        assert_eq!(PromptSlot::all().count(), 9);
    }

    #[test]
    fn test_radio_values() {
        assert_eq!(GenerationType::from_value("code"), Some(GenerationType::Code));
        assert_eq!(GenerationType::from_value("video"), None);
        assert_eq!(
            TargetModel::from_value("stable_diffusion"),
            Some(TargetModel::StableDiffusion)
        );
    }

    #[test]
    fn test_display_is_radio_value() {
        assert_eq!(GenerationType::Image.to_string(), "image");
        assert_eq!(TargetModel::ChatGpt.to_string(), "chatgpt");
        assert_eq!(TargetModel::StableDiffusion.to_string(), "stable_diffusion");
    }
}
