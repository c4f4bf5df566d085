use log::{debug, info};
use std::sync::Arc;

use crate::prompts::{parse_prompts, render_instructions, GenerationError};
use crate::services::gemini::PromptModel;
use crate::types::OptimizedPrompts;

pub type SharedModel = Arc<dyn PromptModel>;

pub async fn generate_prompts(
    model: &dyn PromptModel,
    goal: &str,
) -> Result<OptimizedPrompts, GenerationError> {
    if goal.trim().is_empty() {
        return Err(GenerationError::EmptyGoal);
    }

    info!("Generating prompts for goal ({} chars)", goal.chars().count());
    let raw = model.generate(&render_instructions(goal)).await?;
    debug!("Raw model response: {raw}");

    parse_prompts(&raw)
}
