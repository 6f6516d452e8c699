//! Question Generator — asks the LLM for a numbered list of interview questions.

use tracing::info;

use crate::errors::AppError;
use crate::interview::prompts::{fill_template, QUESTION_PROMPT_TEMPLATE, QUESTION_SYSTEM};
use crate::llm_client::{ChatCompletion, ChatRequest};
use crate::models::session::InterviewMeta;

pub fn build_question_prompt(meta: &InterviewMeta) -> String {
    let num_questions = meta.num_questions.to_string();
    fill_template(
        QUESTION_PROMPT_TEMPLATE,
        &[
            ("num_questions", num_questions.as_str()),
            ("role", meta.role.as_str()),
            ("position", meta.position.as_str()),
            ("extra", meta.extra.as_str()),
        ],
    )
}

/// Splits a reply into questions: one per non-blank line, trimmed.
/// Numbering is kept as the model wrote it.
pub fn split_questions(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Generates interview questions for `meta`. The returned count is whatever the
/// model produced, not necessarily `meta.num_questions`.
pub async fn generate_questions(
    llm: &dyn ChatCompletion,
    meta: &InterviewMeta,
) -> Result<Vec<String>, AppError> {
    let request = ChatRequest::new(QUESTION_SYSTEM, build_question_prompt(meta));
    let reply = llm
        .complete(&request)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to generate questions: {e}")))?;

    let questions = split_questions(&reply);
    info!(
        "Generated {} question(s) for role '{}' (requested {})",
        questions.len(),
        meta.role,
        meta.num_questions
    );
    Ok(questions)
}
