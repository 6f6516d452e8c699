//! Answer Evaluator — scores a finished transcript and checks the reply layout.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::prompts::{
    fill_template, EVALUATION_MAX_TOKENS, EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM,
    EVALUATION_TEMPERATURE, REQUIRED_SECTIONS,
};
use crate::llm_client::{ChatCompletion, ChatRequest};
use crate::models::session::{AnswerRecord, Evaluation, InterviewMeta};

/// Renders answers as alternating `Q:` / `A:` lines in submission order.
pub fn build_transcript(answers: &[AnswerRecord]) -> String {
    answers
        .iter()
        .map(|qa| format!("Q: {}\nA: {}", qa.question, qa.answer))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_evaluation_prompt(meta: &InterviewMeta, answers: &[AnswerRecord]) -> String {
    let transcript = build_transcript(answers);
    fill_template(
        EVALUATION_PROMPT_TEMPLATE,
        &[
            ("role", meta.role.as_str()),
            ("position", meta.position.as_str()),
            ("transcript", transcript.as_str()),
        ],
    )
}

/// Required headings absent from `reply`, in canonical order.
pub fn missing_sections(reply: &str) -> Vec<&'static str> {
    REQUIRED_SECTIONS
        .iter()
        .copied()
        .filter(|section| !reply.contains(section))
        .collect()
}

/// Evaluates a completed interview. The reply is returned verbatim once it is
/// known to contain every required heading; it is never retried.
pub async fn evaluate_answers(
    llm: &dyn ChatCompletion,
    meta: &InterviewMeta,
    answers: &[AnswerRecord],
) -> Result<Evaluation, AppError> {
    let request = ChatRequest::new(EVALUATION_SYSTEM, build_evaluation_prompt(meta, answers))
        .temperature(EVALUATION_TEMPERATURE)
        .max_tokens(EVALUATION_MAX_TOKENS);

    let reply = llm
        .complete(&request)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to evaluate answers: {e}")))?;

    let missing = missing_sections(&reply);
    if !missing.is_empty() {
        warn!("Discarding evaluation reply missing sections: {missing:?}");
        return Err(AppError::EvaluationFormat(format!(
            "Failed to evaluate answers: Evaluation response missing required sections: {}",
            missing.join(", ")
        )));
    }

    info!("Evaluated {} answer(s) for role '{}'", answers.len(), meta.role);
    Ok(Evaluation {
        raw_evaluation: reply,
    })
}
