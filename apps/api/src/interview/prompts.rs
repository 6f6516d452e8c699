// All LLM prompt constants for the interview flow.

/// System prompt for question generation.
pub const QUESTION_SYSTEM: &str = "You are a helpful assistant.";

/// Question generation prompt template.
/// Replace: {num_questions}, {role}, {position}, {extra}
pub const QUESTION_PROMPT_TEMPLATE: &str = "Generate {num_questions} high-quality, unique \
    interview questions for a candidate applying for the role of {role}, position: {position}. \
    Additional context: {extra}. Return only a numbered list of questions.";

/// System prompt for answer evaluation.
pub const EVALUATION_SYSTEM: &str = "You are an expert interview evaluator. \
    Always provide evaluations in the exact format requested.";

pub const EVALUATION_TEMPERATURE: f32 = 0.7;
pub const EVALUATION_MAX_TOKENS: u32 = 2000;

/// Headings the evaluator reply must contain verbatim.
pub const REQUIRED_SECTIONS: [&str; 4] = [
    "Overall Score:",
    "Key Strengths:",
    "Key Weaknesses:",
    "Tips for Improvement:",
];

/// Evaluation prompt template.
/// Replace: {role}, {position}, {transcript}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"
You are an expert interview evaluator. Address the candidate directly using "you" (do NOT use third-person).
Evaluate these interview answers for a {role} {position} position.

Interview Responses:
{transcript}

Provide the evaluation EXACTLY in this format (use "you" in each item and keep headings verbatim):

Overall Score: [score]/100

Key Strengths:
1. You [specific strength and brief example]
2. You [specific strength and brief example]
3. You [specific strength and brief example]

Key Weaknesses:
1. You [specific weakness and context]
2. You [specific weakness and context]
3. You [specific weakness and context]

Tips for Improvement:
1. You should [actionable tip]
2. You should [actionable tip]
3. You should [actionable tip]

Brief Feedback:
- Q1: You [direct short feedback referencing the candidate's answer]
- Q2: You [direct short feedback referencing the candidate's answer]
- Q3: You [direct short feedback referencing the candidate's answer]
... (one line per question)

Do not add any other text, preface, or trailing commentary. Keep headings and numbering exactly as above.
"#;

/// Substitutes `{key}` markers in one pass. Values are copied verbatim and never
/// re-scanned, so user text containing a marker is sent as written.
/// Unknown markers are left in place.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let filled = tail.find('}').and_then(|end| {
            let key = &tail[..end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (end, *value))
        });
        match filled {
            Some((end, value)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
