//! HTML pages for the interview flow. Templates live in `templates/` and use
//! `{placeholder}` markers; every substituted value is HTML-escaped.

use crate::models::session::Session;

const START_TEMPLATE: &str = include_str!("../../templates/start.html");
const INTERVIEW_TEMPLATE: &str = include_str!("../../templates/interview.html");
const RESULT_TEMPLATE: &str = include_str!("../../templates/result.html");

pub fn start_page() -> &'static str {
    START_TEMPLATE
}

/// Interview view for the question at `session.current_index` (1-based in the page).
pub fn interview_page(session_id: &str, session: &Session) -> String {
    INTERVIEW_TEMPLATE
        .replace("{session_id}", &escape_html(session_id))
        .replace("{index}", &(session.current_index + 1).to_string())
        .replace("{total}", &session.total().to_string())
        .replace("{question}", &escape_html(session.current_question()))
}

pub fn result_page(session: &Session, raw_evaluation: &str) -> String {
    let answers = session
        .answers
        .iter()
        .map(|qa| {
            format!(
                "    <dt>{}</dt>\n    <dd>{}</dd>",
                escape_html(&qa.question),
                escape_html(&qa.answer)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    RESULT_TEMPLATE
        .replace("{num_questions}", &session.meta.num_questions.to_string())
        .replace("{role}", &escape_html(&session.meta.role))
        .replace("{position}", &escape_html(&session.meta.position))
        .replace("{extra}", &escape_html(&session.meta.extra))
        .replace("{answers}", &answers)
        .replace("{evaluation}", &escape_html(raw_evaluation))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // Braces are escaped so user text can never form a template marker.
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}
